//! SMS one-time-passcode delivery channel for the solsms (Kaleyra) messages API.
//!
//! The crate is layered the same way throughout: a domain layer of validated types, a
//! transport layer for wire-format details, and a small client layer that performs the
//! single HTTP round trip behind [`Provider::push`].
//!
//! ```rust,no_run
//! use solsms::{Provider, SolSms};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let channel = SolSms::new(br#"{"APIKey":"...","SID":"...","Sender":"OTPSMS"}"#)?;
//!     channel.validate_address("+919876543210")?;
//!     channel.push("+919876543210", b"Your code is 123456").await?;
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod provider;
mod transport;

pub use client::{ConfigError, DispatchError, DispatchErrorKind, SolSms, SolSmsBuilder};
pub use domain::{
    AccountSid, Address, ApiKey, ChannelConfig, GatewayResponse, InvalidAddressError, SenderName,
    Status, ValidationError,
};
pub use provider::{BoxFuture, Capabilities, Provider, SOLSMS};
