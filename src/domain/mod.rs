//! Domain layer: strong types with validation and invariants (no I/O).

mod config;
mod request;
mod response;
mod validation;
mod value;

pub use config::{
    ChannelConfig, DEFAULT_MAX_IDLE_PER_HOST, DEFAULT_ROOT_URL, DEFAULT_TIMEOUT, resolve_endpoint,
};
pub use request::PushSms;
pub use response::{GatewayResponse, STATUS_OK, Status};
pub use validation::{InvalidAddressError, ValidationError};
pub use value::{AccountSid, Address, ApiKey, BODY_FIELD, SenderName};
