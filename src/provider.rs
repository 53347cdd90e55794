//! Host-facing channel contract and the static capabilities of the SMS channel.

use std::future::Future;
use std::pin::Pin;

use crate::client::DispatchError;
use crate::domain::InvalidAddressError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Static, process-wide description of a delivery channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub provider_id: &'static str,
    pub channel_name: &'static str,
    pub address_name: &'static str,
    pub address_desc: &'static str,
    pub max_address_len: usize,
    pub max_otp_len: usize,
    pub max_body_len: usize,
}

impl Capabilities {
    /// Help text shown next to the OTP input.
    pub fn channel_desc(&self) -> String {
        format!(
            "We've sent a {} digit code in an SMS to your mobile.\n\
             Enter it here to verify your mobile number.",
            self.max_otp_len
        )
    }
}

/// Capabilities of the solsms SMS channel.
pub const SOLSMS: Capabilities = Capabilities {
    provider_id: "solsms",
    channel_name: "SMS",
    address_name: "Mobile number",
    address_desc: "Please enter your mobile number",
    max_address_len: 11,
    max_otp_len: 6,
    max_body_len: 140,
};

/// A delivery channel the host can drive without knowing which one it is.
///
/// The host validates the address, enforces [`Provider::max_body_len`] on the rendered body,
/// and then calls [`Provider::push`] once per message. Retries belong to the host.
pub trait Provider: Send + Sync {
    fn capabilities(&self) -> &'static Capabilities;

    /// Syntactic check of a destination; never touches the network.
    fn validate_address(&self, address: &str) -> Result<(), InvalidAddressError>;

    /// Deliver `body` to `address` in exactly one gateway round trip.
    fn push<'a>(
        &'a self,
        address: &'a str,
        body: &'a [u8],
    ) -> BoxFuture<'a, Result<(), DispatchError>>;

    fn id(&self) -> &'static str {
        self.capabilities().provider_id
    }

    fn channel_name(&self) -> &'static str {
        self.capabilities().channel_name
    }

    fn address_name(&self) -> &'static str {
        self.capabilities().address_name
    }

    fn channel_desc(&self) -> String {
        self.capabilities().channel_desc()
    }

    fn address_desc(&self) -> &'static str {
        self.capabilities().address_desc
    }

    fn max_address_len(&self) -> usize {
        self.capabilities().max_address_len
    }

    fn max_otp_len(&self) -> usize {
        self.capabilities().max_otp_len
    }

    fn max_body_len(&self) -> usize {
        self.capabilities().max_body_len
    }
}
