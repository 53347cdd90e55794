use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::validation::{InvalidAddressError, ValidationError};

static MOBILE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9]{8,15}$").expect("mobile number pattern is valid"));

#[derive(Clone, PartialEq, Eq, Hash)]
/// Gateway API key, sent as the `api-key` header.
///
/// Invariant: non-empty after trimming. `Debug` never prints the key.
pub struct ApiKey(String);

impl ApiKey {
    /// Configuration key carrying the API key (`APIKey`).
    pub const CONFIG_KEY: &'static str = "APIKey";

    /// HTTP header the gateway reads the key from.
    pub const HEADER: &'static str = "api-key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: Self::CONFIG_KEY,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Gateway account identifier (`SID`), used as a path segment of the endpoint.
///
/// Invariant: non-empty after trimming.
pub struct AccountSid(String);

impl AccountSid {
    /// Configuration key carrying the account id (`SID`).
    pub const CONFIG_KEY: &'static str = "SID";

    /// Create a validated [`AccountSid`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: Self::CONFIG_KEY,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated account id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Sender name shown to the recipient (`sender`).
///
/// Invariant: non-empty after trimming. The name must be registered with the gateway account.
pub struct SenderName(String);

impl SenderName {
    /// Configuration key carrying the sender name (`Sender`).
    pub const CONFIG_KEY: &'static str = "Sender";

    /// Form field name used by the gateway (`sender`).
    pub const FIELD: &'static str = "sender";

    /// Create a validated [`SenderName`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty {
                field: Self::CONFIG_KEY,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated sender name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Mobile number in international shape: optional leading `+`, then 8 to 15 digits.
///
/// This is a syntactic check only; it says nothing about whether the number exists.
pub struct Address(String);

impl Address {
    /// Form field name used by the gateway (`to`).
    pub const FIELD: &'static str = "to";

    /// Validate `value` against the mobile number shape.
    pub fn new(value: impl Into<String>) -> Result<Self, InvalidAddressError> {
        let value = value.into();
        if !MOBILE_NUMBER.is_match(&value) {
            return Err(InvalidAddressError { input: value });
        }
        Ok(Self(value))
    }

    /// Borrow the number exactly as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Form field carrying the message text (`body`).
pub const BODY_FIELD: &str = "body";
