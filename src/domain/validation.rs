use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty { field: &'static str },
    InvalidRootUrl { input: String, reason: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::InvalidRootUrl { input, reason } => {
                write!(f, "invalid root URL {input:?}: {reason}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// A destination that does not look like an international mobile number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAddressError {
    pub input: String,
}

impl fmt::Display for InvalidAddressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid mobile number: {}", self.input)
    }
}

impl std::error::Error for InvalidAddressError {}
