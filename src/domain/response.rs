/// Literal status the gateway reports for an accepted message.
pub const STATUS_OK: &str = "OK";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ok,
    /// Any other status string, kept as reported.
    Other(String),
}

impl Status {
    pub fn from_wire(value: &str) -> Self {
        if value == STATUS_OK {
            Self::Ok
        } else {
            Self::Other(value.to_owned())
        }
    }
}

/// Decoded gateway reply to a push. `data` is kept as raw JSON and never interpreted.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    pub status: Status,
    pub message: String,
    pub data: Option<String>,
}
