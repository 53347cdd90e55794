use serde::Deserialize;
use serde_json::value::RawValue;
use url::form_urlencoded::byte_serialize;

use crate::domain::{Address, BODY_FIELD, GatewayResponse, PushSms, SenderName, Status};

#[derive(Debug, Deserialize)]
struct PushJsonResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Box<RawValue>>,
}

/// Encode the push payload as `application/x-www-form-urlencoded`.
///
/// The body is percent-encoded byte by byte, so it reaches the gateway verbatim even when it
/// is not valid UTF-8.
pub fn encode_push_form(request: &PushSms<'_>) -> String {
    let fields: [(&str, &[u8]); 3] = [
        (SenderName::FIELD, request.sender.as_str().as_bytes()),
        (Address::FIELD, request.to.as_bytes()),
        (BODY_FIELD, request.body),
    ];

    fields
        .iter()
        .map(|(key, value)| format!("{key}={}", byte_serialize(value).collect::<String>()))
        .collect::<Vec<_>>()
        .join("&")
}

pub fn decode_push_json_response(json: &str) -> Result<GatewayResponse, serde_json::Error> {
    let parsed: PushJsonResponse = serde_json::from_str(json)?;

    Ok(GatewayResponse {
        status: Status::from_wire(parsed.status.as_deref().unwrap_or_default()),
        message: parsed.message.unwrap_or_default(),
        data: parsed.data.map(|raw| raw.get().to_owned()),
    })
}
