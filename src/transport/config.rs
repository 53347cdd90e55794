use std::time::Duration;

use serde::Deserialize;

/// Channel configuration as it appears in the host's JSON blob.
///
/// Every key is optional at this level; required fields are enforced by the domain types.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigJson {
    #[serde(rename = "RootURL", alias = "root_url")]
    root_url: Option<String>,
    #[serde(rename = "APIKey", alias = "api_key")]
    api_key: Option<String>,
    #[serde(rename = "SID", alias = "sid")]
    sid: Option<String>,
    #[serde(rename = "Sender", alias = "sender")]
    sender: Option<String>,
    /// Seconds.
    #[serde(rename = "Timeout", alias = "timeout")]
    timeout: Option<u64>,
    #[serde(rename = "MaxIdleConns", alias = "max_idle_conns")]
    max_idle_conns: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    pub root_url: Option<String>,
    pub api_key: String,
    pub sid: String,
    pub sender: String,
    pub timeout: Option<Duration>,
    pub max_idle_conns: Option<usize>,
}

pub fn decode_config_json(json: &[u8]) -> Result<ConfigDocument, serde_json::Error> {
    let parsed: ConfigJson = serde_json::from_slice(json)?;

    Ok(ConfigDocument {
        root_url: parsed.root_url,
        api_key: parsed.api_key.unwrap_or_default(),
        sid: parsed.sid.unwrap_or_default(),
        sender: parsed.sender.unwrap_or_default(),
        timeout: parsed.timeout.map(Duration::from_secs),
        max_idle_conns: parsed.max_idle_conns,
    })
}
