use std::time::Duration;

use url::Url;

use crate::domain::validation::ValidationError;
use crate::domain::value::{AccountSid, ApiKey, SenderName};

/// Gateway base URL used when no `RootURL` is configured.
pub const DEFAULT_ROOT_URL: &str = "https://api.kaleyra.io/v1/";

/// Request timeout used when none (or zero) is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Idle connections kept per gateway host when none (or zero) is configured.
pub const DEFAULT_MAX_IDLE_PER_HOST: usize = 1;

const MESSAGES_PATH: &str = "messages";

#[derive(Debug, Clone)]
/// Resolved, immutable channel configuration.
///
/// Invariant: `endpoint` is an absolute http(s) URL of the form `<root>/<sid>/messages`.
pub struct ChannelConfig {
    api_key: ApiKey,
    sid: AccountSid,
    sender: SenderName,
    endpoint: String,
    timeout: Duration,
    max_idle_per_host: usize,
}

impl ChannelConfig {
    pub(crate) fn resolve(
        api_key: ApiKey,
        sid: AccountSid,
        sender: SenderName,
        root_url: Option<&str>,
        timeout: Option<Duration>,
        max_idle_per_host: Option<usize>,
    ) -> Result<Self, ValidationError> {
        let endpoint = resolve_endpoint(root_url, &sid)?;
        Ok(Self {
            api_key,
            sid,
            sender,
            endpoint,
            timeout: timeout
                .filter(|it| !it.is_zero())
                .unwrap_or(DEFAULT_TIMEOUT),
            max_idle_per_host: max_idle_per_host
                .filter(|it| *it > 0)
                .unwrap_or(DEFAULT_MAX_IDLE_PER_HOST),
        })
    }

    /// Fully-qualified URL messages are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn sid(&self) -> &AccountSid {
        &self.sid
    }

    pub fn sender(&self) -> &SenderName {
        &self.sender
    }

    /// Upper bound on one push round trip.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn max_idle_per_host(&self) -> usize {
        self.max_idle_per_host
    }

    pub(crate) fn api_key(&self) -> &ApiKey {
        &self.api_key
    }
}

/// Join a root URL and an account id into `<root>/<sid>/messages`.
///
/// A missing or blank root falls back to [`DEFAULT_ROOT_URL`]; trailing slashes on the root
/// are collapsed so the result never contains `//` at the join.
pub fn resolve_endpoint(
    root_url: Option<&str>,
    sid: &AccountSid,
) -> Result<String, ValidationError> {
    let root = root_url
        .map(str::trim)
        .filter(|it| !it.is_empty())
        .unwrap_or(DEFAULT_ROOT_URL);
    let endpoint = format!(
        "{}/{}/{}",
        root.trim_end_matches('/'),
        sid.as_str(),
        MESSAGES_PATH
    );

    let parsed = Url::parse(&endpoint).map_err(|err| ValidationError::InvalidRootUrl {
        input: root.to_owned(),
        reason: err.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ValidationError::InvalidRootUrl {
            input: root.to_owned(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }
    if parsed.host_str().is_none() {
        return Err(ValidationError::InvalidRootUrl {
            input: root.to_owned(),
            reason: "missing host".to_owned(),
        });
    }

    Ok(endpoint)
}
