//! Client layer: orchestrates transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::domain::{
    AccountSid, Address, ApiKey, ChannelConfig, InvalidAddressError, PushSms, SenderName, Status,
    ValidationError,
};
use crate::provider::{BoxFuture, Capabilities, Provider, SOLSMS};

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a ApiKey,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        api_key: &'a ApiKey,
        body: String,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .header(ApiKey::HEADER, api_key.as_str())
                .body(body)
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors that prevent a [`SolSms`] channel from being constructed.
pub enum ConfigError {
    /// The configuration blob is not a JSON object of the expected shape.
    #[error("invalid configuration: {0}")]
    Decode(#[source] serde_json::Error),

    /// A required value is missing or the root URL is unusable.
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// The HTTP client could not be built (e.g. TLS backend initialization).
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] Box<dyn StdError + Send + Sync>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchErrorKind {
    Transport,
    Protocol,
    Rejected,
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SolSms::push`].
///
/// Every non-`OK` gateway status maps to [`Rejected`]; `data` is never inspected.
///
/// [`Rejected`]: DispatchError::Rejected
pub enum DispatchError {
    /// The round trip did not complete (DNS, connect, TLS, timeout, body read).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// The gateway answered with a body that is not a gateway response.
    #[error("unexpected gateway response (HTTP {status}): {source}")]
    Protocol {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    /// The gateway refused the message; `message` is its reason, verbatim.
    #[error("gateway rejected message: {message}")]
    Rejected { status: Status, message: String },
}

impl DispatchError {
    pub fn kind(&self) -> DispatchErrorKind {
        match self {
            Self::Transport(_) => DispatchErrorKind::Transport,
            Self::Protocol { .. } => DispatchErrorKind::Protocol,
            Self::Rejected { .. } => DispatchErrorKind::Rejected,
        }
    }

    /// Infrastructure failures may succeed on a later attempt; rejections need a changed request.
    pub fn is_retryable(&self) -> bool {
        !matches!(self.kind(), DispatchErrorKind::Rejected)
    }

    /// Whether the configured timeout elapsed before the gateway answered.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(source) => source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_timeout),
            _ => false,
        }
    }

    /// Gateway-supplied reason for a rejection.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SolSms`].
///
/// Use this to configure the channel from code instead of a JSON blob.
pub struct SolSmsBuilder {
    api_key: ApiKey,
    sid: AccountSid,
    sender: SenderName,
    root_url: Option<String>,
    timeout: Option<Duration>,
    max_idle_per_host: Option<usize>,
    user_agent: Option<String>,
}

impl SolSmsBuilder {
    /// Create a builder with the default root URL, timeout and idle pool size.
    pub fn new(api_key: ApiKey, sid: AccountSid, sender: SenderName) -> Self {
        Self {
            api_key,
            sid,
            sender,
            root_url: None,
            timeout: None,
            max_idle_per_host: None,
            user_agent: None,
        }
    }

    /// Override the gateway base URL; the account path is appended to it.
    pub fn root_url(mut self, root_url: impl Into<String>) -> Self {
        self.root_url = Some(root_url.into());
        self
    }

    /// Bound on one push round trip. Zero means the default (5 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Idle connections kept per gateway host. Zero means the default (1).
    pub fn max_idle_per_host(mut self, max: usize) -> Self {
        self.max_idle_per_host = Some(max);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Resolve the endpoint and build a [`SolSms`].
    pub fn build(self) -> Result<SolSms, ConfigError> {
        let config = ChannelConfig::resolve(
            self.api_key,
            self.sid,
            self.sender,
            self.root_url.as_deref(),
            self.timeout,
            self.max_idle_per_host,
        )?;

        let mut builder = reqwest::Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout())
            .pool_max_idle_per_host(config.max_idle_per_host());
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| ConfigError::HttpClient(Box::new(err)))?;

        tracing::info!(
            endpoint = %config.endpoint(),
            timeout_secs = config.timeout().as_secs_f64(),
            max_idle_per_host = config.max_idle_per_host(),
            "solsms channel configured"
        );

        Ok(SolSms {
            config: Arc::new(config),
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// SMS delivery channel backed by the solsms (Kaleyra) messages API.
///
/// Cloning is cheap; clones share the configuration and the connection pool. `push` takes
/// `&self` and may be called concurrently.
pub struct SolSms {
    config: Arc<ChannelConfig>,
    http: Arc<dyn HttpTransport>,
}

impl fmt::Debug for SolSms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolSms")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SolSms {
    /// Create a channel from the host's JSON configuration blob.
    ///
    /// Recognized keys: `RootURL` (optional), `APIKey`, `SID`, `Sender` (required),
    /// `Timeout` in seconds and `MaxIdleConns` (optional, zero means default).
    pub fn new(config_json: &[u8]) -> Result<Self, ConfigError> {
        let doc = crate::transport::decode_config_json(config_json).map_err(ConfigError::Decode)?;

        let api_key = ApiKey::new(doc.api_key)?;
        let sender = SenderName::new(doc.sender)?;
        let sid = AccountSid::new(doc.sid)?;

        let mut builder = SolSmsBuilder::new(api_key, sid, sender);
        if let Some(root_url) = doc.root_url {
            builder = builder.root_url(root_url);
        }
        if let Some(timeout) = doc.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(max) = doc.max_idle_conns {
            builder = builder.max_idle_per_host(max);
        }
        builder.build()
    }

    /// Start building a channel with custom settings.
    pub fn builder(api_key: ApiKey, sid: AccountSid, sender: SenderName) -> SolSmsBuilder {
        SolSmsBuilder::new(api_key, sid, sender)
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Check that `address` looks like an international mobile number.
    pub fn validate_address(&self, address: &str) -> Result<(), InvalidAddressError> {
        Address::new(address).map(|_| ())
    }

    /// Send `body` to `address` through the gateway.
    ///
    /// The body is sent verbatim; callers enforce [`Capabilities::max_body_len`] beforehand.
    ///
    /// Errors:
    /// - [`DispatchError::Transport`] when the request or body read fails or times out,
    /// - [`DispatchError::Protocol`] when the reply is not a gateway response,
    /// - [`DispatchError::Rejected`] when the gateway status is anything but `OK`.
    pub async fn push(&self, address: &str, body: &[u8]) -> Result<(), DispatchError> {
        let form = crate::transport::encode_push_form(&PushSms {
            sender: self.config.sender(),
            to: address,
            body,
        });

        tracing::debug!(
            endpoint = %self.config.endpoint(),
            to = address,
            body_len = body.len(),
            "pushing sms"
        );

        let response = self
            .http
            .post_form(self.config.endpoint(), self.config.api_key(), form)
            .await
            .map_err(DispatchError::Transport)?;

        let parsed = crate::transport::decode_push_json_response(&response.body).map_err(
            |source| DispatchError::Protocol {
                status: response.status,
                source,
            },
        )?;

        if parsed.status != Status::Ok {
            tracing::warn!(
                to = address,
                status = ?parsed.status,
                message = %parsed.message,
                "gateway rejected sms"
            );
            return Err(DispatchError::Rejected {
                status: parsed.status,
                message: parsed.message,
            });
        }

        Ok(())
    }
}

impl Provider for SolSms {
    fn capabilities(&self) -> &'static Capabilities {
        &SOLSMS
    }

    fn validate_address(&self, address: &str) -> Result<(), InvalidAddressError> {
        SolSms::validate_address(self, address)
    }

    fn push<'a>(
        &'a self,
        address: &'a str,
        body: &'a [u8],
    ) -> BoxFuture<'a, Result<(), DispatchError>> {
        Box::pin(SolSms::push(self, address, body))
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Clone)]
    struct FakeTransport {
        state: Arc<Mutex<FakeTransportState>>,
    }

    #[derive(Debug)]
    struct FakeTransportState {
        last_url: Option<String>,
        last_api_key: Option<String>,
        last_body: Option<String>,
        calls: usize,
        response: Result<(u16, String), String>,
    }

    impl FakeTransport {
        fn new(response_status: u16, response_body: impl Into<String>) -> Self {
            Self::with_response(Ok((response_status, response_body.into())))
        }

        fn failing(reason: impl Into<String>) -> Self {
            Self::with_response(Err(reason.into()))
        }

        fn with_response(response: Result<(u16, String), String>) -> Self {
            Self {
                state: Arc::new(Mutex::new(FakeTransportState {
                    last_url: None,
                    last_api_key: None,
                    last_body: None,
                    calls: 0,
                    response,
                })),
            }
        }

        fn last_request(&self) -> (Option<String>, Option<String>, Option<String>) {
            let state = self.state.lock().unwrap();
            (
                state.last_url.clone(),
                state.last_api_key.clone(),
                state.last_body.clone(),
            )
        }

        fn calls(&self) -> usize {
            self.state.lock().unwrap().calls
        }
    }

    impl HttpTransport for FakeTransport {
        fn post_form<'a>(
            &'a self,
            url: &'a str,
            api_key: &'a ApiKey,
            body: String,
        ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
            Box::pin(async move {
                let response = {
                    let mut state = self.state.lock().unwrap();
                    state.last_url = Some(url.to_owned());
                    state.last_api_key = Some(api_key.as_str().to_owned());
                    state.last_body = Some(body);
                    state.calls += 1;
                    state.response.clone()
                };
                match response {
                    Ok((status, body)) => Ok(HttpResponse { status, body }),
                    Err(reason) => Err(Box::new(io::Error::new(
                        io::ErrorKind::ConnectionRefused,
                        reason,
                    )) as Box<dyn StdError + Send + Sync>),
                }
            })
        }
    }

    fn make_channel(transport: FakeTransport) -> SolSms {
        let config = ChannelConfig::resolve(
            ApiKey::new("test_key").unwrap(),
            AccountSid::new("acct").unwrap(),
            SenderName::new("OTPSMS").unwrap(),
            Some("https://example.invalid/v1/"),
            None,
            None,
        )
        .unwrap();
        SolSms {
            config: Arc::new(config),
            http: Arc::new(transport),
        }
    }

    #[tokio::test]
    async fn push_posts_form_to_account_endpoint() {
        let transport = FakeTransport::new(200, r#"{"status":"OK","message":"queued"}"#);
        let channel = make_channel(transport.clone());

        channel
            .push("+919876543210", b"Your code is 123456")
            .await
            .unwrap();

        let (url, api_key, body) = transport.last_request();
        assert_eq!(
            url.as_deref(),
            Some("https://example.invalid/v1/acct/messages")
        );
        assert_eq!(api_key.as_deref(), Some("test_key"));
        assert_eq!(
            body.as_deref(),
            Some("sender=OTPSMS&to=%2B919876543210&body=Your+code+is+123456")
        );
    }

    #[tokio::test]
    async fn push_does_not_check_address_or_body_length() {
        let transport = FakeTransport::new(200, r#"{"status":"OK"}"#);
        let channel = make_channel(transport.clone());

        let long_body = vec![b'x'; SOLSMS.max_body_len * 2];
        channel.push("not-a-number", &long_body).await.unwrap();
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn push_maps_non_ok_status_to_rejected() {
        let transport = FakeTransport::new(200, r#"{"status":"FAIL","message":"bad sender"}"#);
        let channel = make_channel(transport);

        let err = channel.push("919876543210", b"123456").await.unwrap_err();
        assert_eq!(err.kind(), DispatchErrorKind::Rejected);
        assert_eq!(err.detail(), Some("bad sender"));
        assert!(!err.is_retryable());
        match err {
            DispatchError::Rejected { status, message } => {
                assert_eq!(status, Status::Other("FAIL".to_owned()));
                assert_eq!(message, "bad sender");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn push_ignores_http_status_when_body_is_a_gateway_response() {
        let transport = FakeTransport::new(
            401,
            r#"{"status":"ERROR","message":"Invalid api key","data":null}"#,
        );
        let channel = make_channel(transport);

        let err = channel.push("919876543210", b"123456").await.unwrap_err();
        assert_eq!(err.detail(), Some("Invalid api key"));

        let transport = FakeTransport::new(202, r#"{"status":"OK","data":{"id":"m-1"}}"#);
        let channel = make_channel(transport);
        channel.push("919876543210", b"123456").await.unwrap();
    }

    #[tokio::test]
    async fn push_maps_malformed_body_to_protocol_error() {
        let transport = FakeTransport::new(502, "<html>Bad Gateway</html>");
        let channel = make_channel(transport);

        let err = channel.push("919876543210", b"123456").await.unwrap_err();
        assert_eq!(err.kind(), DispatchErrorKind::Protocol);
        assert!(err.is_retryable());
        assert!(matches!(err, DispatchError::Protocol { status: 502, .. }));
    }

    #[tokio::test]
    async fn push_maps_transport_failure() {
        let transport = FakeTransport::failing("connection refused");
        let channel = make_channel(transport.clone());

        let err = channel.push("919876543210", b"123456").await.unwrap_err();
        assert_eq!(err.kind(), DispatchErrorKind::Transport);
        assert!(err.is_retryable());
        assert!(!err.is_timeout());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn repeated_pushes_send_repeated_requests() {
        let transport = FakeTransport::new(200, r#"{"status":"OK"}"#);
        let channel = make_channel(transport.clone());

        channel.push("919876543210", b"123456").await.unwrap();
        channel.clone().push("919876543210", b"123456").await.unwrap();
        assert_eq!(transport.calls(), 2);
    }

    #[tokio::test]
    async fn provider_trait_delegates_to_channel() {
        let transport = FakeTransport::new(200, r#"{"status":"OK"}"#);
        let channel: Box<dyn Provider> = Box::new(make_channel(transport.clone()));

        assert_eq!(channel.id(), "solsms");
        assert_eq!(channel.channel_name(), "SMS");
        assert_eq!(channel.address_name(), "Mobile number");
        assert_eq!(channel.address_desc(), "Please enter your mobile number");
        assert!(channel.validate_address("+919876543210").is_ok());
        assert!(channel.validate_address("1234567").is_err());

        channel.push("+919876543210", b"123456").await.unwrap();
        assert_eq!(transport.calls(), 1);
    }

    #[test]
    fn new_requires_api_key_sender_and_sid() {
        let cases = [
            (r#"{"SID":"acct","Sender":"OTPSMS"}"#, "APIKey"),
            (r#"{"APIKey":"key","SID":"acct"}"#, "Sender"),
            (r#"{"APIKey":"key","Sender":"OTPSMS","SID":""}"#, "SID"),
            (
                r#"{"RootURL":"https://x/","APIKey":" ","SID":"acct","Sender":"OTPSMS","Timeout":3}"#,
                "APIKey",
            ),
        ];

        for (json, missing) in cases {
            let err = SolSms::new(json.as_bytes()).unwrap_err();
            match err {
                ConfigError::Validation(ValidationError::Empty { field }) => {
                    assert_eq!(field, missing, "{json}");
                }
                other => panic!("unexpected error for {json}: {other:?}"),
            }
        }
    }

    #[test]
    fn new_rejects_undecodable_config() {
        for json in ["", "not json", "null", "42", r#"{"Timeout":"soon"}"#] {
            let err = SolSms::new(json.as_bytes()).unwrap_err();
            assert!(matches!(err, ConfigError::Decode(_)), "{json}: {err:?}");
        }
    }

    #[test]
    fn new_resolves_endpoint_and_defaults() {
        let channel = SolSms::new(br#"{"APIKey":"key","SID":"acct","Sender":"OTPSMS"}"#).unwrap();
        let config = channel.config();
        assert_eq!(
            config.endpoint(),
            "https://api.kaleyra.io/v1/acct/messages"
        );
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.max_idle_per_host(), 1);
        assert_eq!(config.sender().as_str(), "OTPSMS");

        let channel = SolSms::new(
            br#"{"RootURL":"https://x/","APIKey":"key","SID":"acct","Sender":"OTPSMS","Timeout":0,"MaxIdleConns":3}"#,
        )
        .unwrap();
        assert_eq!(channel.config().endpoint(), "https://x/acct/messages");
        assert_eq!(channel.config().timeout(), Duration::from_secs(5));
        assert_eq!(channel.config().max_idle_per_host(), 3);
    }

    #[test]
    fn debug_output_does_not_leak_api_key() {
        let channel =
            SolSms::new(br#"{"APIKey":"very-secret","SID":"acct","Sender":"OTPSMS"}"#).unwrap();
        let rendered = format!("{channel:?}");
        assert!(rendered.contains("acct"));
        assert!(!rendered.contains("very-secret"));
    }

    #[test]
    fn builder_overrides_are_applied() {
        let channel = SolSms::builder(
            ApiKey::new("key").unwrap(),
            AccountSid::new("acct").unwrap(),
            SenderName::new("OTPSMS").unwrap(),
        )
        .root_url("http://127.0.0.1:9/base")
        .timeout(Duration::from_millis(250))
        .max_idle_per_host(2)
        .user_agent("otp-host/1.0")
        .build()
        .unwrap();

        assert_eq!(
            channel.config().endpoint(),
            "http://127.0.0.1:9/base/acct/messages"
        );
        assert_eq!(channel.config().timeout(), Duration::from_millis(250));
        assert_eq!(channel.config().max_idle_per_host(), 2);
    }

    #[test]
    fn builder_rejects_unusable_root_url() {
        let err = SolSms::builder(
            ApiKey::new("key").unwrap(),
            AccountSid::new("acct").unwrap(),
            SenderName::new("OTPSMS").unwrap(),
        )
        .root_url("mailto:ops@example.com")
        .build()
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Validation(ValidationError::InvalidRootUrl { .. })
        ));
    }
}
