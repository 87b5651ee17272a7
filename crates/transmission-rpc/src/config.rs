//! Client configuration.

use std::env;
use std::fmt;
use std::time::Duration;

use url::Url;

use crate::error::RpcError;

/// RPC endpoint of a daemon running on the local host with default settings.
pub const DEFAULT_RPC_URL: &str = "http://localhost:9091/transmission/rpc";

/// Path of the RPC endpoint on a daemon with default settings.
pub const DEFAULT_RPC_PATH: &str = "/transmission/rpc";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// `User-Agent` sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("transmission-rpc/", env!("CARGO_PKG_VERSION"));

/// Everything needed to build a client.
#[derive(Clone)]
pub struct ClientConfig {
    /// RPC endpoint URL.
    pub url: String,
    /// HTTP basic auth user, when the daemon requires authentication.
    pub username: Option<String>,
    /// HTTP basic auth password.
    pub password: Option<String>,
    /// `User-Agent` override.
    pub user_agent: Option<String>,
    /// Per-request timeout, applied to every HTTP exchange. Must not be zero.
    pub timeout: Duration,
    /// HTTP client override, e.g. to share a connection pool.
    pub http_client: Option<reqwest::Client>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_RPC_URL)
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("http_client", &self.http_client.is_some())
            .finish()
    }
}

impl ClientConfig {
    /// Configuration for the given endpoint URL, everything else default.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            username: None,
            password: None,
            user_agent: None,
            timeout: DEFAULT_TIMEOUT,
            http_client: None,
        }
    }

    /// Configuration for a daemon on `host`, at the default RPC path.
    ///
    /// `port` defaults to 443 with `https`, 80 otherwise.
    pub fn for_host(host: &str, https: bool, port: Option<u16>) -> Self {
        let (scheme, default_port) = if https { ("https", 443) } else { ("http", 80) };
        let port = port.unwrap_or(default_port);
        Self::new(format!("{scheme}://{host}:{port}{DEFAULT_RPC_PATH}"))
    }

    /// Reads the configuration from the environment.
    ///
    /// - `TRANSMISSION_RPC_URL` (default: [`DEFAULT_RPC_URL`])
    /// - `TRANSMISSION_RPC_USERNAME` / `TRANSMISSION_RPC_PASSWORD`
    /// - `TRANSMISSION_RPC_USER_AGENT`
    /// - `TRANSMISSION_RPC_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self, RpcError> {
        let mut config = Self::new(
            env::var("TRANSMISSION_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.into()),
        );
        config.username = env::var("TRANSMISSION_RPC_USERNAME").ok();
        config.password = env::var("TRANSMISSION_RPC_PASSWORD").ok();
        config.user_agent = env::var("TRANSMISSION_RPC_USER_AGENT").ok();
        if let Ok(raw) = env::var("TRANSMISSION_RPC_TIMEOUT_SECS") {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                RpcError::Configuration(format!("invalid TRANSMISSION_RPC_TIMEOUT_SECS '{raw}': {e}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Sets HTTP basic auth credentials.
    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Sets the `User-Agent`.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses the given HTTP client instead of building one.
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Parses and checks the endpoint URL and the timeout.
    pub(crate) fn endpoint(&self) -> Result<Url, RpcError> {
        let url = Url::parse(&self.url)
            .map_err(|e| RpcError::Configuration(format!("invalid RPC URL '{}': {e}", self.url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(RpcError::Configuration(format!(
                "unsupported RPC URL scheme '{}'",
                url.scheme()
            )));
        }
        if self.timeout.is_zero() {
            return Err(RpcError::Configuration("timeout can't be 0".into()));
        }
        Ok(url)
    }

    pub(crate) fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    pub(crate) fn build_http_client(&self) -> Result<reqwest::Client, RpcError> {
        match &self.http_client {
            Some(client) => Ok(client.clone()),
            None => reqwest::Client::builder()
                .build()
                .map_err(|e| RpcError::Configuration(format!("can't build HTTP client: {e}"))),
        }
    }
}
