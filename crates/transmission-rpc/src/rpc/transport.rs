//! HTTP exchange with the daemon and session token negotiation.

use std::fmt;
use std::future::{self, Future};
use std::pin::pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use super::ClientState;
use super::envelope::{self, SUCCESS};
use crate::config::ClientConfig;
use crate::error::{ProtocolViolation, RpcError};

#[cfg(test)]
mod tests;

/// Header carrying the anti-forgery session token, both ways.
pub const SESSION_ID_HEADER: &str = "X-Transmission-Session-Id";

/// First attempt plus one retry after the token was renewed.
const MAX_ATTEMPTS: u32 = 2;

/// Outcome of one HTTP exchange, body included.
enum Reply {
    Answer(Vec<u8>),
    TokenRejected(Option<String>),
    Status(StatusCode),
}

/// Sends RPC calls to one daemon endpoint.
///
/// Each call is a POST of the request envelope. When the daemon rejects the
/// session token (409) the token from the answer is stored and the request
/// is sent once more; any other failure is returned as is.
///
/// `Transport` is cheap to clone. Clones share the session token and the
/// tag counter.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    url: Url,
    user_agent: String,
    credentials: Option<(String, Option<String>)>,
    timeout: Duration,
    state: Arc<ClientState>,
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("url", &self.url.as_str())
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Builds a transport from a configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, RpcError> {
        let url = config.endpoint()?;
        let http = config.build_http_client()?;
        Ok(Self {
            http,
            url,
            user_agent: config.user_agent().to_owned(),
            credentials: config
                .username
                .clone()
                .map(|user| (user, config.password.clone())),
            timeout: config.timeout,
            state: Arc::new(ClientState::default()),
        })
    }

    /// Endpoint the calls are sent to.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Latest session token, empty until the daemon handed one out.
    pub fn session_token(&self) -> String {
        self.state.tokens.get()
    }

    /// Calls `method` and deserializes the answer arguments into `R`.
    ///
    /// Answers without arguments are read as `null`, so `R` can be an
    /// `Option` or [`serde::de::IgnoredAny`] for methods that return nothing.
    pub async fn call<A, R>(&self, method: &str, arguments: Option<&A>) -> Result<R, RpcError>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call_until(method, arguments, future::pending()).await
    }

    /// Like [`Transport::call`], but gives up with [`RpcError::Cancelled`] as
    /// soon as `cancel` completes. A cancelled call is never retried.
    pub async fn call_until<A, R, C>(
        &self,
        method: &str,
        arguments: Option<&A>,
        cancel: C,
    ) -> Result<R, RpcError>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
        C: Future<Output = ()>,
    {
        let tag = self.state.tags.next_tag();
        let body = envelope::encode(method, tag, arguments)?;
        trace!(method, tag, body = %String::from_utf8_lossy(&body), "encoded request");
        let mut cancel = pin!(cancel);

        for attempt in 1..=MAX_ATTEMPTS {
            debug!(method, tag, attempt, "sending RPC request");
            let reply = tokio::select! {
                biased;
                () = &mut cancel => {
                    debug!(method, tag, attempt, "RPC request cancelled");
                    return Err(RpcError::Cancelled);
                }
                reply = self.exchange(body.clone()) => reply?,
            };

            match reply {
                Reply::Answer(answer) => return self.interpret(method, tag, &answer),
                Reply::TokenRejected(token) => {
                    let token = token.unwrap_or_else(|| {
                        warn!(method, tag, "409 answer without {SESSION_ID_HEADER} header");
                        String::new()
                    });
                    debug!(method, tag, attempt, "session token rejected, storing new token");
                    self.state.tokens.set(token);
                }
                Reply::Status(status) => {
                    debug!(method, tag, %status, "RPC request failed");
                    return Err(RpcError::HttpStatus(status.as_u16()));
                }
            }
        }

        Err(RpcError::TokenRetryExhausted)
    }

    async fn exchange(&self, body: Vec<u8>) -> Result<Reply, RpcError> {
        let mut request = self
            .http
            .post(self.url.clone())
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, &self.user_agent)
            .header(SESSION_ID_HEADER, self.state.tokens.get())
            .body(body);
        if let Some((user, password)) = &self.credentials {
            request = request.basic_auth(user, password.as_ref());
        }

        let response = request.send().await.map_err(RpcError::Transport)?;
        match response.status() {
            StatusCode::OK => {
                let body = response.bytes().await.map_err(RpcError::Transport)?;
                Ok(Reply::Answer(body.to_vec()))
            }
            StatusCode::CONFLICT => Ok(Reply::TokenRejected(
                response
                    .headers()
                    .get(SESSION_ID_HEADER)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_owned),
            )),
            status => Ok(Reply::Status(status)),
        }
    }

    fn interpret<R: DeserializeOwned>(
        &self,
        method: &str,
        tag: u64,
        body: &[u8],
    ) -> Result<R, RpcError> {
        trace!(method, tag, body = %String::from_utf8_lossy(body), "received answer");
        let answer = envelope::decode(body)?;
        match answer.tag {
            Some(received) if received != tag => {
                return Err(ProtocolViolation::TagMismatch {
                    sent: tag,
                    received,
                }
                .into());
            }
            _ => {}
        }
        // Daemon failures may come back untagged.
        if answer.result != SUCCESS {
            debug!(method, tag, result = %answer.result, "daemon reported failure");
            return Err(RpcError::Remote(answer.result));
        }
        if answer.tag.is_none() {
            return Err(ProtocolViolation::MissingTag.into());
        }
        debug!(method, tag, "RPC call succeeded");
        envelope::decode_arguments(answer.arguments.as_deref())
    }
}
