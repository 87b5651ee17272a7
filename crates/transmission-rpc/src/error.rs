//! Error taxonomy of the client.

use thiserror::Error;
use transmission_rpc_types::UnknownField;

/// Errors returned by every client operation.
///
/// When an operation returns an error its result must be treated as unset.
#[derive(Error, Debug)]
pub enum RpcError {
    /// The client was built from an unusable configuration.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The request arguments could not be serialized.
    #[error("can't encode request: {0}")]
    Encoding(#[source] serde_json::Error),

    /// The HTTP exchange itself failed (DNS, connection, timeout).
    #[error("request error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The call was cancelled before the HTTP exchange completed.
    #[error("request cancelled")]
    Cancelled,

    /// The daemon answered with a status other than 200 or 409.
    #[error("HTTP error {0}")]
    HttpStatus(u16),

    /// The session token was rejected on the first attempt and on the retry.
    #[error("session token rejected twice in a row")]
    TokenRetryExhausted,

    /// The response body is not a valid answer envelope.
    #[error("can't decode answer: {0}")]
    Decoding(#[source] serde_json::Error),

    /// The answer envelope is well formed but breaks the protocol.
    #[error("protocol violation: {0}")]
    Protocol(#[from] ProtocolViolation),

    /// The daemon processed the call and reported a failure.
    #[error("daemon reported failure: {0}")]
    Remote(String),

    /// The caller supplied invalid arguments; nothing was sent.
    #[error("invalid arguments: {0}")]
    Validation(String),
}

/// Ways an answer can break the protocol.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolViolation {
    /// The answer carries no tag.
    #[error("answer missing tag")]
    MissingTag,

    /// The answer tag is not the one the request was sent with.
    #[error("tag mismatch: sent {sent}, received {received}")]
    TagMismatch {
        /// Tag of the request.
        sent: u64,
        /// Tag found in the answer.
        received: u64,
    },

    /// The answer arguments don't match what the method promises.
    #[error("unexpected answer: {0}")]
    UnexpectedAnswer(String),
}

impl From<UnknownField> for RpcError {
    fn from(err: UnknownField) -> Self {
        Self::Validation(err.to_string())
    }
}

impl RpcError {
    /// `true` when the call never produced an HTTP answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(RpcError::HttpStatus(401).to_string(), "HTTP error 401");
        assert_eq!(
            RpcError::Remote("some error text".into()).to_string(),
            "daemon reported failure: some error text"
        );
        assert_eq!(
            RpcError::from(ProtocolViolation::TagMismatch {
                sent: 1,
                received: 2
            })
            .to_string(),
            "protocol violation: tag mismatch: sent 1, received 2"
        );
    }

    #[test]
    fn unknown_field_becomes_validation() {
        let err: RpcError = UnknownField {
            entity: "torrent",
            field: "bogus".into(),
        }
        .into();
        assert!(matches!(err, RpcError::Validation(msg) if msg.contains("bogus")));
    }

    #[test]
    fn transport_classification() {
        assert!(RpcError::Cancelled.is_transport());
        assert!(!RpcError::TokenRetryExhausted.is_transport());
    }
}
