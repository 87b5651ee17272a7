//! Request and answer envelopes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::error::RpcError;

/// `result` value of a successful answer.
pub(crate) const SUCCESS: &str = "success";

#[derive(Serialize)]
struct Request<'a, A: Serialize + ?Sized> {
    method: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    arguments: Option<&'a A>,
    tag: u64,
}

/// A decoded answer whose arguments are still raw JSON.
#[derive(Debug, Deserialize)]
pub(crate) struct Answer {
    pub(crate) result: String,
    #[serde(default)]
    pub(crate) arguments: Option<Box<RawValue>>,
    #[serde(default)]
    pub(crate) tag: Option<u64>,
}

/// Serializes a request. `arguments` is left out of the body when `None`.
pub(crate) fn encode<A: Serialize + ?Sized>(
    method: &str,
    tag: u64,
    arguments: Option<&A>,
) -> Result<Vec<u8>, RpcError> {
    if method.is_empty() {
        return Err(RpcError::Validation("method name can't be empty".into()));
    }
    serde_json::to_vec(&Request {
        method,
        arguments,
        tag,
    })
    .map_err(RpcError::Encoding)
}

pub(crate) fn decode(body: &[u8]) -> Result<Answer, RpcError> {
    serde_json::from_slice(body).map_err(RpcError::Decoding)
}

/// Deserializes the answer arguments. Missing arguments are read as `null`.
pub(crate) fn decode_arguments<R: DeserializeOwned>(
    arguments: Option<&RawValue>,
) -> Result<R, RpcError> {
    serde_json::from_str(arguments.map_or("null", RawValue::get)).map_err(RpcError::Decoding)
}
