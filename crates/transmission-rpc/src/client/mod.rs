//! Typed method surface of the Transmission RPC protocol.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::RpcError;
use crate::ops::RpcOps;
use crate::rpc::Transport;

mod admin;
mod session;
mod torrents;


/// TransmissionClient talks to a Transmission daemon over its RPC protocol.
///
/// Every method validates its input, sends exactly one RPC call and reshapes
/// the answer. Session token negotiation happens inside the [`Transport`].
/// The client can be shared between tasks; calls run concurrently.
#[allow(missing_debug_implementations, private_bounds)]
pub struct TransmissionClient<T: RpcOps = Transport> {
    client: T,
}

impl TransmissionClient {
    /// Create a new TransmissionClient from a configuration.
    ///
    /// Nothing is sent to the daemon until the first call.
    pub fn try_new(config: &ClientConfig) -> Result<Self, RpcError> {
        debug!("Creating Transmission RPC client for {}", config.url);
        Ok(Self {
            client: Transport::new(config)?,
        })
    }

    /// Create a client from an existing transport, sharing its session token.
    pub fn from_transport(transport: Transport) -> Self {
        Self { client: transport }
    }

    /// The underlying transport, for raw calls.
    pub fn transport(&self) -> &Transport {
        &self.client
    }
}

#[allow(private_bounds)]
impl<T: RpcOps> TransmissionClient<T> {
    /// Create a TransmissionClient with a custom transport implementation.
    /// This is primarily useful for testing with mocks.
    #[cfg(test)]
    pub(crate) fn with_client(client: T) -> Self {
        Self { client }
    }

    /// Sends one call and deserializes the answer arguments into `R`.
    async fn invoke<R: DeserializeOwned>(
        &self,
        method: &str,
        arguments: Option<Value>,
    ) -> Result<R, RpcError> {
        let answer = self.client.rpc_call(method, arguments).await?;
        serde_json::from_value(answer).map_err(RpcError::Decoding)
    }
}

/// Serializes a payload into the `arguments` of a call.
fn arguments<A: Serialize>(payload: &A) -> Result<Option<Value>, RpcError> {
    serde_json::to_value(payload)
        .map(Some)
        .map_err(RpcError::Encoding)
}

/// Rejects field lists that are empty or name unknown keys.
fn check_fields<F, S>(fields: &[S]) -> Result<(), RpcError>
where
    F: transmission_rpc_types::FieldTable,
    S: AsRef<str>,
{
    if fields.is_empty() {
        return Err(RpcError::Validation(format!(
            "at least one {} field is required",
            F::ENTITY
        )));
    }
    F::validate_fields(fields)?;
    Ok(())
}
