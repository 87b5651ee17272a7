//! Internal trait abstracting the RPC transport.
//!
//! This module provides the [`RpcOps`] trait which sits between the typed
//! method surface and [`Transport`], enabling mocking in tests.

use serde_json::Value;

use crate::error::RpcError;
use crate::rpc::Transport;

/// Internal trait that abstracts one RPC round trip.
/// This allows for mocking in tests.
#[cfg_attr(test, mockall::automock)]
#[allow(async_fn_in_trait)]
pub(crate) trait RpcOps {
    /// Calls `method` and returns the answer arguments (`null` when absent).
    async fn rpc_call(&self, method: &str, arguments: Option<Value>) -> Result<Value, RpcError>;
}

impl RpcOps for Transport {
    async fn rpc_call(&self, method: &str, arguments: Option<Value>) -> Result<Value, RpcError> {
        Transport::call(self, method, arguments.as_ref()).await
    }
}
