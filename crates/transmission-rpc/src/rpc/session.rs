//! Storage of the anti-forgery session token.

use std::sync::{PoisonError, RwLock};

/// Latest `X-Transmission-Session-Id` learned from the daemon.
///
/// Empty until the first 409 answer. The lock is never held across an await.
#[derive(Debug, Default)]
pub(crate) struct TokenStore {
    token: RwLock<String>,
}

impl TokenStore {
    pub(crate) fn get(&self) -> String {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn set(&self, token: impl Into<String>) {
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = token.into();
    }
}
