//! The RPC core: tags, session token, envelopes and the HTTP transport.

mod envelope;
mod session;
mod tag;
mod transport;

pub use transport::{SESSION_ID_HEADER, Transport};

use session::TokenStore;
use tag::TagGenerator;

/// Mutable state of one client, shared by every call made through it.
#[derive(Debug, Default)]
pub(crate) struct ClientState {
    pub(crate) tokens: TokenStore,
    pub(crate) tags: TagGenerator,
}
