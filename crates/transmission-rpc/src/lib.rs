//! # Async client for the Transmission RPC protocol.
//!
//! usage:
//!
//! ```rust,ignore
//! use transmission_rpc::{ClientConfig, TorrentIds, TransmissionClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?.with_credentials("user", "secret");
//!     let client = TransmissionClient::try_new(&config)?;
//!
//!     let added = client.torrent_add_file("path/to/file.torrent").await?;
//!     let torrents = client
//!         .torrent_get(&["id", "name", "percentDone"], TorrentIds::from(added.id))
//!         .await?;
//!     println!("Added torrent: {:?}", torrents);
//!     Ok(())
//! }
//! ```
//!
//! Raw calls go through the [`Transport`], which negotiates the session
//! token and checks the answer tag:
//!
//! ```rust,ignore
//! let stats: serde_json::Value = client.transport().call("session-stats", None::<&()>).await?;
//! ```

mod client;
mod config;
mod error;
mod ops;
mod rpc;

#[cfg(test)]
mod testutil;

pub use client::TransmissionClient;
pub use config::{ClientConfig, DEFAULT_RPC_PATH, DEFAULT_RPC_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use error::{ProtocolViolation, RpcError};
pub use rpc::{SESSION_ID_HEADER, Transport};
pub use transmission_rpc_types::*;

#[cfg(test)]
use libc as _;
#[cfg(test)]
use tracing_subscriber as _;
