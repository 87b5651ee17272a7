//! # Transmission RPC types
//!
//! Schemas of the entities exchanged with a Transmission daemon, the static
//! field tables used to validate accessor requests, and the conversions
//! between wire encodings (unix timestamps, `0`/`1` booleans, byte counts)
//! and Rust types.
//!
//! Nothing in this crate performs I/O.

mod bandwidth_group;
pub mod convert;
mod fields;
mod payloads;
mod session;
mod torrent;

pub use bandwidth_group::BandwidthGroup;
pub use convert::ByteSize;
pub use fields::{FieldTable, UnknownField};
pub use payloads::{AddedTorrent, FreeSpace, TorrentAddPayload, TorrentIds, TorrentSetPayload};
pub use session::{
    Encryption, RPC_VERSION, RpcVersionInfo, SessionArguments, SessionStats, SessionStatsDetails,
    Units,
};
pub use torrent::{
    Peer, SeedRatioMode, Torrent, TorrentFile, TorrentFileStat, TorrentPeersFrom, TorrentStatus,
    Tracker, TrackerStats,
};
