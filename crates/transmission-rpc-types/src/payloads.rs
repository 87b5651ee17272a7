//! Torrent selectors and mutator payloads (`torrent-set`, `torrent-add`).

use std::time::Duration;

use serde::{Deserialize, Serialize, Serializer};

/// Which torrents a request applies to, sent as the `ids` argument.
///
/// `All` omits the key, which the daemon reads as "every torrent". An empty
/// `Ids` or `Hashes` list is sent as `[]`; what that means depends on the
/// method, so wrappers that need a concrete selection reject it upfront.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TorrentIds {
    /// Every torrent.
    #[default]
    All,
    /// Numeric torrent ids.
    Ids(Vec<i64>),
    /// Torrent hash strings.
    Hashes(Vec<String>),
    /// Torrents that were recently active.
    RecentlyActive,
}

impl TorrentIds {
    /// `true` for [`TorrentIds::All`]; used to omit the `ids` key.
    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// `true` when this names a concrete, non-empty set of torrents.
    pub fn is_explicit(&self) -> bool {
        match self {
            Self::Ids(ids) => !ids.is_empty(),
            Self::Hashes(hashes) => !hashes.is_empty(),
            Self::All | Self::RecentlyActive => false,
        }
    }
}

impl Serialize for TorrentIds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::All => serializer.serialize_none(),
            Self::Ids(ids) => ids.serialize(serializer),
            Self::Hashes(hashes) => hashes.serialize(serializer),
            Self::RecentlyActive => serializer.serialize_str("recently-active"),
        }
    }
}

impl From<i64> for TorrentIds {
    fn from(id: i64) -> Self {
        Self::Ids(vec![id])
    }
}

impl From<Vec<i64>> for TorrentIds {
    fn from(ids: Vec<i64>) -> Self {
        Self::Ids(ids)
    }
}

impl From<&str> for TorrentIds {
    fn from(hash: &str) -> Self {
        Self::Hashes(vec![hash.to_owned()])
    }
}

impl From<Vec<String>> for TorrentIds {
    fn from(hashes: Vec<String>) -> Self {
        Self::Hashes(hashes)
    }
}

/// Mutators applied to one or more torrents by `torrent-set`.
///
/// Only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TorrentSetPayload {
    /// Torrents to mutate. Must name at least one torrent.
    #[serde(skip_serializing_if = "TorrentIds::is_all")]
    pub ids: TorrentIds,
    /// Transfer priority.
    #[serde(rename = "bandwidthPriority", skip_serializing_if = "Option::is_none")]
    pub bandwidth_priority: Option<i64>,
    /// Download limit (KBps).
    #[serde(rename = "downloadLimit", skip_serializing_if = "Option::is_none")]
    pub download_limit: Option<i64>,
    /// Download limit enabled.
    #[serde(rename = "downloadLimited", skip_serializing_if = "Option::is_none")]
    pub download_limited: Option<bool>,
    /// File indices to download; an empty list means all files.
    #[serde(rename = "files-wanted", skip_serializing_if = "Option::is_none")]
    pub files_wanted: Option<Vec<i64>>,
    /// File indices to skip; an empty list means all files.
    #[serde(rename = "files-unwanted", skip_serializing_if = "Option::is_none")]
    pub files_unwanted: Option<Vec<i64>>,
    /// Bandwidth group the torrents belong to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    /// Honor the session limits.
    #[serde(rename = "honorsSessionLimits", skip_serializing_if = "Option::is_none")]
    pub honors_session_limits: Option<bool>,
    /// Labels replacing the current ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// New content location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Max number of peers.
    #[serde(rename = "peer-limit", skip_serializing_if = "Option::is_none")]
    pub peer_limit: Option<i64>,
    /// File indices to mark high priority; an empty list means all files.
    #[serde(rename = "priority-high", skip_serializing_if = "Option::is_none")]
    pub priority_high: Option<Vec<i64>>,
    /// File indices to mark low priority; an empty list means all files.
    #[serde(rename = "priority-low", skip_serializing_if = "Option::is_none")]
    pub priority_low: Option<Vec<i64>>,
    /// File indices to mark normal priority; an empty list means all files.
    #[serde(rename = "priority-normal", skip_serializing_if = "Option::is_none")]
    pub priority_normal: Option<Vec<i64>>,
    /// Position in the queue.
    #[serde(rename = "queuePosition", skip_serializing_if = "Option::is_none")]
    pub queue_position: Option<i64>,
    /// Idle time after which seeding stops. Sent in minutes.
    #[serde(
        rename = "seedIdleLimit",
        with = "crate::convert::option_minutes",
        skip_serializing_if = "Option::is_none"
    )]
    pub seed_idle_limit: Option<Duration>,
    /// Idle seeding policy.
    #[serde(rename = "seedIdleMode", skip_serializing_if = "Option::is_none")]
    pub seed_idle_mode: Option<i64>,
    /// Seed ratio limit.
    #[serde(rename = "seedRatioLimit", skip_serializing_if = "Option::is_none")]
    pub seed_ratio_limit: Option<f64>,
    /// Seed ratio policy.
    #[serde(rename = "seedRatioMode", skip_serializing_if = "Option::is_none")]
    pub seed_ratio_mode: Option<crate::SeedRatioMode>,
    /// Announce URLs to add.
    #[serde(rename = "trackerAdd", skip_serializing_if = "Option::is_none")]
    pub tracker_add: Option<Vec<String>>,
    /// Full tracker list, one announce URL per line, tiers separated by a blank line.
    #[serde(rename = "trackerList", skip_serializing_if = "Option::is_none")]
    pub tracker_list: Option<String>,
    /// Tracker ids to remove.
    #[serde(rename = "trackerRemove", skip_serializing_if = "Option::is_none")]
    pub tracker_remove: Option<Vec<i64>>,
    /// Upload limit (KBps).
    #[serde(rename = "uploadLimit", skip_serializing_if = "Option::is_none")]
    pub upload_limit: Option<i64>,
    /// Upload limit enabled.
    #[serde(rename = "uploadLimited", skip_serializing_if = "Option::is_none")]
    pub upload_limited: Option<bool>,
}

/// Arguments of `torrent-add`.
///
/// Exactly one of `filename` (path or URL, magnet links included) and
/// `metainfo` (base64 encoded `.torrent` content) must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TorrentAddPayload {
    /// Cookies sent when fetching `filename` over HTTP.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<String>,
    /// Download directory.
    #[serde(rename = "download-dir", skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<String>,
    /// Path, URL or magnet link of the torrent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Base64 encoded `.torrent` content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metainfo: Option<String>,
    /// Add without starting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    /// Max number of peers.
    #[serde(rename = "peer-limit", skip_serializing_if = "Option::is_none")]
    pub peer_limit: Option<i64>,
    /// Transfer priority.
    #[serde(rename = "bandwidthPriority", skip_serializing_if = "Option::is_none")]
    pub bandwidth_priority: Option<i64>,
    /// File indices to download.
    #[serde(rename = "files-wanted", skip_serializing_if = "Option::is_none")]
    pub files_wanted: Option<Vec<i64>>,
    /// File indices to skip.
    #[serde(rename = "files-unwanted", skip_serializing_if = "Option::is_none")]
    pub files_unwanted: Option<Vec<i64>>,
    /// Labels of the new torrent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
    /// File indices with high priority.
    #[serde(rename = "priority-high", skip_serializing_if = "Option::is_none")]
    pub priority_high: Option<Vec<i64>>,
    /// File indices with low priority.
    #[serde(rename = "priority-low", skip_serializing_if = "Option::is_none")]
    pub priority_low: Option<Vec<i64>>,
    /// File indices with normal priority.
    #[serde(rename = "priority-normal", skip_serializing_if = "Option::is_none")]
    pub priority_normal: Option<Vec<i64>>,
}

/// Torrent reported by `torrent-add`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddedTorrent {
    /// Torrent id.
    pub id: i64,
    /// Torrent name.
    pub name: String,
    /// Info hash.
    #[serde(rename = "hashString")]
    pub hash_string: String,
    /// `true` when the daemon already had this torrent.
    #[serde(skip)]
    pub duplicate: bool,
}

/// Free space of a directory on the daemon's host (`free-space`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FreeSpace {
    /// Directory that was queried.
    pub path: String,
    /// Bytes available.
    #[serde(rename = "size-bytes")]
    pub free: crate::ByteSize,
    /// Total size of the volume (RPC 17 and later).
    #[serde(rename = "total_size", default)]
    pub total: Option<crate::ByteSize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_wire_forms() {
        assert_eq!(serde_json::to_string(&TorrentIds::from(vec![1, 2])).unwrap(), "[1,2]");
        assert_eq!(serde_json::to_string(&TorrentIds::from("abc")).unwrap(), r#"["abc"]"#);
        assert_eq!(
            serde_json::to_string(&TorrentIds::RecentlyActive).unwrap(),
            r#""recently-active""#
        );
        assert_eq!(serde_json::to_string(&TorrentIds::Ids(vec![])).unwrap(), "[]");
    }

    #[test]
    fn explicit_selection() {
        assert!(TorrentIds::from(3).is_explicit());
        assert!(!TorrentIds::Ids(vec![]).is_explicit());
        assert!(!TorrentIds::Hashes(vec![]).is_explicit());
        assert!(!TorrentIds::All.is_explicit());
        assert!(!TorrentIds::RecentlyActive.is_explicit());
    }

    #[test]
    fn set_payload_sends_only_set_fields() {
        let payload = TorrentSetPayload {
            ids: TorrentIds::from(vec![7]),
            upload_limited: Some(false),
            seed_idle_limit: Some(Duration::from_secs(30 * 60)),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"ids":[7],"seedIdleLimit":30,"uploadLimited":false}"#
        );
    }

    #[test]
    fn add_payload_keys() {
        let payload = TorrentAddPayload {
            filename: Some("magnet:?xt=urn:btih:abc".into()),
            download_dir: Some("/data".into()),
            paused: Some(true),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"download-dir":"/data","filename":"magnet:?xt=urn:btih:abc","paused":true}"#
        );
    }

    #[test]
    fn free_space_without_total() {
        let space: FreeSpace =
            serde_json::from_str(r#"{"path":"/data","size-bytes":4096}"#).unwrap();
        assert_eq!(space.free, crate::ByteSize(4096));
        assert_eq!(space.total, None);
    }
}
