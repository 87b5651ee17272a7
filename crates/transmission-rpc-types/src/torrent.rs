//! Torrent accessor schema (`torrent-get`).

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::convert::ByteSize;
use crate::fields::rpc_entity;

rpc_entity! {
    /// Every field a `torrent-get` call can return.
    ///
    /// Fields are `None` when they were not requested.
    #[allow(missing_docs)] // rationale: wire keys are documented in the Transmission rpc-spec
    pub struct Torrent("torrent") {
        #[serde(with = "crate::convert::option_unix_time")]
        activity_date: DateTime<Utc> => "activityDate",
        #[serde(with = "crate::convert::option_unix_time")]
        added_date: DateTime<Utc> => "addedDate",
        availability: Vec<i64> => "availability",
        bandwidth_priority: i64 => "bandwidthPriority",
        comment: String => "comment",
        corrupt_ever: i64 => "corruptEver",
        creator: String => "creator",
        #[serde(with = "crate::convert::option_unix_time")]
        date_created: DateTime<Utc> => "dateCreated",
        desired_available: i64 => "desiredAvailable",
        #[serde(with = "crate::convert::option_unix_time")]
        done_date: DateTime<Utc> => "doneDate",
        download_dir: String => "downloadDir",
        downloaded_ever: i64 => "downloadedEver",
        download_limit: i64 => "downloadLimit",
        download_limited: bool => "downloadLimited",
        #[serde(with = "crate::convert::option_unix_time")]
        edit_date: DateTime<Utc> => "editDate",
        error: i64 => "error",
        error_string: String => "errorString",
        /// Seconds until done, `-1` when unknown.
        eta: i64 => "eta",
        eta_idle: i64 => "etaIdle",
        file_count: i64 => "file-count",
        files: Vec<TorrentFile> => "files",
        file_stats: Vec<TorrentFileStat> => "fileStats",
        group: String => "group",
        hash_string: String => "hashString",
        have_unchecked: i64 => "haveUnchecked",
        have_valid: i64 => "haveValid",
        honors_session_limits: bool => "honorsSessionLimits",
        id: i64 => "id",
        is_finished: bool => "isFinished",
        is_private: bool => "isPrivate",
        is_stalled: bool => "isStalled",
        labels: Vec<String> => "labels",
        left_until_done: i64 => "leftUntilDone",
        magnet_link: String => "magnetLink",
        manual_announce_time: i64 => "manualAnnounceTime",
        max_connected_peers: i64 => "maxConnectedPeers",
        metadata_percent_complete: f64 => "metadataPercentComplete",
        name: String => "name",
        peer_limit: i64 => "peer-limit",
        peers: Vec<Peer> => "peers",
        peers_connected: i64 => "peersConnected",
        peers_from: TorrentPeersFrom => "peersFrom",
        peers_getting_from_us: i64 => "peersGettingFromUs",
        peers_sending_to_us: i64 => "peersSendingToUs",
        percent_complete: f64 => "percentComplete",
        percent_done: f64 => "percentDone",
        pieces: String => "pieces",
        piece_count: i64 => "pieceCount",
        piece_size: ByteSize => "pieceSize",
        priorities: Vec<i64> => "priorities",
        primary_mime_type: String => "primary-mime-type",
        queue_position: i64 => "queuePosition",
        /// Bytes per second.
        rate_download: i64 => "rateDownload",
        /// Bytes per second.
        rate_upload: i64 => "rateUpload",
        recheck_progress: f64 => "recheckProgress",
        #[serde(with = "crate::convert::option_seconds")]
        time_downloading: Duration => "secondsDownloading",
        #[serde(with = "crate::convert::option_seconds")]
        time_seeding: Duration => "secondsSeeding",
        #[serde(with = "crate::convert::option_minutes")]
        seed_idle_limit: Duration => "seedIdleLimit",
        seed_idle_mode: i64 => "seedIdleMode",
        seed_ratio_limit: f64 => "seedRatioLimit",
        seed_ratio_mode: SeedRatioMode => "seedRatioMode",
        size_when_done: ByteSize => "sizeWhenDone",
        #[serde(with = "crate::convert::option_unix_time")]
        start_date: DateTime<Utc> => "startDate",
        status: TorrentStatus => "status",
        trackers: Vec<Tracker> => "trackers",
        tracker_list: String => "trackerList",
        tracker_stats: Vec<TrackerStats> => "trackerStats",
        total_size: ByteSize => "totalSize",
        torrent_file: String => "torrentFile",
        uploaded_ever: i64 => "uploadedEver",
        upload_limit: i64 => "uploadLimit",
        upload_limited: bool => "uploadLimited",
        upload_ratio: f64 => "uploadRatio",
        #[serde(with = "crate::convert::option_bool_list")]
        wanted: Vec<bool> => "wanted",
        web_seeds: Vec<String> => "webseeds",
        web_seeds_sending_to_us: i64 => "webseedsSendingToUs",
    }
}

impl Torrent {
    /// Current download rate. `None` when not requested or negative.
    pub fn download_rate(&self) -> Option<ByteSize> {
        self.rate_download.and_then(rate_to_size)
    }

    /// Current upload rate. `None` when not requested or negative.
    pub fn upload_rate(&self) -> Option<ByteSize> {
        self.rate_upload.and_then(rate_to_size)
    }
}

fn rate_to_size(rate: i64) -> Option<ByteSize> {
    u64::try_from(rate).ok().map(ByteSize)
}

/// One file of a torrent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct TorrentFile {
    pub bytes_completed: i64,
    pub length: i64,
    pub name: String,
}

/// Download state of one file of a torrent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct TorrentFileStat {
    pub bytes_completed: i64,
    pub wanted: bool,
    pub priority: i64,
}

/// A connected peer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct Peer {
    pub address: String,
    pub client_name: String,
    pub client_is_choked: bool,
    pub client_is_interested: bool,
    pub flag_str: String,
    pub is_downloading_from: bool,
    pub is_encrypted: bool,
    pub is_incoming: bool,
    pub is_uploading_to: bool,
    #[serde(rename = "isUTP")]
    pub is_utp: bool,
    pub peer_is_choked: bool,
    pub peer_is_interested: bool,
    pub port: i64,
    pub progress: f64,
    /// Bytes per second.
    pub rate_to_client: i64,
    /// Bytes per second.
    pub rate_to_peer: i64,
}

impl Peer {
    /// Rate at which this peer sends to us, `None` if the daemon sent a
    /// negative rate.
    pub fn download_rate(&self) -> Option<ByteSize> {
        rate_to_size(self.rate_to_client)
    }

    /// Rate at which we send to this peer, `None` if negative.
    pub fn upload_rate(&self) -> Option<ByteSize> {
        rate_to_size(self.rate_to_peer)
    }
}

/// Where the peers of a torrent were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct TorrentPeersFrom {
    #[serde(rename = "fromCache")]
    pub from_cache: i64,
    #[serde(rename = "fromDht")]
    pub from_dht: i64,
    #[serde(rename = "fromIncoming")]
    pub from_incoming: i64,
    #[serde(rename = "fromLpd")]
    pub from_lpd: i64,
    #[serde(rename = "fromLtep")]
    pub from_ltep: i64,
    #[serde(rename = "fromPex")]
    pub from_pex: i64,
    #[serde(rename = "fromTracker")]
    pub from_tracker: i64,
}

/// A tracker of a torrent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Tracker {
    pub announce: String,
    pub id: i64,
    pub scrape: String,
    #[serde(rename = "sitename", default)]
    pub site_name: String,
    pub tier: i64,
}

/// Announce and scrape state of a tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct TrackerStats {
    pub announce: String,
    pub announce_state: i64,
    pub download_count: i64,
    pub has_announced: bool,
    pub has_scraped: bool,
    pub host: String,
    pub id: i64,
    pub is_backup: bool,
    pub last_announce_peer_count: i64,
    pub last_announce_result: String,
    #[serde(with = "crate::convert::unix_time")]
    pub last_announce_start_time: DateTime<Utc>,
    pub last_announce_succeeded: bool,
    #[serde(with = "crate::convert::unix_time")]
    pub last_announce_time: DateTime<Utc>,
    pub last_announce_timed_out: bool,
    pub last_scrape_result: String,
    #[serde(with = "crate::convert::unix_time")]
    pub last_scrape_start_time: DateTime<Utc>,
    pub last_scrape_succeeded: bool,
    #[serde(with = "crate::convert::unix_time")]
    pub last_scrape_time: DateTime<Utc>,
    /// Older daemons send `0`/`1` here.
    #[serde(with = "crate::convert::number_or_bool")]
    pub last_scrape_timed_out: bool,
    pub leecher_count: i64,
    #[serde(with = "crate::convert::unix_time")]
    pub next_announce_time: DateTime<Utc>,
    #[serde(with = "crate::convert::unix_time")]
    pub next_scrape_time: DateTime<Utc>,
    pub scrape: String,
    pub scrape_state: i64,
    #[serde(rename = "sitename", default)]
    pub site_name: String,
    pub seeder_count: i64,
    pub tier: i64,
}

/// Activity state of a torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum TorrentStatus {
    /// Stopped.
    Stopped,
    /// Queued for files checking.
    CheckWait,
    /// Files are being checked.
    Check,
    /// Queued to download.
    DownloadWait,
    /// Downloading.
    Download,
    /// Queued to seed.
    SeedWait,
    /// Seeding.
    Seed,
    /// Can't find peers.
    Isolated,
    /// A code this library does not know about.
    Unknown(i64),
}

impl From<i64> for TorrentStatus {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Stopped,
            1 => Self::CheckWait,
            2 => Self::Check,
            3 => Self::DownloadWait,
            4 => Self::Download,
            5 => Self::SeedWait,
            6 => Self::Seed,
            7 => Self::Isolated,
            other => Self::Unknown(other),
        }
    }
}

impl From<TorrentStatus> for i64 {
    fn from(status: TorrentStatus) -> Self {
        match status {
            TorrentStatus::Stopped => 0,
            TorrentStatus::CheckWait => 1,
            TorrentStatus::Check => 2,
            TorrentStatus::DownloadWait => 3,
            TorrentStatus::Download => 4,
            TorrentStatus::SeedWait => 5,
            TorrentStatus::Seed => 6,
            TorrentStatus::Isolated => 7,
            TorrentStatus::Unknown(code) => code,
        }
    }
}

impl fmt::Display for TorrentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stopped => f.write_str("stopped"),
            Self::CheckWait => f.write_str("waiting to check files"),
            Self::Check => f.write_str("checking files"),
            Self::DownloadWait => f.write_str("waiting to download"),
            Self::Download => f.write_str("downloading"),
            Self::SeedWait => f.write_str("waiting to seed"),
            Self::Seed => f.write_str("seeding"),
            Self::Isolated => f.write_str("can't find peers"),
            Self::Unknown(code) => write!(f, "<unknown> ({code})"),
        }
    }
}

/// Seed ratio policy of a torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum SeedRatioMode {
    /// Use the session-wide ratio.
    Global,
    /// Use the torrent's own ratio.
    Custom,
    /// Seed regardless of ratio.
    NoRatio,
    /// A mode this library does not know about.
    Unknown(i64),
}

impl From<i64> for SeedRatioMode {
    fn from(code: i64) -> Self {
        match code {
            0 => Self::Global,
            1 => Self::Custom,
            2 => Self::NoRatio,
            other => Self::Unknown(other),
        }
    }
}

impl From<SeedRatioMode> for i64 {
    fn from(mode: SeedRatioMode) -> Self {
        match mode {
            SeedRatioMode::Global => 0,
            SeedRatioMode::Custom => 1,
            SeedRatioMode::NoRatio => 2,
            SeedRatioMode::Unknown(code) => code,
        }
    }
}

impl fmt::Display for SeedRatioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::Custom => f.write_str("custom"),
            Self::NoRatio => f.write_str("no ratio"),
            Self::Unknown(code) => write!(f, "<unknown> ({code})"),
        }
    }
}
