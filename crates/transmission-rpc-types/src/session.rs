//! Session arguments (`session-get` / `session-set`) and statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::convert::ByteSize;
use crate::fields::rpc_entity;

/// RPC version this library is written against.
pub const RPC_VERSION: i64 = 17;

/// Peer encryption preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encryption {
    /// Only encrypted peers.
    Required,
    /// Prefer encrypted peers.
    #[serde(alias = "prefered")]
    Preferred,
    /// Accept unencrypted peers.
    Tolerated,
}

impl fmt::Display for Encryption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Required => "required",
            Self::Preferred => "preferred",
            Self::Tolerated => "tolerated",
        })
    }
}

rpc_entity! {
    /// Global session values.
    ///
    /// The same struct is used to read (`session-get`) and to mutate
    /// (`session-set`); unset fields are left untouched by the daemon.
    pub struct SessionArguments("session") {
        /// Max global download speed (KBps) while alt speeds are enabled.
        alt_speed_down: i64 => "alt-speed-down",
        /// Use the alt speeds.
        alt_speed_enabled: bool => "alt-speed-enabled",
        /// When to turn on alt speeds, in minutes after midnight.
        alt_speed_time_begin: i64 => "alt-speed-time-begin",
        /// Day mask of the alt speed schedule.
        alt_speed_time_day: i64 => "alt-speed-time-day",
        /// Use the scheduled on/off times.
        alt_speed_time_enabled: bool => "alt-speed-time-enabled",
        /// When to turn off alt speeds, in minutes after midnight.
        alt_speed_time_end: i64 => "alt-speed-time-end",
        /// Max global upload speed (KBps) while alt speeds are enabled.
        alt_speed_up: i64 => "alt-speed-up",
        /// Blocklist enabled.
        blocklist_enabled: bool => "blocklist-enabled",
        /// Number of rules in the blocklist. Read only.
        blocklist_size: i64 => "blocklist-size",
        /// Where `blocklist-update` fetches the blocklist from.
        blocklist_url: String => "blocklist-url",
        /// Disk cache size in MB.
        cache_size_mb: i64 => "cache-size-mb",
        /// Daemon configuration directory. Read only.
        config_dir: String => "config-dir",
        /// Trackers added to public torrents.
        #[serde(with = "crate::convert::option_newline_list")]
        default_trackers: Vec<String> => "default-trackers",
        /// DHT enabled for public torrents.
        dht_enabled: bool => "dht-enabled",
        /// Default download directory.
        download_dir: String => "download-dir",
        /// Limit concurrent downloads.
        download_queue_enabled: bool => "download-queue-enabled",
        /// Max concurrent downloads.
        download_queue_size: i64 => "download-queue-size",
        /// Peer encryption preference.
        encryption: Encryption => "encryption",
        /// Honor the idle seeding limit by default.
        idle_seeding_limit_enabled: bool => "idle-seeding-limit-enabled",
        /// Stop seeding torrents idle for this many minutes.
        idle_seeding_limit: i64 => "idle-seeding-limit",
        /// Keep incomplete torrents in `incomplete-dir`.
        incomplete_dir_enabled: bool => "incomplete-dir-enabled",
        /// Directory for incomplete torrents.
        incomplete_dir: String => "incomplete-dir",
        /// Local peer discovery enabled for public torrents.
        lpd_enabled: bool => "lpd-enabled",
        /// Max global number of peers.
        peer_limit_global: i64 => "peer-limit-global",
        /// Max number of peers per torrent.
        peer_limit_per_torrent: i64 => "peer-limit-per-torrent",
        /// Pick a random peer port on launch.
        peer_port_random_on_start: bool => "peer-port-random-on-start",
        /// Incoming peer port.
        peer_port: i64 => "peer-port",
        /// PEX enabled for public torrents.
        pex_enabled: bool => "pex-enabled",
        /// UPnP / NAT-PMP port forwarding enabled.
        port_forwarding_enabled: bool => "port-forwarding-enabled",
        /// Treat idle torrents as stalled.
        queue_stalled_enabled: bool => "queue-stalled-enabled",
        /// Minutes of inactivity before a torrent counts as stalled.
        queue_stalled_minutes: i64 => "queue-stalled-minutes",
        /// Append `.part` to incomplete files.
        rename_partial_files: bool => "rename-partial-files",
        /// Minimum RPC version supported by the daemon. Read only.
        rpc_version_minimum: i64 => "rpc-version-minimum",
        /// RPC version as a semver string. Read only.
        rpc_version_semver: String => "rpc-version-semver",
        /// RPC version of the daemon. Read only.
        rpc_version: i64 => "rpc-version",
        /// Run the torrent-added script.
        script_torrent_added_enabled: bool => "script-torrent-added-enabled",
        /// Torrent-added script.
        script_torrent_added_filename: String => "script-torrent-added-filename",
        /// Run the torrent-done script.
        script_torrent_done_enabled: bool => "script-torrent-done-enabled",
        /// Torrent-done script.
        script_torrent_done_filename: String => "script-torrent-done-filename",
        /// Run the seeding-done script.
        script_torrent_done_seeding_enabled: bool => "script-torrent-done-seeding-enabled",
        /// Seeding-done script.
        script_torrent_done_seeding_filename: String => "script-torrent-done-seeding-filename",
        /// Limit concurrent seeds.
        seed_queue_enabled: bool => "seed-queue-enabled",
        /// Max concurrent seeds.
        seed_queue_size: i64 => "seed-queue-size",
        /// Default seed ratio.
        seed_ratio_limit: f64 => "seedRatioLimit",
        /// Honor the seed ratio by default.
        seed_ratio_limited: bool => "seedRatioLimited",
        /// Current session id. Read only.
        session_id: String => "session-id",
        /// Global download limit enabled.
        speed_limit_down_enabled: bool => "speed-limit-down-enabled",
        /// Global download limit (KBps).
        speed_limit_down: i64 => "speed-limit-down",
        /// Global upload limit enabled.
        speed_limit_up_enabled: bool => "speed-limit-up-enabled",
        /// Global upload limit (KBps).
        speed_limit_up: i64 => "speed-limit-up",
        /// Start added torrents right away.
        start_added_torrents: bool => "start-added-torrents",
        /// Delete the `.torrent` file of added torrents.
        trash_original_torrent_files: bool => "trash-original-torrent-files",
        /// Unit conventions of the daemon. Read only.
        units: Units => "units",
        /// uTP enabled.
        utp_enabled: bool => "utp-enabled",
        /// Long version string. Read only.
        version: String => "version",
    }
}

impl SessionArguments {
    /// Clears every key the daemon refuses in `session-set`.
    pub fn strip_read_only(&mut self) {
        self.blocklist_size = None;
        self.config_dir = None;
        self.rpc_version_minimum = None;
        self.rpc_version_semver = None;
        self.rpc_version = None;
        self.session_id = None;
        self.units = None;
        self.version = None;
    }

    /// Disk cache size, when requested.
    pub fn cache_size(&self) -> Option<ByteSize> {
        self.cache_size_mb
            .and_then(|mb| u64::try_from(mb).ok())
            .map(ByteSize::from_mib)
    }
}

/// Unit conventions used by the daemon for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Units {
    /// Speed unit labels, smallest first.
    pub speed_units: Vec<String>,
    /// Bytes in one speed "kilo" unit.
    pub speed_bytes: i64,
    /// Size unit labels, smallest first.
    pub size_units: Vec<String>,
    /// Bytes in one size "kilo" unit.
    pub size_bytes: i64,
    /// Memory unit labels, smallest first.
    pub memory_units: Vec<String>,
    /// Bytes in one memory "kilo" unit.
    pub memory_bytes: i64,
}

/// Result of comparing this library's RPC version with the daemon's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcVersionInfo {
    /// `true` when [`RPC_VERSION`] is at least the daemon's minimum.
    pub compatible: bool,
    /// RPC version reported by the daemon.
    pub server: i64,
    /// Minimum RPC version accepted by the daemon.
    pub server_minimum: i64,
}

impl RpcVersionInfo {
    /// Compares the daemon's versions with [`RPC_VERSION`].
    pub fn new(server: i64, server_minimum: i64) -> Self {
        Self {
            compatible: RPC_VERSION >= server_minimum,
            server,
            server_minimum,
        }
    }
}

/// Current and cumulative transfer statistics (`session-stats`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SessionStats {
    pub active_torrent_count: i64,
    pub download_speed: i64,
    pub paused_torrent_count: i64,
    pub torrent_count: i64,
    pub upload_speed: i64,
    #[serde(rename = "cumulative-stats")]
    pub cumulative_stats: SessionStatsDetails,
    #[serde(rename = "current-stats")]
    pub current_stats: SessionStatsDetails,
}

/// Detailed statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct SessionStatsDetails {
    pub downloaded_bytes: i64,
    pub files_added: i64,
    pub seconds_active: i64,
    pub session_count: i64,
    pub uploaded_bytes: i64,
}

impl SessionStatsDetails {
    /// Downloaded amount.
    pub fn downloaded(&self) -> ByteSize {
        ByteSize(u64::try_from(self.downloaded_bytes).unwrap_or(0))
    }

    /// Uploaded amount.
    pub fn uploaded(&self) -> ByteSize {
        ByteSize(u64::try_from(self.uploaded_bytes).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::FieldTable;

    #[test]
    fn read_only_keys_are_stripped() {
        let mut args = SessionArguments {
            download_dir: Some("/data".into()),
            rpc_version: Some(17),
            session_id: Some("abc".into()),
            version: Some("4.0.5".into()),
            ..Default::default()
        };
        args.strip_read_only();

        assert_eq!(
            serde_json::to_string(&args).unwrap(),
            r#"{"download-dir":"/data"}"#
        );
    }

    #[test]
    fn false_and_zero_are_sent() {
        let args = SessionArguments {
            dht_enabled: Some(false),
            peer_port: Some(0),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&args).unwrap(),
            r#"{"dht-enabled":false,"peer-port":0}"#
        );
    }

    #[test]
    fn default_trackers_and_encryption() {
        let args: SessionArguments = serde_json::from_str(
            r#"{"default-trackers":"udp://a\nudp://b","encryption":"prefered","cache-size-mb":4}"#,
        )
        .unwrap();
        assert_eq!(
            args.default_trackers,
            Some(vec!["udp://a".to_string(), "udp://b".to_string()])
        );
        assert_eq!(args.encryption, Some(Encryption::Preferred));
        assert_eq!(args.cache_size(), Some(ByteSize::from_mib(4)));
        assert_eq!(
            serde_json::to_value(&args).unwrap()["encryption"],
            serde_json::json!("preferred")
        );
    }

    #[test]
    fn session_field_table() {
        assert!(SessionArguments::validate_fields(&["rpc-version", "download-dir"]).is_ok());
        let err = SessionArguments::validate_fields(&["download_dir"]).unwrap_err();
        assert_eq!(err.entity, "session");
    }

    #[test]
    fn version_compatibility() {
        assert!(RpcVersionInfo::new(17, 14).compatible);
        assert!(!RpcVersionInfo::new(30, RPC_VERSION + 1).compatible);
    }

    #[test]
    fn decodes_stats() {
        let stats: SessionStats = serde_json::from_str(
            r#"{
                "activeTorrentCount": 1, "downloadSpeed": 1000, "pausedTorrentCount": 0,
                "torrentCount": 1, "uploadSpeed": 500,
                "cumulative-stats": {"downloadedBytes": 1000, "filesAdded": 5, "secondsActive": 3600, "sessionCount": 10, "uploadedBytes": 500},
                "current-stats": {"downloadedBytes": 100, "filesAdded": 1, "secondsActive": 600, "sessionCount": 1, "uploadedBytes": 50}
            }"#,
        )
        .unwrap();
        assert_eq!(stats.download_speed, 1000);
        assert_eq!(stats.cumulative_stats.session_count, 10);
        assert_eq!(stats.current_stats.downloaded(), ByteSize(100));
        assert_eq!(stats.current_stats.uploaded(), ByteSize(50));
    }
}
