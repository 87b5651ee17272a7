//! Shared test utilities and fixtures.

use serde_json::{Value, json};

pub(crate) fn make_test_torrent(id: i64, name: &str, hash: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "hashString": hash,
        "addedDate": 1_700_000_000,
        "downloadDir": "/downloads",
        "eta": -1,
        "percentDone": 0.5,
        "rateDownload": 2048,
        "rateUpload": 0,
        "status": 4,
        "totalSize": 1000,
        "isFinished": false,
        "labels": ["linux"],
        "wanted": [1, 0],
    })
}

pub(crate) fn make_test_added(id: i64, name: &str, hash: &str) -> Value {
    json!({ "id": id, "name": name, "hashString": hash })
}

pub(crate) fn make_test_stats() -> Value {
    let details = json!({
        "downloadedBytes": 1000,
        "filesAdded": 5,
        "secondsActive": 3600,
        "sessionCount": 1,
        "uploadedBytes": 500,
    });
    json!({
        "activeTorrentCount": 2,
        "downloadSpeed": 1024,
        "pausedTorrentCount": 1,
        "torrentCount": 3,
        "uploadSpeed": 512,
        "cumulative-stats": details,
        "current-stats": details,
    })
}

pub(crate) fn make_test_group(name: &str) -> Value {
    json!({
        "honorsSessionLimits": true,
        "name": name,
        "speed-limit-down-enabled": false,
        "speed-limit-down": 0,
        "speed-limit-up-enabled": true,
        "speed-limit-up": 100,
    })
}
