//! Torrent accessors, mutators and actions.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::debug;
use transmission_rpc_types::{
    AddedTorrent, FieldTable, Torrent, TorrentAddPayload, TorrentIds, TorrentSetPayload,
};

use super::{TransmissionClient, arguments, check_fields};
use crate::error::{ProtocolViolation, RpcError};
use crate::ops::RpcOps;

#[derive(Serialize)]
struct TorrentGetArgs<'a> {
    fields: Vec<&'a str>,
    #[serde(skip_serializing_if = "TorrentIds::is_all")]
    ids: &'a TorrentIds,
}

#[derive(Deserialize)]
struct TorrentGetAnswer {
    torrents: Vec<Torrent>,
}

#[derive(Deserialize)]
struct TorrentAddAnswer {
    #[serde(rename = "torrent-added")]
    added: Option<AddedTorrent>,
    #[serde(rename = "torrent-duplicate")]
    duplicate: Option<AddedTorrent>,
}

#[derive(Serialize)]
struct IdsArgs<'a> {
    #[serde(skip_serializing_if = "TorrentIds::is_all")]
    ids: &'a TorrentIds,
}

#[derive(Serialize)]
struct TorrentRemoveArgs<'a> {
    ids: &'a TorrentIds,
    #[serde(rename = "delete-local-data")]
    delete_local_data: bool,
}

#[derive(Serialize)]
struct TorrentSetLocationArgs<'a> {
    ids: &'a TorrentIds,
    location: &'a str,
    #[serde(rename = "move")]
    move_data: bool,
}

#[derive(Serialize)]
struct TorrentRenamePathArgs<'a> {
    ids: &'a TorrentIds,
    path: &'a str,
    name: &'a str,
}

fn require_explicit(ids: &TorrentIds, method: &str) -> Result<(), RpcError> {
    if ids.is_explicit() {
        Ok(())
    } else {
        Err(RpcError::Validation(format!(
            "{method} needs at least one torrent id or hash"
        )))
    }
}

fn require_non_empty(value: &str, what: &str) -> Result<(), RpcError> {
    if value.is_empty() {
        Err(RpcError::Validation(format!("{what} can't be empty")))
    } else {
        Ok(())
    }
}

#[allow(private_bounds)]
impl<T: RpcOps> TransmissionClient<T> {
    /// Fetches the given fields of the selected torrents.
    ///
    /// Every field name must be a torrent wire key (`"id"`, `"name"`,
    /// `"percentDone"`, ...). Fields that were not requested are `None`.
    pub async fn torrent_get<S: AsRef<str>>(
        &self,
        fields: &[S],
        ids: TorrentIds,
    ) -> Result<Vec<Torrent>, RpcError> {
        check_fields::<Torrent, _>(fields)?;
        debug!("Getting {} torrent fields for {ids:?}", fields.len());
        let args = arguments(&TorrentGetArgs {
            fields: fields.iter().map(AsRef::as_ref).collect(),
            ids: &ids,
        })?;
        let answer: TorrentGetAnswer = self.invoke("torrent-get", args).await?;
        debug!("Got {} torrents", answer.torrents.len());
        Ok(answer.torrents)
    }

    /// Fetches every known field of every torrent.
    pub async fn torrent_get_all(&self) -> Result<Vec<Torrent>, RpcError> {
        self.torrent_get(Torrent::FIELDS, TorrentIds::All).await
    }

    /// Fetches every known field of the selected torrents.
    pub async fn torrent_get_all_for(&self, ids: TorrentIds) -> Result<Vec<Torrent>, RpcError> {
        self.torrent_get(Torrent::FIELDS, ids).await
    }

    /// Applies the set mutators of `payload` to the torrents it names.
    pub async fn torrent_set(&self, payload: &TorrentSetPayload) -> Result<(), RpcError> {
        require_explicit(&payload.ids, "torrent-set")?;
        debug!("Setting torrent mutators for {:?}", payload.ids);
        let _: IgnoredAny = self.invoke("torrent-set", arguments(payload)?).await?;
        debug!("Torrent mutators applied");
        Ok(())
    }

    /// Adds a torrent.
    ///
    /// Exactly one of `filename` and `metainfo` must be set. When the daemon
    /// already knows the torrent, the existing one is returned with
    /// `duplicate` set.
    pub async fn torrent_add(&self, payload: &TorrentAddPayload) -> Result<AddedTorrent, RpcError> {
        match (&payload.filename, &payload.metainfo) {
            (Some(_), Some(_)) => {
                return Err(RpcError::Validation(
                    "filename and metainfo can't both be set".into(),
                ));
            }
            (None, None) => {
                return Err(RpcError::Validation(
                    "either filename or metainfo is required".into(),
                ));
            }
            (Some(filename), None) => require_non_empty(filename, "filename")?,
            (None, Some(metainfo)) => require_non_empty(metainfo, "metainfo")?,
        }
        debug!("Adding torrent {:?}", payload.filename);
        let answer: TorrentAddAnswer = self.invoke("torrent-add", arguments(payload)?).await?;
        let torrent = match (answer.added, answer.duplicate) {
            (Some(added), _) => added,
            (None, Some(duplicate)) => AddedTorrent {
                duplicate: true,
                ..duplicate
            },
            (None, None) => {
                return Err(ProtocolViolation::UnexpectedAnswer(
                    "torrent-add answer has neither torrent-added nor torrent-duplicate".into(),
                )
                .into());
            }
        };
        debug!("Added {torrent:?}");
        Ok(torrent)
    }

    /// Reads a local `.torrent` file and adds it.
    pub async fn torrent_add_file(&self, path: impl AsRef<Path>) -> Result<AddedTorrent, RpcError> {
        let payload = TorrentAddPayload {
            metainfo: Some(read_metainfo(path.as_ref()).await?),
            ..Default::default()
        };
        self.torrent_add(&payload).await
    }

    /// Reads a local `.torrent` file and adds it, downloading to `download_dir`.
    pub async fn torrent_add_file_download_dir(
        &self,
        path: impl AsRef<Path>,
        download_dir: &str,
    ) -> Result<AddedTorrent, RpcError> {
        require_non_empty(download_dir, "download directory")?;
        let payload = TorrentAddPayload {
            metainfo: Some(read_metainfo(path.as_ref()).await?),
            download_dir: Some(download_dir.to_owned()),
            ..Default::default()
        };
        self.torrent_add(&payload).await
    }

    /// Removes torrents, and their data when `delete_local_data` is set.
    ///
    /// The selection must name at least one torrent.
    pub async fn torrent_remove(
        &self,
        ids: TorrentIds,
        delete_local_data: bool,
    ) -> Result<(), RpcError> {
        require_explicit(&ids, "torrent-remove")?;
        debug!("Removing torrents {ids:?}, delete_local_data={delete_local_data}");
        let args = arguments(&TorrentRemoveArgs {
            ids: &ids,
            delete_local_data,
        })?;
        let _: IgnoredAny = self.invoke("torrent-remove", args).await?;
        debug!("Remove command sent");
        Ok(())
    }

    /// Points torrents at a new location, moving the data when `move_data`
    /// is set and searching `location` for it otherwise.
    pub async fn torrent_set_location(
        &self,
        ids: TorrentIds,
        location: &str,
        move_data: bool,
    ) -> Result<(), RpcError> {
        require_explicit(&ids, "torrent-set-location")?;
        require_non_empty(location, "location")?;
        debug!("Setting location of {ids:?} to {location}, move={move_data}");
        let args = arguments(&TorrentSetLocationArgs {
            ids: &ids,
            location,
            move_data,
        })?;
        let _: IgnoredAny = self.invoke("torrent-set-location", args).await?;
        Ok(())
    }

    /// Renames the file or folder at `path` inside a single torrent to `name`.
    pub async fn torrent_rename_path(
        &self,
        id: TorrentIds,
        path: &str,
        name: &str,
    ) -> Result<(), RpcError> {
        let single = match &id {
            TorrentIds::Ids(ids) => ids.len() == 1,
            TorrentIds::Hashes(hashes) => hashes.len() == 1,
            TorrentIds::All | TorrentIds::RecentlyActive => false,
        };
        if !single {
            return Err(RpcError::Validation(
                "torrent-rename-path needs exactly one torrent".into(),
            ));
        }
        require_non_empty(path, "path")?;
        require_non_empty(name, "name")?;
        debug!("Renaming {path} to {name} in {id:?}");
        let args = arguments(&TorrentRenamePathArgs {
            ids: &id,
            path,
            name,
        })?;
        let _: IgnoredAny = self.invoke("torrent-rename-path", args).await?;
        Ok(())
    }

    /// Starts the selected torrents.
    pub async fn torrent_start(&self, ids: TorrentIds) -> Result<(), RpcError> {
        self.torrent_action("torrent-start", &ids).await
    }

    /// Starts the selected torrents, bypassing the queue.
    pub async fn torrent_start_now(&self, ids: TorrentIds) -> Result<(), RpcError> {
        self.torrent_action("torrent-start-now", &ids).await
    }

    /// Stops the selected torrents.
    pub async fn torrent_stop(&self, ids: TorrentIds) -> Result<(), RpcError> {
        self.torrent_action("torrent-stop", &ids).await
    }

    /// Verifies the local data of the selected torrents.
    pub async fn torrent_verify(&self, ids: TorrentIds) -> Result<(), RpcError> {
        self.torrent_action("torrent-verify", &ids).await
    }

    /// Asks the trackers of the selected torrents for more peers.
    pub async fn torrent_reannounce(&self, ids: TorrentIds) -> Result<(), RpcError> {
        self.torrent_action("torrent-reannounce", &ids).await
    }

    /// Moves the selected torrents to the top of the queue.
    pub async fn queue_move_top(&self, ids: TorrentIds) -> Result<(), RpcError> {
        self.torrent_action("queue-move-top", &ids).await
    }

    /// Moves the selected torrents one step up the queue.
    pub async fn queue_move_up(&self, ids: TorrentIds) -> Result<(), RpcError> {
        self.torrent_action("queue-move-up", &ids).await
    }

    /// Moves the selected torrents one step down the queue.
    pub async fn queue_move_down(&self, ids: TorrentIds) -> Result<(), RpcError> {
        self.torrent_action("queue-move-down", &ids).await
    }

    /// Moves the selected torrents to the bottom of the queue.
    pub async fn queue_move_bottom(&self, ids: TorrentIds) -> Result<(), RpcError> {
        self.torrent_action("queue-move-bottom", &ids).await
    }

    async fn torrent_action(&self, method: &str, ids: &TorrentIds) -> Result<(), RpcError> {
        debug!("Sending {method} for {ids:?}");
        let args = if ids.is_all() {
            None
        } else {
            arguments(&IdsArgs { ids })?
        };
        let _: IgnoredAny = self.invoke(method, args).await?;
        debug!("{method} command sent");
        Ok(())
    }
}

async fn read_metainfo(path: &Path) -> Result<String, RpcError> {
    let content = tokio::fs::read(path).await.map_err(|e| {
        RpcError::Validation(format!("can't read torrent file {}: {e}", path.display()))
    })?;
    Ok(STANDARD.encode(content))
}
