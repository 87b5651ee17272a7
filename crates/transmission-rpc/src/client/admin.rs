//! Port check, free space, blocklist and bandwidth groups.

use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::debug;
use transmission_rpc_types::{BandwidthGroup, FieldTable, FreeSpace};

use super::{TransmissionClient, arguments, check_fields};
use crate::error::{ProtocolViolation, RpcError};
use crate::ops::RpcOps;

#[derive(Deserialize)]
struct PortTestAnswer {
    #[serde(rename = "port-is-open")]
    open: bool,
}

#[derive(Serialize)]
struct FreeSpaceArgs<'a> {
    path: &'a str,
}

#[derive(Deserialize)]
struct BlocklistUpdateAnswer {
    #[serde(rename = "blocklist-size")]
    size: i64,
}

#[derive(Serialize)]
struct GroupGetArgs<'a> {
    fields: Vec<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    group: Vec<&'a str>,
}

#[derive(Deserialize)]
struct GroupGetAnswer {
    group: Vec<BandwidthGroup>,
}

#[allow(private_bounds)]
impl<T: RpcOps> TransmissionClient<T> {
    /// Asks the daemon whether its peer port is reachable from outside.
    pub async fn port_test(&self) -> Result<bool, RpcError> {
        debug!("Testing peer port");
        let answer: PortTestAnswer = self.invoke("port-test", None).await?;
        debug!("Peer port open: {}", answer.open);
        Ok(answer.open)
    }

    /// Free space in `path` on the daemon's host.
    pub async fn free_space(&self, path: &str) -> Result<FreeSpace, RpcError> {
        if path.is_empty() {
            return Err(RpcError::Validation("path can't be empty".into()));
        }
        debug!("Getting free space of {path}");
        let space: FreeSpace = self
            .invoke("free-space", arguments(&FreeSpaceArgs { path })?)
            .await?;
        if space.path != path {
            return Err(ProtocolViolation::UnexpectedAnswer(format!(
                "free-space answered for '{}' instead of '{path}'",
                space.path
            ))
            .into());
        }
        debug!("Free space of {path}: {}", space.free);
        Ok(space)
    }

    /// Refreshes the blocklist and returns its number of entries.
    pub async fn blocklist_update(&self) -> Result<i64, RpcError> {
        debug!("Updating blocklist");
        let answer: BlocklistUpdateAnswer = self.invoke("blocklist-update", None).await?;
        debug!("Blocklist has {} entries", answer.size);
        Ok(answer.size)
    }

    /// Fetches every known field of every bandwidth group.
    pub async fn bandwidth_group_get_all(&self) -> Result<Vec<BandwidthGroup>, RpcError> {
        self.bandwidth_group_get(BandwidthGroup::FIELDS, &[] as &[&str])
            .await
    }

    /// Fetches the given fields of the named groups, or of every group when
    /// `names` is empty.
    pub async fn bandwidth_group_get<S: AsRef<str>, N: AsRef<str>>(
        &self,
        fields: &[S],
        names: &[N],
    ) -> Result<Vec<BandwidthGroup>, RpcError> {
        check_fields::<BandwidthGroup, _>(fields)?;
        debug!("Getting bandwidth groups ({} names)", names.len());
        let args = arguments(&GroupGetArgs {
            fields: fields.iter().map(AsRef::as_ref).collect(),
            group: names.iter().map(AsRef::as_ref).collect(),
        })?;
        let answer: GroupGetAnswer = self.invoke("group-get", args).await?;
        debug!("Got {} bandwidth groups", answer.group.len());
        Ok(answer.group)
    }

    /// Applies the set values of `group` to the group it names.
    pub async fn bandwidth_group_set(&self, group: &BandwidthGroup) -> Result<(), RpcError> {
        if group.name.as_deref().is_none_or(str::is_empty) {
            return Err(RpcError::Validation(
                "bandwidth group name is required".into(),
            ));
        }
        debug!("Setting bandwidth group {group:?}");
        let _: IgnoredAny = self.invoke("group-set", arguments(group)?).await?;
        Ok(())
    }
}
