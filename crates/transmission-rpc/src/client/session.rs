//! Session arguments, statistics and shutdown.

use serde::Serialize;
use serde::de::IgnoredAny;
use tracing::debug;
use transmission_rpc_types::{RpcVersionInfo, SessionArguments, SessionStats};

use super::{TransmissionClient, arguments, check_fields};
use crate::error::{ProtocolViolation, RpcError};
use crate::ops::RpcOps;

#[derive(Serialize)]
struct SessionGetArgs<'a> {
    fields: Vec<&'a str>,
}

#[allow(private_bounds)]
impl<T: RpcOps> TransmissionClient<T> {
    /// Fetches every session argument the daemon reports.
    pub async fn session_arguments_get_all(&self) -> Result<SessionArguments, RpcError> {
        debug!("Getting all session arguments");
        self.invoke("session-get", None).await
    }

    /// Fetches the given session arguments.
    ///
    /// Every field name must be a session wire key (`"download-dir"`,
    /// `"rpc-version"`, ...).
    pub async fn session_arguments_get<S: AsRef<str>>(
        &self,
        fields: &[S],
    ) -> Result<SessionArguments, RpcError> {
        check_fields::<SessionArguments, _>(fields)?;
        debug!("Getting {} session arguments", fields.len());
        let args = arguments(&SessionGetArgs {
            fields: fields.iter().map(AsRef::as_ref).collect(),
        })?;
        self.invoke("session-get", args).await
    }

    /// Applies the set session arguments.
    ///
    /// Read-only keys (`version`, `rpc-version`, `session-id`, ...) are
    /// dropped before sending.
    pub async fn session_arguments_set(&self, session: &SessionArguments) -> Result<(), RpcError> {
        let mut session = session.clone();
        session.strip_read_only();
        debug!("Setting session arguments {session:?}");
        let _: IgnoredAny = self.invoke("session-set", arguments(&session)?).await?;
        debug!("Session arguments applied");
        Ok(())
    }

    /// Checks whether the daemon accepts this library's RPC version.
    pub async fn rpc_version(&self) -> Result<RpcVersionInfo, RpcError> {
        let session = self
            .session_arguments_get(&["rpc-version", "rpc-version-minimum"])
            .await?;
        match (session.rpc_version, session.rpc_version_minimum) {
            (Some(server), Some(minimum)) => {
                let info = RpcVersionInfo::new(server, minimum);
                debug!("RPC version check: {info:?}");
                Ok(info)
            }
            _ => Err(ProtocolViolation::UnexpectedAnswer(
                "session-get answer lacks rpc-version or rpc-version-minimum".into(),
            )
            .into()),
        }
    }

    /// Fetches the current and cumulative transfer statistics.
    pub async fn session_stats(&self) -> Result<SessionStats, RpcError> {
        debug!("Getting session statistics");
        let stats: SessionStats = self.invoke("session-stats", None).await?;
        debug!("Session statistics: {stats:?}");
        Ok(stats)
    }

    /// Asks the daemon to shut down.
    pub async fn session_close(&self) -> Result<(), RpcError> {
        debug!("Closing the daemon session");
        let _: IgnoredAny = self.invoke("session-close", None).await?;
        Ok(())
    }
}
