//! Bandwidth groups (`group-get` / `group-set`).

use crate::fields::rpc_entity;

rpc_entity! {
    /// A named bandwidth group.
    ///
    /// Read with `group-get`; written with `group-set`, where `name` selects
    /// the group and every other set field is applied to it.
    pub struct BandwidthGroup("bandwidth group") {
        /// Session upload/download limits also apply to the group.
        honors_session_limits: bool => "honorsSessionLimits",
        /// Group name.
        name: String => "name",
        /// Download limit enabled.
        speed_limit_down_enabled: bool => "speed-limit-down-enabled",
        /// Download limit (KBps).
        speed_limit_down: i64 => "speed-limit-down",
        /// Upload limit enabled.
        speed_limit_up_enabled: bool => "speed-limit-up-enabled",
        /// Upload limit (KBps).
        speed_limit_up: i64 => "speed-limit-up",
    }
}

impl BandwidthGroup {
    /// A mutator for the group called `name`, with no values set yet.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}
