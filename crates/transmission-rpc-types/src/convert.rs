//! Value conversions between Transmission wire encodings and Rust types.
//!
//! The daemon sends timestamps as unix seconds, durations as plain counts,
//! sizes as byte counts and some booleans as `0`/`1`. The pure functions here
//! do the conversion; the serde adapter modules apply them to struct fields.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Converts a unix timestamp (seconds) into a UTC date.
///
/// Returns `None` when the timestamp is outside chrono's representable range.
pub fn timestamp_to_time(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
}

/// Converts a number-encoded boolean. Only `0` and `1` are accepted.
pub fn number_to_bool(value: i64) -> Option<bool> {
    match value {
        0 => Some(false),
        1 => Some(true),
        _ => None,
    }
}

/// Converts a non-negative count of seconds into a [`Duration`].
pub fn seconds_to_duration(secs: i64) -> Option<Duration> {
    u64::try_from(secs).ok().map(Duration::from_secs)
}

/// Converts a non-negative count of minutes into a [`Duration`].
pub fn minutes_to_duration(minutes: i64) -> Option<Duration> {
    u64::try_from(minutes)
        .ok()
        .and_then(|m| m.checked_mul(60))
        .map(Duration::from_secs)
}

/// A size in bytes, as reported by the daemon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ByteSize(pub u64);

impl ByteSize {
    const UNITS: [&'static str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];

    /// Size from a count of bytes.
    pub const fn from_bytes(bytes: u64) -> Self {
        Self(bytes)
    }

    /// Size from a count of mebibytes, saturating on overflow.
    pub const fn from_mib(mib: u64) -> Self {
        Self(mib.saturating_mul(1024 * 1024))
    }

    /// Raw byte count.
    pub const fn bytes(self) -> u64 {
        self.0
    }

    /// Size in kibibytes.
    pub fn kib(self) -> f64 {
        self.0 as f64 / 1024.0
    }

    /// Size in mebibytes.
    pub fn mib(self) -> f64 {
        self.0 as f64 / (1024.0 * 1024.0)
    }
}

impl fmt::Display for ByteSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = self.0 as f64;
        let mut unit = 0;
        while value >= 1024.0 && unit < Self::UNITS.len() - 1 {
            value /= 1024.0;
            unit += 1;
        }
        if unit == 0 {
            write!(f, "{} {}", self.0, Self::UNITS[0])
        } else {
            write!(f, "{value:.2} {}", Self::UNITS[unit])
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrBool {
    Bool(bool),
    Number(i64),
}

impl NumberOrBool {
    fn into_bool<E: serde::de::Error>(self) -> Result<bool, E> {
        match self {
            Self::Bool(value) => Ok(value),
            Self::Number(value) => number_to_bool(value).ok_or_else(|| {
                E::custom(format!("can't convert value '{value}' into a boolean"))
            }),
        }
    }
}

/// Unix timestamp <-> `DateTime<Utc>`.
pub mod unix_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    /// Serializes as unix seconds.
    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.timestamp())
    }

    /// Deserializes from unix seconds.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        super::timestamp_to_time(secs)
            .ok_or_else(|| D::Error::custom(format!("timestamp {secs} is out of range")))
    }
}

/// Optional unix timestamp <-> `Option<DateTime<Utc>>`.
pub mod option_unix_time {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    /// Serializes as unix seconds.
    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_some(&time.timestamp()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes from unix seconds.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Option::<i64>::deserialize(deserializer)?
            .map(|secs| {
                super::timestamp_to_time(secs)
                    .ok_or_else(|| D::Error::custom(format!("timestamp {secs} is out of range")))
            })
            .transpose()
    }
}

/// Optional count of seconds <-> `Option<Duration>`.
pub mod option_seconds {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    /// Serializes as whole seconds.
    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&duration.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes from whole seconds.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<i64>::deserialize(deserializer)?
            .map(|secs| {
                super::seconds_to_duration(secs)
                    .ok_or_else(|| D::Error::custom(format!("negative duration {secs}s")))
            })
            .transpose()
    }
}

/// Optional count of minutes <-> `Option<Duration>`.
pub mod option_minutes {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    /// Serializes as whole minutes.
    pub fn serialize<S: Serializer>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&(duration.as_secs() / 60)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes from whole minutes.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Option::<i64>::deserialize(deserializer)?
            .map(|minutes| {
                super::minutes_to_duration(minutes)
                    .ok_or_else(|| D::Error::custom(format!("invalid duration {minutes}min")))
            })
            .transpose()
    }
}

/// Boolean sent either as `true`/`false` or as `1`/`0`. Serialized as a number.
pub mod number_or_bool {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes as `1` or `0`.
    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(i64::from(*value))
    }

    /// Accepts either encoding.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        super::NumberOrBool::deserialize(deserializer)?.into_bool()
    }
}

/// Optional list of booleans sent as `1`/`0` (or real booleans).
pub mod option_bool_list {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes each entry as `1` or `0`.
    pub fn serialize<S: Serializer>(value: &Option<Vec<bool>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(list) => {
                let numbers: Vec<i64> = list.iter().map(|b| i64::from(*b)).collect();
                serializer.serialize_some(&numbers)
            }
            None => serializer.serialize_none(),
        }
    }

    /// Accepts either encoding for every entry.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<bool>>, D::Error> {
        Option::<Vec<super::NumberOrBool>>::deserialize(deserializer)?
            .map(|list| {
                list.into_iter()
                    .map(super::NumberOrBool::into_bool)
                    .collect::<Result<Vec<bool>, D::Error>>()
            })
            .transpose()
    }
}

/// Optional list of strings sent as one newline-joined string.
pub mod option_newline_list {
    use serde::{Deserialize, Deserializer, Serializer};

    /// Joins the entries with `\n`.
    pub fn serialize<S: Serializer>(
        value: &Option<Vec<String>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(list) => serializer.serialize_some(&list.join("\n")),
            None => serializer.serialize_none(),
        }
    }

    /// Splits on `\n`; an empty string yields an empty list.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Vec<String>>, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.map(|joined| {
            if joined.is_empty() {
                Vec::new()
            } else {
                joined.split('\n').map(str::to_owned).collect()
            }
        }))
    }
}
