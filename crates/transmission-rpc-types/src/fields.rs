//! Static field tables for the RPC entities.
//!
//! Accessor methods (`torrent-get`, `session-get`, `group-get`) take a list of
//! wire keys to return. Every entity declared with [`rpc_entity!`] carries the
//! table of its keys, generated from the same declaration as the struct so the
//! two can never drift apart.

use thiserror::Error;

/// A requested field name is not part of the entity's field table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("field '{field}' is not a valid {entity} field")]
pub struct UnknownField {
    /// Entity the field was requested for (`torrent`, `session`, ...).
    pub entity: &'static str,
    /// The offending field name.
    pub field: String,
}

/// An RPC entity with a static table of wire keys.
pub trait FieldTable {
    /// Short entity name used in error messages.
    const ENTITY: &'static str;

    /// Every wire key, in declaration order.
    const FIELDS: &'static [&'static str];

    /// Checks that every requested field is a known wire key.
    fn validate_fields<S: AsRef<str>>(fields: &[S]) -> Result<(), UnknownField> {
        match fields
            .iter()
            .map(AsRef::as_ref)
            .find(|field| !Self::FIELDS.contains(field))
        {
            Some(field) => Err(UnknownField {
                entity: Self::ENTITY,
                field: field.to_owned(),
            }),
            None => Ok(()),
        }
    }
}

/// Declares an entity whose fields are all optional on the wire.
///
/// A field is `None` when the daemon was not asked for it (or did not send
/// it) and is skipped when the value is serialized back.
macro_rules! rpc_entity {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident($entity:literal) {
            $(
                $(#[$fmeta:meta])*
                $field:ident: $ty:ty => $wire:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        $vis struct $name {
            $(
                $(#[$fmeta])*
                #[serde(rename = $wire, default, skip_serializing_if = "Option::is_none")]
                pub $field: Option<$ty>,
            )*
        }

        impl $crate::fields::FieldTable for $name {
            const ENTITY: &'static str = $entity;
            const FIELDS: &'static [&'static str] = &[$($wire),*];
        }
    };
}

pub(crate) use rpc_entity;
