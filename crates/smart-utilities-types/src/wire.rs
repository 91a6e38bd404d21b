//! # Producer Field Tolerance
//!
//! The authority's scripts are not consistent about field names, and some
//! records arrive carrying both spellings of the same field at once (a
//! `propertyId` next to a `property_id`). Serde aliases reject that as a
//! duplicate field, so raw objects are rewritten to one canonical key per
//! field before parsing with [`FieldAliases::canonicalize`].
//!
//! Cosmetic fields (timestamps, ticket numbers, connection counts) are parsed
//! with [`lenient`]: a value of the wrong type becomes `None` instead of
//! rejecting the whole record.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::{
    HubStatus, IllegalDumpSite, PendingInstall, PropertyListing, ServiceTierCatalog,
    Subscription, TrashBin, WaterLeak, WaterSource, ZoneStatus,
};

/// Alternate wire spellings of a record's fields.
pub trait FieldAliases {
    /// `(canonical key, spellings)` pairs. Spellings are listed in
    /// preference order and include the canonical key itself.
    const FIELD_ALIASES: &'static [(&'static str, &'static [&'static str])] = &[];

    /// Collapse every spelling in `fields` onto its canonical key.
    ///
    /// The first spelling with a non-null value wins; the others are dropped.
    fn canonicalize(fields: &mut Map<String, Value>) {
        for (canonical, spellings) in Self::FIELD_ALIASES {
            let chosen = spellings
                .iter()
                .find_map(|spelling| fields.get(*spelling).filter(|v| !v.is_null()).cloned());
            for spelling in *spellings {
                fields.remove(*spelling);
            }
            if let Some(value) = chosen {
                fields.insert((*canonical).to_string(), value);
            }
        }
    }
}

impl FieldAliases for HubStatus {
    const FIELD_ALIASES: &'static [(&'static str, &'static [&'static str])] = &[
        ("currentConnections", &["cc", "currentConnections", "current_connections"]),
        ("maxConnections", &["mc", "maxConnections", "max_connections"]),
        ("isDown", &["isDown", "is_down"]),
    ];
}

impl FieldAliases for Subscription {
    const FIELD_ALIASES: &'static [(&'static str, &'static [&'static str])] = &[
        ("property_id", &["property_id", "propertyId"]),
        ("speed_tier", &["speed_tier", "speedTier"]),
        ("is_active", &["is_active", "isActive"]),
        ("last_payment", &["last_payment", "lastPayment"]),
    ];
}

impl FieldAliases for PendingInstall {
    const FIELD_ALIASES: &'static [(&'static str, &'static [&'static str])] = &[
        ("ticket_id", &["ticket_id", "ticketId"]),
        ("property_id", &["property_id", "propertyId"]),
        ("speed_tier", &["speedTierKey", "speed_tier", "tierId"]),
    ];
}

impl FieldAliases for PropertyListing {
    const FIELD_ALIASES: &'static [(&'static str, &'static [&'static str])] =
        &[("property_id", &["property_id", "propertyId"])];
}

impl FieldAliases for ZoneStatus {}
impl FieldAliases for WaterSource {}
impl FieldAliases for WaterLeak {}
impl FieldAliases for TrashBin {}
impl FieldAliases for IllegalDumpSite {}
impl FieldAliases for ServiceTierCatalog {}

/// Deserialize an optional field, mapping a value of the wrong shape to `None`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(T::deserialize(raw).ok())
}

/// Deserialize a field, mapping a value of the wrong shape to its default.
pub fn lenient_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(T::deserialize(raw).unwrap_or_default())
}
