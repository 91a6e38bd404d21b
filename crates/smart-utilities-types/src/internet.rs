//! # Internet Records
//!
//! Hubs, per-property subscriptions, pending install work orders and the
//! property listings the cards are drawn for.

use serde::{Deserialize, Serialize};

// ============================================================================
// Hubs
// ============================================================================

/// Status of one internet hub.
///
/// Every field is optional: hub updates arrive as partial patches and a
/// field that no patch ever carried stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubStatus {
    /// Display label
    #[serde(
        default,
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    /// Whether the hub is down
    #[serde(
        default,
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub is_down: Option<bool>,
    /// Current connection count
    #[serde(
        default,
        alias = "cc",
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub current_connections: Option<u32>,
    /// Maximum connection count
    #[serde(
        default,
        alias = "mc",
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_connections: Option<u32>,
}

impl HubStatus {
    /// Shallow field-wise merge: every field present in `patch` overwrites ours.
    pub fn merge_from(&mut self, patch: HubStatus) {
        if patch.label.is_some() {
            self.label = patch.label;
        }
        if patch.is_down.is_some() {
            self.is_down = patch.is_down;
        }
        if patch.current_connections.is_some() {
            self.current_connections = patch.current_connections;
        }
        if patch.max_connections.is_some() {
            self.max_connections = patch.max_connections;
        }
    }
}

// ============================================================================
// Subscriptions
// ============================================================================

/// A property's internet subscription.
///
/// Always delivered as a full replacement object.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Property this subscription serves
    #[serde(default, alias = "propertyId")]
    pub property_id: String,
    /// Owning citizen
    #[serde(
        default,
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub citizenid: Option<String>,
    /// Provider hub id
    #[serde(
        default,
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub provider: Option<String>,
    /// Catalog tier key
    #[serde(
        default,
        alias = "speedTier",
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub speed_tier: Option<String>,
    /// Whether the service is live
    #[serde(default, alias = "isActive", deserialize_with = "crate::wire::lenient_or_default")]
    pub is_active: bool,
    /// Last payment timestamp (epoch seconds; other shapes are dropped)
    #[serde(
        default,
        alias = "lastPayment",
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_payment: Option<i64>,
}

// ============================================================================
// Pending installs
// ============================================================================

/// Work order status. Anything other than `open` is terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallStatus {
    /// Waiting for a technician
    Open,
    /// Completed, cancelled or otherwise closed
    #[default]
    #[serde(other)]
    Closed,
}

/// An open or closed installation work order for a property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingInstall {
    /// Ticket number
    #[serde(
        default,
        alias = "ticketId",
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub ticket_id: Option<u64>,
    /// Work order type (e.g. `internet_install`)
    #[serde(
        default,
        rename = "type",
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<String>,
    /// Property the install is for
    #[serde(default, alias = "propertyId")]
    pub property_id: String,
    /// Requesting citizen
    #[serde(
        default,
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub citizenid: Option<String>,
    /// Free-text description, e.g. `"Install Basic ADSL at property: p1"`
    #[serde(
        default,
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    /// Ticket status
    #[serde(default, deserialize_with = "crate::wire::lenient_or_default")]
    pub status: InstallStatus,
    /// Structured tier key
    #[serde(
        default,
        alias = "speedTierKey",
        alias = "tierId",
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub speed_tier: Option<String>,
}

impl PendingInstall {
    /// Whether the work order is still open.
    pub fn is_open(&self) -> bool {
        self.status == InstallStatus::Open
    }
}

// ============================================================================
// Property listings
// ============================================================================

/// A property the player owns; one internet card is drawn per listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyListing {
    /// Property identifier
    #[serde(default, alias = "propertyId")]
    pub property_id: String,
    /// Display label
    #[serde(
        default,
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub label: Option<String>,
    /// Street address
    #[serde(
        default,
        deserialize_with = "crate::wire::lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<String>,
}

impl PropertyListing {
    /// Bare listing for a property id.
    pub fn new(property_id: impl Into<String>) -> Self {
        Self {
            property_id: property_id.into(),
            ..Self::default()
        }
    }

    /// Label, falling back to the property id.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.property_id)
    }
}
