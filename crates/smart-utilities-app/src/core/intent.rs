//! # Intents: Outbound Actions
//!
//! An intent is a user or admin action that the dashboard forwards to the
//! authority. Intents never touch the store; the authority is expected to
//! echo a confirming update back through the router.
//!
//! ```text
//! Click → Intent → validate → Gateway → authority → UPDATE → Router → Store
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::DashboardError;

/// A request sent to the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    // =========================================================================
    // Session
    // =========================================================================
    /// Dashboard became visible; authority should push a full snapshot
    NuiReady,
    /// Dashboard was closed
    NuiClose,

    // =========================================================================
    // User Intents
    // =========================================================================
    /// Ask for an internet installation at an owned property
    RequestInternetInstall {
        /// Target property
        property_id: String,
        /// Catalog tier key
        tier_id: String,
    },
    /// Ask to move an active subscription to a later catalog tier
    RequestInternetUpgrade {
        /// Target property
        property_id: String,
        /// Catalog tier key
        tier_id: String,
    },
    /// Report illegal dumping at the player's location
    ReportIllegalDumping,
    /// Ask for a full water snapshot (leak list drifted)
    RequestFullWaterStatus,

    // =========================================================================
    // Admin Intents
    // =========================================================================
    /// Black out a power zone
    ForceBlackout {
        /// Target zone
        zone_id: String,
    },
    /// Restore a power zone
    RepairPowerZone {
        /// Target zone
        zone_id: String,
    },
    /// Take a hub down
    ForceInternetOutage {
        /// Target hub
        hub_id: String,
    },
    /// Start a random water leak
    ForceWaterLeak,
    /// Spawn trash
    SpawnTrash,
    /// Open an install work order on any property
    AdminRequestInternetInstall {
        /// Target property
        property_id: String,
        /// Catalog tier key
        tier_id: String,
    },
}

impl Intent {
    /// Outbound action name.
    pub fn action_name(&self) -> &'static str {
        match self {
            Self::NuiReady => "NUI_READY",
            Self::NuiClose => "NUI_CLOSE",
            Self::RequestInternetInstall { .. } => "user:requestInternetInstall",
            Self::RequestInternetUpgrade { .. } => "user:requestInternetUpgrade",
            Self::ReportIllegalDumping => "user:reportIllegalDumping",
            Self::RequestFullWaterStatus => "user:requestFullWaterStatus",
            Self::ForceBlackout { .. } => "admin:forceBlackout",
            Self::RepairPowerZone { .. } => "admin:repairPowerZone",
            Self::ForceInternetOutage { .. } => "admin:forceInternetOutage",
            Self::ForceWaterLeak => "admin:forceWaterLeak",
            Self::SpawnTrash => "admin:spawnTrash",
            Self::AdminRequestInternetInstall { .. } => "admin:requestInternetInstall",
        }
    }

    /// Outbound payload body.
    pub fn payload(&self) -> Value {
        match self {
            Self::RequestInternetInstall {
                property_id,
                tier_id,
            }
            | Self::RequestInternetUpgrade {
                property_id,
                tier_id,
            } => json!({ "tierId": tier_id, "propertyId": property_id }),
            Self::AdminRequestInternetInstall {
                property_id,
                tier_id,
            } => json!({ "propertyId": property_id, "tierId": tier_id }),
            Self::ForceBlackout { zone_id } | Self::RepairPowerZone { zone_id } => {
                json!({ "zoneId": zone_id })
            }
            Self::ForceInternetOutage { hub_id } => json!({ "hubId": hub_id }),
            Self::NuiReady
            | Self::NuiClose
            | Self::ReportIllegalDumping
            | Self::RequestFullWaterStatus
            | Self::ForceWaterLeak
            | Self::SpawnTrash => json!({}),
        }
    }

    /// Whether the intent belongs to the admin-only controls.
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Self::ForceBlackout { .. }
                | Self::RepairPowerZone { .. }
                | Self::ForceInternetOutage { .. }
                | Self::ForceWaterLeak
                | Self::SpawnTrash
                | Self::AdminRequestInternetInstall { .. }
        )
    }

    /// Check the intent's inputs. The error text is meant for the status bar.
    pub fn validate(&self) -> Result<(), DashboardError> {
        match self {
            Self::RequestInternetInstall {
                property_id,
                tier_id,
            } => {
                if tier_id.is_empty() {
                    Err(DashboardError::invalid_input(
                        "Please select an internet tier first.",
                    ))
                } else if property_id.is_empty() {
                    Err(DashboardError::invalid_input(
                        "Property ID missing for installation request.",
                    ))
                } else {
                    Ok(())
                }
            }
            Self::RequestInternetUpgrade {
                property_id,
                tier_id,
            } => {
                if tier_id.is_empty() {
                    Err(DashboardError::invalid_input(
                        "Please select an internet tier first.",
                    ))
                } else if property_id.is_empty() {
                    Err(DashboardError::invalid_input(
                        "Property ID missing for upgrade request.",
                    ))
                } else {
                    Ok(())
                }
            }
            Self::ForceBlackout { zone_id } | Self::RepairPowerZone { zone_id }
                if zone_id.is_empty() =>
            {
                Err(DashboardError::invalid_input(
                    "Please select a power zone first.",
                ))
            }
            Self::ForceInternetOutage { hub_id } if hub_id.is_empty() => Err(
                DashboardError::invalid_input("Please select an internet hub first."),
            ),
            Self::AdminRequestInternetInstall {
                property_id,
                tier_id,
            } if property_id.is_empty() || tier_id.is_empty() => {
                Err(DashboardError::invalid_input(
                    "Admin: Property ID and Tier required for install request.",
                ))
            }
            _ => Ok(()),
        }
    }

    /// Status text shown while the request is in flight.
    pub fn progress_text(&self) -> Option<String> {
        match self {
            Self::NuiReady | Self::NuiClose | Self::RequestFullWaterStatus => None,
            Self::RequestInternetInstall { property_id, .. } => Some(format!(
                "Requesting installation for property {property_id}..."
            )),
            Self::RequestInternetUpgrade { property_id, .. } => {
                Some(format!("Requesting upgrade for property {property_id}..."))
            }
            Self::ReportIllegalDumping => {
                Some("Reporting illegal dumping at current location...".to_string())
            }
            Self::ForceBlackout { zone_id } => {
                Some(format!("Attempting to force blackout in {zone_id}..."))
            }
            Self::RepairPowerZone { zone_id } => {
                Some(format!("Attempting to repair power zone {zone_id}..."))
            }
            Self::ForceInternetOutage { hub_id } => {
                Some(format!("Attempting to force outage for hub {hub_id}..."))
            }
            Self::ForceWaterLeak => Some("Attempting to force a random water leak...".to_string()),
            Self::SpawnTrash => Some("Attempting to spawn trash (admin)...".to_string()),
            Self::AdminRequestInternetInstall {
                property_id,
                tier_id,
            } => Some(format!(
                "Admin: Requesting install for {property_id}, tier {tier_id}"
            )),
        }
    }
}
