//! Power grid zone status.

use serde::{Deserialize, Serialize};

/// Status of one power zone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneStatus {
    /// Zone identifier (the key of the producer's zone map)
    #[serde(default)]
    pub id: String,
    /// Display label
    #[serde(default)]
    pub label: Option<String>,
    /// Whether the zone is blacked out
    #[serde(default)]
    pub is_blackout: bool,
}

impl ZoneStatus {
    /// Label, falling back to the zone id.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }
}
