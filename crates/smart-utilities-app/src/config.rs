//! Dashboard configuration.
//!
//! Every field has a default so an empty TOML file (or no file at all) is a
//! valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::DashboardError;
use crate::views::RenderOptions;

/// Runtime configuration for the dashboard core and host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Resource name the outbound endpoints are addressed under
    pub resource_name: String,
    /// Render a subscription whose provider hub is unknown as interrupted
    pub unknown_hub_treated_as_down: bool,
    /// Pending outbound requests older than this are expired
    pub request_timeout_ms: u64,
    /// `tracing` filter used by the host binary
    pub log_filter: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            resource_name: "fivem-smart-utilities".to_string(),
            unknown_hub_treated_as_down: true,
            request_timeout_ms: 10_000,
            log_filter: "info".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self, DashboardError> {
        toml::from_str(raw).map_err(|e| DashboardError::Config(e.to_string()))
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| DashboardError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Projection options derived from this configuration.
    ///
    /// Admin visibility is session state and starts hidden.
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            unknown_hub_treated_as_down: self.unknown_hub_treated_as_down,
            admin_visible: false,
        }
    }
}
