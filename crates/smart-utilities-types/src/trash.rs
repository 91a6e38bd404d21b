//! # Trash Records
//!
//! Public bins, large dumpsters and illegal dump sites.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which container list a bin belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinKind {
    /// Street-side public bin
    PublicBin,
    /// Large dumpster
    LargeDumpster,
}

impl BinKind {
    /// Infer the container for a bin id never seen before.
    ///
    /// Producers prefix dumpster ids with `dumpster` (e.g. `dumpster@12`);
    /// everything else is listed with the public bins.
    pub fn infer_from_id(id: &str) -> Self {
        if id.starts_with("dumpster") {
            Self::LargeDumpster
        } else {
            Self::PublicBin
        }
    }
}

/// Fill level band of a bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadLevel {
    /// 60% full or less
    Ok,
    /// Above 60%, up to 85%
    Warning,
    /// Above 85%
    Critical,
}

impl LoadLevel {
    /// Band for a fill percentage.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage > 85.0 {
            Self::Critical
        } else if percentage > 60.0 {
            Self::Warning
        } else {
            Self::Ok
        }
    }
}

/// A bin or dumpster.
///
/// Mergeable fields are optional: bin updates arrive as partial patches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrashBin {
    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Current load
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load: Option<f64>,
    /// Capacity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<f64>,
    /// Container list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<BinKind>,
}

impl TrashBin {
    /// Shallow field-wise merge: every field present in `patch` overwrites ours.
    pub fn merge_from(&mut self, patch: TrashBin) {
        if patch.label.is_some() {
            self.label = patch.label;
        }
        if patch.load.is_some() {
            self.load = patch.load;
        }
        if patch.capacity.is_some() {
            self.capacity = patch.capacity;
        }
        if patch.kind.is_some() {
            self.kind = patch.kind;
        }
    }

    /// Fill level in percent; `0` when capacity is unknown or not positive.
    pub fn fill_percentage(&self) -> f64 {
        match (self.load, self.capacity) {
            (Some(load), Some(capacity)) if capacity > 0.0 => load / capacity * 100.0,
            _ => 0.0,
        }
    }

    /// Fill level band.
    pub fn load_level(&self) -> LoadLevel {
        LoadLevel::from_percentage(self.fill_percentage())
    }
}

/// World coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    /// X
    #[serde(default)]
    pub x: f64,
    /// Y
    #[serde(default)]
    pub y: f64,
    /// Z
    #[serde(default)]
    pub z: f64,
}

/// An illegal dumping site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IllegalDumpSite {
    /// Site identifier
    #[serde(default)]
    pub id: String,
    /// Location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coords: Option<Coords>,
    /// Dumped items; contents are opaque to the dashboard
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Value>>,
    /// `false` means the site was cleaned up and should be removed
    #[serde(default = "crate::default_true")]
    pub is_active: bool,
}
