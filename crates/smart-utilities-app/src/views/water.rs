//! Water sources and active leaks.

use serde::{Deserialize, Serialize};
use smart_utilities_types::{WaterLeak, WaterSource};

use super::placeholder;
use crate::store::ReconciliationStore;

/// Placeholder for an empty leak list.
pub const NO_ACTIVE_LEAKS: &str = "No active water leaks.";

/// One water source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRow {
    /// Source identifier
    pub id: String,
    /// Label, falling back to the id
    pub label: String,
    /// Fill level in percent
    pub percentage: f64,
    /// Below the alert threshold
    pub low: bool,
    /// Display text, e.g. `"Land Act Reservoir: 75.0%"`
    pub text: String,
}

/// One active leak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeakRow {
    /// Leak identifier
    pub id: String,
    /// Display text
    pub text: String,
}

/// The water module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WaterView {
    /// Sources in arrival order
    pub sources: Vec<SourceRow>,
    /// Shown instead of sources when there are none
    pub sources_placeholder: Option<String>,
    /// Active leaks in arrival order
    pub leaks: Vec<LeakRow>,
    /// Shown instead of leaks when there are none
    pub leaks_placeholder: Option<String>,
}

impl WaterView {
    /// Recompute the leak placeholder after the leak list changed.
    pub fn refresh_leaks_placeholder(&mut self) {
        self.leaks_placeholder = placeholder(&self.leaks, NO_ACTIVE_LEAKS);
    }
}

fn source_row(id: &str, source: &WaterSource) -> SourceRow {
    let label = source.label.clone().unwrap_or_else(|| id.to_string());
    let percentage = source.fill_percentage();
    let low = source.is_low();
    let mut text = format!("{label}: {percentage:.1}%");
    if low {
        text.push_str(" (LOW)");
    }
    SourceRow {
        id: id.to_string(),
        label,
        percentage,
        low,
        text,
    }
}

/// Row for one leak; `None` once it stopped leaking.
pub fn render_leak_row(id: &str, leak: &WaterLeak) -> Option<LeakRow> {
    if !leak.is_leaking {
        return None;
    }
    let location = leak
        .location_description
        .as_deref()
        .unwrap_or("in an unknown location");
    Some(LeakRow {
        id: id.to_string(),
        text: format!("Leak {id} detected {location}"),
    })
}

/// Render the water module.
pub fn render_water(store: &ReconciliationStore) -> WaterView {
    let sources: Vec<SourceRow> = store
        .all::<WaterSource>()
        .map(|(id, source)| source_row(id, source))
        .collect();
    let leaks: Vec<LeakRow> = store
        .all::<WaterLeak>()
        .filter_map(|(id, leak)| render_leak_row(id, leak))
        .collect();
    WaterView {
        sources_placeholder: placeholder(&sources, "No water source data available."),
        sources,
        leaks_placeholder: placeholder(&leaks, NO_ACTIVE_LEAKS),
        leaks,
    }
}
