//! Power zone list.

use serde::{Deserialize, Serialize};
use smart_utilities_types::ZoneStatus;

use super::placeholder;
use crate::store::ReconciliationStore;

/// One power zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRow {
    /// Zone identifier
    pub id: String,
    /// Label, falling back to the id
    pub label: String,
    /// `false` during a blackout
    pub online: bool,
}

/// The power module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerView {
    /// Zones in arrival order
    pub rows: Vec<ZoneRow>,
    /// Shown instead of rows when there are none
    pub placeholder: Option<String>,
}

/// Render the power module.
pub fn render_power(store: &ReconciliationStore) -> PowerView {
    let rows: Vec<ZoneRow> = store
        .all::<ZoneStatus>()
        .map(|(id, zone)| ZoneRow {
            id: id.clone(),
            label: zone.label.clone().unwrap_or_else(|| id.clone()),
            online: !zone.is_blackout,
        })
        .collect();
    PowerView {
        placeholder: placeholder(&rows, "No power zone data available."),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blackout_zone_is_offline() {
        let mut store = ReconciliationStore::new();
        store.replace([
            (
                "Downtown".to_string(),
                ZoneStatus {
                    id: "Downtown".to_string(),
                    label: Some("Downtown Power Grid".to_string()),
                    is_blackout: false,
                },
            ),
            (
                "Vinewood".to_string(),
                ZoneStatus {
                    id: "Vinewood".to_string(),
                    label: None,
                    is_blackout: true,
                },
            ),
        ]);
        let view = render_power(&store);
        assert!(view.placeholder.is_none());
        assert_eq!(view.rows[0].label, "Downtown Power Grid");
        assert!(view.rows[0].online);
        assert_eq!(view.rows[1].label, "Vinewood");
        assert!(!view.rows[1].online);
    }
}
