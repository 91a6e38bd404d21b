//! Bins, dumpsters and illegal dump sites.

use serde::{Deserialize, Serialize};
use smart_utilities_types::{BinKind, IllegalDumpSite, LoadLevel, TrashBin};

use super::placeholder;
use crate::store::ReconciliationStore;

/// Placeholder for an empty public bin list.
pub const NO_PUBLIC_BINS: &str = "No public bin data.";
/// Placeholder for an empty dumpster list.
pub const NO_LARGE_DUMPSTERS: &str = "No large dumpster data.";
/// Placeholder for an empty illegal dump list.
pub const NO_ILLEGAL_DUMPS: &str = "No active illegal dump sites.";

/// One bin or dumpster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinRow {
    /// Bin identifier
    pub id: String,
    /// Container list the row belongs to
    pub kind: BinKind,
    /// Fill level in percent
    pub percentage: f64,
    /// Fill band
    pub level: LoadLevel,
    /// Display text, e.g. `"bin1: 90% Full (Load: 90/100)"`
    pub text: String,
}

/// One illegal dump site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DumpRow {
    /// Site identifier
    pub id: String,
    /// Number of dumped items, when known
    pub item_count: Option<usize>,
    /// Display text
    pub text: String,
}

/// The trash module.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrashView {
    /// Public bins
    pub public_bins: Vec<BinRow>,
    /// Large dumpsters
    pub large_dumpsters: Vec<BinRow>,
    /// Active illegal dump sites
    pub illegal_dumps: Vec<DumpRow>,
    /// Placeholder for `public_bins`
    pub public_bins_placeholder: Option<String>,
    /// Placeholder for `large_dumpsters`
    pub large_dumpsters_placeholder: Option<String>,
    /// Placeholder for `illegal_dumps`
    pub illegal_dumps_placeholder: Option<String>,
}

impl TrashView {
    /// Rows of one container list.
    pub fn bins_mut(&mut self, kind: BinKind) -> &mut Vec<BinRow> {
        match kind {
            BinKind::PublicBin => &mut self.public_bins,
            BinKind::LargeDumpster => &mut self.large_dumpsters,
        }
    }

    /// Recompute the placeholders after rows were patched.
    pub fn refresh_placeholders(&mut self) {
        self.public_bins_placeholder = placeholder(&self.public_bins, NO_PUBLIC_BINS);
        self.large_dumpsters_placeholder = placeholder(&self.large_dumpsters, NO_LARGE_DUMPSTERS);
        self.illegal_dumps_placeholder = placeholder(&self.illegal_dumps, NO_ILLEGAL_DUMPS);
    }
}

fn amount(value: Option<f64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

/// Row for one bin.
pub fn render_bin_row(id: &str, bin: &TrashBin) -> BinRow {
    let percentage = bin.fill_percentage();
    let label = bin.label.as_deref().unwrap_or(id);
    BinRow {
        id: id.to_string(),
        kind: bin.kind.unwrap_or_else(|| BinKind::infer_from_id(id)),
        percentage,
        level: bin.load_level(),
        text: format!(
            "{label}: {percentage:.0}% Full (Load: {}/{})",
            amount(bin.load),
            amount(bin.capacity)
        ),
    }
}

/// Row for one dump site; `None` once it was cleaned up.
pub fn render_dump_row(id: &str, site: &IllegalDumpSite) -> Option<DumpRow> {
    if !site.is_active {
        return None;
    }
    let item_count = site.items.as_ref().map(Vec::len);
    let mut text = format!(
        "Dump ID: {id} (Items: {})",
        item_count.map_or_else(|| "N/A".to_string(), |n| n.to_string())
    );
    if let Some(coords) = site.coords {
        text.push_str(&format!(" near ({:.0}, {:.0})", coords.x, coords.y));
    }
    Some(DumpRow {
        id: id.to_string(),
        item_count,
        text,
    })
}

/// Render the trash module.
pub fn render_trash(store: &ReconciliationStore) -> TrashView {
    let mut view = TrashView::default();
    for (id, bin) in store.all::<TrashBin>() {
        let row = render_bin_row(id, bin);
        view.bins_mut(row.kind).push(row);
    }
    view.illegal_dumps = store
        .all::<IllegalDumpSite>()
        .filter_map(|(id, site)| render_dump_row(id, site))
        .collect();
    view.refresh_placeholders();
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use smart_utilities_types::Coords;

    #[test]
    fn test_bins_split_by_kind() {
        let mut store = ReconciliationStore::new();
        store.replace([
            (
                "bin1".to_string(),
                TrashBin {
                    load: Some(90.0),
                    capacity: Some(100.0),
                    ..Default::default()
                },
            ),
            (
                "dumpster@2".to_string(),
                TrashBin {
                    label: Some("Alley".to_string()),
                    load: Some(10.0),
                    capacity: Some(200.0),
                    kind: Some(BinKind::LargeDumpster),
                },
            ),
        ]);
        let view = render_trash(&store);
        assert_eq!(view.public_bins[0].text, "bin1: 90% Full (Load: 90/100)");
        assert_eq!(view.public_bins[0].level, LoadLevel::Critical);
        assert_eq!(view.large_dumpsters[0].text, "Alley: 5% Full (Load: 10/200)");
        assert_eq!(view.illegal_dumps_placeholder.as_deref(), Some(NO_ILLEGAL_DUMPS));
        assert!(view.public_bins_placeholder.is_none());
    }

    #[test]
    fn test_dump_row_text() {
        let site = IllegalDumpSite {
            id: "dump7".to_string(),
            coords: Some(Coords {
                x: 10.4,
                y: -20.6,
                z: 30.0,
            }),
            items: Some(vec![serde_json::json!("tyre")]),
            is_active: true,
        };
        let row = render_dump_row("dump7", &site).unwrap();
        assert_eq!(row.text, "Dump ID: dump7 (Items: 1) near (10, -21)");

        let bare = IllegalDumpSite {
            coords: None,
            items: None,
            ..site.clone()
        };
        assert_eq!(
            render_dump_row("dump7", &bare).unwrap().text,
            "Dump ID: dump7 (Items: N/A)"
        );

        let cleaned = IllegalDumpSite {
            is_active: false,
            ..site
        };
        assert!(render_dump_row("dump7", &cleaned).is_none());
    }
}
