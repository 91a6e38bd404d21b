//! # Projection Renderer
//!
//! Pure functions from store state (plus the service tier catalog) to plain,
//! serializable view data. Nothing here touches a live surface and nothing
//! here keeps a reference into the store past the call: every view owns its
//! strings. Committing a view to a surface is [`crate::surface::commit`]'s
//! job.

pub mod admin;
pub mod internet;
pub mod power;
pub mod trash;
pub mod water;

use serde::{Deserialize, Serialize};
use smart_utilities_types::ServiceTierCatalog;

use crate::store::ReconciliationStore;

pub use admin::{render_admin, AdminPanel};
pub use internet::{
    render_hubs, render_properties, render_property, CardStatus, HubRow, HubsView, PropertiesView,
    PropertyCard,
};
pub use power::{render_power, PowerView, ZoneRow};
pub use trash::{render_bin_row, render_dump_row, render_trash, BinRow, DumpRow, TrashView};
pub use water::{render_leak_row, render_water, LeakRow, SourceRow, WaterView};

/// Knobs that change how the store is projected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    /// A subscription whose provider hub is unknown renders as interrupted
    pub unknown_hub_treated_as_down: bool,
    /// Admin controls are shown
    pub admin_visible: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            unknown_hub_treated_as_down: true,
            admin_visible: false,
        }
    }
}

/// A dashboard module that can be re-rendered on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModuleId {
    /// Power zones
    Power,
    /// Water sources and leaks
    Water,
    /// Internet hub list
    Hubs,
    /// Property cards
    Properties,
    /// Bins, dumpsters and illegal dumps
    Trash,
    /// Admin controls
    Admin,
}

/// One rendered module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModuleView {
    /// Power zones
    Power(PowerView),
    /// Water sources and leaks
    Water(WaterView),
    /// Internet hub list
    Hubs(HubsView),
    /// Property cards
    Properties(PropertiesView),
    /// Bins, dumpsters and illegal dumps
    Trash(TrashView),
    /// Admin controls
    Admin(AdminPanel),
}

impl ModuleView {
    /// Which module this is.
    pub fn id(&self) -> ModuleId {
        match self {
            Self::Power(_) => ModuleId::Power,
            Self::Water(_) => ModuleId::Water,
            Self::Hubs(_) => ModuleId::Hubs,
            Self::Properties(_) => ModuleId::Properties,
            Self::Trash(_) => ModuleId::Trash,
            Self::Admin(_) => ModuleId::Admin,
        }
    }
}

/// The whole dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardView {
    /// Power zones
    pub power: PowerView,
    /// Water sources and leaks
    pub water: WaterView,
    /// Internet hub list
    pub hubs: HubsView,
    /// Property cards
    pub properties: PropertiesView,
    /// Bins, dumpsters and illegal dumps
    pub trash: TrashView,
    /// Admin controls
    pub admin: AdminPanel,
}

impl DashboardView {
    /// Swap one module in place.
    pub fn apply_module(&mut self, module: ModuleView) {
        match module {
            ModuleView::Power(view) => self.power = view,
            ModuleView::Water(view) => self.water = view,
            ModuleView::Hubs(view) => self.hubs = view,
            ModuleView::Properties(view) => self.properties = view,
            ModuleView::Trash(view) => self.trash = view,
            ModuleView::Admin(view) => self.admin = view,
        }
    }
}

/// Render every module.
pub fn render(
    store: &ReconciliationStore,
    catalog: &ServiceTierCatalog,
    options: &RenderOptions,
) -> DashboardView {
    DashboardView {
        power: render_power(store),
        water: render_water(store),
        hubs: render_hubs(store),
        properties: render_properties(store, catalog, options),
        trash: render_trash(store),
        admin: render_admin(store, catalog, options),
    }
}

/// Render one module.
pub fn render_module(
    module: ModuleId,
    store: &ReconciliationStore,
    catalog: &ServiceTierCatalog,
    options: &RenderOptions,
) -> ModuleView {
    match module {
        ModuleId::Power => ModuleView::Power(render_power(store)),
        ModuleId::Water => ModuleView::Water(render_water(store)),
        ModuleId::Hubs => ModuleView::Hubs(render_hubs(store)),
        ModuleId::Properties => {
            ModuleView::Properties(render_properties(store, catalog, options))
        }
        ModuleId::Trash => ModuleView::Trash(render_trash(store)),
        ModuleId::Admin => ModuleView::Admin(render_admin(store, catalog, options)),
    }
}

/// Placeholder text when `rows` is empty.
pub(crate) fn placeholder<T>(rows: &[T], text: &str) -> Option<String> {
    rows.is_empty().then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smart_utilities_types::ZoneStatus;

    #[test]
    fn test_empty_store_renders_placeholders() {
        let store = ReconciliationStore::new();
        let view = render(&store, store.catalog(), &RenderOptions::default());
        assert_eq!(
            view.power.placeholder.as_deref(),
            Some("No power zone data available.")
        );
        assert_eq!(
            view.hubs.placeholder.as_deref(),
            Some("No internet hub data available.")
        );
        assert!(view.properties.cards.is_empty());
        assert!(!view.admin.visible);
    }

    #[test]
    fn test_apply_module_replaces_only_that_module() {
        let mut store = ReconciliationStore::new();
        let options = RenderOptions::default();
        let mut view = render(&store, store.catalog(), &options);
        store.replace([(
            "Downtown".to_string(),
            ZoneStatus {
                id: "Downtown".to_string(),
                label: None,
                is_blackout: true,
            },
        )]);
        let module = render_module(ModuleId::Power, &store, store.catalog(), &options);
        assert_eq!(module.id(), ModuleId::Power);
        view.apply_module(module);
        assert_eq!(view.power.rows.len(), 1);
        assert!(view.water.sources.is_empty());
    }
}
