//! # Render Surface
//!
//! [`commit`] is the only function that writes to a live surface. It renders
//! each directive of a [`Dispatch`] from the store and applies the result.
//! A patch addressed to a slot the surface has not materialised yet is
//! logged and reported; the store already holds the new state, so the next
//! full mount is consistent.

use smart_utilities_types::{IllegalDumpSite, TrashBin, WaterLeak};

use crate::core::Intent;
use crate::errors::DashboardError;
use crate::router::{Dispatch, RenderDirective};
use crate::store::ReconciliationStore;
use crate::views::{
    self, BinRow, DashboardView, DumpRow, LeakRow, ModuleView, PropertyCard, RenderOptions,
};

/// A surface rejected a patch.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    /// The addressed slot is not materialised
    #[error("render target `{0}` is not mounted")]
    MissingTarget(String),
}

impl From<SurfaceError> for DashboardError {
    fn from(err: SurfaceError) -> Self {
        match err {
            SurfaceError::MissingTarget(target) => DashboardError::missing_target(target),
        }
    }
}

/// Slot id of the leak list.
pub const LEAK_LIST_TARGET: &str = "active-leaks-list";

/// A live view the dashboard is drawn on.
pub trait RenderSurface {
    /// Replace everything with a freshly rendered dashboard.
    fn mount(&mut self, view: &DashboardView);
    /// Replace one module.
    fn replace_module(&mut self, module: ModuleView) -> Result<(), SurfaceError>;
    /// Replace one property card in place.
    fn patch_property_card(&mut self, card: &PropertyCard) -> Result<(), SurfaceError>;
    /// Add or replace (`Some`) or remove (`None`) one leak row.
    fn patch_leak(&mut self, id: &str, row: Option<&LeakRow>) -> Result<(), SurfaceError>;
    /// Replace one bin row, or append it under its container.
    fn patch_bin_row(&mut self, row: &BinRow) -> Result<(), SurfaceError>;
    /// Add or replace (`Some`) or remove (`None`) one illegal dump row.
    fn patch_dump_row(&mut self, id: &str, row: Option<&DumpRow>) -> Result<(), SurfaceError>;
    /// Show or hide the admin controls.
    fn set_admin_visible(&mut self, visible: bool);
    /// Show or hide the dashboard.
    fn set_visible(&mut self, visible: bool);
    /// Replace the status line.
    fn set_status(&mut self, text: &str);
}

/// Result of one commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReport {
    /// Directives applied to the surface
    pub applied: usize,
    /// Targets that were not mounted
    pub missing_targets: Vec<String>,
    /// Intents the commit itself needs sent
    pub follow_ups: Vec<Intent>,
}

/// Render and apply every directive in `dispatch`.
pub fn commit<S: RenderSurface + ?Sized>(
    dispatch: &Dispatch,
    store: &ReconciliationStore,
    options: &RenderOptions,
    visible: bool,
    surface: &mut S,
) -> CommitReport {
    let catalog = store.catalog();
    let mut report = CommitReport::default();

    for directive in &dispatch.directives {
        let result = match directive {
            RenderDirective::MountAll => {
                surface.mount(&views::render(store, catalog, options));
                Ok(())
            }
            RenderDirective::Module(module) => {
                surface.replace_module(views::render_module(*module, store, catalog, options))
            }
            RenderDirective::PropertyCard(property_id) => surface.patch_property_card(
                &views::render_property(property_id, store, catalog, options),
            ),
            RenderDirective::Leak(id) => {
                let row = store
                    .get::<WaterLeak>(id)
                    .and_then(|leak| views::render_leak_row(id, leak));
                surface.patch_leak(id, row.as_ref())
            }
            RenderDirective::BinRow(id) => match store.get::<TrashBin>(id) {
                Some(bin) => surface.patch_bin_row(&views::render_bin_row(id, bin)),
                None => Ok(()),
            },
            RenderDirective::DumpRow(id) => {
                let row = store
                    .get::<IllegalDumpSite>(id)
                    .and_then(|site| views::render_dump_row(id, site));
                surface.patch_dump_row(id, row.as_ref())
            }
            RenderDirective::AdminVisibility => {
                surface.set_admin_visible(options.admin_visible);
                Ok(())
            }
            RenderDirective::Visibility => {
                surface.set_visible(visible);
                Ok(())
            }
        };

        match result {
            Ok(()) => report.applied += 1,
            Err(SurfaceError::MissingTarget(target)) => {
                tracing::warn!(slot = %target, "render target missing; store updated, frame skipped");
                if target == LEAK_LIST_TARGET
                    && !report.follow_ups.contains(&Intent::RequestFullWaterStatus)
                {
                    report.follow_ups.push(Intent::RequestFullWaterStatus);
                }
                report.missing_targets.push(target);
            }
        }
    }

    if let Some(status) = &dispatch.status {
        surface.set_status(&status.text);
    }
    report
}

// ============================================================================
// In-memory surface
// ============================================================================

/// A retained, in-memory surface.
///
/// Nothing is materialised until the first [`mount`](RenderSurface::mount),
/// so patches before that report missing targets the way a page that has not
/// rendered its lists yet would.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    view: Option<DashboardView>,
    visible: bool,
    status: Option<String>,
}

impl MemorySurface {
    /// An empty, unmounted surface.
    pub fn new() -> Self {
        Self::default()
    }

    /// The retained view, once mounted.
    pub fn view(&self) -> Option<&DashboardView> {
        self.view.as_ref()
    }

    /// Whether the dashboard is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Current status text.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// A retained property card.
    pub fn card(&self, property_id: &str) -> Option<&PropertyCard> {
        self.view
            .as_ref()?
            .properties
            .cards
            .iter()
            .find(|card| card.property_id == property_id)
    }

    fn mounted(&mut self, target: &str) -> Result<&mut DashboardView, SurfaceError> {
        self.view
            .as_mut()
            .ok_or_else(|| SurfaceError::MissingTarget(target.to_string()))
    }
}

impl RenderSurface for MemorySurface {
    fn mount(&mut self, view: &DashboardView) {
        self.view = Some(view.clone());
    }

    fn replace_module(&mut self, module: ModuleView) -> Result<(), SurfaceError> {
        let target = format!("{:?}", module.id()).to_lowercase();
        self.mounted(&target)?.apply_module(module);
        Ok(())
    }

    fn patch_property_card(&mut self, card: &PropertyCard) -> Result<(), SurfaceError> {
        let target = format!("property-{}", card.property_id);
        let view = self.mounted(&target)?;
        let slot = view
            .properties
            .cards
            .iter_mut()
            .find(|existing| existing.property_id == card.property_id)
            .ok_or(SurfaceError::MissingTarget(target))?;
        *slot = card.clone();
        Ok(())
    }

    fn patch_leak(&mut self, id: &str, row: Option<&LeakRow>) -> Result<(), SurfaceError> {
        let water = &mut self.mounted(LEAK_LIST_TARGET)?.water;
        let position = water.leaks.iter().position(|existing| existing.id == id);
        match (position, row) {
            (Some(index), Some(row)) => water.leaks[index] = row.clone(),
            (Some(index), None) => {
                water.leaks.remove(index);
            }
            (None, Some(row)) => water.leaks.push(row.clone()),
            (None, None) => {}
        }
        water.refresh_leaks_placeholder();
        Ok(())
    }

    fn patch_bin_row(&mut self, row: &BinRow) -> Result<(), SurfaceError> {
        let trash = &mut self.mounted("trash-status-list")?.trash;
        // A row keeps the container it was first listed under.
        let list = if trash.large_dumpsters.iter().any(|existing| existing.id == row.id) {
            &mut trash.large_dumpsters
        } else if trash.public_bins.iter().any(|existing| existing.id == row.id) {
            &mut trash.public_bins
        } else {
            trash.bins_mut(row.kind)
        };
        match list.iter_mut().find(|existing| existing.id == row.id) {
            Some(existing) => *existing = row.clone(),
            None => list.push(row.clone()),
        }
        trash.refresh_placeholders();
        Ok(())
    }

    fn patch_dump_row(&mut self, id: &str, row: Option<&DumpRow>) -> Result<(), SurfaceError> {
        let trash = &mut self.mounted("illegal-dumps-status-list")?.trash;
        trash.illegal_dumps.retain(|existing| existing.id != id);
        trash.illegal_dumps.extend(row.cloned());
        trash.refresh_placeholders();
        Ok(())
    }

    fn set_admin_visible(&mut self, visible: bool) {
        if let Some(view) = self.view.as_mut() {
            view.admin.visible = visible;
        }
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    fn set_status(&mut self, text: &str) {
        self.status = Some(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Session;
    use crate::router::route;
    use serde_json::json;
    use smart_utilities_types::InboundMessage;

    fn apply(
        store: &mut ReconciliationStore,
        session: &mut Session,
        surface: &mut MemorySurface,
        message: InboundMessage,
    ) -> CommitReport {
        let dispatch = route(store, session, &message);
        let options = RenderOptions {
            admin_visible: session.is_admin(),
            ..RenderOptions::default()
        };
        commit(&dispatch, store, &options, session.is_shown(), surface)
    }

    #[test]
    fn test_leak_patch_before_mount_requests_water_snapshot() {
        let mut store = ReconciliationStore::new();
        let mut session = Session::new();
        let mut surface = MemorySurface::new();
        let report = apply(
            &mut store,
            &mut session,
            &mut surface,
            InboundMessage::update("water_leak_update", json!({"id": "leak1"})),
        );
        assert_eq!(report.missing_targets, vec![LEAK_LIST_TARGET.to_string()]);
        assert_eq!(report.follow_ups, vec![Intent::RequestFullWaterStatus]);
        assert!(store.get::<WaterLeak>("leak1").is_some());
    }

    #[test]
    fn test_card_patch_for_unlisted_property_is_missing_target() {
        let mut store = ReconciliationStore::new();
        let mut session = Session::new();
        let mut surface = MemorySurface::new();
        apply(
            &mut store,
            &mut session,
            &mut surface,
            InboundMessage::update("initial_load", json!({})),
        );
        let report = apply(
            &mut store,
            &mut session,
            &mut surface,
            InboundMessage::update(
                "internet_user_service",
                json!({"propertyId": "p9", "is_active": true}),
            ),
        );
        assert_eq!(report.missing_targets, vec!["property-p9".to_string()]);
        assert!(report.follow_ups.is_empty());
        assert_eq!(surface.status(), Some("System data updated."));
    }

    #[test]
    fn test_leak_rows_patch_in_place() {
        let mut store = ReconciliationStore::new();
        let mut session = Session::new();
        let mut surface = MemorySurface::new();
        apply(
            &mut store,
            &mut session,
            &mut surface,
            InboundMessage::update(
                "initial_load",
                json!({"water": {"sources": {}, "leaks": [{"id": "leak1"}]}}),
            ),
        );
        apply(
            &mut store,
            &mut session,
            &mut surface,
            InboundMessage::update("water_leak_update", json!({"id": "leak2"})),
        );
        apply(
            &mut store,
            &mut session,
            &mut surface,
            InboundMessage::update("water_leak_update", json!({"id": "leak1", "isLeaking": false})),
        );
        let water = &surface.view().unwrap().water;
        let ids: Vec<&str> = water.leaks.iter().map(|row| row.id.as_str()).collect();
        assert_eq!(ids, ["leak2"]);
        assert!(water.leaks_placeholder.is_none());
    }

    #[test]
    fn test_admin_flag_toggles_panel() {
        let mut store = ReconciliationStore::new();
        let mut session = Session::new();
        let mut surface = MemorySurface::new();
        apply(
            &mut store,
            &mut session,
            &mut surface,
            InboundMessage::update("initial_load", json!({"isAdmin": false})),
        );
        assert!(!surface.view().unwrap().admin.visible);
        apply(
            &mut store,
            &mut session,
            &mut surface,
            InboundMessage::update("admin_status_update", json!({"isAdmin": true})),
        );
        assert!(surface.view().unwrap().admin.visible);
    }
}
