//! # Reconciliation Store
//!
//! The client-side cache of everything the authority has told us. It is an
//! explicitly owned value: the router borrows it mutably while handling one
//! message, the renderer borrows it immutably for one render pass, and
//! nothing else touches it.
//!
//! ## Contract
//!
//! | Operation | Effect |
//! |---|---|
//! | [`replace`](ReconciliationStore::replace) | drop the kind's records, take the new set |
//! | [`merge_partial`](ReconciliationStore::merge_partial) | field-wise last-write-wins merge |
//! | [`upsert`](ReconciliationStore::upsert) | full replacement of one record |
//! | [`delete`](ReconciliationStore::delete) | remove one record |
//! | [`get`](ReconciliationStore::get) / [`all`](ReconciliationStore::all) | reads |
//!
//! Upserting an active [`Subscription`] deletes the [`PendingInstall`] for
//! the same property in the same call, so no reader ever sees an active
//! subscription next to a pending install that the upsert completed.
//! Records are never evicted except by `delete` or `replace`.

mod entity;
mod table;

pub use entity::{Entity, EntityKind};
pub use table::{EntityTable, Mergeable};

use entity::sealed::Slot;
use smart_utilities_types::{
    HubStatus, IllegalDumpSite, PendingInstall, PropertyListing, SelectOption, ServiceTierCatalog,
    Subscription, TrashBin, WaterLeak, WaterSource, ZoneStatus,
};

/// Admin select-box reference data from the configuration payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    /// Power zones an admin can target
    pub zone_options: Vec<SelectOption>,
    /// Internet hubs an admin can target
    pub hub_options: Vec<SelectOption>,
}

/// Client-side cache of zone, water, hub, subscription, install and trash state.
#[derive(Debug, Clone, Default)]
pub struct ReconciliationStore {
    zones: EntityTable<ZoneStatus>,
    water_sources: EntityTable<WaterSource>,
    leaks: EntityTable<WaterLeak>,
    hubs: EntityTable<HubStatus>,
    subscriptions: EntityTable<Subscription>,
    pending_installs: EntityTable<PendingInstall>,
    properties: EntityTable<PropertyListing>,
    bins: EntityTable<TrashBin>,
    dumps: EntityTable<IllegalDumpSite>,
    catalog: ServiceTierCatalog,
    reference: ReferenceData,
}

impl ReconciliationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Generic contract ────────────────────────────────────

    /// Replace every record of kind `E` with `items`.
    pub fn replace<E: Entity>(&mut self, items: impl IntoIterator<Item = (String, E)>) {
        let table = E::table_mut(self);
        table.replace(items);
        tracing::trace!(kind = %E::KIND, count = table.len(), "replaced");
    }

    /// Merge a partial record into the record `id` of kind `E`.
    pub fn merge_partial<E: Entity + Mergeable>(&mut self, id: &str, patch: E) -> &E {
        E::table_mut(self).merge_partial(id, patch)
    }

    /// Insert or fully replace the record `id` of kind `E`.
    ///
    /// Returns the previous record, if any.
    pub fn upsert<E: Entity>(&mut self, id: impl Into<String>, record: E) -> Option<E> {
        let id = id.into();
        let previous = E::table_mut(self).upsert(id.clone(), record);
        E::after_upsert(self, &id);
        previous
    }

    /// Delete the record `id` of kind `E`.
    pub fn delete<E: Entity>(&mut self, id: &str) -> Option<E> {
        E::table_mut(self).delete(id)
    }

    /// Read the record `id` of kind `E`.
    pub fn get<E: Entity>(&self, id: &str) -> Option<&E> {
        E::table(self).get(id)
    }

    /// All records of kind `E` in insertion order.
    pub fn all<'a, E: Entity + 'a>(&'a self) -> impl Iterator<Item = (&'a String, &'a E)> {
        E::table(self).all()
    }

    /// The table for kind `E`.
    pub fn table<E: Entity>(&self) -> &EntityTable<E> {
        E::table(self)
    }

    // ─── Reference data ──────────────────────────────────────

    /// The service tier catalog.
    pub fn catalog(&self) -> &ServiceTierCatalog {
        &self.catalog
    }

    /// Replace the service tier catalog wholesale.
    pub fn replace_catalog(&mut self, catalog: ServiceTierCatalog) {
        self.catalog = catalog;
    }

    /// Admin select-box reference data.
    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Replace the zone select options.
    pub fn replace_zone_options(&mut self, options: Vec<SelectOption>) {
        self.reference.zone_options = options;
    }

    /// Replace the hub select options.
    pub fn replace_hub_options(&mut self, options: Vec<SelectOption>) {
        self.reference.hub_options = options;
    }

    // ─── Derived lookups ─────────────────────────────────────

    /// Properties whose subscription is served by `hub_id`.
    pub fn properties_served_by(&self, hub_id: &str) -> Vec<String> {
        self.subscriptions
            .all()
            .filter(|(_, sub)| sub.provider.as_deref() == Some(hub_id))
            .map(|(property_id, _)| property_id.clone())
            .collect()
    }
}
