//! Entity kinds and the binding of each record type to its store table.

use std::fmt;

use smart_utilities_types::{
    HubStatus, IllegalDumpSite, PendingInstall, PropertyListing, Subscription, TrashBin,
    WaterLeak, WaterSource, ZoneStatus,
};

use super::table::{EntityTable, Mergeable};
use super::ReconciliationStore;

/// Every entity kind held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Power zone
    Zone,
    /// Water source
    WaterSource,
    /// Water leak
    Leak,
    /// Internet hub
    Hub,
    /// Property subscription
    Subscription,
    /// Pending install work order
    PendingInstall,
    /// Owned property listing
    Property,
    /// Public bin or large dumpster
    TrashBin,
    /// Illegal dump site
    IllegalDump,
}

impl EntityKind {
    /// Lowercase label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Zone => "zone",
            Self::WaterSource => "water_source",
            Self::Leak => "leak",
            Self::Hub => "hub",
            Self::Subscription => "subscription",
            Self::PendingInstall => "pending_install",
            Self::Property => "property",
            Self::TrashBin => "trash_bin",
            Self::IllegalDump => "illegal_dump",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub(super) mod sealed {
    use super::{EntityTable, ReconciliationStore};

    /// Table binding; unreachable outside the store so writes can't bypass it.
    pub trait Slot: Sized {
        fn table(store: &ReconciliationStore) -> &EntityTable<Self>;
        fn table_mut(store: &mut ReconciliationStore) -> &mut EntityTable<Self>;

        /// Runs inside the same `&mut` borrow as the upsert of `id`.
        fn after_upsert(_store: &mut ReconciliationStore, _id: &str) {}
    }
}

/// A record type owned by the [`ReconciliationStore`].
pub trait Entity: sealed::Slot + Clone {
    /// Kind tag for logging and directives.
    const KIND: EntityKind;
}

macro_rules! bind_entity {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl sealed::Slot for $ty {
            fn table(store: &ReconciliationStore) -> &EntityTable<Self> {
                &store.$field
            }
            fn table_mut(store: &mut ReconciliationStore) -> &mut EntityTable<Self> {
                &mut store.$field
            }
        }

        impl Entity for $ty {
            const KIND: EntityKind = EntityKind::$kind;
        }
    };
}

bind_entity!(ZoneStatus, Zone, zones);
bind_entity!(WaterSource, WaterSource, water_sources);
bind_entity!(WaterLeak, Leak, leaks);
bind_entity!(HubStatus, Hub, hubs);
bind_entity!(PendingInstall, PendingInstall, pending_installs);
bind_entity!(PropertyListing, Property, properties);
bind_entity!(TrashBin, TrashBin, bins);
bind_entity!(IllegalDumpSite, IllegalDump, dumps);

impl sealed::Slot for Subscription {
    fn table(store: &ReconciliationStore) -> &EntityTable<Self> {
        &store.subscriptions
    }

    fn table_mut(store: &mut ReconciliationStore) -> &mut EntityTable<Self> {
        &mut store.subscriptions
    }

    /// An active subscription completes any install work order for the property.
    fn after_upsert(store: &mut ReconciliationStore, id: &str) {
        let active = store
            .subscriptions
            .get(id)
            .is_some_and(|subscription| subscription.is_active);
        if active && store.pending_installs.delete(id).is_some() {
            tracing::debug!(property_id = %id, "active subscription superseded pending install");
        }
    }
}

impl Entity for Subscription {
    const KIND: EntityKind = EntityKind::Subscription;
}

impl Mergeable for HubStatus {
    fn merge_from(&mut self, patch: Self) {
        HubStatus::merge_from(self, patch);
    }
}

impl Mergeable for TrashBin {
    fn merge_from(&mut self, patch: Self) {
        TrashBin::merge_from(self, patch);
    }
}
