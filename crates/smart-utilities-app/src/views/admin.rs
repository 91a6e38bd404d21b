//! Admin controls.

use serde::{Deserialize, Serialize};
use smart_utilities_types::{HubStatus, SelectOption, ServiceTierCatalog, ZoneStatus};

use super::internet::tier_options;
use super::RenderOptions;
use crate::store::ReconciliationStore;

/// Select boxes behind the admin controls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminPanel {
    /// Controls are shown
    pub visible: bool,
    /// Power zone select
    pub zone_options: Vec<SelectOption>,
    /// Internet hub select
    pub hub_options: Vec<SelectOption>,
    /// Tier select for admin install requests
    pub tier_options: Vec<SelectOption>,
}

/// Render the admin controls.
///
/// Zone and hub options come from the configuration's reference data; when
/// none arrived, the zones and hubs currently known to the store are offered.
pub fn render_admin(
    store: &ReconciliationStore,
    catalog: &ServiceTierCatalog,
    options: &RenderOptions,
) -> AdminPanel {
    let reference = store.reference();

    let zone_options = if reference.zone_options.is_empty() {
        store
            .all::<ZoneStatus>()
            .map(|(id, zone)| SelectOption::new(id.clone(), zone.display_label()))
            .collect()
    } else {
        reference.zone_options.clone()
    };

    let hub_options = if reference.hub_options.is_empty() {
        store
            .all::<HubStatus>()
            .map(|(id, hub)| SelectOption::new(id.clone(), hub.label.as_deref().unwrap_or(id)))
            .collect()
    } else {
        reference.hub_options.clone()
    };

    AdminPanel {
        visible: options.admin_visible,
        zone_options,
        hub_options,
        tier_options: tier_options(catalog),
    }
}
