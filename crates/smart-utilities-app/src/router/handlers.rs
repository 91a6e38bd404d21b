//! `UPDATE` handlers, one per `dataType`.
//!
//! | dataType | Store effect | Directive |
//! |---|---|---|
//! | `initial_load` | replace every module, catalog and reference data | mount all |
//! | `power_status` | replace zones | power module |
//! | `water_status` | replace sources and leaks | water module |
//! | `water_leak_update` | upsert/delete one leak by `isLeaking` | leak row |
//! | `internet_status` | replace hubs; upsert `userService` | hub list, cards |
//! | `internet_hub_status` | merge hub patches | hub list, dependent cards |
//! | `internet_user_service` | upsert subscription | card |
//! | `internet_pending_install_update` | upsert pending install | card |
//! | `trash_status` | replace bins and dumps | trash module |
//! | `trash_bin_status` | merge bin patches | bin rows |
//! | `trash_illegal_dump_update` | upsert/delete one dump by `isActive` | dump row |
//! | `admin_status_update` | session admin flag | admin visibility |

use serde_json::Value;
use smart_utilities_types::{
    BinKind, DataType, HubStatus, IllegalDumpSite, PendingInstall, PropertyListing,
    ServiceTierCatalog, Subscription, TrashBin, WaterLeak, WaterSource, ZoneStatus,
};

use super::payload::{self, path};
use super::{Dispatch, RenderDirective};
use crate::core::Session;
use crate::errors::DashboardError;
use crate::store::ReconciliationStore;
use crate::views::ModuleId;

const PROPERTY_ID: &[&str] = &["property_id", "propertyId"];
const ID: &[&str] = &["id"];

/// Apply one update. Returns `false` for an unknown `dataType`.
pub(super) fn handle(
    store: &mut ReconciliationStore,
    session: &mut Session,
    data_type: &DataType,
    body: &Value,
    dispatch: &mut Dispatch,
) -> bool {
    let name = data_type.as_str();
    match data_type {
        DataType::InitialLoad => initial_load(store, session, body, dispatch),
        DataType::PowerStatus => {
            replace_zones(store, name, body, dispatch);
            dispatch.push(RenderDirective::Module(ModuleId::Power));
        }
        DataType::WaterStatus => {
            replace_water(store, name, body, dispatch);
            dispatch.push(RenderDirective::Module(ModuleId::Water));
        }
        DataType::WaterLeakUpdate => water_leak_update(store, name, body, dispatch),
        DataType::InternetStatus => internet_status(store, name, body, dispatch),
        DataType::InternetHubStatus => internet_hub_status(store, name, body, dispatch),
        DataType::InternetUserService => {
            if let Some(property_id) = upsert_subscription(store, name, body, dispatch) {
                dispatch.push(RenderDirective::PropertyCard(property_id));
            }
        }
        DataType::InternetPendingInstallUpdate => pending_install_update(store, name, body, dispatch),
        DataType::TrashStatus => {
            replace_trash(store, name, body, dispatch);
            dispatch.push(RenderDirective::Module(ModuleId::Trash));
        }
        DataType::TrashBinStatus => trash_bin_status(store, name, body, dispatch),
        DataType::TrashIllegalDumpUpdate => illegal_dump_update(store, name, body, dispatch),
        DataType::AdminStatusUpdate => {
            apply_admin_flag(session, name, body, dispatch);
        }
        DataType::Unknown(raw) => {
            tracing::debug!(data_type = %raw, "unknown dataType ignored");
            return false;
        }
    }
    true
}

// ============================================================================
// Snapshot
// ============================================================================

fn initial_load(
    store: &mut ReconciliationStore,
    session: &mut Session,
    body: &Value,
    dispatch: &mut Dispatch,
) {
    let name = DataType::InitialLoad.as_str();

    if let Some(tiers) = path(body, &["config", "Internet", "ServiceTiers"]) {
        match payload::record::<ServiceTierCatalog>(name, tiers) {
            Ok(catalog) => store.replace_catalog(catalog),
            Err(err) => dispatch.errors.push(err),
        }
    }
    if let Some(zones) = path(body, &["config", "Power", "Zones"]) {
        store.replace_zone_options(payload::select_options(zones));
    }
    if let Some(hubs) = path(body, &["config", "Internet", "Hubs"]) {
        store.replace_hub_options(payload::select_options(hubs));
    }

    if let Some(power) = body.get("power") {
        replace_zones(store, name, power, dispatch);
    }
    if let Some(water) = body.get("water") {
        replace_water(store, name, water, dispatch);
    }
    if let Some(hubs) = path(body, &["internet", "hubs"]) {
        let hubs: Vec<(String, HubStatus)> = payload::keyed(name, hubs, ID, &mut dispatch.errors);
        store.replace(hubs);
    }
    if let Some(subscriptions) = path(body, &["internet", "subscriptions"]) {
        let subscriptions: Vec<(String, Subscription)> =
            payload::keyed(name, subscriptions, PROPERTY_ID, &mut dispatch.errors);
        store.replace(subscriptions);
    }
    if let Some(pending) = path(body, &["internet", "pendingInstallations"]) {
        let pending: Vec<(String, PendingInstall)> =
            payload::keyed(name, pending, PROPERTY_ID, &mut dispatch.errors);
        store.replace(pending);
    }

    // No listing means no cards; there is nothing to fall back to.
    let properties: Vec<(String, PropertyListing)> = path(body, &["internet", "playerProperties"])
        .map(|raw| payload::keyed(name, raw, PROPERTY_ID, &mut dispatch.errors))
        .unwrap_or_default();
    store.replace(properties);

    if let Some(trash) = body.get("trash") {
        replace_trash(store, name, trash, dispatch);
    }

    apply_admin_flag(session, name, body, dispatch);
    dispatch.push(RenderDirective::MountAll);
}

// ============================================================================
// Power / Water
// ============================================================================

fn replace_zones(
    store: &mut ReconciliationStore,
    name: &str,
    body: &Value,
    dispatch: &mut Dispatch,
) {
    let zones: Vec<(String, ZoneStatus)> = payload::keyed(name, body, ID, &mut dispatch.errors);
    store.replace(zones);
}

fn replace_water(
    store: &mut ReconciliationStore,
    name: &str,
    body: &Value,
    dispatch: &mut Dispatch,
) {
    if let Some(sources) = body.get("sources") {
        let sources: Vec<(String, WaterSource)> =
            payload::keyed(name, sources, ID, &mut dispatch.errors);
        store.replace(sources);
    }
    if let Some(leaks) = body.get("leaks") {
        let leaks: Vec<(String, WaterLeak)> = payload::keyed(name, leaks, ID, &mut dispatch.errors);
        store.replace(leaks.into_iter().filter(|(_, leak)| leak.is_leaking));
    }
}

fn water_leak_update(
    store: &mut ReconciliationStore,
    name: &str,
    body: &Value,
    dispatch: &mut Dispatch,
) {
    let Some(id) = payload::id_field(body, ID) else {
        dispatch
            .errors
            .push(DashboardError::malformed(name, "leak update without `id`"));
        return;
    };
    match payload::record::<WaterLeak>(name, body) {
        Ok(leak) if leak.is_leaking => {
            store.upsert(id.clone(), WaterLeak { id: id.clone(), ..leak });
        }
        Ok(_) => {
            store.delete::<WaterLeak>(&id);
        }
        Err(err) => {
            dispatch.errors.push(err);
            return;
        }
    }
    dispatch.push(RenderDirective::Leak(id));
}

// ============================================================================
// Internet
// ============================================================================

/// Upsert a full subscription object. Returns its property id.
fn upsert_subscription(
    store: &mut ReconciliationStore,
    name: &str,
    body: &Value,
    dispatch: &mut Dispatch,
) -> Option<String> {
    let Some(property_id) = payload::id_field(body, PROPERTY_ID) else {
        tracing::debug!(data_type = %name, "subscription without property id ignored");
        return None;
    };
    match payload::record::<Subscription>(name, body) {
        Ok(subscription) => {
            store.upsert(
                property_id.clone(),
                Subscription {
                    property_id: property_id.clone(),
                    ..subscription
                },
            );
            Some(property_id)
        }
        Err(err) => {
            dispatch.errors.push(err);
            None
        }
    }
}

fn internet_status(
    store: &mut ReconciliationStore,
    name: &str,
    body: &Value,
    dispatch: &mut Dispatch,
) {
    if let Some(hubs) = body.get("hubs") {
        let hubs: Vec<(String, HubStatus)> = payload::keyed(name, hubs, ID, &mut dispatch.errors);
        store.replace(hubs);
        dispatch.push(RenderDirective::Module(ModuleId::Hubs));
        let subscribed: Vec<String> = store
            .all::<Subscription>()
            .map(|(property_id, _)| property_id.clone())
            .collect();
        for property_id in subscribed {
            dispatch.push(RenderDirective::PropertyCard(property_id));
        }
    }
    if let Some(service) = body.get("userService") {
        if let Some(property_id) = upsert_subscription(store, name, service, dispatch) {
            dispatch.push(RenderDirective::PropertyCard(property_id));
        }
    }
}

fn internet_hub_status(
    store: &mut ReconciliationStore,
    name: &str,
    body: &Value,
    dispatch: &mut Dispatch,
) {
    let patches: Vec<(String, HubStatus)> = payload::keyed(name, body, ID, &mut dispatch.errors);
    if patches.is_empty() {
        return;
    }
    let mut dependent = Vec::new();
    for (hub_id, patch) in patches {
        store.merge_partial(&hub_id, patch);
        dependent.extend(store.properties_served_by(&hub_id));
    }
    dispatch.push(RenderDirective::Module(ModuleId::Hubs));
    for property_id in dependent {
        dispatch.push(RenderDirective::PropertyCard(property_id));
    }
}

fn pending_install_update(
    store: &mut ReconciliationStore,
    name: &str,
    body: &Value,
    dispatch: &mut Dispatch,
) {
    let Some(property_id) = payload::id_field(body, PROPERTY_ID) else {
        dispatch.errors.push(DashboardError::malformed(
            name,
            "pending install without `property_id`",
        ));
        return;
    };
    match payload::record::<PendingInstall>(name, body) {
        Ok(pending) => {
            store.upsert(
                property_id.clone(),
                PendingInstall {
                    property_id: property_id.clone(),
                    ..pending
                },
            );
            dispatch.push(RenderDirective::PropertyCard(property_id));
        }
        Err(err) => dispatch.errors.push(err),
    }
}

// ============================================================================
// Trash
// ============================================================================

fn bins_of_kind(
    name: &str,
    body: &Value,
    key: &str,
    kind: BinKind,
    dispatch: &mut Dispatch,
) -> Option<Vec<(String, TrashBin)>> {
    let raw = body.get(key)?;
    let bins: Vec<(String, TrashBin)> = payload::keyed(name, raw, ID, &mut dispatch.errors);
    Some(
        bins.into_iter()
            .map(|(id, bin)| {
                (
                    id,
                    TrashBin {
                        kind: Some(kind),
                        ..bin
                    },
                )
            })
            .collect(),
    )
}

fn replace_trash(
    store: &mut ReconciliationStore,
    name: &str,
    body: &Value,
    dispatch: &mut Dispatch,
) {
    let public = bins_of_kind(name, body, "public_bins", BinKind::PublicBin, dispatch);
    let dumpsters = bins_of_kind(name, body, "large_dumpsters", BinKind::LargeDumpster, dispatch);
    if public.is_some() || dumpsters.is_some() {
        store.replace(public.into_iter().chain(dumpsters).flatten());
    }
    if let Some(dumps) = body.get("illegal_dumps") {
        let dumps: Vec<(String, IllegalDumpSite)> =
            payload::keyed(name, dumps, ID, &mut dispatch.errors);
        store.replace(dumps.into_iter().filter(|(_, site)| site.is_active));
    }
}

fn trash_bin_status(
    store: &mut ReconciliationStore,
    name: &str,
    body: &Value,
    dispatch: &mut Dispatch,
) {
    let patches: Vec<(String, TrashBin)> = payload::keyed(name, body, ID, &mut dispatch.errors);
    for (bin_id, mut patch) in patches {
        if patch.kind.is_none() && store.get::<TrashBin>(&bin_id).is_none() {
            patch.kind = Some(BinKind::infer_from_id(&bin_id));
        }
        store.merge_partial(&bin_id, patch);
        dispatch.push(RenderDirective::BinRow(bin_id));
    }
}

fn illegal_dump_update(
    store: &mut ReconciliationStore,
    name: &str,
    body: &Value,
    dispatch: &mut Dispatch,
) {
    let Some(id) = payload::id_field(body, ID) else {
        dispatch
            .errors
            .push(DashboardError::malformed(name, "dump update without `id`"));
        return;
    };
    match payload::record::<IllegalDumpSite>(name, body) {
        Ok(site) if site.is_active => {
            store.upsert(id.clone(), IllegalDumpSite { id: id.clone(), ..site });
        }
        Ok(_) => {
            store.delete::<IllegalDumpSite>(&id);
        }
        Err(err) => {
            dispatch.errors.push(err);
            return;
        }
    }
    dispatch.push(RenderDirective::DumpRow(id));
}

// ============================================================================
// Session
// ============================================================================

fn apply_admin_flag(session: &mut Session, name: &str, body: &Value, dispatch: &mut Dispatch) {
    match body.get("isAdmin") {
        Some(Value::Bool(is_admin)) => {
            session.set_admin(*is_admin);
            dispatch.push(RenderDirective::AdminVisibility);
        }
        Some(Value::Null) | None => {}
        Some(_) => dispatch
            .errors
            .push(DashboardError::malformed(name, "`isAdmin` is not a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn run(store: &mut ReconciliationStore, data_type: &str, body: Value) -> Dispatch {
        let mut session = Session::new();
        let mut dispatch = Dispatch::default();
        handle(
            store,
            &mut session,
            &DataType::parse(data_type),
            &body,
            &mut dispatch,
        );
        dispatch
    }

    #[test]
    fn test_hub_patch_rerenders_dependent_cards_only() {
        let mut store = ReconciliationStore::new();
        run(
            &mut store,
            "internet_user_service",
            json!({"propertyId": "p1", "provider": "hubA", "is_active": true}),
        );
        run(
            &mut store,
            "internet_user_service",
            json!({"propertyId": "p2", "provider": "hubB", "is_active": true}),
        );
        let dispatch = run(&mut store, "internet_hub_status", json!({"hubA": {"isDown": true}}));
        assert_eq!(
            dispatch.directives,
            vec![
                RenderDirective::Module(ModuleId::Hubs),
                RenderDirective::PropertyCard("p1".to_string()),
            ]
        );
    }

    #[test]
    fn test_internet_status_without_hubs_keeps_hubs() {
        let mut store = ReconciliationStore::new();
        run(&mut store, "internet_hub_status", json!({"hubA": {"label": "A"}}));
        let dispatch = run(
            &mut store,
            "internet_status",
            json!({"userService": {"propertyId": "p1", "is_active": false}}),
        );
        assert!(store.get::<HubStatus>("hubA").is_some());
        assert_eq!(
            dispatch.directives,
            vec![RenderDirective::PropertyCard("p1".to_string())]
        );
    }

    #[test]
    fn test_repaired_leak_is_deleted() {
        let mut store = ReconciliationStore::new();
        run(
            &mut store,
            "water_leak_update",
            json!({"id": "leak1", "locationDescription": "near Legion Square"}),
        );
        assert!(store.get::<WaterLeak>("leak1").is_some());
        let dispatch = run(
            &mut store,
            "water_leak_update",
            json!({"id": "leak1", "isLeaking": false}),
        );
        assert!(store.get::<WaterLeak>("leak1").is_none());
        assert_eq!(
            dispatch.directives,
            vec![RenderDirective::Leak("leak1".to_string())]
        );
    }

    #[test]
    fn test_bin_kind_inferred_once() {
        let mut store = ReconciliationStore::new();
        run(&mut store, "trash_bin_status", json!({"dumpster@4": {"load": 5}}));
        assert_eq!(
            store.get::<TrashBin>("dumpster@4").and_then(|b| b.kind),
            Some(BinKind::LargeDumpster)
        );
        run(
            &mut store,
            "trash_bin_status",
            json!({"bin9": {"load": 5, "kind": "large_dumpster"}}),
        );
        assert_eq!(
            store.get::<TrashBin>("bin9").and_then(|b| b.kind),
            Some(BinKind::LargeDumpster)
        );
    }

    #[test]
    fn test_trash_status_tags_containers() {
        let mut store = ReconciliationStore::new();
        run(
            &mut store,
            "trash_status",
            json!({
                "public_bins": {"bin1": {"load": 1, "capacity": 10}},
                "large_dumpsters": {"bin2": {"load": 1, "capacity": 10}},
                "illegal_dumps": [{"id": "d1", "isActive": true}, {"id": "d2", "isActive": false}]
            }),
        );
        assert_eq!(
            store.get::<TrashBin>("bin2").and_then(|b| b.kind),
            Some(BinKind::LargeDumpster)
        );
        assert_eq!(store.table::<IllegalDumpSite>().len(), 1);
    }

    #[test]
    fn test_pending_without_property_is_reported() {
        let mut store = ReconciliationStore::new();
        let dispatch = run(
            &mut store,
            "internet_pending_install_update",
            json!({"status": "open", "ticket_id": 3}),
        );
        assert!(dispatch.directives.is_empty());
        assert_eq!(dispatch.errors.len(), 1);
    }

    #[test]
    fn test_duplicate_property_spellings_still_store_subscription() {
        let mut store = ReconciliationStore::new();
        let dispatch = run(
            &mut store,
            "internet_user_service",
            json!({"propertyId": "p1", "property_id": "p1", "is_active": true}),
        );
        assert!(dispatch.errors.is_empty(), "{:?}", dispatch.errors);
        assert!(store.get::<Subscription>("p1").is_some_and(|s| s.is_active));
    }

    #[test]
    fn test_hub_with_both_connection_keys_is_stored() {
        let mut store = ReconciliationStore::new();
        let dispatch = run(
            &mut store,
            "internet_hub_status",
            json!({"hubA": {"isDown": true, "cc": 3, "currentConnections": 3}}),
        );
        assert!(dispatch.errors.is_empty(), "{:?}", dispatch.errors);
        let hub = store.get::<HubStatus>("hubA").unwrap();
        assert_eq!(hub.is_down, Some(true));
        assert_eq!(hub.current_connections, Some(3));
    }

    #[test]
    fn test_text_payment_date_keeps_subscription() {
        let mut store = ReconciliationStore::new();
        let dispatch = run(
            &mut store,
            "internet_user_service",
            json!({
                "property_id": "p1",
                "provider": "hubA",
                "is_active": true,
                "last_payment": "2024-05-01 10:00:00"
            }),
        );
        assert!(dispatch.errors.is_empty(), "{:?}", dispatch.errors);
        let sub = store.get::<Subscription>("p1").unwrap();
        assert!(sub.is_active);
        assert_eq!(sub.last_payment, None);
        assert_eq!(sub.provider.as_deref(), Some("hubA"));
    }

    #[test]
    fn test_pending_with_both_tier_keys_is_stored() {
        let mut store = ReconciliationStore::new();
        let dispatch = run(
            &mut store,
            "internet_pending_install_update",
            json!({
                "property_id": "p2",
                "status": "open",
                "ticket_id": "T-9",
                "speed_tier": "premium",
                "speedTierKey": "premium"
            }),
        );
        assert!(dispatch.errors.is_empty(), "{:?}", dispatch.errors);
        let pending = store.get::<PendingInstall>("p2").unwrap();
        assert!(pending.is_open());
        assert_eq!(pending.speed_tier.as_deref(), Some("premium"));
        assert_eq!(pending.ticket_id, None);
    }

    #[test]
    fn test_initial_load_reference_data() {
        let mut store = ReconciliationStore::new();
        let mut session = Session::new();
        let mut dispatch = Dispatch::default();
        let body = json!({
            "isAdmin": true,
            "config": {
                "Internet": {
                    "ServiceTiers": {
                        "basic": {"label": "Basic ADSL", "speed": "25/5 Mbps", "price": 75},
                        "premium": {"label": "Premium Fiber", "speed": "500/100 Mbps", "price": 200}
                    },
                    "Hubs": {"LS_MainExchange": {"label": "LS Main"}}
                },
                "Power": {"Zones": {"Downtown": {"label": "Downtown"}}}
            },
            "internet": {
                "playerProperties": [{"property_id": "prop_123", "label": "My Apartment"}]
            }
        });
        handle(
            &mut store,
            &mut session,
            &DataType::InitialLoad,
            &body,
            &mut dispatch,
        );
        assert!(session.is_admin());
        assert_eq!(store.catalog().position("premium"), Some(1));
        assert_eq!(store.reference().hub_options[0].label, "LS Main");
        assert_eq!(store.table::<PropertyListing>().len(), 1);
        assert!(dispatch.directives.contains(&RenderDirective::MountAll));
        assert!(dispatch.errors.is_empty(), "{:?}", dispatch.errors);
    }
}
