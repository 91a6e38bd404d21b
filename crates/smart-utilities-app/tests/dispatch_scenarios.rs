//! End-to-end scenarios: inbound messages through the router, store and
//! views onto an in-memory surface.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use smart_utilities_app::types::{BinKind, InboundMessage, PendingInstall};
use smart_utilities_app::views::CardStatus;
use smart_utilities_app::{
    DashboardConfig, DashboardCore, Intent, MemorySurface, Transport, TransportError,
};

#[derive(Default)]
struct Recording {
    posts: Mutex<Vec<(String, Value)>>,
}

#[async_trait]
impl Transport for Recording {
    async fn post(&self, endpoint: &str, body: Value) -> Result<Value, TransportError> {
        self.posts.lock().push((endpoint.to_string(), body));
        Ok(json!({ "ok": true }))
    }
}

fn core() -> DashboardCore<MemorySurface, Recording> {
    DashboardCore::new(
        DashboardConfig::default(),
        MemorySurface::new(),
        Recording::default(),
    )
}

fn snapshot() -> InboundMessage {
    InboundMessage::update(
        "initial_load",
        json!({
            "config": {
                "Internet": {
                    "ServiceTiers": {
                        "basic": {"label": "Basic", "speed": "25Mbps", "price": 50},
                        "premium": {"label": "Premium", "speed": "500Mbps", "price": 200},
                        "ultra": {"label": "Ultra", "speed": "1Gbps", "price": 350}
                    },
                    "Hubs": {"hubA": {"label": "LS Main Exchange"}}
                },
                "Power": {"Zones": {"Downtown": {"label": "Downtown"}}}
            },
            "power": {"Downtown": {"label": "Downtown", "isBlackout": false}},
            "water": {
                "sources": {"reservoir": {"label": "Alamo Sea", "currentLevel": 40, "capacity": 100}},
                "leaks": {}
            },
            "internet": {
                "hubs": {"hubA": {"label": "LS Main Exchange", "isDown": true, "cc": 3, "mc": 10}},
                "subscriptions": [
                    {"property_id": "p1", "provider": "hubA", "speed_tier": "basic", "is_active": true}
                ],
                "pendingInstallations": [
                    {"property_id": "p2", "status": "open", "ticket_id": 5, "speed_tier": "premium"}
                ],
                "playerProperties": [
                    {"property_id": "p1", "label": "Vinewood Hills"},
                    {"property_id": "p2", "label": "Mirror Park"},
                    {"property_id": "p3", "label": "Paleto Cabin"}
                ]
            },
            "trash": {
                "public_bins": {"bin@1": {"label": "Legion Square", "load": 20, "capacity": 100}},
                "large_dumpsters": {},
                "illegal_dumps": {}
            },
            "isAdmin": false
        }),
    )
}

fn loaded() -> DashboardCore<MemorySurface, Recording> {
    let mut core = core();
    core.handle(&InboundMessage::show());
    core.handle(&snapshot());
    core
}

#[test]
fn test_snapshot_mounts_every_module() {
    let core = loaded();
    let view = core.surface().view().unwrap();
    assert_eq!(view.power.rows.len(), 1);
    assert_eq!(view.hubs.rows.len(), 1);
    assert_eq!(view.properties.cards.len(), 3);
    assert_eq!(view.trash.public_bins.len(), 1);
    assert!(view.water.leaks_placeholder.is_some());
    assert!(!view.admin.visible);
    assert_eq!(core.surface().status(), Some("All modules updated."));
}

#[test]
fn test_subscription_on_downed_hub_is_interrupted() {
    let core = loaded();
    let card = core.surface().card("p1").unwrap();
    assert!(card.is_interrupted());
    match &card.status {
        CardStatus::Active {
            tier_label,
            upgrade_options,
            ..
        } => {
            assert_eq!(tier_label, "Basic");
            let keys: Vec<&str> = upgrade_options.iter().map(|o| o.value.as_str()).collect();
            assert_eq!(keys, ["premium", "ultra"]);
        }
        other => panic!("expected active card, got {other:?}"),
    }
    assert_eq!(card.detail.as_deref(), Some("Hub: hubA (Hub Offline)"));
}

#[test]
fn test_hub_recovery_repaints_dependent_card() {
    let mut core = loaded();
    core.handle(&InboundMessage::update(
        "internet_hub_status",
        json!({"hubA": {"isDown": false}}),
    ));
    let card = core.surface().card("p1").unwrap();
    assert!(!card.is_interrupted());
    let hub = &core.surface().view().unwrap().hubs.rows[0];
    assert!(hub.online);
    assert_eq!(hub.text, "LS Main Exchange (Conn: 3/10)");
}

#[test]
fn test_bin_update_appends_row_under_inferred_container() {
    let mut core = loaded();
    core.handle(&InboundMessage::update(
        "trash_bin_status",
        json!({"dumpster@9": {"load": 90, "capacity": 100}}),
    ));
    let trash = &core.surface().view().unwrap().trash;
    assert_eq!(trash.large_dumpsters.len(), 1);
    assert_eq!(trash.large_dumpsters[0].kind, BinKind::LargeDumpster);
    assert!(trash.large_dumpsters_placeholder.is_none());
    assert_eq!(trash.public_bins.len(), 1);
}

#[test]
fn test_activation_supersedes_pending_install() {
    let mut core = loaded();
    let pending = core.surface().card("p2").unwrap();
    assert_eq!(pending.headline, "Installation Pending for Premium");

    core.handle(&InboundMessage::update(
        "internet_user_service",
        json!({"property_id": "p2", "provider": "hubA", "speed_tier": "premium", "is_active": true}),
    ));
    assert!(core.store().get::<PendingInstall>("p2").is_none());
    let card = core.surface().card("p2").unwrap();
    assert!(matches!(card.status, CardStatus::Active { .. }));
    assert_eq!(card.headline, "Active: Premium (500Mbps)");
}

#[test]
fn test_unsubscribed_card_offers_every_tier() {
    let core = loaded();
    let card = core.surface().card("p3").unwrap();
    assert!(card.offers_install());
    match &card.status {
        CardStatus::Unsubscribed { install_options } => {
            assert_eq!(install_options.len(), 3);
            assert_eq!(install_options[0].label, "Basic (25Mbps) - $50");
        }
        other => panic!("expected install offer, got {other:?}"),
    }
}

#[test]
fn test_leak_rows_follow_updates() {
    let mut core = loaded();
    core.handle(&InboundMessage::update(
        "water_leak_update",
        json!({"id": "leak1", "isLeaking": true, "locationDescription": "Vespucci Canals"}),
    ));
    let water = &core.surface().view().unwrap().water;
    assert_eq!(water.leaks.len(), 1);
    assert!(water.leaks_placeholder.is_none());

    core.handle(&InboundMessage::update(
        "water_leak_update",
        json!({"id": "leak1", "isLeaking": false}),
    ));
    let water = &core.surface().view().unwrap().water;
    assert!(water.leaks.is_empty());
    assert!(water.leaks_placeholder.is_some());
}

#[test]
fn test_leak_before_mount_requests_full_water_status() {
    let mut core = core();
    let follow_ups = core.handle(&InboundMessage::update(
        "water_leak_update",
        json!({"id": "leak1", "isLeaking": true}),
    ));
    assert!(follow_ups.contains(&Intent::RequestFullWaterStatus));
}

#[test]
fn test_admin_flag_reveals_controls() {
    let mut core = loaded();
    core.handle(&InboundMessage::update(
        "admin_status_update",
        json!({"isAdmin": true}),
    ));
    let admin = &core.surface().view().unwrap().admin;
    assert!(admin.visible);
    assert_eq!(admin.zone_options.len(), 1);
    assert_eq!(admin.tier_options.len(), 3);
}

#[tokio::test]
async fn test_install_request_reaches_transport() {
    let mut core = loaded();
    let request = core
        .request(
            Intent::RequestInternetInstall {
                property_id: "p3".to_string(),
                tier_id: "ultra".to_string(),
            },
            0,
        )
        .unwrap();
    let (intent, result) = request.send().await;
    assert!(core.record_outcome(&intent, &result));

    let posts = core.gateway().transport().posts.lock();
    let (endpoint, body) = posts.last().unwrap();
    assert!(endpoint.ends_with("/user:requestInternetInstall"));
    assert_eq!(body["propertyId"], "p3");
    assert_eq!(body["tierId"], "ultra");
    assert!(body["requestId"].is_string());
}
