//! # Internet Projections
//!
//! The hub list and the per-property service cards.
//!
//! A card is derived in priority order:
//!
//! 1. an active [`Subscription`] renders the plan, with an interrupted state
//!    when the provider hub is down;
//! 2. otherwise an open [`PendingInstall`] renders a pending label;
//! 3. otherwise the card offers every catalog tier for installation.
//!
//! The store may hold both an active subscription and a pending install for
//! the same property (after a wholesale replace); rule 1 wins.

use serde::{Deserialize, Serialize};
use smart_utilities_types::{
    HubStatus, PendingInstall, PropertyListing, SelectOption, ServiceTierCatalog, Subscription,
};

use super::{placeholder, RenderOptions};
use crate::store::ReconciliationStore;

// ============================================================================
// Hubs
// ============================================================================

/// One internet hub.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubRow {
    /// Hub identifier
    pub id: String,
    /// Label, falling back to the id
    pub label: String,
    /// `false` while the hub is down
    pub online: bool,
    /// Display text, e.g. `"LS Main Exchange (Conn: 120/5000)"`
    pub text: String,
}

/// The hub list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubsView {
    /// Hubs in arrival order
    pub rows: Vec<HubRow>,
    /// Shown instead of rows when there are none
    pub placeholder: Option<String>,
}

fn hub_row(id: &str, hub: &HubStatus) -> HubRow {
    let label = hub.label.clone().unwrap_or_else(|| id.to_string());
    let current = hub.current_connections.unwrap_or(0);
    let max = hub
        .max_connections
        .map_or_else(|| "N/A".to_string(), |max| max.to_string());
    HubRow {
        id: id.to_string(),
        text: format!("{label} (Conn: {current}/{max})"),
        label,
        online: !hub.is_down.unwrap_or(false),
    }
}

/// Render the hub list.
pub fn render_hubs(store: &ReconciliationStore) -> HubsView {
    let rows: Vec<HubRow> = store
        .all::<HubStatus>()
        .map(|(id, hub)| hub_row(id, hub))
        .collect();
    HubsView {
        placeholder: placeholder(&rows, "No internet hub data available."),
        rows,
    }
}

// ============================================================================
// Property cards
// ============================================================================

/// Service state shown on a property card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardStatus {
    /// Active subscription
    Active {
        /// Catalog tier key as subscribed
        tier_key: String,
        /// Catalog label, or the raw key when the catalog has no such tier
        tier_label: String,
        /// Catalog speed, or `N/A`
        speed: String,
        /// Provider hub
        provider: Option<String>,
        /// Provider hub is down (or unknown and treated as down)
        interrupted: bool,
        /// Later catalog tiers offered as upgrades
        upgrade_options: Vec<SelectOption>,
    },
    /// Open installation work order
    Pending {
        /// Ticket number
        ticket_id: Option<u64>,
        /// Requested tier, when it could be determined
        tier_label: Option<String>,
    },
    /// No service; every catalog tier is offered for installation
    Unsubscribed {
        /// Installable tiers in catalog order
        install_options: Vec<SelectOption>,
    },
}

/// One property's internet card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyCard {
    /// Property identifier
    pub property_id: String,
    /// Label, falling back to the id
    pub label: String,
    /// Street address
    pub address: Option<String>,
    /// Service state
    pub status: CardStatus,
    /// Main status line
    pub headline: String,
    /// Secondary line (hub, upgrade hint)
    pub detail: Option<String>,
}

impl PropertyCard {
    /// Whether the card offers an install control.
    pub fn offers_install(&self) -> bool {
        matches!(self.status, CardStatus::Unsubscribed { .. })
    }

    /// Whether the card renders a degraded service.
    pub fn is_interrupted(&self) -> bool {
        matches!(
            self.status,
            CardStatus::Active {
                interrupted: true,
                ..
            }
        )
    }
}

/// The property card list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertiesView {
    /// Cards in property listing order
    pub cards: Vec<PropertyCard>,
    /// Shown instead of cards when there are none
    pub placeholder: Option<String>,
}

/// Every catalog tier as a select option.
pub(crate) fn tier_options(catalog: &ServiceTierCatalog) -> Vec<SelectOption> {
    catalog
        .iter()
        .map(|(key, tier)| SelectOption::new(key.clone(), tier.option_text()))
        .collect()
}

/// Tier label from a free-text description such as
/// `"Install Basic ADSL at property: p1"`.
pub(crate) fn parse_description_tier(description: &str) -> Option<String> {
    let rest = description.strip_prefix("Install ")?;
    let label = rest
        .rsplit_once(" at property: ")
        .map_or(rest, |(label, _)| label)
        .trim();
    (!label.is_empty()).then(|| label.to_string())
}

fn pending_tier_label(
    property_id: &str,
    pending: &PendingInstall,
    catalog: &ServiceTierCatalog,
) -> Option<String> {
    if let Some(key) = pending.speed_tier.as_deref().filter(|key| !key.is_empty()) {
        return Some(
            catalog
                .get(key)
                .map_or_else(|| key.to_string(), |tier| tier.label.clone()),
        );
    }
    let parsed = pending
        .description
        .as_deref()
        .and_then(parse_description_tier);
    if parsed.is_some() {
        tracing::warn!(
            property_id = %property_id,
            "pending install has no structured tier key; parsed description"
        );
    }
    parsed
}

fn active_status(
    subscription: &Subscription,
    store: &ReconciliationStore,
    catalog: &ServiceTierCatalog,
    options: &RenderOptions,
) -> (CardStatus, String, Option<String>) {
    let tier_key = subscription.speed_tier.clone().unwrap_or_default();
    let tier = catalog.get(&tier_key);
    let tier_label = match tier {
        Some(tier) if !tier.label.is_empty() => tier.label.clone(),
        _ if !tier_key.is_empty() => tier_key.clone(),
        _ => "Unknown plan".to_string(),
    };
    let speed = tier
        .and_then(|tier| tier.speed.clone())
        .unwrap_or_else(|| "N/A".to_string());

    let interrupted = match subscription
        .provider
        .as_deref()
        .and_then(|provider| store.get::<HubStatus>(provider))
    {
        Some(hub) => hub.is_down.unwrap_or(false),
        None => options.unknown_hub_treated_as_down,
    };

    let upgrade_options: Vec<SelectOption> = catalog
        .upgrades_from(&tier_key)
        .map(|(key, tier)| SelectOption::new(key.clone(), tier.option_text()))
        .collect();

    let headline = format!("Active: {tier_label} ({speed})");
    let mut detail = format!(
        "Hub: {}",
        subscription.provider.as_deref().unwrap_or("N/A")
    );
    if interrupted {
        detail.push_str(" (Hub Offline)");
    }
    if upgrade_options.is_empty() {
        detail.push_str(". You are on the highest available tier.");
    }

    (
        CardStatus::Active {
            tier_key,
            tier_label,
            speed,
            provider: subscription.provider.clone(),
            interrupted,
            upgrade_options,
        },
        headline,
        Some(detail),
    )
}

fn card_for(
    listing: &PropertyListing,
    store: &ReconciliationStore,
    catalog: &ServiceTierCatalog,
    options: &RenderOptions,
) -> PropertyCard {
    let property_id = listing.property_id.as_str();
    let subscription = store
        .get::<Subscription>(property_id)
        .filter(|subscription| subscription.is_active);
    let pending = store
        .get::<PendingInstall>(property_id)
        .filter(|pending| pending.is_open());

    let (status, headline, detail) = if let Some(subscription) = subscription {
        active_status(subscription, store, catalog, options)
    } else if let Some(pending) = pending {
        let tier_label = pending_tier_label(property_id, pending, catalog);
        let headline = match &tier_label {
            Some(label) => format!("Installation Pending for {label}"),
            None => "Installation Pending".to_string(),
        };
        (
            CardStatus::Pending {
                ticket_id: pending.ticket_id,
                tier_label,
            },
            headline,
            None,
        )
    } else {
        (
            CardStatus::Unsubscribed {
                install_options: tier_options(catalog),
            },
            "No active internet service.".to_string(),
            None,
        )
    };

    PropertyCard {
        property_id: property_id.to_string(),
        label: listing.display_label().to_string(),
        address: listing.address.clone(),
        status,
        headline,
        detail,
    }
}

/// Render one property card.
///
/// A property with no listing still renders, labelled by its id.
pub fn render_property(
    property_id: &str,
    store: &ReconciliationStore,
    catalog: &ServiceTierCatalog,
    options: &RenderOptions,
) -> PropertyCard {
    match store.get::<PropertyListing>(property_id) {
        Some(listing) => card_for(listing, store, catalog, options),
        None => card_for(&PropertyListing::new(property_id), store, catalog, options),
    }
}

/// Render every property card.
pub fn render_properties(
    store: &ReconciliationStore,
    catalog: &ServiceTierCatalog,
    options: &RenderOptions,
) -> PropertiesView {
    let cards: Vec<PropertyCard> = store
        .all::<PropertyListing>()
        .map(|(_, listing)| card_for(listing, store, catalog, options))
        .collect();
    PropertiesView {
        placeholder: placeholder(
            &cards,
            "You do not own any properties or property data is unavailable.",
        ),
        cards,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smart_utilities_types::{InstallStatus, ServiceTier};

    fn catalog() -> ServiceTierCatalog {
        [
            ("basic".to_string(), ServiceTier::new("Basic", "25Mbps", 50.0)),
            ("premium".to_string(), ServiceTier::new("Premium", "500Mbps", 200.0)),
        ]
        .into_iter()
        .collect()
    }

    fn store_with_property(property_id: &str) -> ReconciliationStore {
        let mut store = ReconciliationStore::new();
        store.replace_catalog(catalog());
        store.replace([(property_id.to_string(), PropertyListing::new(property_id))]);
        store
    }

    fn active(tier: &str, provider: &str) -> Subscription {
        Subscription {
            property_id: "p1".to_string(),
            provider: Some(provider.to_string()),
            speed_tier: Some(tier.to_string()),
            is_active: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_unsubscribed_offers_every_tier() {
        let store = store_with_property("p1");
        let card = render_property("p1", &store, store.catalog(), &RenderOptions::default());
        let CardStatus::Unsubscribed { install_options } = &card.status else {
            panic!("expected install control, got {:?}", card.status);
        };
        assert_eq!(install_options.len(), 2);
        assert_eq!(install_options[0].label, "Basic (25Mbps) - $50");
        assert_eq!(card.headline, "No active internet service.");
    }

    #[test]
    fn test_active_with_hub_up() {
        let mut store = store_with_property("p1");
        store.upsert("p1", active("basic", "hubA"));
        store.replace([(
            "hubA".to_string(),
            HubStatus {
                is_down: Some(false),
                ..Default::default()
            },
        )]);
        let card = render_property("p1", &store, store.catalog(), &RenderOptions::default());
        assert_eq!(card.headline, "Active: Basic (25Mbps)");
        assert!(!card.is_interrupted());
        assert!(!card.offers_install());
        let CardStatus::Active {
            upgrade_options, ..
        } = &card.status
        else {
            panic!("expected active card");
        };
        assert_eq!(upgrade_options.len(), 1);
        assert_eq!(upgrade_options[0].value, "premium");
    }

    #[test]
    fn test_unknown_hub_follows_option() {
        let mut store = store_with_property("p1");
        store.upsert("p1", active("premium", "ghost"));

        let defensive = RenderOptions::default();
        let card = render_property("p1", &store, store.catalog(), &defensive);
        assert!(card.is_interrupted());
        assert_eq!(
            card.detail.as_deref(),
            Some("Hub: ghost (Hub Offline). You are on the highest available tier.")
        );

        let legacy = RenderOptions {
            unknown_hub_treated_as_down: false,
            ..RenderOptions::default()
        };
        let card = render_property("p1", &store, store.catalog(), &legacy);
        assert!(!card.is_interrupted());
    }

    #[test]
    fn test_catalog_miss_falls_back_to_tier_key() {
        let mut store = store_with_property("p1");
        store.upsert("p1", active("gigabit", "hubA"));
        let card = render_property("p1", &store, store.catalog(), &RenderOptions::default());
        assert_eq!(card.headline, "Active: gigabit (N/A)");
    }

    #[test]
    fn test_pending_prefers_structured_key() {
        let mut store = store_with_property("p2");
        store.upsert(
            "p2",
            PendingInstall {
                property_id: "p2".to_string(),
                status: InstallStatus::Open,
                speed_tier: Some("premium".to_string()),
                description: Some("Install Something Else at property: p2".to_string()),
                ..Default::default()
            },
        );
        let card = render_property("p2", &store, store.catalog(), &RenderOptions::default());
        assert_eq!(card.headline, "Installation Pending for Premium");
    }

    #[test]
    fn test_pending_description_fallback() {
        assert_eq!(
            parse_description_tier("Install Basic ADSL at property: prop_123").as_deref(),
            Some("Basic ADSL")
        );
        assert_eq!(parse_description_tier("Router swap").as_deref(), None);
        assert_eq!(parse_description_tier("Install  ").as_deref(), None);

        let mut store = store_with_property("p2");
        store.upsert(
            "p2",
            PendingInstall {
                property_id: "p2".to_string(),
                status: InstallStatus::Open,
                description: Some("Router swap".to_string()),
                ..Default::default()
            },
        );
        let card = render_property("p2", &store, store.catalog(), &RenderOptions::default());
        assert_eq!(card.headline, "Installation Pending");
    }

    #[test]
    fn test_closed_pending_renders_install_control() {
        let mut store = store_with_property("p2");
        store.upsert(
            "p2",
            PendingInstall {
                property_id: "p2".to_string(),
                status: InstallStatus::Closed,
                ..Default::default()
            },
        );
        let card = render_property("p2", &store, store.catalog(), &RenderOptions::default());
        assert!(card.offers_install());
    }

    #[test]
    fn test_hub_row_fallbacks() {
        let mut store = ReconciliationStore::new();
        store.replace([(
            "hubB".to_string(),
            HubStatus {
                is_down: Some(true),
                ..Default::default()
            },
        )]);
        let view = render_hubs(&store);
        assert_eq!(view.rows[0].text, "hubB (Conn: 0/N/A)");
        assert!(!view.rows[0].online);
    }
}
