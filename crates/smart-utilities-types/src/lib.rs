//! # Smart Utilities Types
//!
//! Wire-level types shared by every smart utilities dashboard frontend:
//!
//! - [`InboundMessage`]: the tagged envelope pushed by the game-side authority
//! - [`DataType`]: the `dataType` discriminant of `UPDATE` messages
//! - Utility records: power zones, water sources and leaks, internet hubs,
//!   subscriptions and pending installs, trash bins and illegal dump sites
//! - [`ServiceTierCatalog`]: the insertion-ordered internet plan catalog
//!
//! These types carry no reconciliation behavior. Producers are loose about
//! field naming (`propertyId` vs `property_id`, `cc` vs `currentConnections`)
//! and about the types of cosmetic fields; [`wire`] folds both into one
//! accepted shape.

pub mod catalog;
pub mod internet;
pub mod message;
pub mod power;
pub mod reference;
pub mod trash;
pub mod water;
pub mod wire;

pub use catalog::{ServiceTier, ServiceTierCatalog};
pub use internet::{HubStatus, InstallStatus, PendingInstall, PropertyListing, Subscription};
pub use message::{DataType, InboundMessage, MessageKind};
pub use power::ZoneStatus;
pub use reference::SelectOption;
pub use trash::{BinKind, Coords, IllegalDumpSite, LoadLevel, TrashBin};
pub use water::{WaterLeak, WaterSource};
pub use wire::FieldAliases;

pub(crate) fn default_true() -> bool {
    true
}
