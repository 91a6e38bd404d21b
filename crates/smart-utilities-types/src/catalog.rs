//! # Service Tier Catalog
//!
//! Static internet plan reference data. Catalog order is the order the
//! producer listed the tiers in, and that order doubles as the upgrade
//! ordering: a tier is "higher" when it appears later.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One internet plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceTier {
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Advertised speed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<String>,
    /// Monthly price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

impl ServiceTier {
    /// Build a tier.
    pub fn new(label: impl Into<String>, speed: impl Into<String>, price: f64) -> Self {
        Self {
            label: label.into(),
            speed: Some(speed.into()),
            price: Some(price),
        }
    }

    /// Select-box text, e.g. `"Basic (25Mbps) - $50"`.
    pub fn option_text(&self) -> String {
        let speed = self.speed.as_deref().unwrap_or("N/A");
        match self.price {
            Some(price) => format!("{} ({speed}) - ${price}", self.label),
            None => format!("{} ({speed})", self.label),
        }
    }
}

/// Insertion-ordered tier catalog keyed by tier key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceTierCatalog {
    tiers: IndexMap<String, ServiceTier>,
}

impl ServiceTierCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a tier.
    pub fn get(&self, key: &str) -> Option<&ServiceTier> {
        self.tiers.get(key)
    }

    /// Catalog position of a tier.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.tiers.get_index_of(key)
    }

    /// Tiers in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ServiceTier)> {
        self.tiers.iter()
    }

    /// Number of tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Tiers a subscriber on `current` may upgrade to.
    ///
    /// Known tier: every tier listed after it. Unknown tier: every tier, since
    /// there is no position to compare against (the current key itself is
    /// excluded either way).
    pub fn upgrades_from<'a>(
        &'a self,
        current: &'a str,
    ) -> impl Iterator<Item = (&'a String, &'a ServiceTier)> + 'a {
        let start = self.position(current).map_or(0, |pos| pos + 1);
        self.tiers
            .iter()
            .skip(start)
            .filter(move |(key, _)| key.as_str() != current)
    }
}

impl FromIterator<(String, ServiceTier)> for ServiceTierCatalog {
    fn from_iter<I: IntoIterator<Item = (String, ServiceTier)>>(iter: I) -> Self {
        Self {
            tiers: iter.into_iter().collect(),
        }
    }
}
