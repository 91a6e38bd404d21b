//! Water sources and leaks.

use serde::{Deserialize, Serialize};

/// Alert threshold (percent) used when a source does not carry one.
pub const DEFAULT_LOW_THRESHOLD_PERCENT: f64 = 25.0;

/// A reservoir or other water source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterSource {
    /// Source identifier
    #[serde(default)]
    pub id: String,
    /// Display label
    #[serde(default)]
    pub label: Option<String>,
    /// Current stored volume
    #[serde(default)]
    pub current_level: Option<f64>,
    /// Maximum volume
    #[serde(default)]
    pub capacity: Option<f64>,
    /// Low-level alert threshold as a fraction of capacity
    #[serde(default)]
    pub alert_threshold: Option<f64>,
    /// Precomputed fill percentage, preferred when present
    #[serde(default)]
    pub percentage: Option<f64>,
}

impl WaterSource {
    /// Label, falling back to the source id.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Fill level in percent.
    pub fn fill_percentage(&self) -> f64 {
        if let Some(percentage) = self.percentage {
            return percentage;
        }
        match (self.current_level, self.capacity) {
            (Some(level), Some(capacity)) if capacity > 0.0 => level / capacity * 100.0,
            _ => 0.0,
        }
    }

    /// Threshold in percent below which the source is reported low.
    ///
    /// A missing or zero threshold falls back to 25%.
    pub fn low_threshold_percent(&self) -> f64 {
        self.alert_threshold
            .map(|t| t * 100.0)
            .filter(|t| t.is_finite() && *t != 0.0)
            .unwrap_or(DEFAULT_LOW_THRESHOLD_PERCENT)
    }

    /// Whether the source is below its alert threshold.
    pub fn is_low(&self) -> bool {
        self.fill_percentage() < self.low_threshold_percent()
    }
}

/// A water main leak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterLeak {
    /// Leak identifier
    #[serde(default)]
    pub id: String,
    /// Human readable location
    #[serde(default)]
    pub location_description: Option<String>,
    /// `false` means the leak was repaired and should be removed
    #[serde(default = "crate::default_true")]
    pub is_leaking: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_percentage_prefers_explicit_value() {
        let source = WaterSource {
            percentage: Some(42.0),
            current_level: Some(1.0),
            capacity: Some(2.0),
            ..Default::default()
        };
        assert_eq!(source.fill_percentage(), 42.0);
    }

    #[test]
    fn test_percentage_from_level() {
        let source: WaterSource = serde_json::from_value(json!({
            "label": "Land Act Reservoir",
            "currentLevel": 750000,
            "capacity": 1000000,
            "alertThreshold": 0.25
        }))
        .unwrap();
        assert_eq!(source.fill_percentage(), 75.0);
        assert!(!source.is_low());
    }

    #[test]
    fn test_zero_capacity_reads_empty() {
        let source = WaterSource {
            current_level: Some(10.0),
            capacity: Some(0.0),
            ..Default::default()
        };
        assert_eq!(source.fill_percentage(), 0.0);
        assert!(source.is_low());
    }

    #[test]
    fn test_threshold_fallback() {
        let mut source = WaterSource {
            percentage: Some(20.0),
            ..Default::default()
        };
        assert_eq!(source.low_threshold_percent(), 25.0);
        assert!(source.is_low());

        source.alert_threshold = Some(0.0);
        assert_eq!(source.low_threshold_percent(), 25.0);

        source.alert_threshold = Some(0.1);
        assert!(!source.is_low());
    }

    #[test]
    fn test_leak_defaults_to_leaking() {
        let leak: WaterLeak = serde_json::from_value(json!({"id": "leak1"})).unwrap();
        assert!(leak.is_leaking);
        let leak: WaterLeak =
            serde_json::from_value(json!({"id": "leak1", "isLeaking": false})).unwrap();
        assert!(!leak.is_leaking);
    }
}
