//! Overlay rendering/behavior configuration.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Immutable description of how the floating indicator should look and act.
///
/// Fully modeled (construction, copy, map serialization, field-wise
/// equality) but not yet consumed by the running render path: the service
/// renders with built-in defaults and the controller uses
/// `quill_bubble::DEFAULT_HIDE_DELAY`. Wiring these knobs through is a
/// known open integration point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Show the indicator automatically on text focus. Default `true`.
    pub auto_show: bool,

    /// Auto-hide delay in milliseconds. Default `3000`.
    pub auto_hide_ms: u64,

    /// Vibrate when the indicator appears. Default `false`.
    pub vibration: bool,

    /// Indicator color as a hex string. Default `"#4A90D9"`.
    pub color: String,

    /// Indicator diameter in density-independent pixels. Default `40.0`.
    pub size: f64,

    /// Indicator opacity, 0.0 through 1.0. Default `0.9`.
    pub opacity: f64,

    /// Offer spell-check actions. Default `true`.
    pub spell_check: bool,

    /// Offer grammar-check actions. Default `true`.
    pub grammar_check: bool,

    /// Initial horizontal position. Default `0`.
    pub x: i32,

    /// Initial vertical position. Default `200`.
    pub y: i32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            auto_show: true,
            auto_hide_ms: 3000,
            vibration: false,
            color: "#4A90D9".to_string(),
            size: 40.0,
            opacity: 0.9,
            spell_check: true,
            grammar_check: true,
            x: 0,
            y: 200,
        }
    }
}

impl OverlayConfig {
    /// Encode to the field-wise map form used across the call boundary.
    pub fn to_map(&self) -> serde_json::Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        }
    }

    /// Decode from the map form. Fails on missing or mistyped fields.
    pub fn from_map(map: serde_json::Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(map))
    }
}
