//! Pen configuration: defaults merged with caller-supplied overrides.

use crate::render::StrokeStyle;
use kurbo::{Cap, Join};
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Default stroke width in logical pixels.
pub const DEFAULT_LINE_WIDTH: f64 = 6.0;
/// Default stroke color (any CSS color string).
pub const DEFAULT_COLOR: &str = "black";

/// Partial configuration supplied at construction.
///
/// Every field is optional; missing fields fall back to the defaults and
/// unknown keys in JSON input are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenOverrides {
    #[serde(default)]
    pub line_width: Option<f64>,
    #[serde(default)]
    pub color: Option<String>,
}

impl PenOverrides {
    /// Parse overrides from a JSON object such as `{"lineWidth": 3}`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn line_width(mut self, width: f64) -> Self {
        self.line_width = Some(width);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Resolved, immutable pen configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PenConfig {
    /// Stroke width in logical pixels. Not range-checked.
    pub line_width: f64,
    /// Stroke color as a CSS color string.
    pub color: String,
}

impl Default for PenConfig {
    fn default() -> Self {
        Self {
            line_width: DEFAULT_LINE_WIDTH,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl PenConfig {
    /// Merge overrides over the defaults.
    pub fn with_overrides(overrides: PenOverrides) -> Self {
        let defaults = Self::default();
        Self {
            line_width: overrides.line_width.unwrap_or(defaults.line_width),
            color: overrides.color.unwrap_or(defaults.color),
        }
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The style every stroke is rendered with: configured width and color,
    /// rounded caps and joins.
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            width: self.line_width,
            color: parse_stroke_color(&self.color),
            cap: Cap::Round,
            join: Join::Round,
        }
    }
}

/// Parse a CSS color string, keeping opaque black when it cannot be parsed.
fn parse_stroke_color(color: &str) -> Color {
    match peniko::color::parse_color(color) {
        Ok(parsed) => parsed.to_alpha_color(),
        Err(e) => {
            log::warn!("Ignoring unparseable stroke color {:?}: {:?}", color, e);
            Color::from_rgba8(0, 0, 0, 255)
        }
    }
}
