//! Scene settings and preferences
//!
//! Persisted in LocalStorage; the scene itself is never saved.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::scene::{AnimationMode, BowlStyle, Color, Tuning, rgb8};

/// Fallback for unparseable bowl colors
const FALLBACK_COLOR: Color = rgb8(128, 128, 128);

/// Parse a `#RRGGBB` (or `RRGGBB`) hex color
pub fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(rgb8(channel(0)?, channel(2)?, channel(4)?))
}

/// A bowl to create at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BowlSpec {
    pub center: Vec2,
    pub radius: f32,
    /// Fill color, `#RRGGBB`
    pub fill: String,
    /// Stroke color, `#RRGGBB`
    pub stroke: String,
}

impl BowlSpec {
    pub fn new(x: f32, y: f32, radius: f32, fill: &str, stroke: &str) -> Self {
        Self {
            center: Vec2::new(x, y),
            radius,
            fill: fill.to_string(),
            stroke: stroke.to_string(),
        }
    }

    /// Resolved colors; bad hex strings fall back to gray
    pub fn style(&self) -> BowlStyle {
        let resolve = |s: &str| {
            parse_hex_color(s).unwrap_or_else(|| {
                log::warn!("Invalid bowl color {:?}, using gray", s);
                FALLBACK_COLOR
            })
        };
        BowlStyle {
            fill: resolve(&self.fill),
            stroke: resolve(&self.stroke),
        }
    }
}

/// Scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Instant or eased pebble motion
    pub animation: AnimationMode,
    /// Shadow under the held pebble
    pub drop_shadows: bool,
    /// Easing and wobble constants
    pub tuning: Tuning,
    /// Bowls in pick/drop priority order
    pub bowls: Vec<BowlSpec>,
    /// Pebbles per bowl at startup, [min, max)
    pub pebbles_per_bowl: (u32, u32),
    /// Logical canvas size in pixels
    pub canvas_size: [f32; 2],
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            animation: AnimationMode::Eased,
            drop_shadows: true,
            tuning: Tuning::default(),
            bowls: vec![
                BowlSpec::new(150.0, 150.0, BOWL_RADIUS, "#FF14A1", "#d80082"),
                BowlSpec::new(450.0, 150.0, BOWL_RADIUS, "#FE9923", "#e57c01"),
            ],
            pebbles_per_bowl: (PEBBLES_PER_BOWL_MIN, PEBBLES_PER_BOWL_MAX),
            canvas_size: [CANVAS_WIDTH, CANVAS_HEIGHT],
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "pebble_bowls_settings";

    /// Parse settings; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#FF14A1"), Some(rgb8(0xFF, 0x14, 0xA1)));
        assert_eq!(parse_hex_color("e57c01"), Some(rgb8(0xE5, 0x7C, 0x01)));
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#GG0000"), None);
    }

    #[test]
    fn test_bad_color_falls_back() {
        let spec = BowlSpec::new(0.0, 0.0, 50.0, "pink", "#000000");
        let style = spec.style();
        assert_eq!(style.fill, FALLBACK_COLOR);
        assert_eq!(style.stroke, rgb8(0, 0, 0));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            animation: AnimationMode::Instant,
            drop_shadows: false,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{"animation":"Instant","tuning":{"ease":0.5}}"#).unwrap();
        assert_eq!(settings.animation, AnimationMode::Instant);
        assert_eq!(settings.tuning.ease, 0.5);
        assert_eq!(settings.tuning.decay, Tuning::default().decay);
        assert!(settings.drop_shadows);
        assert_eq!(settings.bowls.len(), 2);
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Settings::from_json("{not json").is_err());
    }
}
