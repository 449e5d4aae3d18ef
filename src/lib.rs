//! Pebble Bowls - drag pebbles between bowls on a canvas
//!
//! Core modules:
//! - `scene`: Deterministic scene core (hit-testing, entities, animation, drag handling)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Frame scheduling and input coordinate mapping
//! - `settings`: Data-driven configuration

pub mod platform;
pub mod renderer;
pub mod scene;
pub mod settings;

pub use scene::{DragEvent, Game};
pub use settings::Settings;

use glam::Vec2;

/// Scene configuration constants
pub mod consts {
    /// Fixed animation timestep (60 Hz, one step per display frame)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum animation steps per advance to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest wall-clock delta accepted by a single advance (seconds)
    pub const MAX_FRAME_DELTA: f32 = 0.1;

    /// Canvas dimensions (surface-local pixels)
    pub const CANVAS_WIDTH: f32 = 600.0;
    pub const CANVAS_HEIGHT: f32 = 300.0;

    /// Default bowl layout
    pub const BOWL_RADIUS: f32 = 100.0;
    pub const BOWL_STROKE_WIDTH: f32 = 4.0;

    /// Pebble radius range [min, max) at population time
    pub const PEBBLE_RADIUS_MIN: f32 = 15.0;
    pub const PEBBLE_RADIUS_MAX: f32 = 20.0;

    /// Pebble count range [min, max) per bowl at population time
    pub const PEBBLES_PER_BOWL_MIN: u32 = 5;
    pub const PEBBLES_PER_BOWL_MAX: u32 = 15;

    /// Random pebble color channel range [min, max)
    pub const COLOR_CHANNEL_MIN: u8 = 55;
    pub const COLOR_CHANNEL_MAX: u8 = 255;

    /// Drop shadow under a picked pebble
    pub const SHADOW_OFFSET: f32 = 5.0;
    pub const SHADOW_BLUR: f32 = 10.0;
    pub const SHADOW_ALPHA: f32 = 0.5;
}

/// Convert polar (r, theta) around `center` to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(center: Vec2, r: f32, theta: f32) -> Vec2 {
    center + Vec2::new(r * theta.cos(), r * theta.sin())
}
