//! Deterministic scene core
//!
//! All interaction logic lives here. This module must be pure and deterministic:
//! - Fixed animation timestep only
//! - Seeded RNG only
//! - Stable iteration order (container order = z-order)
//! - No rendering or platform dependencies

pub mod animation;
pub mod frame;
pub mod geometry;
pub mod interaction;
pub mod state;

pub use animation::{AnimationMode, Tuning};
pub use frame::{BACKGROUND, DrawCommand, Game, RenderList, Shadow, build_render_list};
pub use geometry::{circle_contains_circle, point_in_circle};
pub use interaction::{Controller, CountSink, Cursor, DragEvent, publish_counts};
pub use state::{Bowl, BowlId, BowlStyle, Color, Owner, Pebble, PebbleId, Scene, rgb8};
