//! Per-pebble easing and wobble
//!
//! Each step moves a pebble a fixed fraction of the way to its target,
//! relaxes the radius back to rest (unless held), advances the wobble phase
//! and decays its amplitude. Once everything is within `epsilon` the pebble
//! snaps to its exact resting values and stops animating.

use serde::{Deserialize, Serialize};

use super::state::Pebble;

/// How pebbles follow the pointer and settle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AnimationMode {
    /// Drag moves the pebble directly; no pick boost, no wobble
    Instant,
    /// Drag moves the target; position, radius and wobble ease each frame
    #[default]
    Eased,
}

impl AnimationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationMode::Instant => "Instant",
            AnimationMode::Eased => "Eased",
        }
    }

}

/// Animation constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Fraction of the remaining distance covered per step
    pub ease: f32,
    /// Wobble phase advance per step (radians)
    pub phase_step: f32,
    /// Wobble amplitude multiplier per step
    pub decay: f32,
    /// Settle threshold for position, radius and amplitude
    pub epsilon: f32,
    /// Radius multiplier while held
    pub pick_scale: f32,
    /// Wobble amplitude seeded on pick
    pub pick_wobble: f32,
    /// Wobble amplitude seeded on drop
    pub settle_wobble: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ease: 0.2,
            phase_step: 0.3,
            decay: 0.95,
            epsilon: 0.1,
            pick_scale: 1.2,
            pick_wobble: 4.0,
            settle_wobble: 2.0,
        }
    }
}

/// Visual "pop" when a pebble is picked up
pub fn seed_pick(pebble: &mut Pebble, mode: AnimationMode, tuning: &Tuning) {
    pebble.picked = true;
    pebble.target = pebble.pos;
    if mode == AnimationMode::Eased {
        pebble.radius = pebble.rest_radius * tuning.pick_scale;
        pebble.amplitude = tuning.pick_wobble;
        pebble.animating = true;
    }
}

/// Smaller wobble when a pebble is put down
pub fn seed_settle(pebble: &mut Pebble, mode: AnimationMode, tuning: &Tuning) {
    pebble.picked = false;
    match mode {
        AnimationMode::Eased => {
            pebble.amplitude = tuning.settle_wobble;
            pebble.animating = true;
        }
        AnimationMode::Instant => {
            pebble.radius = pebble.rest_radius;
            pebble.amplitude = 0.0;
            pebble.animating = false;
        }
    }
}

/// Point the pebble at a new pointer position
pub fn retarget(pebble: &mut Pebble, target: glam::Vec2, mode: AnimationMode) {
    pebble.target = target;
    match mode {
        AnimationMode::Instant => pebble.pos = target,
        AnimationMode::Eased => pebble.animating = true,
    }
}

/// Advance one pebble by one frame. Returns true while still animating.
pub fn step(pebble: &mut Pebble, mode: AnimationMode, tuning: &Tuning) -> bool {
    if !pebble.animating {
        return false;
    }

    if mode == AnimationMode::Instant {
        settle(pebble);
        return false;
    }

    pebble.pos += (pebble.target - pebble.pos) * tuning.ease;
    if !pebble.picked {
        pebble.radius += (pebble.rest_radius - pebble.radius) * tuning.ease;
    }
    pebble.phase += tuning.phase_step;
    pebble.amplitude *= tuning.decay;

    let eps = tuning.epsilon;
    let at_target = pebble.pos.distance(pebble.target) < eps;
    let at_rest = !pebble.picked && (pebble.radius - pebble.rest_radius).abs() < eps;
    let still = pebble.amplitude.abs() < eps;

    if at_target && at_rest && still {
        settle(pebble);
        log::trace!("Pebble {:?} settled at {:?}", pebble.id, pebble.pos);
        return false;
    }
    true
}

/// Snap to exact resting values and stop animating
fn settle(pebble: &mut Pebble) {
    pebble.pos = pebble.target;
    if !pebble.picked {
        pebble.radius = pebble.rest_radius;
    }
    pebble.amplitude = 0.0;
    pebble.animating = false;
}
