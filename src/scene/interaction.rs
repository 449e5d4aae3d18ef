//! Drag gestures: pick, retarget, drop
//!
//! State machine:
//! - Idle: no gesture in progress
//! - Gesture without a pebble: pointer went down on empty space
//! - Dragging: one pebble in the scene's dragged slot
//!
//! Pick scans bowls in order and each bowl top-down, then the loose set
//! top-down. Drop hands the pebble to the first bowl that strictly contains
//! it, or to the loose set.

use glam::Vec2;

use super::animation::{self, AnimationMode, Tuning};
use super::state::{BowlId, Owner, PebbleId, Scene};

/// Input from the pointer/touch collaborator, in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragEvent {
    Start(Vec2),
    Move(Vec2),
    End,
}

/// Cursor affordance for the pointer position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Pointer,
}

impl Cursor {
    /// CSS cursor keyword
    pub fn as_css(&self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Pointer => "pointer",
        }
    }
}

/// Receives per-bowl pebble counts after every pick and drop
pub trait CountSink {
    fn pebble_count_changed(&mut self, bowl: BowlId, count: usize);
}

impl<F: FnMut(BowlId, usize)> CountSink for F {
    fn pebble_count_changed(&mut self, bowl: BowlId, count: usize) {
        self(bowl, count)
    }
}

/// Push every bowl's current count to the sink
pub fn publish_counts(scene: &Scene, sink: &mut dyn CountSink) {
    for bowl in scene.bowls() {
        sink.pebble_count_changed(bowl.id, bowl.count());
    }
}

/// Topmost pebble under `point`: bowls in order (top-down within each), then loose pebbles
pub fn hit_test(scene: &Scene, point: Vec2) -> Option<(PebbleId, Owner)> {
    for bowl in scene.bowls() {
        if let Some(&id) = bowl
            .pebbles()
            .iter()
            .rev()
            .find(|&&id| scene.pebble(id).contains_point(point))
        {
            return Some((id, Owner::Bowl(bowl.id)));
        }
    }
    scene
        .loose()
        .iter()
        .rev()
        .find(|&&id| scene.pebble(id).contains_point(point))
        .map(|&id| (id, Owner::Loose))
}

/// Is the pointer over any bowl or loose pebble
pub fn hovering(scene: &Scene, point: Vec2) -> bool {
    hit_test(scene, point).is_some()
}

/// First bowl (in bowl order) that strictly contains the pebble at its
/// release point
pub fn drop_target(scene: &Scene, pebble: PebbleId) -> Option<BowlId> {
    let p = scene.pebble(pebble);
    scene.bowls().iter().find(|b| b.contains(p)).map(|b| b.id)
}

/// Turns drag events into scene mutations
#[derive(Debug, Clone, Default)]
pub struct Controller {
    /// A start has been accepted and its end not yet seen
    gesture_active: bool,
    /// Last cursor reported for the pointer
    cursor: Cursor,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn gesture_active(&self) -> bool {
        self.gesture_active
    }

    #[inline]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Feed one event; pick and drop report counts to `sink`
    pub fn handle(
        &mut self,
        scene: &mut Scene,
        event: DragEvent,
        mode: AnimationMode,
        tuning: &Tuning,
        sink: &mut dyn CountSink,
    ) {
        match event {
            DragEvent::Start(point) => {
                // Touch and synthetic mouse events can both start the same gesture
                if self.gesture_active {
                    return;
                }
                self.gesture_active = true;
                if self.pick(scene, point, mode, tuning).is_some() {
                    publish_counts(scene, sink);
                }
            }
            DragEvent::Move(point) => {
                self.drag_to(scene, point, mode);
                self.cursor = if hovering(scene, point) {
                    Cursor::Pointer
                } else {
                    Cursor::Default
                };
            }
            DragEvent::End => {
                if !self.gesture_active {
                    return;
                }
                self.gesture_active = false;
                if self.drop(scene, mode, tuning).is_some() {
                    publish_counts(scene, sink);
                }
            }
        }
    }

    /// Take the topmost pebble under `point` into the dragged slot
    pub fn pick(
        &mut self,
        scene: &mut Scene,
        point: Vec2,
        mode: AnimationMode,
        tuning: &Tuning,
    ) -> Option<PebbleId> {
        if scene.dragged().is_some() {
            return None;
        }
        let (id, from) = hit_test(scene, point)?;
        scene.move_to_dragged(id);
        animation::seed_pick(scene.pebble_mut(id), mode, tuning);
        log::debug!("Picked {:?} from {:?}", id, from);
        Some(id)
    }

    /// Follow the pointer with the dragged pebble, if any
    pub fn drag_to(&mut self, scene: &mut Scene, point: Vec2, mode: AnimationMode) {
        if let Some(id) = scene.dragged() {
            animation::retarget(scene.pebble_mut(id), point, mode);
        }
    }

    /// Place the dragged pebble in the first containing bowl, else make it loose
    pub fn drop(&mut self, scene: &mut Scene, mode: AnimationMode, tuning: &Tuning) -> Option<Owner> {
        let id = scene.take_dragged()?;
        let owner = match drop_target(scene, id) {
            Some(bowl) => {
                scene.move_to_bowl(id, bowl);
                Owner::Bowl(bowl)
            }
            None => {
                scene.move_to_loose(id);
                Owner::Loose
            }
        };
        animation::seed_settle(scene.pebble_mut(id), mode, tuning);
        log::debug!("Dropped {:?} into {:?}", id, owner);
        Some(owner)
    }
}
