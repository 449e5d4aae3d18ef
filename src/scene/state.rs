//! Scene entities and container ownership
//!
//! Pebbles live in a single arena indexed by `PebbleId`. Bowls and the loose
//! set only hold ordered id lists, so moving a pebble between containers is
//! "remove id here, push id there". Container order is z-order: the last id
//! is drawn on top and is hit first.

use std::f32::consts::TAU;
use std::ops::Range;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::geometry::{circle_contains_circle, point_in_circle};
use crate::consts::*;
use crate::polar_to_cartesian;

/// Linear RGBA color
pub type Color = [f32; 4];

/// Build an opaque color from 8-bit channels
pub const fn rgb8(r: u8, g: u8, b: u8) -> Color {
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}

/// Stable pebble handle (index into the scene arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PebbleId(pub u32);

impl PebbleId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Stable bowl handle (index into the scene's bowl list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BowlId(pub u32);

impl BowlId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A draggable pebble
#[derive(Debug, Clone)]
pub struct Pebble {
    pub id: PebbleId,
    /// Current center
    pub pos: Vec2,
    /// Logical radius (containment uses this, not the drawn radius)
    pub radius: f32,
    /// Radius the pebble relaxes back to after a pick
    pub rest_radius: f32,
    /// Position the easing converges toward
    pub target: Vec2,
    /// Held by the pointer
    pub picked: bool,
    /// Still converging or wobbling
    pub animating: bool,
    /// Oscillation phase (radians)
    pub phase: f32,
    /// Oscillation amplitude (pixels, decays toward 0)
    pub amplitude: f32,
    color: Color,
}

impl Pebble {
    pub fn new(id: PebbleId, pos: Vec2, radius: f32, color: Color) -> Self {
        Self {
            id,
            pos,
            radius,
            rest_radius: radius,
            target: pos,
            picked: false,
            animating: false,
            phase: 0.0,
            amplitude: 0.0,
            color,
        }
    }

    /// Fill color, fixed at creation
    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Radius to draw this frame: logical radius plus the wobble
    #[inline]
    pub fn drawn_radius(&self) -> f32 {
        (self.radius + self.phase.sin() * self.amplitude).max(0.0)
    }

    /// Pointer hit-test against the logical radius
    #[inline]
    pub fn contains_point(&self, point: Vec2) -> bool {
        point_in_circle(self.pos, self.radius, point)
    }
}

/// Fill and stroke colors of a bowl
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BowlStyle {
    pub fill: Color,
    pub stroke: Color,
}

/// A circular container of pebbles
#[derive(Debug, Clone)]
pub struct Bowl {
    pub id: BowlId,
    pub center: Vec2,
    pub radius: f32,
    pub style: BowlStyle,
    pebbles: Vec<PebbleId>,
}

impl Bowl {
    /// Owned pebbles, bottom to top
    #[inline]
    pub fn pebbles(&self) -> &[PebbleId] {
        &self.pebbles
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.pebbles.len()
    }

    /// Strict containment of the pebble's logical circle at the point it
    /// is heading to (the pointer while dragged, its position once settled)
    #[inline]
    pub fn contains(&self, pebble: &Pebble) -> bool {
        circle_contains_circle(self.center, self.radius, pebble.target, pebble.radius)
    }
}

/// Which container currently owns a pebble
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Bowl(BowlId),
    Loose,
    Dragged,
}

/// Remove `id` from an ordered id list; absent ids are a no-op
fn remove_id(list: &mut Vec<PebbleId>, id: PebbleId) -> bool {
    match list.iter().position(|&p| p == id) {
        Some(i) => {
            list.remove(i);
            true
        }
        None => false,
    }
}

/// All entities of a session plus the single dragged slot
#[derive(Debug, Clone)]
pub struct Scene {
    /// Seed the scene RNG was created from
    pub seed: u64,
    rng: Pcg32,
    pebbles: Vec<Pebble>,
    bowls: Vec<Bowl>,
    loose: Vec<PebbleId>,
    dragged: Option<PebbleId>,
}

impl Scene {
    /// Create an empty scene with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            pebbles: Vec::new(),
            bowls: Vec::new(),
            loose: Vec::new(),
            dragged: None,
        }
    }

    /// Random pebble color, each channel in [COLOR_CHANNEL_MIN, COLOR_CHANNEL_MAX)
    fn random_color(&mut self) -> Color {
        let r = self.rng.random_range(COLOR_CHANNEL_MIN..COLOR_CHANNEL_MAX);
        let g = self.rng.random_range(COLOR_CHANNEL_MIN..COLOR_CHANNEL_MAX);
        let b = self.rng.random_range(COLOR_CHANNEL_MIN..COLOR_CHANNEL_MAX);
        rgb8(r, g, b)
    }

    /// Create a resting pebble with a fresh random color.
    ///
    /// New pebbles start in the loose set; use `move_to_bowl` to place them.
    pub fn create_pebble(&mut self, pos: Vec2, radius: f32) -> PebbleId {
        let id = PebbleId(self.pebbles.len() as u32);
        let color = self.random_color();
        self.pebbles.push(Pebble::new(id, pos, radius, color));
        self.loose.push(id);
        id
    }

    /// Create an empty bowl
    pub fn create_bowl(&mut self, center: Vec2, radius: f32, style: BowlStyle) -> BowlId {
        let id = BowlId(self.bowls.len() as u32);
        self.bowls.push(Bowl {
            id,
            center,
            radius,
            style,
            pebbles: Vec::new(),
        });
        id
    }

    /// Append a pebble on top of a bowl. The caller must have released it
    /// from its previous container first.
    pub fn add_to_bowl(&mut self, bowl: BowlId, pebble: PebbleId) {
        self.bowls[bowl.index()].pebbles.push(pebble);
    }

    /// Remove a pebble from a bowl; returns false (and does nothing) if absent
    pub fn remove_from_bowl(&mut self, bowl: BowlId, pebble: PebbleId) -> bool {
        remove_id(&mut self.bowls[bowl.index()].pebbles, pebble)
    }

    /// Append a pebble on top of the loose set
    pub fn add_loose(&mut self, pebble: PebbleId) {
        self.loose.push(pebble);
    }

    /// Remove a pebble from the loose set; no-op if absent
    pub fn remove_loose(&mut self, pebble: PebbleId) -> bool {
        remove_id(&mut self.loose, pebble)
    }

    /// Detach a pebble from whichever container holds it
    pub fn release(&mut self, pebble: PebbleId) -> Option<Owner> {
        let owner = self.owner_of(pebble)?;
        match owner {
            Owner::Bowl(bowl) => {
                self.remove_from_bowl(bowl, pebble);
            }
            Owner::Loose => {
                self.remove_loose(pebble);
            }
            Owner::Dragged => self.dragged = None,
        }
        Some(owner)
    }

    /// Move a pebble into a bowl, releasing it from its current container
    pub fn move_to_bowl(&mut self, pebble: PebbleId, bowl: BowlId) {
        self.release(pebble);
        self.add_to_bowl(bowl, pebble);
    }

    /// Move a pebble into the loose set, releasing it from its current container
    pub fn move_to_loose(&mut self, pebble: PebbleId) {
        self.release(pebble);
        self.add_loose(pebble);
    }

    /// Move a pebble into the dragged slot. Any previously dragged pebble
    /// is returned to the loose set so ownership stays total.
    pub fn move_to_dragged(&mut self, pebble: PebbleId) {
        self.release(pebble);
        if let Some(previous) = self.dragged.take() {
            log::warn!("Dragged slot already held {:?}, making it loose", previous);
            self.add_loose(previous);
        }
        self.dragged = Some(pebble);
    }

    /// Clear the dragged slot without placing the pebble anywhere
    pub(crate) fn take_dragged(&mut self) -> Option<PebbleId> {
        self.dragged.take()
    }

    #[inline]
    pub fn pebble(&self, id: PebbleId) -> &Pebble {
        &self.pebbles[id.index()]
    }

    #[inline]
    pub fn pebble_mut(&mut self, id: PebbleId) -> &mut Pebble {
        &mut self.pebbles[id.index()]
    }

    /// Every pebble in creation order
    #[inline]
    pub fn pebbles(&self) -> &[Pebble] {
        &self.pebbles
    }

    #[inline]
    pub fn pebbles_mut(&mut self) -> &mut [Pebble] {
        &mut self.pebbles
    }

    #[inline]
    pub fn bowls(&self) -> &[Bowl] {
        &self.bowls
    }

    #[inline]
    pub fn bowl(&self, id: BowlId) -> &Bowl {
        &self.bowls[id.index()]
    }

    /// Loose pebbles, bottom to top
    #[inline]
    pub fn loose(&self) -> &[PebbleId] {
        &self.loose
    }

    #[inline]
    pub fn dragged(&self) -> Option<PebbleId> {
        self.dragged
    }

    /// Pebble count of every bowl, in bowl order
    pub fn counts(&self) -> Vec<usize> {
        self.bowls.iter().map(Bowl::count).collect()
    }

    /// Find the container holding a pebble
    pub fn owner_of(&self, pebble: PebbleId) -> Option<Owner> {
        if self.dragged == Some(pebble) {
            return Some(Owner::Dragged);
        }
        if let Some(bowl) = self.bowls.iter().find(|b| b.pebbles.contains(&pebble)) {
            return Some(Owner::Bowl(bowl.id));
        }
        if self.loose.contains(&pebble) {
            return Some(Owner::Loose);
        }
        None
    }

    /// Every pebble appears in exactly one of {a bowl, the loose set, the dragged slot}
    pub fn ownership_is_exclusive(&self) -> bool {
        let mut seen = vec![0u32; self.pebbles.len()];
        let held = self
            .bowls
            .iter()
            .flat_map(|b| b.pebbles.iter())
            .chain(self.loose.iter())
            .chain(self.dragged.iter());
        for id in held {
            match seen.get_mut(id.index()) {
                Some(n) => *n += 1,
                None => return false,
            }
        }
        seen.iter().all(|&n| n == 1)
    }

    /// Fill every bowl with a random number of pebbles from `per_bowl`.
    ///
    /// Radii are drawn from [PEBBLE_RADIUS_MIN, PEBBLE_RADIUS_MAX) and centers
    /// are scattered inside the bowl, keeping clear of the rim.
    pub fn populate(&mut self, per_bowl: Range<u32>) {
        let bowl_ids: Vec<BowlId> = self.bowls.iter().map(|b| b.id).collect();
        for bowl_id in bowl_ids {
            let count = if per_bowl.is_empty() {
                per_bowl.start
            } else {
                self.rng.random_range(per_bowl.clone())
            };
            let (center, bowl_radius) = {
                let bowl = self.bowl(bowl_id);
                (bowl.center, bowl.radius)
            };
            for _ in 0..count {
                let radius = self.rng.random_range(PEBBLE_RADIUS_MIN..PEBBLE_RADIUS_MAX);
                let angle = self.rng.random_range(0.0..TAU);
                let r = self.rng.random::<f32>() * (bowl_radius - radius * 2.0);
                let pos = polar_to_cartesian(center, r, angle);
                let id = self.create_pebble(pos, radius);
                self.move_to_bowl(id, bowl_id);
            }
        }
        log::info!("Populated bowls: {:?}", self.counts());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLE: BowlStyle = BowlStyle {
        fill: rgb8(255, 20, 161),
        stroke: rgb8(216, 0, 130),
    };

    #[test]
    fn test_create_pebble_rest_state() {
        let mut scene = Scene::new(1);
        let id = scene.create_pebble(Vec2::new(3.0, 4.0), 12.0);
        let p = scene.pebble(id);
        assert_eq!(p.pos, Vec2::new(3.0, 4.0));
        assert_eq!(p.target, p.pos);
        assert_eq!(p.radius, 12.0);
        assert_eq!(p.rest_radius, 12.0);
        assert!(!p.picked);
        assert!(!p.animating);
        assert_eq!(p.amplitude, 0.0);
        for channel in &p.color()[..3] {
            assert!(*channel >= 55.0 / 255.0 && *channel < 1.0);
        }
        assert_eq!(scene.owner_of(id), Some(Owner::Loose));
    }

    #[test]
    fn test_add_appends_on_top() {
        let mut scene = Scene::new(1);
        let bowl = scene.create_bowl(Vec2::ZERO, 100.0, STYLE);
        let a = scene.create_pebble(Vec2::ZERO, 10.0);
        let b = scene.create_pebble(Vec2::ZERO, 10.0);
        scene.move_to_bowl(a, bowl);
        scene.move_to_bowl(b, bowl);
        assert_eq!(scene.bowl(bowl).pebbles(), &[a, b]);
        assert!(scene.loose().is_empty());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut scene = Scene::new(1);
        let bowl = scene.create_bowl(Vec2::ZERO, 100.0, STYLE);
        let a = scene.create_pebble(Vec2::ZERO, 10.0);
        assert!(!scene.remove_from_bowl(bowl, a));
        assert!(!scene.remove_from_bowl(bowl, a));
        assert_eq!(scene.loose(), &[a]);
        assert!(scene.remove_loose(a));
        assert!(!scene.remove_loose(a));
    }

    #[test]
    fn test_ownership_exclusive_through_moves() {
        let mut scene = Scene::new(5);
        let b0 = scene.create_bowl(Vec2::new(150.0, 150.0), 100.0, STYLE);
        let b1 = scene.create_bowl(Vec2::new(450.0, 150.0), 100.0, STYLE);
        scene.populate(5..15);
        assert!(scene.ownership_is_exclusive());

        let top = *scene.bowl(b0).pebbles().last().unwrap();
        scene.move_to_dragged(top);
        assert_eq!(scene.owner_of(top), Some(Owner::Dragged));
        assert!(scene.ownership_is_exclusive());

        scene.move_to_bowl(top, b1);
        assert_eq!(scene.owner_of(top), Some(Owner::Bowl(b1)));
        assert_eq!(scene.dragged(), None);
        assert!(scene.ownership_is_exclusive());

        scene.move_to_loose(top);
        assert_eq!(scene.owner_of(top), Some(Owner::Loose));
        assert!(scene.ownership_is_exclusive());
    }

    #[test]
    fn test_double_add_breaks_exclusivity() {
        let mut scene = Scene::new(1);
        let bowl = scene.create_bowl(Vec2::ZERO, 100.0, STYLE);
        let a = scene.create_pebble(Vec2::ZERO, 10.0);
        // Raw add without release leaves the pebble in two containers
        scene.add_to_bowl(bowl, a);
        assert!(!scene.ownership_is_exclusive());
    }

    #[test]
    fn test_populate_is_deterministic_and_in_range() {
        let build = |seed| {
            let mut scene = Scene::new(seed);
            scene.create_bowl(Vec2::new(150.0, 150.0), 100.0, STYLE);
            scene.create_bowl(Vec2::new(450.0, 150.0), 100.0, STYLE);
            scene.populate(5..15);
            scene
        };
        let a = build(42);
        let b = build(42);
        assert_eq!(a.counts(), b.counts());
        for (pa, pb) in a.pebbles().iter().zip(b.pebbles()) {
            assert_eq!(pa.pos, pb.pos);
            assert_eq!(pa.color(), pb.color());
        }

        for count in a.counts() {
            assert!((5..15).contains(&count));
        }
        for bowl in a.bowls() {
            for &id in bowl.pebbles() {
                let p = a.pebble(id);
                assert!(p.radius >= 15.0 && p.radius < 20.0);
                assert!(bowl.center.distance(p.pos) <= bowl.radius - p.radius * 2.0 + 1e-3);
            }
        }
    }

    #[test]
    fn test_drawn_radius_includes_wobble() {
        let mut p = Pebble::new(PebbleId(0), Vec2::ZERO, 10.0, rgb8(100, 100, 100));
        p.phase = std::f32::consts::FRAC_PI_2;
        p.amplitude = 3.0;
        assert!((p.drawn_radius() - 13.0).abs() < 1e-5);
        // Logical radius untouched
        assert_eq!(p.radius, 10.0);
    }
}
