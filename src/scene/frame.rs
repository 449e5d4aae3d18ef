//! Per-frame stepping and draw list generation
//!
//! `Game` is the explicit session context: it owns the scene, the drag
//! controller and the settings, and exposes a pure `advance(dt)` that runs
//! fixed animation steps and returns what to draw. Scheduling the next
//! frame is the platform layer's job.

use glam::Vec2;

use super::animation;
use super::interaction::{self, CountSink, Cursor, DragEvent};
use super::state::{Color, Pebble, Scene};
use crate::consts::*;
use crate::settings::Settings;

/// Surface clear color
pub const BACKGROUND: Color = [0.97, 0.96, 0.94, 1.0];

/// Drop shadow under a held pebble
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shadow {
    pub offset: Vec2,
    pub blur: f32,
    pub color: Color,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            offset: Vec2::splat(SHADOW_OFFSET),
            blur: SHADOW_BLUR,
            color: [0.0, 0.0, 0.0, SHADOW_ALPHA],
        }
    }
}

/// A single drawing operation, in surface-local pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    /// Filled disk
    Disk {
        center: Vec2,
        radius: f32,
        color: Color,
        shadow: Option<Shadow>,
    },
    /// Stroked circle outline centered on `radius`
    Ring {
        center: Vec2,
        radius: f32,
        width: f32,
        color: Color,
    },
}

/// Everything to draw for one frame, back to front
#[derive(Debug, Clone, Default)]
pub struct RenderList {
    pub size: Vec2,
    pub commands: Vec<DrawCommand>,
}

impl RenderList {
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn pebble_command(pebble: &Pebble, shadows: bool) -> DrawCommand {
    DrawCommand::Disk {
        center: pebble.pos,
        radius: pebble.drawn_radius(),
        color: pebble.color(),
        shadow: (shadows && pebble.picked).then(Shadow::default),
    }
}

/// Clear, then bowls with their pebbles, then loose pebbles, then the dragged pebble
pub fn build_render_list(scene: &Scene, size: Vec2, shadows: bool) -> RenderList {
    let mut commands = Vec::with_capacity(scene.pebbles().len() + scene.bowls().len() * 2 + 1);
    commands.push(DrawCommand::Clear { color: BACKGROUND });

    for bowl in scene.bowls() {
        commands.push(DrawCommand::Disk {
            center: bowl.center,
            radius: bowl.radius,
            color: bowl.style.fill,
            shadow: None,
        });
        commands.push(DrawCommand::Ring {
            center: bowl.center,
            radius: bowl.radius,
            width: BOWL_STROKE_WIDTH,
            color: bowl.style.stroke,
        });
        for &id in bowl.pebbles() {
            commands.push(pebble_command(scene.pebble(id), shadows));
        }
    }

    for &id in scene.loose() {
        commands.push(pebble_command(scene.pebble(id), shadows));
    }

    if let Some(id) = scene.dragged() {
        commands.push(pebble_command(scene.pebble(id), shadows));
    }

    RenderList { size, commands }
}

/// One interactive session: scene, drag controller and frame clock
#[derive(Debug, Clone)]
pub struct Game {
    pub scene: Scene,
    pub controller: interaction::Controller,
    pub settings: Settings,
    accumulator: f32,
    frames: u64,
    disposed: bool,
}

impl Game {
    /// Build the bowls from settings and fill them
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut scene = Scene::new(seed);
        for spec in &settings.bowls {
            scene.create_bowl(spec.center, spec.radius, spec.style());
        }
        let (min, max) = settings.pebbles_per_bowl;
        scene.populate(min..max);

        log::info!(
            "Game created with seed {} ({} bowls, {} pebbles, {} animation)",
            seed,
            scene.bowls().len(),
            scene.pebbles().len(),
            settings.animation.as_str()
        );

        Self {
            scene,
            controller: interaction::Controller::new(),
            settings,
            accumulator: 0.0,
            frames: 0,
            disposed: false,
        }
    }

    /// Surface size in pixels
    pub fn size(&self) -> Vec2 {
        Vec2::from(self.settings.canvas_size)
    }

    /// Send every bowl's count to the sink (used once at startup)
    pub fn publish_counts(&self, sink: &mut dyn CountSink) {
        interaction::publish_counts(&self.scene, sink);
    }

    /// Apply one drag event
    pub fn handle(&mut self, event: DragEvent, sink: &mut dyn CountSink) {
        if self.disposed {
            return;
        }
        self.controller.handle(
            &mut self.scene,
            event,
            self.settings.animation,
            &self.settings.tuning,
            sink,
        );
    }

    /// Cursor for the last pointer position
    pub fn cursor(&self) -> Cursor {
        self.controller.cursor()
    }

    /// Run one animation step over every animating pebble.
    /// Returns how many are still animating.
    pub fn animate(&mut self) -> usize {
        let mode = self.settings.animation;
        let tuning = self.settings.tuning;
        self.scene
            .pebbles_mut()
            .iter_mut()
            .filter(|p| p.animating)
            .map(|p| animation::step(p, mode, &tuning))
            .filter(|&still| still)
            .count()
    }

    /// Advance wall-clock time by `dt` seconds and produce the frame's draw list
    pub fn advance(&mut self, dt: f32) -> RenderList {
        let dt = dt.clamp(0.0, MAX_FRAME_DELTA);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= FRAME_DT && substeps < MAX_SUBSTEPS {
            self.animate();
            self.accumulator -= FRAME_DT;
            substeps += 1;
        }
        self.frames += 1;

        self.render_list()
    }

    /// Draw list for the current state without stepping
    pub fn render_list(&self) -> RenderList {
        build_render_list(&self.scene, self.size(), self.settings.drop_shadows)
    }

    /// Frames produced so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Stop accepting input; frame loops stop at their next tick
    pub fn dispose(&mut self) {
        if !self.disposed {
            log::info!("Game disposed after {} frames", self.frames);
        }
        self.disposed = true;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::animation::AnimationMode;
    use crate::scene::state::{BowlId, Owner};

    fn no_sink() -> impl FnMut(BowlId, usize) {
        |_, _| {}
    }

    fn disks(list: &RenderList) -> Vec<(Vec2, Option<Shadow>)> {
        list.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Disk { center, shadow, .. } => Some((*center, *shadow)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_new_game_populates_default_bowls() {
        let game = Game::new(Settings::default(), 11);
        assert_eq!(game.scene.bowls().len(), 2);
        for count in game.scene.counts() {
            assert!((5..15).contains(&count));
        }
        assert!(game.scene.loose().is_empty());
        assert!(game.scene.ownership_is_exclusive());
    }

    #[test]
    fn test_render_order() {
        let mut game = Game::new(Settings::default(), 11);
        let list = game.render_list();
        let pebbles = game.scene.pebbles().len();
        // clear + (disk + ring) per bowl + one disk per pebble
        assert_eq!(list.len(), 1 + 2 * 2 + pebbles);
        assert!(matches!(list.commands[0], DrawCommand::Clear { .. }));
        assert!(matches!(list.commands[1], DrawCommand::Disk { radius, .. } if radius == 100.0));
        assert!(matches!(list.commands[2], DrawCommand::Ring { width, .. } if width == BOWL_STROKE_WIDTH));

        let bowl = &game.scene.bowls()[0];
        let top = *bowl.pebbles().last().unwrap();
        let at = game.scene.pebble(top).pos;
        game.handle(DragEvent::Start(at), &mut no_sink());
        assert_eq!(game.scene.dragged(), Some(top));

        let list = game.render_list();
        let last = disks(&list).pop().unwrap();
        assert_eq!(last.0, at);
        assert!(last.1.is_some(), "held pebble casts a shadow");
        assert_eq!(disks(&list).iter().filter(|d| d.1.is_some()).count(), 1);
    }

    #[test]
    fn test_shadow_disabled_by_settings() {
        let settings = Settings {
            drop_shadows: false,
            ..Default::default()
        };
        let mut game = Game::new(settings, 3);
        let top = *game.scene.bowls()[1].pebbles().last().unwrap();
        let at = game.scene.pebble(top).pos;
        game.handle(DragEvent::Start(at), &mut no_sink());
        assert!(disks(&game.render_list()).iter().all(|d| d.1.is_none()));
    }

    #[test]
    fn test_advance_fixed_steps() {
        let mut game = Game::new(Settings::default(), 5);
        let top = *game.scene.bowls()[0].pebbles().last().unwrap();
        let start = game.scene.pebble(top).pos;
        game.handle(DragEvent::Start(start), &mut no_sink());
        game.handle(DragEvent::Move(start + Vec2::new(100.0, 0.0)), &mut no_sink());

        // Half a step: no movement yet
        game.advance(FRAME_DT * 0.5);
        assert_eq!(game.scene.pebble(top).pos, start);

        // Completes the first step
        game.advance(FRAME_DT * 0.5);
        let moved = game.scene.pebble(top).pos.x - start.x;
        assert!((moved - 20.0).abs() < 1e-3);
        assert_eq!(game.frames(), 2);
    }

    #[test]
    fn test_drag_between_bowls_settles() {
        let mut game = Game::new(Settings::default(), 21);
        let before = game.scene.counts();
        let top = *game.scene.bowls()[0].pebbles().last().unwrap();
        let start = game.scene.pebble(top).pos;
        let dest = game.scene.bowls()[1].center;

        let mut counts = Vec::new();
        let mut sink = |bowl: BowlId, count: usize| counts.push((bowl, count));
        game.handle(DragEvent::Start(start), &mut sink);
        game.handle(DragEvent::Move(dest), &mut sink);
        game.advance(FRAME_DT);
        // Released long before the held pebble catches up with the pointer
        game.handle(DragEvent::End, &mut sink);

        assert_eq!(game.scene.owner_of(top), Some(Owner::Bowl(BowlId(1))));
        assert_eq!(game.scene.counts(), vec![before[0] - 1, before[1] + 1]);
        assert_eq!(counts.last(), Some(&(BowlId(1), before[1] + 1)));

        for _ in 0..200 {
            game.advance(FRAME_DT);
        }
        let p = game.scene.pebble(top);
        assert!(!p.animating);
        assert_eq!(p.pos, dest);
        assert_eq!(p.radius, p.rest_radius);
        assert_eq!(game.animate(), 0);
    }

    #[test]
    fn test_instant_mode_game() {
        let settings = Settings {
            animation: AnimationMode::Instant,
            ..Default::default()
        };
        let mut game = Game::new(settings, 8);
        let top = *game.scene.bowls()[0].pebbles().last().unwrap();
        let start = game.scene.pebble(top).pos;
        game.handle(DragEvent::Start(start), &mut no_sink());
        game.handle(DragEvent::Move(Vec2::new(300.0, 280.0)), &mut no_sink());
        assert_eq!(game.scene.pebble(top).pos, Vec2::new(300.0, 280.0));
        game.handle(DragEvent::End, &mut no_sink());
        assert_eq!(game.scene.owner_of(top), Some(Owner::Loose));
        assert_eq!(game.animate(), 0);
    }

    #[test]
    fn test_dispose_ignores_input() {
        let mut game = Game::new(Settings::default(), 2);
        game.dispose();
        assert!(game.is_disposed());
        let top = *game.scene.bowls()[0].pebbles().last().unwrap();
        let at = game.scene.pebble(top).pos;
        game.handle(DragEvent::Start(at), &mut no_sink());
        assert_eq!(game.scene.dragged(), None);
    }
}
