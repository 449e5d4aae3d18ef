//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (requestAnimationFrame on web, manual ticks elsewhere)
//! - Input coordinate mapping

#[cfg(target_arch = "wasm32")]
pub mod web;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;

use crate::consts::FRAME_DT;
use crate::scene::{Game, RenderList};

/// Convert a client (page) coordinate to surface-local pixels given the
/// surface's bounding rectangle origin
#[inline]
pub fn surface_point(client_x: f32, client_y: f32, rect_left: f32, rect_top: f32) -> Vec2 {
    Vec2::new(client_x - rect_left, client_y - rect_top)
}

/// Callback run at the next frame, given a timestamp in milliseconds
pub type FrameCallback = Box<dyn FnOnce(f64)>;

/// Something that can run a callback at the next display frame
pub trait FrameScheduler {
    fn request_frame(&self, callback: FrameCallback);
}

/// Scheduler driven by explicit `fire` calls (native runs and tests)
#[derive(Default)]
pub struct ManualScheduler {
    pending: RefCell<Option<FrameCallback>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Is a frame waiting to be fired
    pub fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Run the pending frame, if any. Returns false when nothing was scheduled.
    pub fn fire(&self, time_ms: f64) -> bool {
        let callback = self.pending.borrow_mut().take();
        match callback {
            Some(callback) => {
                callback(time_ms);
                true
            }
            None => false,
        }
    }

    /// Fire frames at a fixed interval until the loop stops or `max_frames` is reached.
    /// Returns the number of frames run.
    pub fn run_fixed(&self, start_ms: f64, interval_ms: f64, max_frames: u32) -> u32 {
        let mut ran = 0;
        while ran < max_frames && self.fire(start_ms + interval_ms * ran as f64) {
            ran += 1;
        }
        ran
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&self, callback: FrameCallback) {
        if self.pending.borrow_mut().replace(callback).is_some() {
            log::warn!("Frame requested twice before firing; dropping the older request");
        }
    }
}

/// Self-rescheduling frame loop: advance the game, present the frame,
/// request the next one. Stops once the game is disposed.
pub struct FrameLoop<S, P>
where
    S: FrameScheduler + 'static,
    P: FnMut(&RenderList) + 'static,
{
    scheduler: Rc<S>,
    game: Rc<RefCell<Game>>,
    present: RefCell<P>,
    last_time: Cell<Option<f64>>,
}

impl<S, P> FrameLoop<S, P>
where
    S: FrameScheduler + 'static,
    P: FnMut(&RenderList) + 'static,
{
    pub fn new(scheduler: Rc<S>, game: Rc<RefCell<Game>>, present: P) -> Rc<Self> {
        Rc::new(Self {
            scheduler,
            game,
            present: RefCell::new(present),
            last_time: Cell::new(None),
        })
    }

    /// Request the first frame
    pub fn start(self: &Rc<Self>) {
        let this = Rc::clone(self);
        self.scheduler
            .request_frame(Box::new(move |time| this.frame(time)));
    }

    fn frame(self: Rc<Self>, time_ms: f64) {
        if self.game.borrow().is_disposed() {
            log::info!("Frame loop stopped");
            return;
        }

        // Calculate delta time
        let dt = match self.last_time.replace(Some(time_ms)) {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => FRAME_DT,
        };

        let list = self.game.borrow_mut().advance(dt);
        {
            let mut present = self.present.borrow_mut();
            (*present)(&list);
        }

        self.start();
    }
}
