//! Pebble Bowls entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent, NodeList, TouchEvent};

    use pebble_bowls::Settings;
    use pebble_bowls::platform::web::AnimationFrameScheduler;
    use pebble_bowls::platform::{FrameLoop, surface_point};
    use pebble_bowls::renderer::RenderState;
    use pebble_bowls::scene::{BowlId, CountSink, DragEvent, Game, RenderList};

    /// Writes bowl counts into the page's `.pebble-count` elements, one per bowl
    struct DomCountSink {
        counters: NodeList,
    }

    impl CountSink for DomCountSink {
        fn pebble_count_changed(&mut self, bowl: BowlId, count: usize) {
            if let Some(node) = self.counters.get(bowl.0) {
                node.set_text_content(Some(&count.to_string()));
            }
        }
    }

    /// Shared state for input handlers
    struct Session {
        game: Rc<RefCell<Game>>,
        sink: RefCell<DomCountSink>,
        canvas: HtmlCanvasElement,
    }

    impl Session {
        /// Convert a client position to canvas-local coordinates
        fn local(&self, client_x: i32, client_y: i32) -> glam::Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            surface_point(
                client_x as f32,
                client_y as f32,
                rect.left() as f32,
                rect.top() as f32,
            )
        }

        fn dispatch(&self, event: DragEvent) {
            let mut game = self.game.borrow_mut();
            game.handle(event, &mut *self.sink.borrow_mut());

            if matches!(event, DragEvent::Move(_)) {
                let _ = self
                    .canvas
                    .style()
                    .set_property("cursor", game.cursor().as_css());
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("Pebble Bowls starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("game")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "element #game is not a canvas")?;

        let settings = Settings::load();
        let [logical_w, logical_h] = settings.canvas_size;

        // Set canvas size: CSS pixels match scene coordinates, backing store scales with DPR
        let dpr = window.device_pixel_ratio();
        let width = (logical_w as f64 * dpr) as u32;
        let height = (logical_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let style = canvas.style();
        style.set_property("width", &format!("{}px", logical_w))?;
        style.set_property("height", &format!("{}px", logical_h))?;

        // Initialize game
        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(settings, seed)));

        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {}", e)))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {}", e)))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let mut render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {}", e)))?;

        let session = Rc::new(Session {
            game: game.clone(),
            sink: RefCell::new(DomCountSink {
                counters: document.query_selector_all(".pebble-count")?,
            }),
            canvas: canvas.clone(),
        });

        // Initial counts before the first frame
        game.borrow().publish_counts(&mut *session.sink.borrow_mut());

        setup_input_handlers(&canvas, session)?;

        // Start frame loop
        let scheduler = Rc::new(AnimationFrameScheduler::new()?);
        let frame_loop = FrameLoop::new(scheduler, game, move |list: &RenderList| {
            match render_state.render(list) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        });
        frame_loop.start();

        log::info!("Pebble Bowls running!");
        Ok(())
    }

    fn setup_input_handlers(
        canvas: &HtmlCanvasElement,
        session: Rc<Session>,
    ) -> Result<(), JsValue> {
        // Mouse down - pick
        {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = session.local(event.client_x(), event.client_y());
                session.dispatch(DragEvent::Start(point));
            });
            canvas.add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch start - pick with the first touch point
        {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    let point = session.local(touch.client_x(), touch.client_y());
                    session.dispatch(DragEvent::Start(point));
                }
            });
            canvas.add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse move - drag and hover cursor
        {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let point = session.local(event.client_x(), event.client_y());
                session.dispatch(DragEvent::Move(point));
            });
            canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Touch move
        {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    let point = session.local(touch.client_x(), touch.client_y());
                    session.dispatch(DragEvent::Move(point));
                }
            });
            canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Mouse up / touch end - drop
        for name in ["mouseup", "touchend"] {
            let session = session.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                session.dispatch(DragEvent::End);
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pebble Bowls (native) starting...");
    log::info!("Native mode runs a headless drag - run with `trunk serve` for the web version");

    headless_drag();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive one scripted drag from the first bowl to the second on a manual scheduler
#[cfg(not(target_arch = "wasm32"))]
fn headless_drag() {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::{SystemTime, UNIX_EPOCH};

    use pebble_bowls::Settings;
    use pebble_bowls::consts::FRAME_DT;
    use pebble_bowls::platform::{FrameLoop, ManualScheduler};
    use pebble_bowls::scene::{BowlId, DragEvent, Game, RenderList};

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    let settings = Settings::load();
    match settings.to_json() {
        Ok(json) => log::debug!("Settings: {}", json),
        Err(e) => log::warn!("Settings not serializable: {}", e),
    }
    let game = Rc::new(RefCell::new(Game::new(settings, seed)));
    let mut sink = |bowl: BowlId, count: usize| log::info!("Bowl {} holds {} pebbles", bowl.0, count);
    game.borrow().publish_counts(&mut sink);

    let scheduler = Rc::new(ManualScheduler::new());
    let commands = Rc::new(Cell::new(0usize));
    let drawn = commands.clone();
    let frame_loop = FrameLoop::new(scheduler.clone(), game.clone(), move |list: &RenderList| {
        drawn.set(list.len());
    });
    frame_loop.start();

    let frame_ms = FRAME_DT as f64 * 1000.0;
    let mut clock = 0.0;
    let mut run_frames = |frames: u32| {
        let ran = scheduler.run_fixed(clock, frame_ms, frames);
        clock += frame_ms * ran as f64;
    };

    let (from, to) = {
        let g = game.borrow();
        let bowls = g.scene.bowls();
        let Some(top) = bowls.first().and_then(|b| b.pebbles().last()) else {
            log::warn!("First bowl is empty, nothing to drag");
            return;
        };
        let Some(dest) = bowls.get(1).map(|b| b.center) else {
            log::warn!("Need two bowls for the headless drag");
            return;
        };
        (g.scene.pebble(*top).pos, dest)
    };

    game.borrow_mut().handle(DragEvent::Start(from), &mut sink);
    game.borrow_mut().handle(DragEvent::Move(to), &mut sink);
    run_frames(60);
    game.borrow_mut().handle(DragEvent::End, &mut sink);
    run_frames(120);

    log::info!(
        "Final counts {:?}, {} draw commands per frame",
        game.borrow().scene.counts(),
        commands.get()
    );

    game.borrow_mut().dispose();
    run_frames(1);
}
