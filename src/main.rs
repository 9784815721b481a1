//! Lucky Wheel entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent};

    use glam::Vec2;
    use lucky_wheel::assets::{AssetManifest, AssetStore, MANIFEST_JSON};
    use lucky_wheel::consts::*;
    use lucky_wheel::renderer::{FrameParams, WheelRenderState};
    use lucky_wheel::scene::{Layer, Layout, NodeKind, SceneGraph};
    use lucky_wheel::sim::{GamePhase, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        scene: SceneGraph,
        render_state: Option<WheelRenderState>,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Device pixel ratio: scene runs in CSS pixels, the surface in
        /// physical pixels
        dpr: f32,
    }

    impl Game {
        fn new(state: GameState, scene: SceneGraph, dpr: f32) -> Self {
            Self {
                state,
                scene,
                render_state: None,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                dpr,
            }
        }

        /// Run simulation ticks at the fixed timestep
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.start = false;
                self.input.spin = false;
            }

            self.scene.sync(&self.state);
        }

        /// Assemble renderer params from the synced scene
        fn frame_params(&self) -> FrameParams {
            let layout = self.scene.layout();
            let play = self.scene.layer(Layer::Play);
            let wheel_pos = layout.wheel_pos() * self.dpr;
            let arrow_pos = layout.arrow_pos() * self.dpr;

            let highlight = match self.state.phase {
                GamePhase::Revealing => {
                    self.state.spin.as_ref().map(|s| s.prize_index as u32)
                }
                GamePhase::Ended => self.state.winner.map(|w| w as u32),
                _ => None,
            };

            FrameParams {
                rotation: self.state.rotation,
                wheel_pos: [wheel_pos.x, wheel_pos.y],
                wheel_radius: self.scene.wheel_radius() * self.dpr,
                segment_count: self.state.prizes.len() as u32,
                arrow_pos: [arrow_pos.x, arrow_pos.y],
                arrow_scale: ARROW_SCALE * self.dpr,
                wheel_visible: play.attached && play.visible,
                highlight,
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let params = self.frame_params();
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&params, time) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Mirror layer visibility into the DOM overlays
        fn update_dom(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            set_layer_class(&document, "start-screen", self.scene.layer(Layer::Start));
            set_layer_class(&document, "overlay", self.scene.layer(Layer::JackpotOverlay));
            set_layer_class(&document, "end-screen", self.scene.layer(Layer::End));

            if let Some(win_text) = self.scene.win_text() {
                if let Some(el) = document.get_element_by_id("win-text") {
                    el.set_text_content(Some(win_text));
                }
            }
        }
    }

    fn set_layer_class(document: &Document, id: &str, layer: &lucky_wheel::scene::LayerState) {
        if let Some(el) = document.get_element_by_id(id) {
            let class = if layer.attached && layer.visible {
                "layer"
            } else {
                "layer hidden"
            };
            let _ = el.set_attribute("class", class);
        }
    }

    /// Create the prize-label elements inside the overlay container, one per
    /// text node, positioned on the fixed slots.
    fn build_prize_labels(document: &Document, scene: &SceneGraph) {
        let Some(overlay) = document.get_element_by_id("overlay") else {
            return;
        };
        for node in &scene.layer(Layer::JackpotOverlay).nodes {
            let NodeKind::Text { text, font_size, tint } = &node.kind else {
                continue;
            };
            let Ok(el) = document.create_element("div") else {
                continue;
            };
            let _ = el.set_attribute("class", "prize-label");
            el.set_text_content(Some(text));
            if let Ok(html) = el.clone().dyn_into::<HtmlElement>() {
                let style = html.style();
                let _ = style.set_property("left", &format!("{}px", node.pos.x));
                let _ = style.set_property("top", &format!("{}px", node.pos.y));
                let _ = style.set_property("font-size", &format!("{font_size}px"));
                let _ = style.set_property("color", &format!("#{tint:06x}"));
            }
            let _ = overlay.append_child(&el);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lucky Wheel starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Surface in physical pixels, layout in CSS pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        // Resolve the asset manifest; readiness flips exactly once and the
        // scene cannot exist before it
        let manifest = AssetManifest::from_json(MANIFEST_JSON).expect("bad asset manifest");
        let mut assets = AssetStore::resolve(&manifest).expect("asset load failed");
        assets.finish();

        let seed = js_sys::Date::now() as u64;
        let mut state = GameState::new(seed);
        log::info!("Game initialized with seed: {}", seed);

        let layout = Layout::new(client_w as f32, client_h as f32);
        let mut scene = SceneGraph::build(layout, &assets).expect("scene construction failed");
        scene.place_prize_labels(state.prizes.labels());
        state.mark_initialized();
        scene.sync(&state);

        build_prize_labels(&document, &scene);

        let game = Rc::new(RefCell::new(Game::new(state, scene, dpr as f32)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = WheelRenderState::new(surface, &adapter, width, height).await;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());

        request_animation_frame(game);

        log::info!("Lucky Wheel running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();

        // "Start Game" label
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.start = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let pos = Vec2::new(event.offset_x() as f32, event.offset_y() as f32);
                if g.state.phase == GamePhase::Playing && g.scene.wheel_hit(pos) {
                    g.input.spin = true;
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Wheel tap
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let rect = canvas_clone.get_bounding_client_rect();
                    let pos = Vec2::new(
                        touch.client_x() as f32 - rect.left() as f32,
                        touch.client_y() as f32 - rect.top() as f32,
                    );
                    if g.state.phase == GamePhase::Playing && g.scene.wheel_hit(pos) {
                        g.input.spin = true;
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render(time);
            g.update_dom();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Lucky Wheel (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Run a seeded demo session through the whole state machine
    demo_session();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn demo_session() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use lucky_wheel::assets::{AssetManifest, AssetStore, MANIFEST_JSON};
    use lucky_wheel::consts::ANNOUNCE_DELAY_TICKS;
    use lucky_wheel::scene::{Layout, SceneGraph};
    use lucky_wheel::sim::{GamePhase, GameState, TickInput, run_ticks};

    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let manifest = AssetManifest::from_json(MANIFEST_JSON).expect("bad asset manifest");
    let mut assets = AssetStore::resolve(&manifest).expect("asset load failed");
    assets.finish();

    let mut state = GameState::new(seed);
    let mut scene =
        SceneGraph::build(Layout::new(800.0, 600.0), &assets).expect("scene construction failed");
    scene.place_prize_labels(state.prizes.labels());
    state.mark_initialized();

    println!("Seed: {seed}");
    println!("Prize order: {:?}", state.prizes.labels());

    run_ticks(
        &mut state,
        &TickInput {
            start: true,
            ..Default::default()
        },
        1,
    );
    run_ticks(
        &mut state,
        &TickInput {
            spin: true,
            ..Default::default()
        },
        ANNOUNCE_DELAY_TICKS + 1,
    );
    scene.sync(&state);

    assert_eq!(state.phase, GamePhase::Ended);
    println!("{}", scene.win_text().unwrap_or("no result"));
}
