//! Tsundoku Pile entry point
//!
//! On wasm, mounts the pile into the `#book-pile` container and runs the
//! three cooperative tasks: the fixed-cadence physics step (with boundary
//! sweep), the frame-sync loop, and the debounced reconciliation pass. The
//! surrounding application supplies the target count through the demo
//! controls; the pile itself owns no business data.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, HtmlInputElement};

    use tsundoku_pile::consts::*;
    use tsundoku_pile::render::dom::DomSync;
    use tsundoku_pile::render::live_sprites;
    use tsundoku_pile::sim::{
        coerce_target, debounce_delay_ms, reconcile, sweep, PhysicsWorld, PileState,
    };
    use tsundoku_pile::PileSettings;

    /// Pile instance plus the scheduler handles that drive it
    struct PileApp {
        state: PileState,
        world: PhysicsWorld,
        dom: DomSync,
        stage_height: f32,
        /// Pending debounced reconciliation timer
        debounce: Option<i32>,
        /// Fixed-cadence stepping interval
        step_interval: Option<i32>,
        /// Next frame-sync callback
        raf_handle: Option<i32>,
        disposed: bool,
    }

    impl PileApp {
        /// Cancel every scheduled callback and tear the world down.
        /// Safe to call more than once.
        fn dispose(&mut self) {
            if self.disposed {
                return;
            }
            self.disposed = true;

            let window = web_sys::window().expect("no window");
            if let Some(handle) = self.step_interval.take() {
                window.clear_interval_with_handle(handle);
            }
            if let Some(handle) = self.debounce.take() {
                window.clear_timeout_with_handle(handle);
            }
            if let Some(handle) = self.raf_handle.take() {
                let _ = window.cancel_animation_frame(handle);
            }
            self.dom.detach();
            self.world.dispose();
            log::info!("pile disposed");
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let Some(container) = document
            .get_element_by_id("book-pile")
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            log::warn!("no #book-pile container, pile not mounted");
            return;
        };

        // Unmeasurable layouts fall back to the fixed stage size.
        let width = match container.client_width() {
            w if w > 0 => w as f32,
            _ => STAGE_W,
        };
        let stage_height = match container.client_height() {
            h if h > 0 => h as f32,
            _ => DEFAULT_STAGE_H,
        };

        let settings = PileSettings::load();
        let seed = if settings.seed != 0 {
            settings.seed
        } else {
            js_sys::Date::now() as u64
        };

        let state = PileState::new(seed, width, settings.inset);
        let world = PhysicsWorld::new(width, stage_height);
        let dom = match DomSync::new(document.clone(), &container) {
            Ok(dom) => dom,
            Err(e) => {
                log::warn!("failed to build render layers: {e:?}");
                return;
            }
        };

        if settings.show_guides {
            setup_guides(&document, &container, &state);
        }

        log::info!("pile mounted ({width}x{stage_height}, seed {seed})");

        let app = Rc::new(RefCell::new(PileApp {
            state,
            world,
            dom,
            stage_height,
            debounce: None,
            step_interval: None,
            raf_handle: None,
            disposed: false,
        }));

        start_step_loop(app.clone());
        request_animation_frame(app.clone());
        setup_controls(&document, app.clone());

        // Initial target from the demo input, if present.
        let initial = document
            .get_element_by_id("unread-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .and_then(|input| input.value().parse::<f64>().ok())
            .unwrap_or(0.0);
        set_target(&app, initial);
    }

    /// Fixed-cadence physics stepping. The boundary sweep runs inside the
    /// same callback, so it always observes post-step positions before the
    /// next step begins.
    fn start_step_loop(app: Rc<RefCell<PileApp>>) {
        let window = web_sys::window().expect("no window");
        let handle = {
            let app = app.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                let mut a = app.borrow_mut();
                if a.disposed {
                    return;
                }
                a.world.step();
                sweep(&mut a.state, &mut a.world);
            });
            let handle = window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    STEP_INTERVAL_MS,
                )
                .expect("failed to schedule step loop");
            closure.forget();
            handle
        };
        app.borrow_mut().step_interval = Some(handle);
    }

    fn request_animation_frame(app: Rc<RefCell<PileApp>>) {
        let window = web_sys::window().expect("no window");
        let app_for_handle = app.clone();
        let closure = Closure::once(move |_time: f64| {
            frame(app);
        });
        let handle = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .expect("failed to schedule frame sync");
        closure.forget();
        app_for_handle.borrow_mut().raf_handle = Some(handle);
    }

    /// Frame sync: copy live poses into the DOM, repaint towers on change.
    fn frame(app: Rc<RefCell<PileApp>>) {
        {
            let mut a = app.borrow_mut();
            if a.disposed {
                return;
            }
            let sprites = live_sprites(&a.state, &a.world);
            a.dom.sync_live(&sprites);
            let stage_center = a.state.stage_center;
            let floor_y = a.stage_height;
            let PileApp { state, dom, .. } = &mut *a;
            dom.sync_towers(&state.towers, stage_center, floor_y);
            dom.update_hud(state.target);
        }
        request_animation_frame(app);
    }

    /// Store the coerced target and (re)arm the debounce timer. Rapid
    /// successive changes collapse into one reconciliation pass.
    fn set_target(app: &Rc<RefCell<PileApp>>, raw: f64) {
        let delay = {
            let mut a = app.borrow_mut();
            if a.disposed {
                return;
            }
            a.state.target = coerce_target(raw);
            if let Some(handle) = a.debounce.take() {
                web_sys::window()
                    .expect("no window")
                    .clear_timeout_with_handle(handle);
            }
            debounce_delay_ms(&a.state)
        };
        schedule_pass(app, delay);
    }

    /// Arm one reconciliation pass. A pass that hits its per-pass ceiling
    /// schedules a follow-up; saturation and completion stop the chain.
    fn schedule_pass(app: &Rc<RefCell<PileApp>>, delay_ms: i32) {
        let window = web_sys::window().expect("no window");
        let handle = {
            let app = app.clone();
            let closure = Closure::once(move || {
                let more = {
                    let mut a = app.borrow_mut();
                    if a.disposed {
                        return;
                    }
                    a.debounce = None;
                    let PileApp { state, world, .. } = &mut *a;
                    reconcile(state, world)
                };
                if more {
                    schedule_pass(&app, DEBOUNCE_WARM_MS);
                }
            });
            let handle = window
                .set_timeout_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    delay_ms,
                )
                .expect("failed to schedule reconciliation");
            closure.forget();
            handle
        };
        app.borrow_mut().debounce = Some(handle);
    }

    /// Demo controls: a numeric input plus +/- buttons feed the target
    /// count the way the surrounding application's collection would.
    fn setup_controls(document: &Document, app: Rc<RefCell<PileApp>>) {
        if let Some(input) = document
            .get_element_by_id("unread-input")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            let app = app.clone();
            let input_clone = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let raw = input_clone.value().parse::<f64>().unwrap_or(0.0);
                set_target(&app, raw);
            });
            let _ =
                input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        for (id, delta) in [("unread-inc", 1.0), ("unread-dec", -1.0)] {
            if let Some(btn) = document.get_element_by_id(id) {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                    let current = app.borrow().state.target as f64;
                    set_target(&app, current + delta);
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("pile-teardown") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().dispose();
            });
            let _ =
                btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Boundary lines and spawn-range highlight, normally hidden.
    fn setup_guides(document: &Document, container: &HtmlElement, state: &PileState) {
        for x in [state.boundary.left, state.boundary.right] {
            if let Ok(line) = document.create_element("div") {
                if let Ok(line) = line.dyn_into::<HtmlElement>() {
                    let style = line.style();
                    let _ = style.set_property("position", "absolute");
                    let _ = style.set_property("left", &format!("{x}px"));
                    let _ = style.set_property("top", "0");
                    let _ = style.set_property("bottom", "0");
                    let _ = style.set_property("width", "2px");
                    let _ = style.set_property("background", "rgba(255,0,0,0.25)");
                    let _ = container.append_child(&line);
                }
            }
        }

        // Spawn range (stage center ± spread).
        if let Ok(range) = document.create_element("div") {
            if let Ok(range) = range.dyn_into::<HtmlElement>() {
                let style = range.style();
                let _ = style.set_property("position", "absolute");
                let _ = style.set_property(
                    "left",
                    &format!("{}px", state.stage_center - SPAWN_SPREAD),
                );
                let _ = style.set_property("top", "6px");
                let _ = style.set_property("width", &format!("{}px", SPAWN_SPREAD * 2.0));
                let _ = style.set_property("height", "24px");
                let _ = style.set_property("background", "rgba(34,197,94,0.06)");
                let _ = style.set_property("border", "1px dashed rgba(34,197,94,0.16)");
                let _ = style.set_property("border-radius", "4px");
                let _ = container.append_child(&range);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use tsundoku_pile::consts::*;
    use tsundoku_pile::sim::{reconcile, sweep, PhysicsWorld, PileState};

    env_logger::init();
    log::info!("Tsundoku Pile (native headless) starting...");

    // Headless smoke run: populate, settle, shrink.
    let mut state = PileState::new(42, STAGE_W, DEFAULT_INSET);
    let mut world = PhysicsWorld::new(STAGE_W, DEFAULT_STAGE_H);

    state.target = 40;
    while reconcile(&mut state, &mut world) {}
    for _ in 0..300 {
        world.step();
        sweep(&mut state, &mut world);
    }
    log::info!(
        "target 40: {} live, {} towered",
        state.live_count(),
        state.towers.total()
    );

    state.target = 10;
    while reconcile(&mut state, &mut world) {}
    log::info!(
        "target 10: {} live, {} towered",
        state.live_count(),
        state.towers.total()
    );

    assert_eq!(state.total(), 10);
    println!("✓ Pile reconciliation smoke run passed!");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
