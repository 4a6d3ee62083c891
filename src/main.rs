//! Chroma Shift entry point
//!
//! Handles platform-specific initialization and wires the round logic to
//! the DOM: screens, the tile grid, the HUD, and the timer loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element};

    use chroma_shift::audio::{AudioManager, SoundEffect};
    use chroma_shift::game::{GameSession, RoundEvent, RoundSummary};
    use chroma_shift::platform::LocalStorage;
    use chroma_shift::platform::time::PerformanceClock;
    use chroma_shift::records::Records;
    use chroma_shift::{format_best_time, format_time};

    // JS binding for the vibration API (no web-sys feature covers the
    // pattern overload cleanly)
    #[wasm_bindgen(inline_js = "
        export function vibrate_ms(duration) {
            if (navigator.vibrate) { navigator.vibrate(duration); }
        }
        export function vibrate_pattern(pattern) {
            if (navigator.vibrate) { navigator.vibrate(pattern); }
        }
    ")]
    extern "C" {
        fn vibrate_ms(duration: u32);
        fn vibrate_pattern(pattern: &JsValue);
    }

    fn haptic_light() {
        vibrate_ms(10);
    }

    fn haptic_medium() {
        vibrate_ms(25);
    }

    fn haptic_heavy() {
        let pattern = js_sys::Array::new();
        for ms in [30, 20, 30] {
            pattern.push(&JsValue::from_f64(f64::from(ms)));
        }
        vibrate_pattern(&pattern);
    }

    /// App instance holding all state
    struct App {
        session: GameSession,
        audio: AudioManager,
        /// Timer loop guard; a queued frame checks this before acting
        timer_running: bool,
    }

    impl App {
        fn new() -> Self {
            let records = Records::new(Box::new(LocalStorage));
            let session = GameSession::new(records, Rc::new(PerformanceClock));
            let mut audio = AudioManager::new();
            audio.set_enabled(session.sound_enabled());
            Self {
                session,
                audio,
                timer_running: false,
            }
        }
    }

    fn document() -> Document {
        web_sys::window()
            .expect("no window")
            .document()
            .expect("no document")
    }

    fn by_id(id: &str) -> Option<Element> {
        document().get_element_by_id(id)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(id: &str, class: &str) {
        if let Some(el) = by_id(id) {
            let _ = el.set_attribute("class", class);
        }
    }

    /// Schedule a one-shot callback
    fn set_timeout(callback: impl FnOnce() + 'static, millis: i32) {
        let closure = Closure::once(callback);
        let _ = web_sys::window()
            .expect("no window")
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis,
            );
        closure.forget();
    }

    /// Briefly add a class to an element (transient flash effects)
    fn flash_class(el: &Element, class: &'static str, millis: i32) {
        let _ = el.class_list().add_1(class);
        let el = el.clone();
        set_timeout(move || {
            let _ = el.class_list().remove_1(class);
        }, millis);
    }

    // === Screen management ===

    const SCREENS: [&str; 3] = ["startScreen", "gameScreen", "gameOverScreen"];

    fn show_screen(id: &str) {
        for screen in SCREENS {
            if let Some(el) = by_id(screen) {
                let _ = el.class_list().remove_1("active");
            }
        }
        if let Some(el) = by_id(id) {
            let _ = el.class_list().add_1("active");
        }
    }

    // === Grid ===

    fn build_grid(app: &Rc<RefCell<App>>) {
        let document = document();
        let Some(container) = document.get_element_by_id("gridContainer") else {
            return;
        };
        container.set_inner_html("");

        let (grid_size, tiles) = {
            let a = app.borrow();
            let round = a.session.round().expect("round not armed");
            (round.level.grid_size, round.tiles().to_vec())
        };
        let _ = container.set_attribute("class", &format!("grid-container grid-{grid_size}"));

        for value in tiles {
            let Ok(tile) = document.create_element("button") else {
                continue;
            };
            let _ = tile.set_attribute("class", "tile future");
            let _ = tile.set_attribute("data-number", &value.to_string());
            let _ = tile.set_attribute("aria-label", &format!("Number {value}"));

            if let Ok(span) = document.create_element("span") {
                let _ = span.set_attribute("class", "tile-number");
                span.set_text_content(Some(&value.to_string()));
                let _ = tile.append_child(&span);
            }

            let app = app.clone();
            let tile_el = tile.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::PointerEvent| {
                event.prevent_default();
                on_tile_tap(&app, value, &tile_el);
            });
            let _ = tile
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();

            let _ = container.append_child(&tile);
        }

        update_tile_states(app);
    }

    /// Reapply completed / next-target / future classes from the round state
    fn update_tile_states(app: &Rc<RefCell<App>>) {
        let next = match app.borrow().session.round() {
            Some(round) => round.next_expected,
            None => return,
        };

        let tiles = document().query_selector_all(".tile").ok();
        if let Some(tiles) = tiles {
            for i in 0..tiles.length() {
                let Some(tile) = tiles.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let value: u32 = tile
                    .get_attribute("data-number")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);
                let state = if value < next {
                    "completed"
                } else if value == next {
                    "next-target"
                } else {
                    "future"
                };
                let _ = tile.set_attribute("class", &format!("tile {state}"));
            }
        }

        set_text("hudNext", &next.to_string());
    }

    /// Reorder tile elements without touching values or completion state
    fn apply_reshuffle(app: &Rc<RefCell<App>>) {
        let Some(order) = app.borrow_mut().session.reshuffle_positions() else {
            return;
        };
        let Some(container) = by_id("gridContainer") else {
            return;
        };

        let _ = container.class_list().add_1("shifting");

        let children = container.children();
        let snapshot: Vec<Element> = (0..children.length())
            .filter_map(|i| children.item(i))
            .collect();
        for index in order {
            if let Some(tile) = snapshot.get(index as usize) {
                let _ = container.append_child(tile);
            }
        }

        let container = container.clone();
        set_timeout(move || {
            let _ = container.class_list().remove_1("shifting");
        }, 200);
    }

    // === HUD ===

    fn reset_hud(app: &Rc<RefCell<App>>) {
        let a = app.borrow();
        let level = a.session.selected_level();

        set_text("hudLevel", level.name);
        set_text("hudBest", &format_best_time(a.session.best_time(level.id)));
        if level.is_timed() {
            set_text("hudTimer", &format_time(level.time_limit));
            set_text("timerLabel", "REMAINING");
        } else {
            set_text("hudTimer", "0.00");
            set_text("timerLabel", "TIME");
        }
        set_class("hudTimer", "hud-timer");
        set_text("hudCombo", "×0");
        set_class("hudCombo", "hud-combo");
        set_text("hudNext", "1");
        set_text("hudPenalty", "+0.0s");
    }

    fn update_timer_display(app: &Rc<RefCell<App>>, display_seconds: f64) {
        let timed = app
            .borrow()
            .session
            .round()
            .is_some_and(|r| r.level.is_timed());

        set_text("hudTimer", &format_time(display_seconds.max(0.0)));

        if timed {
            let state = if display_seconds <= 2.0 {
                "hud-timer critical"
            } else if display_seconds <= 5.0 {
                "hud-timer warning"
            } else {
                "hud-timer"
            };
            set_class("hudTimer", state);
        }
    }

    // === Round flow ===

    fn on_tile_tap(app: &Rc<RefCell<App>>, value: u32, tile: &Element) {
        let events = app.borrow_mut().session.tap(value);
        for event in events {
            match event {
                RoundEvent::TapAccepted { value, combo } => {
                    haptic_light();
                    app.borrow().audio.play(SoundEffect::Correct { step: value });
                    flash_class(tile, "correct-flash", 250);
                    update_tile_states(app);

                    set_text("hudCombo", &format!("×{combo}"));
                    let combo_class = if combo >= 3 {
                        "hud-combo active"
                    } else {
                        "hud-combo"
                    };
                    set_class("hudCombo", combo_class);
                    if let Some(el) = by_id("hudCombo") {
                        flash_class(&el, "combo-pop", 300);
                    }

                    // First correct tap started the clock
                    let should_start = {
                        let a = app.borrow();
                        !a.timer_running && a.session.round().is_some_and(|r| r.running())
                    };
                    if should_start {
                        start_timer_loop(app);
                    }
                }
                RoundEvent::TapRejected {
                    penalty_seconds, ..
                } => {
                    haptic_medium();
                    app.borrow().audio.play(SoundEffect::Wrong);
                    flash_class(tile, "wrong", 400);

                    set_text("hudPenalty", &format!("+{penalty_seconds:.1}s"));
                    if let Some(el) = by_id("hudPenalty") {
                        flash_class(&el, "penalty-flash", 400);
                    }
                    set_text("hudCombo", "×0");
                    set_class("hudCombo", "hud-combo");
                }
                RoundEvent::ReshuffleRequested => {
                    app.borrow().audio.play(SoundEffect::Shuffle);
                    apply_reshuffle(app);
                }
                RoundEvent::Completed(summary) => {
                    app.borrow_mut().timer_running = false;
                    haptic_heavy();
                    app.borrow().audio.play(SoundEffect::Complete);
                    update_tile_states(app);
                    show_game_over(true, &summary);
                }
                RoundEvent::Failed(_) | RoundEvent::Tick { .. } => {}
            }
        }
    }

    /// Drive the round clock from requestAnimationFrame. The chain stops
    /// re-arming itself as soon as the round leaves the active state.
    fn start_timer_loop(app: &Rc<RefCell<App>>) {
        app.borrow_mut().timer_running = true;
        request_timer_frame(app.clone());
    }

    fn request_timer_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |_time: f64| {
            timer_frame(app);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn timer_frame(app: Rc<RefCell<App>>) {
        // Stale frame after cancellation
        if !app.borrow().timer_running {
            return;
        }

        let events = app.borrow_mut().session.tick();
        for event in events {
            match event {
                RoundEvent::Tick { display_seconds } => {
                    update_timer_display(&app, display_seconds);
                }
                RoundEvent::Failed(summary) => {
                    app.borrow_mut().timer_running = false;
                    haptic_heavy();
                    app.borrow().audio.play(SoundEffect::GameOver);
                    update_timer_display(&app, 0.0);
                    show_game_over(false, &summary);
                    return;
                }
                _ => {}
            }
        }

        if app.borrow().timer_running {
            request_timer_frame(app);
        }
    }

    fn start_game(app: &Rc<RefCell<App>>) {
        let seed = js_sys::Date::now() as u64;
        app.borrow_mut().timer_running = false;
        app.borrow_mut().session.start_round(seed);

        reset_hud(app);
        build_grid(app);
        show_screen("gameScreen");
    }

    fn show_game_over(success: bool, summary: &RoundSummary) {
        set_text(
            "gameoverTitle",
            if success { "SEQUENCE COMPLETE" } else { "TIME EXPIRED" },
        );
        set_class(
            "gameoverTitle",
            if success {
                "gameover-title success"
            } else {
                "gameover-title failure"
            },
        );

        set_text("gameoverTime", &format!("{}s", format_time(summary.finish_time)));
        set_class(
            "gameoverTime",
            if success {
                "gameover-time"
            } else {
                "gameover-time failure-time"
            },
        );

        if let Some(rank) = summary.rank {
            set_class("rankBadge", &format!("rank-badge {}", rank.css_class));
            set_text("rankText", rank.name);
            set_text(
                "rankSub",
                if summary.is_new_best {
                    "★ NEW BEST TIME ★"
                } else {
                    rank.subtitle
                },
            );
            set_class("rankReveal", "rank-reveal");
        } else {
            set_class("rankReveal", "rank-reveal hidden");
        }

        set_text("statCombo", &format!("×{}", summary.max_combo));
        set_text("statPenalties", &summary.wrong_taps.to_string());
        set_text("statPenaltyTime", &format!("+{:.1}s", summary.penalty_seconds));

        show_screen("gameOverScreen");
    }

    fn go_to_start(app: &Rc<RefCell<App>>) {
        app.borrow_mut().timer_running = false;
        app.borrow_mut().session.abandon_round();
        refresh_start_screen(app);
        show_screen("startScreen");
    }

    fn refresh_start_screen(app: &Rc<RefCell<App>>) {
        let a = app.borrow();
        for level in chroma_shift::game::LEVELS.iter() {
            set_text(
                &format!("bestTime{}", level.id),
                &format_best_time(a.session.best_time(level.id)),
            );
        }
        drop(a);
        update_level_buttons(app);
        update_sound_button(app);
    }

    fn update_level_buttons(app: &Rc<RefCell<App>>) {
        let selected = app.borrow().session.selected_level().id;
        if let Ok(buttons) = document().query_selector_all(".level-btn") {
            for i in 0..buttons.length() {
                let Some(btn) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let id: u8 = btn
                    .get_attribute("data-level")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);
                if id == selected {
                    let _ = btn.class_list().add_1("active");
                } else {
                    let _ = btn.class_list().remove_1("active");
                }
            }
        }
    }

    fn update_sound_button(app: &Rc<RefCell<App>>) {
        let enabled = app.borrow().session.sound_enabled();
        set_class(
            "soundToggleBtn",
            if enabled {
                "sound-toggle sound-enabled"
            } else {
                "sound-toggle sound-disabled"
            },
        );
    }

    // === Event wiring ===

    fn on_button<F>(id: &str, handler: F)
    where
        F: Fn() + 'static,
    {
        if let Some(btn) = by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                handler();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(app: &Rc<RefCell<App>>) {
        // Level selection
        if let Ok(buttons) = document().query_selector_all(".level-btn") {
            for i in 0..buttons.length() {
                let Some(btn) = buttons.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let id: u8 = btn
                    .get_attribute("data-level")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0);
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    app.borrow().audio.play(SoundEffect::Click);
                    haptic_light();
                    if let Err(err) = app.borrow_mut().session.select_level(id) {
                        log::warn!("Level select rejected: {err}");
                        return;
                    }
                    update_level_buttons(&app);
                });
                let _ = btn
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        for (id, to_game) in [
            ("playBtn", true),
            ("restartBtn", true),
            ("playAgainBtn", true),
            ("changeLevelBtn", false),
            ("gameoverLevelBtn", false),
        ] {
            let app = app.clone();
            on_button(id, move || {
                app.borrow().audio.play(SoundEffect::Click);
                haptic_light();
                if to_game {
                    start_game(&app);
                } else {
                    go_to_start(&app);
                }
            });
        }

        {
            let app = app.clone();
            on_button("soundToggleBtn", move || {
                let enabled = app.borrow_mut().session.toggle_sound();
                app.borrow_mut().audio.set_enabled(enabled);
                if enabled {
                    app.borrow().audio.play(SoundEffect::Click);
                }
                haptic_light();
                update_sound_button(&app);
            });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Chroma Shift starting...");

        let app = Rc::new(RefCell::new(App::new()));

        setup_buttons(&app);
        refresh_start_screen(&app);
        show_screen("startScreen");

        log::info!("Chroma Shift running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Chroma Shift (native) starting...");
    log::info!("The game runs in the browser - build with `trunk serve` for the web version");

    // Quick scripted round as a smoke test
    run_scripted_round();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn run_scripted_round() {
    use chroma_shift::game::{GameSession, RoundEvent};
    use chroma_shift::platform::{MemoryStorage, system_clock};
    use chroma_shift::records::Records;

    let records = Records::new(Box::new(MemoryStorage::new()));
    let mut session = GameSession::new(records, system_clock());

    session.start_round(42);
    let count = session.selected_level().tile_count;
    let mut summary = None;
    for v in 1..=count {
        for event in session.tap(v) {
            if let RoundEvent::Completed(s) = event {
                summary = Some(s);
            }
        }
    }

    let summary = summary.expect("scripted round should complete");
    println!(
        "Completed {} tiles in {:.3}s, max combo {}, rank {}",
        count,
        summary.finish_time,
        summary.max_combo,
        summary.rank.map_or("-", |r| r.name),
    );
}
