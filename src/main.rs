//! Gravity Hop entry point
//!
//! In the browser this wires the keyboard, runs one tick per animation
//! frame and draws snapshots on a 2D canvas. Natively it plays a short
//! scripted run headless.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::f64::consts::TAU;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use gravity_hop::consts::*;
    use gravity_hop::persistence::LocalStorageGateway;
    use gravity_hop::sim::GravitySign;
    use gravity_hop::{Game, Rgb, Settings, Skin, View};

    /// How long shop feedback stays on screen
    const NOTICE_TICKS: u32 = 120;

    /// Browser-side state wrapped around the game
    struct App {
        game: Game,
        ctx: CanvasRenderingContext2d,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        notice: Option<(String, u32)>,
    }

    /// `"1"`..`"9"` as a number
    fn digit(key: &str) -> Option<usize> {
        key.parse::<usize>().ok().filter(|d| (1..=9).contains(d))
    }

    impl App {
        fn new(game: Game, ctx: CanvasRenderingContext2d) -> Self {
            Self {
                game,
                ctx,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                notice: None,
            }
        }

        fn update(&mut self, time: f64) {
            self.game.tick();

            if let Some((_, ticks)) = self.notice.as_mut() {
                *ticks = ticks.saturating_sub(1);
                if *ticks == 0 {
                    self.notice = None;
                }
            }

            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 && time > oldest_time {
                self.fps = (60000.0 / (time - oldest_time)).round() as u32;
            }
        }

        fn key_down(&mut self, key: &str) {
            let game = &mut self.game;
            match key {
                "ArrowLeft" | "a" | "A" => game.input.move_left = true,
                "ArrowRight" | "d" | "D" => game.input.move_right = true,
                "ArrowUp" | "w" | "W" => game.input.jump = true,
                _ => {}
            }

            match (game.view(), key, digit(key)) {
                (View::MainMenu, "Enter", _) => game.start_game(),
                (View::MainMenu, "l" | "L", _) => game.open_level_select(),
                (View::MainMenu, "s" | "S", _) => game.open_shop(),
                (View::MainMenu, "o" | "O", _) => {
                    let settings = Settings {
                        quality: game.settings().quality.cycled(),
                        ..game.settings().clone()
                    };
                    game.apply_settings(settings);
                }
                (View::MainMenu, "f" | "F", _) => {
                    let settings = Settings {
                        show_fps: !game.settings().show_fps,
                        ..game.settings().clone()
                    };
                    game.apply_settings(settings);
                }
                (View::MainMenu | View::Paused, "c" | "C", _) => game.open_controls(),
                (View::MainMenu | View::Paused, "q" | "Q", _) => game.quit(),
                (View::LevelSelect, _, Some(n)) => {
                    if !game.select_level(n as u32 - 1) {
                        self.notice = Some((format!("Level {} is locked", n), NOTICE_TICKS));
                    }
                }
                (View::Shop, _, Some(n)) => {
                    if let Some(skin) = Skin::ALL.get(n - 1) {
                        self.notice = Some((shop_action(game, *skin), NOTICE_TICKS));
                    }
                }
                (View::LevelSelect | View::Shop, "Escape", _) => game.back_to_menu(),
                (View::Controls, "Escape" | "c" | "C", _) => game.close_controls(),
                (View::Playing | View::Paused, "p" | "P" | "Escape", _) => game.input.pause = true,
                (View::Paused, "Enter", _) => {
                    game.resume();
                }
                (View::Playing, " ", _) => game.input.flip_gravity = true,
                (View::Playing | View::Paused, "h" | "H", _) => game.input.toggle_help = true,
                (View::GameOver | View::LevelComplete, "r" | "R", _) => game.input.retry = true,
                (View::GameOver, "Enter", _) => {
                    game.retry();
                }
                (View::LevelComplete, "n" | "N" | "Enter", _) => {
                    game.advance();
                }
                (View::Paused | View::GameOver | View::LevelComplete, "m" | "M", _) => {
                    game.return_to_menu()
                }
                _ => {}
            }
        }

        fn key_up(&mut self, key: &str) {
            match key {
                "ArrowLeft" | "a" | "A" => self.game.input.move_left = false,
                "ArrowRight" | "d" | "D" => self.game.input.move_right = false,
                "ArrowUp" | "w" | "W" => self.game.input.jump = false,
                _ => {}
            }
        }

        // --- Drawing ---

        fn fill(&self, color: &str) {
            self.ctx.set_fill_style_str(color);
        }

        fn text(&self, s: &str, x: f64, y: f64, size: u32, color: &str) {
            self.ctx.set_font(&format!("{}px sans-serif", size));
            self.fill(color);
            let _ = self.ctx.fill_text(s, x, y);
        }

        fn centered(&self, s: &str, y: f64, size: u32, color: &str) {
            self.ctx.set_text_align("center");
            self.text(s, SCREEN_WIDTH as f64 / 2.0, y, size, color);
            self.ctx.set_text_align("left");
        }

        fn circle(&self, x: f32, y: f32, r: f32, color: Rgb) {
            self.fill(&color.css());
            self.ctx.begin_path();
            let _ = self.ctx.arc(x as f64, y as f64, r as f64, 0.0, TAU);
            self.ctx.fill();
        }

        fn lines(&self, title: &str, body: &[String]) {
            self.centered(title, 120.0, 48, "white");
            for (i, line) in body.iter().enumerate() {
                self.centered(line, 200.0 + i as f64 * 36.0, 22, "rgb(200, 200, 200)");
            }
        }

        fn render(&self) {
            let (w, h) = (SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64);
            self.ctx.set_global_alpha(1.0);
            self.fill("black");
            self.ctx.fill_rect(0.0, 0.0, w, h);

            if !self.game.is_running() {
                self.centered("Thanks for playing!", h / 2.0, 40, "white");
                return;
            }

            match self.game.view() {
                View::MainMenu => self.draw_main_menu(),
                View::LevelSelect => self.draw_level_select(),
                View::Shop => self.draw_shop(),
                View::Controls => self.draw_controls(),
                view => {
                    self.draw_world();
                    self.draw_hud();
                    self.draw_overlay(view);
                }
            }

            if let Some((message, _)) = &self.notice {
                self.centered(message, h - 40.0, 20, "rgb(255, 165, 0)");
            }
        }

        fn draw_main_menu(&self) {
            let settings = self.game.settings();
            let profile = self.game.profile();
            self.lines(
                "Gravity Hop",
                &[
                    "Enter - Start Game".into(),
                    "L - Level Select".into(),
                    "S - Shop".into(),
                    "C - Controls".into(),
                    format!("O - Quality: {}", settings.quality.as_str()),
                    format!("F - Show FPS: {}", if settings.show_fps { "on" } else { "off" }),
                    "Q - Quit".into(),
                    String::new(),
                    format!("Coins: {}   Furthest level: {}", profile.total_coins, profile.furthest_level_reached + 1),
                ],
            );
        }

        fn draw_level_select(&self) {
            let mut body: Vec<String> = self
                .game
                .level_slots()
                .map(|(i, unlocked)| {
                    let state = if unlocked { "" } else { " (locked)" };
                    format!("{} - Level {}{}", i + 1, i + 1, state)
                })
                .collect();
            body.push(String::new());
            body.push("Esc - Back".into());
            self.lines("Select Level", &body);
        }

        fn draw_shop(&self) {
            let profile = self.game.profile();
            let mut body: Vec<String> = self
                .game
                .catalog()
                .entries()
                .iter()
                .enumerate()
                .map(|(i, (skin, price))| {
                    let state = if profile.equipped_skin == *skin {
                        "equipped".to_string()
                    } else if profile.owns(*skin) {
                        "owned".to_string()
                    } else {
                        format!("{} coins", price)
                    };
                    format!("{} - {} ({})", i + 1, skin, state)
                })
                .collect();
            body.push(format!("Wallet: {} coins", profile.total_coins));
            body.push("Esc - Back".into());
            self.lines("Skin Shop", &body);
        }

        fn draw_controls(&self) {
            self.lines(
                "Controls",
                &[
                    "Left / Right - Move".into(),
                    "Up - Jump".into(),
                    "Space - Flip gravity".into(),
                    "P - Pause".into(),
                    "H - Help".into(),
                    "R - Retry".into(),
                    "Esc - Back".into(),
                ],
            );
        }

        fn draw_world(&self) {
            let session = self.game.session();
            let layout = session.layout();

            for platform in &layout.platforms {
                self.fill(&platform.color.css());
                self.ctx.fill_rect(
                    platform.pos.x as f64,
                    platform.pos.y as f64,
                    platform.width as f64,
                    platform.height as f64,
                );
            }

            for coin in layout.coins.iter().filter(|c| !c.collected) {
                self.circle(coin.pos.x, coin.pos.y + coin.hover_offset(), coin.radius, coin.color());
            }

            if let Some(portal) = &layout.portal {
                let ctx = &self.ctx;
                ctx.set_global_alpha(if layout.all_collected() { 1.0 } else { 0.3 });
                ctx.set_stroke_style_str(&portal.color().css());
                ctx.set_line_width(4.0);
                ctx.begin_path();
                let (x, y, r) = (portal.pos.x as f64, portal.pos.y as f64, portal.radius as f64);
                let spin = portal.spin as f64;
                let _ = ctx.arc(x, y, r, spin, spin + TAU * 0.8);
                ctx.stroke();
                ctx.set_global_alpha(1.0);
            }

            for particle in session.particles().particles() {
                self.ctx.set_global_alpha((particle.life as f64 / 40.0).min(1.0));
                self.fill(&particle.color.css());
                let s = particle.size as f64;
                self.ctx
                    .fill_rect(particle.pos.x as f64 - s / 2.0, particle.pos.y as f64 - s / 2.0, s, s);
            }
            self.ctx.set_global_alpha(1.0);

            let actor = session.actor();
            if self.game.settings().trails {
                let n = actor.trail.len().max(1) as f64;
                for (i, p) in actor.trail.iter().enumerate() {
                    self.ctx.set_global_alpha(0.4 * (i + 1) as f64 / n);
                    self.circle(p.x, p.y, actor.radius * 0.8, actor.color);
                }
                self.ctx.set_global_alpha(1.0);
            }
            self.circle(actor.pos.x, actor.pos.y, actor.radius, actor.color);
        }

        fn draw_hud(&self) {
            let hud = self.game.hud();
            let arrow = match hud.gravity {
                GravitySign::Down => "v",
                GravitySign::Up => "^",
            };
            self.ctx.set_text_align("left");
            self.text(&format!("Score: {}", hud.score), 10.0, 30.0, 20, "white");
            self.text(&format!("Coins: {}", hud.total_coins), 10.0, 55.0, 20, "white");
            self.text(&format!("Level: {}", hud.level_index + 1), 10.0, 80.0, 20, "white");
            self.text(&format!("Gravity: {}", arrow), 10.0, 105.0, 20, "white");
            self.text(&format!("Collected: {}/{}", hud.collected, hud.total), 10.0, 130.0, 20, "white");
            if self.game.settings().show_fps {
                self.text(&format!("FPS: {}", self.fps), SCREEN_WIDTH as f64 - 90.0, 30.0, 16, "gray");
            }

            if hud.message_ticks > 0 {
                self.centered(&format!("Level {}", hud.level_index + 1), 200.0, 48, "white");
            }
            if hud.show_help {
                self.centered("Arrows move and jump, Space flips gravity", 420.0, 20, "rgb(0, 255, 255)");
                self.centered("Collect every coin, then enter the portal", 450.0, 20, "rgb(0, 255, 255)");
            }
            if hud.fade_alpha > 0 {
                self.fill(&format!("rgba(0, 0, 0, {:.3})", hud.fade_alpha as f64 / 255.0));
                self.ctx.fill_rect(0.0, 0.0, SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64);
            }
        }

        fn draw_overlay(&self, view: View) {
            let (title, hint) = match view {
                View::Paused => ("Paused", "P - Resume   C - Controls   M - Menu   Q - Quit"),
                View::GameOver => ("Game Over", "R - Retry   M - Menu"),
                View::LevelComplete => ("Level Complete!", "N - Next Level   R - Retry   M - Menu"),
                _ => return,
            };
            self.fill("rgba(0, 0, 0, 0.5)");
            self.ctx.fill_rect(0.0, 0.0, SCREEN_WIDTH as f64, SCREEN_HEIGHT as f64);
            self.centered(title, SCREEN_HEIGHT as f64 / 2.0 - 20.0, 48, "white");
            self.centered(hint, SCREEN_HEIGHT as f64 / 2.0 + 30.0, 20, "rgb(200, 200, 200)");
        }
    }

    /// Equip an owned skin, otherwise try to buy it
    fn shop_action(game: &mut Game, skin: Skin) -> String {
        let result = if game.profile().owns(skin) {
            game.equip(skin.id())
        } else {
            game.purchase(skin.id())
        };
        match result {
            Ok(skin) => format!("Equipped {}", skin),
            Err(e) => e.to_string(),
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Gravity Hop starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        canvas.set_width(SCREEN_WIDTH as u32);
        canvas.set_height(SCREEN_HEIGHT as u32);
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(Box::new(LocalStorageGateway::default()), Settings::load(), seed);
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App::new(game, ctx)));
        setup_input_handlers(&window, app.clone());
        setup_unload(&window, app.clone());
        request_animation_frame(app);

        log::info!("Gravity Hop running!");
        Ok(())
    }

    fn setup_input_handlers(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if matches!(event.key().as_str(), " " | "ArrowUp" | "ArrowDown") {
                    event.prevent_default();
                }
                if !event.repeat() {
                    app.borrow_mut().key_down(&event.key());
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            app.borrow_mut().key_up(&event.key());
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_unload(window: &web_sys::Window, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().game.page_unload();
        });
        let _ = window.add_event_listener_with_callback("beforeunload", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        let running = {
            let mut a = app.borrow_mut();
            a.update(time);
            a.render();
            a.game.is_running()
        };

        if running {
            request_animation_frame(app);
        } else {
            log::info!("Game loop stopped");
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_game::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gravity Hop (native) starting...");
    log::info!("Native mode is headless - build for wasm32 to play in the browser");

    scripted_run(1800);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive the game with a fixed input script and report what happened.
/// Set `GRAVITY_HOP_SAVE` to a path to persist progress between runs.
#[cfg(not(target_arch = "wasm32"))]
fn scripted_run(frames: u32) {
    use gravity_hop::persistence::{FileGateway, MemoryGateway, ProgressGateway};
    use gravity_hop::{Game, Settings, View};

    let gateway: Box<dyn ProgressGateway> = match std::env::var_os("GRAVITY_HOP_SAVE") {
        Some(path) => Box::new(FileGateway::new(path)),
        None => Box::new(MemoryGateway::new()),
    };
    let mut game = Game::new(gateway, Settings::load(), 42);
    game.start_game();

    let (mut coins, mut deaths, mut levels) = (0usize, 0u32, 0u32);
    for frame in 0..frames {
        game.input.move_right = (frame / 120) % 2 == 0;
        game.input.move_left = !game.input.move_right;
        game.input.jump = frame % 40 < 2;
        game.input.flip_gravity = frame % 240 == 200;

        let outcome = game.tick();
        coins += outcome.collected.len();
        if outcome.fell_off {
            deaths += 1;
        }
        if outcome.completed {
            levels += 1;
        }

        match game.view() {
            View::GameOver => {
                game.retry();
            }
            View::LevelComplete => {
                game.advance();
            }
            _ => {}
        }
    }

    let hud = game.hud();
    game.quit();
    println!(
        "{} frames: {} coins, {} falls, {} levels cleared, now on level {} with {} coins banked",
        frames,
        coins,
        deaths,
        levels,
        hud.level_index + 1,
        hud.total_coins
    );
}
