//! Arcade Night entry point
//!
//! Native: runs one game headless at its real tick rate with an optional
//! autopilot and logs the results. Web: hosts the arcade on a canvas with
//! WebGPU and exposes `select_game` / `back_to_menu` to the page menu.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use arcade_night::input::{Button, HostEvent, Key};
    use arcade_night::persistence::{LocalStorageStore, shared};
    use arcade_night::platform;
    use arcade_night::renderer::{Framebuffer, RenderState};
    use arcade_night::sim::{GameId, Lifecycle, TickOutcome};
    use arcade_night::{Arcade, Settings};

    /// Everything the page callbacks share
    struct Host {
        arcade: Arcade,
        render_state: Option<RenderState>,
        /// Stand-in target while no GPU surface exists; never ready
        offline: Framebuffer,
    }

    impl Host {
        fn new(seed: u64) -> Self {
            let mut offline = Framebuffer::new(1, 1);
            offline.set_ready(false);
            Self {
                arcade: Arcade::new(shared(LocalStorageStore), seed),
                render_state: None,
                offline,
            }
        }

        fn select(&mut self, id: GameId) {
            self.arcade.select(id, platform::now_ms());
            if let (Some(rs), Some(game)) = (self.render_state.as_mut(), self.arcade.active()) {
                let (w, h) = game.canvas();
                rs.set_canvas(w, h);
            }
            self.update_hud();
        }

        fn back_to_menu(&mut self) {
            self.arcade.back_to_menu();
            self.update_hud();
        }

        fn handle(&mut self, event: HostEvent) -> bool {
            let handled = self.arcade.handle_event(&event);
            if handled {
                self.update_hud();
            }
            handled
        }

        /// Run a tick if one is due and present it
        fn pump(&mut self, now: f64) {
            let outcome = match self.render_state.as_mut() {
                Some(rs) => {
                    let outcome = self.arcade.pump(now, rs);
                    if outcome.is_some() {
                        match rs.present() {
                            Ok(_) => {}
                            Err(wgpu::SurfaceError::Lost) => rs.resize(rs.size.0, rs.size.1),
                            Err(wgpu::SurfaceError::OutOfMemory) => {
                                log::error!("Out of memory!");
                            }
                            Err(e) => log::warn!("Render error: {:?}", e),
                        }
                    }
                    outcome
                }
                None => self.arcade.pump(now, &mut self.offline),
            };

            match outcome {
                Some(TickOutcome::Advanced { scored }) if scored > 0 => self.update_hud(),
                Some(TickOutcome::Ended { .. }) => {
                    self.arcade.flush_store();
                    self.update_hud();
                }
                _ => {}
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let set = |selector: &str, text: &str| {
                if let Some(el) = document.query_selector(selector).ok().flatten() {
                    el.set_text_content(Some(text));
                }
            };

            match self.arcade.active() {
                Some(game) => {
                    set("#title", game.id().title());
                    set("#score", &game.score().to_string());
                    set("#best", &game.high_score().to_string());
                    let status = match game.lifecycle() {
                        Lifecycle::NotStarted => "Press start",
                        Lifecycle::Running => "",
                        Lifecycle::Over => "Game over",
                    };
                    set("#status", status);
                }
                None => {
                    set("#title", "");
                    set("#status", "");
                }
            }
        }
    }

    thread_local! {
        static HOST: RefCell<Option<Rc<RefCell<Host>>>> = const { RefCell::new(None) };
    }

    /// Run `f` on the host if it exists and is not already borrowed
    fn with_host<R>(f: impl FnOnce(&mut Host) -> R) -> Option<R> {
        let host = HOST.with(|h| h.borrow().clone())?;
        let Ok(mut host) = host.try_borrow_mut() else {
            log::warn!("Host busy, call ignored");
            return None;
        };
        Some(f(&mut host))
    }

    /// Activate a game by id (`flappybird`, `snake`, `carracing`)
    #[wasm_bindgen]
    pub fn select_game(id: &str) -> bool {
        let Some(game) = GameId::parse(id) else {
            log::warn!("Unknown game {:?}", id);
            return false;
        };
        with_host(|host| host.select(game)).is_some()
    }

    /// Deactivate the current game and stop its clock
    #[wasm_bindgen]
    pub fn back_to_menu() {
        with_host(|host| host.back_to_menu());
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Arcade Night starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element");
            return;
        };

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = platform::run_seed(&settings);
        let host = Rc::new(RefCell::new(Host::new(seed)));
        HOST.with(|h| *h.borrow_mut() = Some(host.clone()));

        log::info!("Arcade initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                let adapter = instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::HighPerformance,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await;
                match adapter {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height).await {
                            Ok(rs) => host.borrow_mut().render_state = Some(rs),
                            Err(e) => log::error!("Failed to create device: {}", e),
                        }
                    }
                    Err(e) => log::error!("Failed to get adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(&canvas, host.clone());
        setup_buttons(host.clone());

        host.borrow_mut().select(settings.default_game);

        request_animation_frame(host);

        log::info!("Arcade Night running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, host: Rc<RefCell<Host>>) {
        // Keyboard
        if let Some(window) = web_sys::window() {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = Key::from_code(&event.key()) else {
                    return;
                };
                let handled = host.borrow_mut().handle(HostEvent::Key {
                    key,
                    repeat: event.repeat(),
                });
                if handled && key.blocks_default() {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        {
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                host.borrow_mut().handle(HostEvent::Pointer);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                host.borrow_mut().handle(HostEvent::Touch);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(host: Rc<RefCell<Host>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        for button in Button::ALL {
            let Some(el) = document.get_element_by_id(button.element_id()) else {
                continue;
            };
            let host = host.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                host.borrow_mut().handle(HostEvent::Button(button));
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        // rAF timestamps share the performance.now() timeline
        if let Ok(mut h) = host.try_borrow_mut() {
            h.pump(time);
        }
        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::Duration;

    use anyhow::{Context, Result, bail};

    use arcade_night::arcade::ActiveGame;
    use arcade_night::consts::*;
    use arcade_night::input::{Button, HostEvent, Key};
    use arcade_night::persistence::{FileStore, shared};
    use arcade_night::platform;
    use arcade_night::renderer::Framebuffer;
    use arcade_night::sim::snake::on_board;
    use arcade_night::sim::{Direction, GameId, Lifecycle, Side, TickOutcome};
    use arcade_night::{Arcade, Settings};

    struct Args {
        game: Option<GameId>,
        data_dir: Option<PathBuf>,
    }

    fn parse_args() -> Result<Args> {
        let mut args = Args {
            game: None,
            data_dir: None,
        };
        let mut it = std::env::args().skip(1);
        while let Some(arg) = it.next() {
            match arg.as_str() {
                "--data-dir" => {
                    let dir = it.next().context("--data-dir needs a path")?;
                    args.data_dir = Some(PathBuf::from(dir));
                }
                name => match GameId::parse(name) {
                    Some(game) => args.game = Some(game),
                    None => bail!(
                        "unknown game {:?} (expected one of: {})",
                        name,
                        GameId::ALL.map(|g| g.as_str()).join(", ")
                    ),
                },
            }
        }
        Ok(args)
    }

    pub fn run() -> Result<()> {
        let args = parse_args()?;
        let data_dir = args
            .data_dir
            .unwrap_or_else(|| Settings::default().data_dir);
        let settings = Settings::load_or_init(&data_dir);

        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(settings.log_filter.as_str()),
        )
        .init();
        log::info!("Arcade Night (native) starting...");

        std::fs::create_dir_all(&settings.data_dir).with_context(|| {
            format!("creating data directory {}", settings.data_dir.display())
        })?;
        let store = shared(FileStore::open(settings.highscore_path()));

        let game = args.game.unwrap_or(settings.default_game);
        let seed = platform::run_seed(&settings);
        let mut arcade = Arcade::new(store, seed);
        arcade.select(game, platform::now_ms());

        let (w, h) = arcade
            .active()
            .map(|g| g.canvas())
            .context("no active game after selection")?;
        let mut fb = Framebuffer::new(w, h);

        let mut ticks = 0u64;
        let mut games = 0u32;
        let mut best_run = 0u64;
        while ticks < settings.demo_ticks {
            if let Some(outcome) = arcade.pump(platform::now_ms(), &mut fb) {
                ticks += 1;
                if let TickOutcome::Ended {
                    end,
                    final_score,
                    new_best,
                } = outcome
                {
                    games += 1;
                    best_run = best_run.max(final_score);
                    log::info!(
                        "Game {} ended ({:?}) with {}{}",
                        games,
                        end,
                        final_score,
                        if new_best { " (new best)" } else { "" }
                    );
                    arcade.flush_store();
                    arcade.handle_event(&HostEvent::Button(Button::Reset));
                }

                if let Some(active) = arcade.active_mut() {
                    if active.lifecycle() == Lifecycle::NotStarted {
                        active.start();
                    }
                }
                if settings.autopilot {
                    if let Some(event) = arcade.active().and_then(autopilot) {
                        arcade.handle_event(&event);
                    }
                }
            }

            let wait = arcade
                .clock()
                .and_then(|c| c.until_next(platform::now_ms()))
                .unwrap_or(0.0);
            std::thread::sleep(Duration::from_secs_f64(wait / 1000.0));
        }

        let frame_path = settings.data_dir.join(format!("{}.ppm", game.as_str()));
        write_ppm(&fb, &frame_path)
            .with_context(|| format!("writing last frame to {}", frame_path.display()))?;

        let best = arcade.active().map(|g| g.high_score()).unwrap_or_default();
        arcade.back_to_menu();
        log::info!(
            "{}: {} ticks, {} finished games, best run {}, high score {}",
            game.title(),
            ticks,
            games,
            best_run,
            best
        );
        Ok(())
    }

    /// Binary PPM of the framebuffer
    fn write_ppm(fb: &Framebuffer, path: &std::path::Path) -> std::io::Result<()> {
        use arcade_night::renderer::Surface;

        let (w, h) = fb.size();
        let mut out = format!("P6\n{} {}\n255\n", w, h).into_bytes();
        for px in fb.to_rgba().chunks_exact(4) {
            out.extend_from_slice(&px[..3]);
        }
        std::fs::write(path, out)
    }

    /// Scripted input for the headless demo
    fn autopilot(game: &ActiveGame) -> Option<HostEvent> {
        match game {
            ActiveGame::Pipes(s) => {
                let world = &s.game().world;
                let bird = &world.actor;
                let target = world
                    .entities
                    .iter()
                    .find(|p| p.right() >= bird.bounds().left())
                    .map(|p| p.gap_top + PIPE_GAP * 0.6)
                    .unwrap_or(PIPES_HEIGHT / 2.0);
                (bird.pos.y > target && bird.vel.y >= 0.0).then(|| HostEvent::key(Key::Space))
            }
            ActiveGame::Snake(s) => {
                let snake = s.game();
                let head = snake.head();
                let food = snake.food?;
                let tail = snake.body.back().copied();
                let safe = |dir: Direction| {
                    let cell = head + dir.delta();
                    snake.accepts(dir)
                        && on_board(cell)
                        && (!snake.occupies(cell) || Some(cell) == tail)
                };
                let mut dirs = Direction::ALL;
                dirs.sort_by_key(|d| (head + d.delta() - food).abs().element_sum());
                let dir = dirs.into_iter().find(|&d| safe(d))?;
                let key = match dir {
                    Direction::Up => Key::Up,
                    Direction::Down => Key::Down,
                    Direction::Left => Key::Left,
                    Direction::Right => Key::Right,
                };
                (dir != snake.next_heading).then(|| HostEvent::key(key))
            }
            ActiveGame::Racer(s) => {
                let world = &s.game().world;
                let me = world.actor.bounds();
                let threat = world.entities.iter().map(|c| c.bounds()).find(|b| {
                    b.bottom() > me.top() - 150.0
                        && b.top() < me.bottom()
                        && b.left() < me.right()
                        && b.right() > me.left()
                })?;
                let mine = me.left() + CAR_WIDTH / 2.0;
                let theirs = threat.left() + CAR_WIDTH / 2.0;
                let mut side = if mine <= theirs { Side::Left } else { Side::Right };
                if side == Side::Left && world.actor.x <= PLAYER_MIN_X {
                    side = Side::Right;
                } else if side == Side::Right && world.actor.x >= PLAYER_MAX_X {
                    side = Side::Left;
                }
                Some(HostEvent::key(match side {
                    Side::Left => Key::Left,
                    Side::Right => Key::Right,
                }))
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
