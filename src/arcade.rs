//! Game selection and activation
//!
//! The arcade owns at most one active session and the clock that drives it.
//! Selecting a game builds a fresh session and starts its clock; going back
//! to the menu stops the clock and drops the session, so nothing can tick a
//! discarded world. High score records outlive sessions: each game's record
//! is read from the store on its first selection and reused afterwards.

use std::collections::HashMap;

use crate::clock::Clock;
use crate::highscores::HighScores;
use crate::input::{HostEvent, Key};
use crate::persistence::{KeyValueStore, SharedStore};
use crate::renderer::{Paint, Surface, paint_frame};
use crate::sim::tick::{PipesSession, RacerSession, SnakeSession};
use crate::sim::{GameId, Lifecycle, TickOutcome};

/// The session of whichever game is running
pub enum ActiveGame {
    Pipes(PipesSession),
    Snake(SnakeSession),
    Racer(RacerSession),
}

/// Run `$body` with `$s` bound to the inner session
macro_rules! with_session {
    ($game:expr, $s:ident => $body:expr) => {
        match $game {
            ActiveGame::Pipes($s) => $body,
            ActiveGame::Snake($s) => $body,
            ActiveGame::Racer($s) => $body,
        }
    };
}

impl ActiveGame {
    /// Fresh session for the game `high_scores` belongs to
    pub fn new(seed: u64, high_scores: HighScores) -> Self {
        match high_scores.game() {
            GameId::Pipes => ActiveGame::Pipes(PipesSession::with_high_scores(seed, high_scores)),
            GameId::Snake => ActiveGame::Snake(SnakeSession::with_high_scores(seed, high_scores)),
            GameId::Racer => ActiveGame::Racer(RacerSession::with_high_scores(seed, high_scores)),
        }
    }

    pub fn into_high_scores(self) -> HighScores {
        with_session!(self, s => s.into_high_scores())
    }

    pub fn id(&self) -> GameId {
        with_session!(self, s => s.id())
    }

    pub fn lifecycle(&self) -> Lifecycle {
        with_session!(self, s => s.lifecycle())
    }

    pub fn score(&self) -> u64 {
        with_session!(self, s => s.score())
    }

    pub fn high_score(&self) -> u64 {
        with_session!(self, s => s.high_score())
    }

    /// Canvas size of the game's drawing surface
    pub fn canvas(&self) -> (u32, u32) {
        with_session!(self, s => canvas_of(s.game()))
    }

    pub fn tick(&mut self) -> TickOutcome {
        with_session!(self, s => s.tick())
    }

    pub fn paint(&self, surface: &mut dyn Surface) {
        with_session!(self, s => paint_frame(s.game(), s.lifecycle(), surface))
    }

    pub fn handle(&mut self, event: &HostEvent) -> bool {
        with_session!(self, s => s.handle(event))
    }

    pub fn start(&mut self) -> bool {
        with_session!(self, s => s.start())
    }

    pub fn reset(&mut self) -> bool {
        with_session!(self, s => s.reset())
    }
}

fn canvas_of<P: Paint>(_: &P) -> (u32, u32) {
    P::CANVAS
}

/// Selection surface and host loop driver
pub struct Arcade {
    store: SharedStore,
    high_scores: HashMap<GameId, HighScores>,
    seed: u64,
    activations: u64,
    clock: Option<Clock>,
    active: Option<ActiveGame>,
}

impl Arcade {
    pub fn new(store: SharedStore, seed: u64) -> Self {
        Self {
            store,
            high_scores: HashMap::new(),
            seed,
            activations: 0,
            clock: None,
            active: None,
        }
    }

    pub fn active(&self) -> Option<&ActiveGame> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveGame> {
        self.active.as_mut()
    }

    pub fn clock(&self) -> Option<&Clock> {
        self.clock.as_ref()
    }

    /// Activate `id`, replacing any running game
    pub fn select(&mut self, id: GameId, now_ms: f64) {
        self.back_to_menu();
        let seed = self.seed.wrapping_add(self.activations);
        self.activations += 1;

        let mut clock = Clock::new(id.tick_rate());
        clock.start(now_ms);
        log::info!(
            "Selected {} ({} ms per tick)",
            id.title(),
            clock.rate().period_ms
        );
        self.clock = Some(clock);
        let high_scores = match self.high_scores.remove(&id) {
            Some(record) => record,
            None => HighScores::load(id, self.store.clone()),
        };
        self.active = Some(ActiveGame::new(seed, high_scores));
    }

    /// Best score for `id` as this process knows it
    pub fn high_score(&self, id: GameId) -> Option<u64> {
        match self.active.as_ref().filter(|game| game.id() == id) {
            Some(game) => Some(game.high_score()),
            None => self.high_scores.get(&id).map(HighScores::best),
        }
    }

    /// Stop the clock and drop the active game
    pub fn back_to_menu(&mut self) {
        if let Some(clock) = self.clock.as_mut() {
            clock.stop();
        }
        self.clock = None;
        if let Some(game) = self.active.take() {
            log::info!("Leaving {} (score {})", game.id().title(), game.score());
            let record = game.into_high_scores();
            self.high_scores.insert(record.game(), record);
        }
    }

    /// Route a host event. Escape leaves the game; everything else goes to
    /// the active session. Returns false if nothing handled it.
    pub fn handle_event(&mut self, event: &HostEvent) -> bool {
        if let HostEvent::Key {
            key: Key::Escape, ..
        } = event
        {
            let had_game = self.active.is_some();
            self.back_to_menu();
            return had_game;
        }
        match self.active.as_mut() {
            Some(game) => game.handle(event),
            None => false,
        }
    }

    /// One tick plus its render. Skipped entirely when the surface is not
    /// ready.
    pub fn frame(&mut self, surface: &mut dyn Surface) -> Option<TickOutcome> {
        let game = self.active.as_mut()?;
        if !surface.is_ready() {
            log::debug!("{}: surface not ready, frame skipped", game.id());
            return None;
        }
        let outcome = game.tick();
        game.paint(surface);
        Some(outcome)
    }

    /// Push buffered high score writes to the store's medium. Hosts call
    /// this after presenting a frame so disk writes never land mid-tick.
    pub fn flush_store(&self) {
        if let Err(e) = self.store.borrow_mut().flush() {
            log::warn!("Could not flush high scores: {}", e);
        }
    }

    /// Called by the host loop; runs a frame when the clock says a tick is
    /// due
    pub fn pump(&mut self, now_ms: f64, surface: &mut dyn Surface) -> Option<TickOutcome> {
        let due = self.clock.as_mut().is_some_and(|c| c.poll(now_ms));
        if !due {
            return None;
        }
        self.frame(surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Button;
    use crate::consts::FOOD_SCORE;
    use crate::persistence::{MemoryStore, StoreError, shared};
    use crate::renderer::{DrawList, Framebuffer, colors};
    use crate::sim::Direction;

    fn arcade() -> Arcade {
        Arcade::new(shared(MemoryStore::new()), 42)
    }

    /// Reads work, every write fails
    struct ReadOnlyStore(MemoryStore);

    impl KeyValueStore for ReadOnlyStore {
        fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Rejected(key.to_string()))
        }
    }

    /// Eat the food at (5, 5), then run into the top wall
    fn play_snake(arcade: &mut Arcade) -> u64 {
        let ActiveGame::Snake(session) = arcade.active_mut().unwrap() else {
            panic!("snake not active");
        };
        session.command(Direction::Up);
        for _ in 0..5 {
            session.tick();
        }
        session.command(Direction::Left);
        while session.lifecycle() == Lifecycle::Running {
            session.tick();
        }
        session.score()
    }

    #[test]
    fn test_select_starts_clock() {
        let mut arcade = arcade();
        assert!(arcade.active().is_none());

        arcade.select(GameId::Snake, 0.0);
        let game = arcade.active().unwrap();
        assert_eq!(game.id(), GameId::Snake);
        assert_eq!(game.lifecycle(), Lifecycle::NotStarted);
        assert_eq!(game.canvas(), (320, 320));
        assert!(arcade.clock().unwrap().is_running());
    }

    #[test]
    fn test_back_to_menu_stops_ticks() {
        let mut arcade = arcade();
        let mut surface = DrawList::new(320, 480);
        arcade.select(GameId::Pipes, 0.0);
        arcade.handle_event(&HostEvent::Pointer);

        arcade.back_to_menu();
        assert!(arcade.clock().is_none());
        assert_eq!(arcade.pump(10_000.0, &mut surface), None);
        assert!(surface.is_empty());
    }

    #[test]
    fn test_escape_returns_to_menu() {
        let mut arcade = arcade();
        arcade.select(GameId::Racer, 0.0);
        assert!(arcade.handle_event(&HostEvent::key(Key::Escape)));
        assert!(arcade.active().is_none());
        assert!(!arcade.handle_event(&HostEvent::key(Key::Escape)));
    }

    #[test]
    fn test_pump_follows_clock() {
        let mut arcade = arcade();
        let mut surface = DrawList::new(300, 400);
        arcade.select(GameId::Racer, 0.0);
        arcade.handle_event(&HostEvent::Button(Button::Start));

        assert_eq!(arcade.pump(5.0, &mut surface), None);
        assert_eq!(
            arcade.pump(17.0, &mut surface),
            Some(TickOutcome::Advanced { scored: 0 })
        );
        assert_eq!(surface.clear, Some(colors::GRASS));
    }

    #[test]
    fn test_unready_surface_skips_tick() {
        let mut arcade = arcade();
        let mut fb = Framebuffer::new(320, 320);
        arcade.select(GameId::Snake, 0.0);
        arcade.handle_event(&HostEvent::key(Key::Down));

        fb.set_ready(false);
        assert_eq!(arcade.frame(&mut fb), None);
        fb.set_ready(true);
        assert_eq!(
            arcade.frame(&mut fb),
            Some(TickOutcome::Advanced { scored: 0 })
        );
        // Head moved down one cell and was painted there
        assert_eq!(fb.pixel(210, 230), Some(colors::SNAKE_HEAD));
    }

    #[test]
    fn test_reselect_replaces_game() {
        let mut arcade = arcade();
        arcade.select(GameId::Snake, 0.0);
        arcade.handle_event(&HostEvent::key(Key::Down));
        assert_eq!(arcade.active().unwrap().lifecycle(), Lifecycle::Running);

        arcade.select(GameId::Pipes, 100.0);
        let game = arcade.active().unwrap();
        assert_eq!(game.id(), GameId::Pipes);
        assert_eq!(game.lifecycle(), Lifecycle::NotStarted);
    }

    #[test]
    fn test_best_survives_reselect_when_writes_fail() {
        let mut arcade = Arcade::new(shared(ReadOnlyStore(MemoryStore::new())), 42);
        arcade.select(GameId::Snake, 0.0);
        let score = play_snake(&mut arcade);
        assert!(score >= u64::from(FOOD_SCORE));
        assert_eq!(arcade.active().unwrap().high_score(), score);

        arcade.back_to_menu();
        assert_eq!(arcade.high_score(GameId::Snake), Some(score));

        arcade.select(GameId::Snake, 1000.0);
        let game = arcade.active().unwrap();
        assert_eq!(game.score(), 0);
        assert_eq!(game.high_score(), score);
    }

    #[test]
    fn test_store_read_once_per_game() {
        let store = shared(MemoryStore::new());
        store.borrow_mut().set("carracing-highscore", "50").unwrap();
        let mut arcade = Arcade::new(store.clone(), 1);
        assert_eq!(arcade.high_score(GameId::Racer), None);

        arcade.select(GameId::Racer, 0.0);
        assert_eq!(arcade.high_score(GameId::Racer), Some(50));
        arcade.back_to_menu();

        // Later changes to the store are not re-read
        store.borrow_mut().set("carracing-highscore", "5").unwrap();
        arcade.select(GameId::Racer, 100.0);
        assert_eq!(arcade.active().unwrap().high_score(), 50);
    }
}
