//! Game lifecycle and the per-tick driver
//!
//! A `Session` owns one game's world, its lifecycle, the score and the high
//! score gateway. Input is buffered and only applied at the top of the next
//! tick, so every tick sees one consistent view of "current input".

use std::collections::VecDeque;

use super::pipes::Pipes;
use super::racer::Racer;
use super::scroll::{ScrollPolicy, Scroller};
use super::snake::{Direction, Snake};
use super::state::{GameId, Lifecycle, SpawnRng, Step, StepEnd};
use crate::highscores::HighScores;
use crate::persistence::SharedStore;

/// Buffered commands beyond this are dropped until the next tick drains them
pub const MAX_PENDING_COMMANDS: usize = 32;

/// Per-game glue between a world and the session that drives it
pub trait Game {
    type Command: Copy + std::fmt::Debug;

    const ID: GameId;

    /// World in its documented starting configuration
    fn initial() -> Self;

    /// Whether `cmd` is a qualifying start input
    fn starts_on(&self, cmd: &Self::Command) -> bool;

    /// Apply one buffered command; invalid commands are no-ops
    fn apply(&mut self, cmd: Self::Command);

    /// Advance one tick
    fn step(&mut self, rng: &mut SpawnRng) -> Step;

    /// Completed ticks
    fn ticks(&self) -> u64;
}

impl<P: ScrollPolicy + Default> Game for Scroller<P> {
    type Command = P::Command;

    const ID: GameId = P::ID;

    fn initial() -> Self {
        Self::default()
    }

    fn starts_on(&self, cmd: &P::Command) -> bool {
        self.policy.starts_on(cmd)
    }

    fn apply(&mut self, cmd: P::Command) {
        self.policy.apply(&mut self.world.actor, cmd);
    }

    fn step(&mut self, rng: &mut SpawnRng) -> Step {
        self.advance(rng)
    }

    fn ticks(&self) -> u64 {
        self.world.tick
    }
}

impl Game for Snake {
    type Command = Direction;

    const ID: GameId = GameId::Snake;

    fn initial() -> Self {
        Self::default()
    }

    fn starts_on(&self, dir: &Direction) -> bool {
        self.accepts(*dir)
    }

    fn apply(&mut self, dir: Direction) {
        self.set_heading(dir);
    }

    fn step(&mut self, rng: &mut SpawnRng) -> Step {
        self.advance(rng)
    }

    fn ticks(&self) -> u64 {
        self.tick
    }
}

/// What a call to `Session::tick` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not running; nothing changed
    Idle,
    /// World advanced
    Advanced { scored: u32 },
    /// This tick ended the game
    Ended {
        end: StepEnd,
        final_score: u64,
        new_best: bool,
    },
}

/// Game lifecycle controller
pub struct Session<G: Game> {
    game: G,
    lifecycle: Lifecycle,
    score: u64,
    high_scores: HighScores,
    pending: VecDeque<G::Command>,
    seed: u64,
    runs: u64,
    rng: SpawnRng,
}

impl<G: Game> Session<G> {
    /// Fresh session; reads the stored high score
    pub fn new(seed: u64, store: SharedStore) -> Self {
        Self::with_high_scores(seed, HighScores::load(G::ID, store))
    }

    /// Fresh session over a record that was already loaded, so the best
    /// score carries over from an earlier activation
    pub fn with_high_scores(seed: u64, high_scores: HighScores) -> Self {
        debug_assert_eq!(high_scores.game(), G::ID);
        log::info!(
            "{}: new session (seed {}, best {})",
            G::ID,
            seed,
            high_scores.best()
        );
        Self {
            game: G::initial(),
            lifecycle: Lifecycle::NotStarted,
            score: 0,
            high_scores,
            pending: VecDeque::new(),
            seed,
            runs: 0,
            rng: SpawnRng::new(seed),
        }
    }

    pub fn id(&self) -> GameId {
        G::ID
    }

    /// Give back the high score record when the session is discarded
    pub fn into_high_scores(self) -> HighScores {
        self.high_scores
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_scores.best()
    }

    /// Commands waiting for the next tick
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Explicit start (start button). NotStarted -> Running only.
    pub fn start(&mut self) -> bool {
        if self.lifecycle != Lifecycle::NotStarted {
            return false;
        }
        self.lifecycle = Lifecycle::Running;
        log::info!("{}: started", G::ID);
        true
    }

    /// Queue a game command for the next tick. While NotStarted only a
    /// qualifying start input is accepted (and starts the game); while Over
    /// everything is ignored.
    pub fn command(&mut self, cmd: G::Command) {
        match self.lifecycle {
            Lifecycle::NotStarted => {
                if self.game.starts_on(&cmd) {
                    self.start();
                    self.enqueue(cmd);
                }
            }
            Lifecycle::Running => self.enqueue(cmd),
            Lifecycle::Over => {}
        }
    }

    fn enqueue(&mut self, cmd: G::Command) {
        if self.pending.len() < MAX_PENDING_COMMANDS {
            self.pending.push_back(cmd);
        } else {
            log::debug!("{}: input buffer full, dropping {:?}", G::ID, cmd);
        }
    }

    /// Reinitialize the world and clear the score. Accepted from Over and
    /// NotStarted; a running game cannot be reset.
    pub fn reset(&mut self) -> bool {
        if self.lifecycle == Lifecycle::Running {
            return false;
        }
        self.runs += 1;
        self.game = G::initial();
        self.lifecycle = Lifecycle::NotStarted;
        self.score = 0;
        self.pending.clear();
        self.rng = SpawnRng::new(self.seed.wrapping_add(self.runs));
        log::info!("{}: reset (run {})", G::ID, self.runs);
        true
    }

    /// Advance one tick. No-op unless Running.
    pub fn tick(&mut self) -> TickOutcome {
        if self.lifecycle != Lifecycle::Running {
            return TickOutcome::Idle;
        }

        while let Some(cmd) = self.pending.pop_front() {
            self.game.apply(cmd);
        }

        let step = self.game.step(&mut self.rng);
        self.score += u64::from(step.scored);

        if step.is_terminal() {
            self.finish(step.end)
        } else {
            TickOutcome::Advanced {
                scored: step.scored,
            }
        }
    }

    fn finish(&mut self, end: StepEnd) -> TickOutcome {
        self.lifecycle = Lifecycle::Over;
        let new_best = self.high_scores.record(self.score);
        log::info!(
            "{}: game over ({:?}) after {} ticks, score {}{}",
            G::ID,
            end,
            self.game.ticks(),
            self.score,
            if new_best { ", new best!" } else { "" }
        );
        TickOutcome::Ended {
            end,
            final_score: self.score,
            new_best,
        }
    }
}

/// Sessions for each hosted game
pub type PipesSession = Session<Pipes>;
pub type SnakeSession = Session<Snake>;
pub type RacerSession = Session<Racer>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{FLAP_VELOCITY, GRAVITY};
    use crate::persistence::{MemoryStore, shared};
    use crate::sim::pipes::Flap;
    use crate::sim::racer::Side;

    fn session<G: Game>() -> Session<G> {
        Session::new(12345, shared(MemoryStore::default()))
    }

    #[test]
    fn test_tick_idle_until_started() {
        let mut s = session::<Snake>();
        assert_eq!(s.tick(), TickOutcome::Idle);
        assert_eq!(s.game().tick, 0);
        assert_eq!(s.lifecycle(), Lifecycle::NotStarted);
    }

    #[test]
    fn test_flap_starts_pipes() {
        let mut s = session::<Pipes>();
        s.command(Flap);
        assert_eq!(s.lifecycle(), Lifecycle::Running);
        assert_eq!(s.pending(), 1);

        s.tick();
        assert_eq!(s.game().world.actor.vel.y, FLAP_VELOCITY + GRAVITY);
    }

    #[test]
    fn test_steering_does_not_start_racer() {
        let mut s = session::<Racer>();
        s.command(Side::Left);
        assert_eq!(s.lifecycle(), Lifecycle::NotStarted);
        assert_eq!(s.pending(), 0);

        assert!(s.start());
        s.command(Side::Left);
        s.tick();
        assert_eq!(s.game().world.actor.x, 105.0);
    }

    #[test]
    fn test_reversal_does_not_start_snake() {
        let mut s = session::<Snake>();
        s.command(Direction::Left);
        assert_eq!(s.lifecycle(), Lifecycle::NotStarted);
        s.command(Direction::Up);
        assert_eq!(s.lifecycle(), Lifecycle::Running);
    }

    #[test]
    fn test_input_applied_at_next_tick() {
        let mut s = session::<Snake>();
        s.start();
        s.command(Direction::Down);
        // Not applied until the tick runs
        assert_eq!(s.game().next_heading, Direction::Right);
        s.tick();
        assert_eq!(s.game().heading, Direction::Down);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn test_game_over_records_best() {
        let mut s = session::<Pipes>();
        s.start();
        let mut outcome = TickOutcome::Idle;
        for _ in 0..100 {
            outcome = s.tick();
            if matches!(outcome, TickOutcome::Ended { .. }) {
                break;
            }
        }
        assert!(matches!(
            outcome,
            TickOutcome::Ended {
                end: StepEnd::Collided,
                final_score: 0,
                new_best: false
            }
        ));
        assert_eq!(s.lifecycle(), Lifecycle::Over);

        // Over ignores input and ticks
        s.command(Flap);
        assert_eq!(s.pending(), 0);
        assert_eq!(s.tick(), TickOutcome::Idle);
    }

    #[test]
    fn test_reset_rules() {
        let mut s = session::<Racer>();
        s.start();
        assert!(!s.reset());
        assert_eq!(s.lifecycle(), Lifecycle::Running);
    }

    #[test]
    fn test_best_carries_into_next_session() {
        let mut s = session::<Snake>();
        s.command(Direction::Up);
        for _ in 0..5 {
            s.tick();
        }
        s.command(Direction::Left);
        while s.lifecycle() == Lifecycle::Running {
            s.tick();
        }
        let best = s.high_score();
        assert!(best > 0);

        let next = Session::<Snake>::with_high_scores(7, s.into_high_scores());
        assert_eq!(next.high_score(), best);
        assert_eq!(next.score(), 0);
        assert_eq!(next.lifecycle(), Lifecycle::NotStarted);
    }

    #[test]
    fn test_input_buffer_is_bounded() {
        let mut s = session::<Racer>();
        s.start();
        for _ in 0..MAX_PENDING_COMMANDS + 10 {
            s.command(Side::Right);
        }
        assert_eq!(s.pending(), MAX_PENDING_COMMANDS);
    }
}
