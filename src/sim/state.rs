//! Game state and core simulation types
//!
//! Shared by every game: the lifecycle state machine, game identifiers,
//! the outcome of one update step, and the seeded spawn RNG.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Coarse lifecycle of a game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Waiting for the first qualifying input
    #[default]
    NotStarted,
    /// Ticks advance the world
    Running,
    /// Ended by a terminal collision (or a full grid board)
    Over,
}

/// The games the arcade can host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameId {
    /// Side-scrolling pipe dodging with gravity and flaps
    Pipes,
    /// Grid growth game
    Snake,
    /// Lane-dodging cars on a scrolling road
    Racer,
}

impl GameId {
    /// Every selectable game, in menu order
    pub const ALL: [GameId; 3] = [GameId::Pipes, GameId::Snake, GameId::Racer];

    /// Stable identifier, also the prefix of the persisted high-score key
    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::Pipes => "flappybird",
            GameId::Snake => "snake",
            GameId::Racer => "carracing",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameId::Pipes => "Flappy Bird",
            GameId::Snake => "Snake",
            GameId::Racer => "Car Racing",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "flappybird" | "flappy" | "pipes" | "bird" => Some(GameId::Pipes),
            "snake" => Some(GameId::Snake),
            "carracing" | "racer" | "cars" | "car" => Some(GameId::Racer),
            _ => None,
        }
    }

    /// Key used in the persistent store
    pub fn highscore_key(&self) -> String {
        format!("{}-highscore", self.as_str())
    }
}

impl std::fmt::Display for GameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a tick ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepEnd {
    /// World advanced normally
    #[default]
    Continue,
    /// Actor hit an obstacle, a wall or itself
    Collided,
    /// Grid board has no free cell left for food
    Cleared,
}

/// Result of one update step. The step reports score deltas; the session
/// owns the score itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Step {
    pub scored: u32,
    pub end: StepEnd,
}

impl Step {
    pub fn collided(scored: u32) -> Self {
        Self {
            scored,
            end: StepEnd::Collided,
        }
    }

    pub fn cleared(scored: u32) -> Self {
        Self {
            scored,
            end: StepEnd::Cleared,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.end != StepEnd::Continue
    }
}

/// Spawn RNG: every draw site gets a fresh generator built from the run seed
/// and an increasing stream index, so spawn choices depend only on how many
/// spawns happened, never on timing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnRng {
    pub seed: u64,
    pub stream: u64,
}

impl SpawnRng {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Generator for the next spawn
    pub fn next_rng(&mut self) -> Pcg32 {
        let rng = Pcg32::new(self.seed, self.stream);
        self.stream += 1;
        rng
    }
}
