//! Arcade Night - a small arcade host
//!
//! Core modules:
//! - `sim`: Deterministic simulation (world state, update step, collisions, lifecycle)
//! - `input`: Host events normalized into per-game commands
//! - `clock`: Fixed-cadence tick driver
//! - `renderer`: Rectangle-fill render step and its backends
//! - `persistence`: Key-value stores for high scores and settings
//! - `arcade`: Game selection and activation

pub mod arcade;
pub mod clock;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use arcade::Arcade;
pub use highscores::HighScores;
pub use settings::Settings;
pub use sim::{GameId, Lifecycle, Session};

/// Game configuration constants
pub mod consts {
    /// Continuous games run at 60 Hz
    pub const FRAME_RATE_HZ: u32 = 60;
    /// Grid game steps every 150 ms
    pub const GRID_STEP_MS: u64 = 150;

    /// Obstacle game canvas
    pub const PIPES_WIDTH: f32 = 320.0;
    pub const PIPES_HEIGHT: f32 = 480.0;
    pub const BIRD_SIZE: f32 = 20.0;
    /// Bird is pinned to the horizontal centre
    pub const BIRD_X: f32 = PIPES_WIDTH / 2.0;
    pub const GRAVITY: f32 = 0.5;
    /// Flap sets vertical velocity to this value (negative is up)
    pub const FLAP_VELOCITY: f32 = -8.0;
    pub const PIPE_WIDTH: f32 = 50.0;
    pub const PIPE_GAP: f32 = 150.0;
    pub const PIPE_SPEED: f32 = 2.0;
    pub const PIPE_SPAWN_TICKS: u64 = 90;
    /// Gap top offsets a new pipe can use: 50, 60, ..., 270
    pub const PIPE_GAP_MIN: f32 = 50.0;
    pub const PIPE_GAP_STEP: f32 = 10.0;
    pub const PIPE_GAP_SLOTS: u32 = 23;

    /// Lane game canvas
    pub const RACER_WIDTH: f32 = 300.0;
    pub const RACER_HEIGHT: f32 = 400.0;
    pub const ROAD_WIDTH: f32 = 200.0;
    pub const ROAD_X: f32 = (RACER_WIDTH - ROAD_WIDTH) / 2.0;
    pub const CAR_WIDTH: f32 = 30.0;
    pub const CAR_HEIGHT: f32 = 50.0;
    pub const PLAYER_START_X: f32 = 135.0;
    pub const PLAYER_Y: f32 = 350.0;
    pub const LANE_SHIFT: f32 = 30.0;
    /// Player car x is clamped to [PLAYER_MIN_X, PLAYER_MAX_X]
    pub const PLAYER_MIN_X: f32 = ROAD_X + 10.0;
    pub const PLAYER_MAX_X: f32 = ROAD_X + ROAD_WIDTH - CAR_WIDTH - 10.0;
    /// Enemy lane x offsets from the road edge
    pub const ENEMY_LANES: [f32; 4] = [20.0, 70.0, 120.0, 150.0];
    /// Speed bonus a spawned car may draw on top of the world speed
    pub const ENEMY_SPEED_BONUS: [f32; 4] = [0.0, 0.5, 1.0, 1.5];
    pub const RACER_START_SPEED: f32 = 2.0;
    pub const RACER_SPAWN_TICKS: u64 = 60;
    pub const RACER_RAMP_TICKS: u64 = 300;
    pub const RACER_RAMP_STEP: f32 = 0.5;
    pub const CAR_SCORE: u32 = 10;
    pub const LANE_MARK_WIDTH: f32 = 4.0;
    pub const LANE_MARK_LENGTH: f32 = 30.0;
    pub const LANE_MARK_PERIOD: f32 = 50.0;

    /// Grid game board
    pub const GRID_CANVAS: f32 = 320.0;
    pub const CELL_SIZE: f32 = 20.0;
    pub const GRID_CELLS: i32 = (GRID_CANVAS / CELL_SIZE) as i32;
    pub const SNAKE_START: (i32, i32) = (10, 10);
    pub const FOOD_START: (i32, i32) = (5, 5);
    pub const FOOD_SCORE: u32 = 10;
    /// Rejection-sampling attempts before falling back to a free-cell scan
    pub const FOOD_SAMPLE_ATTEMPTS: u32 = 64;
}
