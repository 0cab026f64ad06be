//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed ticks only; spawn and ramp timing is counted in ticks
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod pipes;
pub mod racer;
pub mod scroll;
pub mod snake;
pub mod state;
pub mod tick;

pub use collision::{Rect, first_overlap};
pub use pipes::{Bird, Flap, PipePair, PipeRules, Pipes};
pub use racer::{EnemyCar, PlayerCar, Racer, RacerRules, Side};
pub use scroll::{Ramp, ScrollConfig, ScrollPolicy, ScrollWorld, Scroller};
pub use snake::{Direction, Snake};
pub use state::{GameId, Lifecycle, SpawnRng, Step, StepEnd};
pub use tick::{Game, Session, TickOutcome};
