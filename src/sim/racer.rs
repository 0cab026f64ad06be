//! Lane-dodging racer
//!
//! The player car sits near the bottom of the road and shifts sideways in
//! fixed steps. Enemy cars drop in from the top in one of four lanes; each
//! one that leaves the bottom of the screen scores.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::scroll::{Ramp, ScrollConfig, ScrollPolicy, ScrollWorld, Scroller};
use super::state::GameId;
use crate::consts::*;

/// Lateral shift request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// The player's car; only its x changes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerCar {
    pub x: f32,
}

impl Default for PlayerCar {
    fn default() -> Self {
        Self { x: PLAYER_START_X }
    }
}

impl PlayerCar {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, PLAYER_Y, CAR_WIDTH, CAR_HEIGHT)
    }

    /// Shift one step, clamped to the drivable part of the road
    pub fn shift(&mut self, side: Side) {
        let dx = match side {
            Side::Left => -LANE_SHIFT,
            Side::Right => LANE_SHIFT,
        };
        self.x = (self.x + dx).clamp(PLAYER_MIN_X, PLAYER_MAX_X);
    }
}

/// Oncoming traffic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyCar {
    /// Top-left corner
    pub pos: Vec2,
    /// Fixed when the car spawns
    pub speed: f32,
}

impl EnemyCar {
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos.x, self.pos.y, CAR_WIDTH, CAR_HEIGHT)
    }
}

/// Rules of the racer
#[derive(Debug, Clone, Copy, Default)]
pub struct RacerRules;

impl ScrollPolicy for RacerRules {
    type Actor = PlayerCar;
    type Entity = EnemyCar;
    type Command = Side;

    const ID: GameId = GameId::Racer;

    fn config(&self) -> ScrollConfig {
        ScrollConfig {
            spawn_every: RACER_SPAWN_TICKS,
            start_speed: RACER_START_SPEED,
            ramp: Some(Ramp {
                every: RACER_RAMP_TICKS,
                step: RACER_RAMP_STEP,
            }),
        }
    }

    fn initial_actor(&self) -> PlayerCar {
        PlayerCar::default()
    }

    /// Steering never starts a race; only the explicit start does
    fn starts_on(&self, _cmd: &Side) -> bool {
        false
    }

    fn apply(&self, car: &mut PlayerCar, side: Side) {
        car.shift(side);
    }

    fn move_actor(&self, _car: &mut PlayerCar) {}

    fn move_entity(&self, car: &mut EnemyCar, _speed: f32) {
        car.pos.y += car.speed;
    }

    fn spawn(&self, speed: f32, rng: &mut Pcg32) -> EnemyCar {
        let lane = ENEMY_LANES[rng.random_range(0..ENEMY_LANES.len())];
        let bonus = ENEMY_SPEED_BONUS[rng.random_range(0..ENEMY_SPEED_BONUS.len())];
        EnemyCar {
            pos: Vec2::new(ROAD_X + lane, -CAR_HEIGHT),
            speed: speed + bonus,
        }
    }

    fn has_exited(&self, car: &EnemyCar) -> bool {
        car.pos.y > RACER_HEIGHT
    }

    fn retire_credit(&self, _car: &EnemyCar) -> u32 {
        CAR_SCORE
    }

    fn collides(&self, player: &PlayerCar, car: &EnemyCar) -> bool {
        player.bounds().overlaps(&car.bounds())
    }

    fn out_of_bounds(&self, _player: &PlayerCar) -> bool {
        false
    }
}

pub type RacerWorld = ScrollWorld<PlayerCar, EnemyCar>;
pub type Racer = Scroller<RacerRules>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{SpawnRng, StepEnd};

    #[test]
    fn test_shift_clamps_left() {
        let mut car = PlayerCar::default();
        for expected in [105.0, 75.0, PLAYER_MIN_X, PLAYER_MIN_X] {
            car.shift(Side::Left);
            assert_eq!(car.x, expected);
        }
    }

    #[test]
    fn test_shift_clamps_right() {
        let mut car = PlayerCar::default();
        for expected in [165.0, 195.0, PLAYER_MAX_X, PLAYER_MAX_X] {
            car.shift(Side::Right);
            assert_eq!(car.x, expected);
        }
    }

    #[test]
    fn test_spawn_uses_lane_slots() {
        let rules = RacerRules;
        let mut rng = SpawnRng::new(11);
        for _ in 0..50 {
            let car = rules.spawn(RACER_START_SPEED, &mut rng.next_rng());
            assert!(ENEMY_LANES.iter().any(|lane| ROAD_X + lane == car.pos.x));
            assert_eq!(car.pos.y, -CAR_HEIGHT);
            assert!(car.speed >= RACER_START_SPEED && car.speed <= RACER_START_SPEED + 1.5);
        }
    }

    #[test]
    fn test_retired_car_scores() {
        let mut game = Racer::default();
        game.world.tick = 1;
        game.world.entities.push(EnemyCar {
            pos: Vec2::new(ROAD_X + ENEMY_LANES[0], RACER_HEIGHT - 1.0),
            speed: 2.0,
        });
        let mut rng = SpawnRng::new(1);

        let step = game.advance(&mut rng);
        assert_eq!(step.scored, CAR_SCORE);
        assert!(game.world.entities.is_empty());
    }

    #[test]
    fn test_head_on_collision() {
        let mut game = Racer::default();
        game.world.tick = 1;
        game.world.entities.push(EnemyCar {
            pos: Vec2::new(PLAYER_START_X, PLAYER_Y - CAR_HEIGHT),
            speed: 2.0,
        });
        let mut rng = SpawnRng::new(1);
        assert_eq!(game.advance(&mut rng).end, StepEnd::Collided);
    }

    #[test]
    fn test_bumper_to_bumper_is_safe() {
        let mut game = Racer::default();
        game.world.tick = 1;
        // Ends exactly at the player's roof after moving
        game.world.entities.push(EnemyCar {
            pos: Vec2::new(PLAYER_START_X, PLAYER_Y - CAR_HEIGHT - 2.0),
            speed: 2.0,
        });
        let mut rng = SpawnRng::new(1);
        assert_eq!(game.advance(&mut rng).end, StepEnd::Continue);
    }

    #[test]
    fn test_no_ramp_on_first_tick() {
        let mut game = Racer::default();
        let mut rng = SpawnRng::new(5);
        game.advance(&mut rng);
        assert_eq!(game.world.tick, 1);
        assert_eq!(game.world.speed, RACER_START_SPEED);
    }

    #[test]
    fn test_speed_ramp_keeps_spawned_cars() {
        let mut game = Racer::default();
        let mut rng = SpawnRng::new(5);
        for _ in 0..RACER_RAMP_TICKS {
            game.advance(&mut rng);
            game.world.entities.clear();
        }
        assert_eq!(game.world.speed, RACER_START_SPEED);

        let parked = EnemyCar {
            pos: Vec2::new(ROAD_X + ENEMY_LANES[0], 0.0),
            speed: 2.25,
        };
        game.world.entities.push(parked);
        game.advance(&mut rng);
        assert_eq!(game.world.speed, RACER_START_SPEED + RACER_RAMP_STEP);
        assert_eq!(game.world.entities[0].speed, 2.25);
    }

    #[test]
    fn test_track_scrolls_at_world_speed() {
        let mut game = Racer::default();
        let mut rng = SpawnRng::new(5);
        game.advance(&mut rng);
        assert_eq!(game.world.distance, RACER_START_SPEED);
    }
}
