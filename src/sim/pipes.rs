//! Pipe-dodging game
//!
//! The bird is pinned to the horizontal centre and falls under gravity; a
//! flap resets its vertical velocity upward. Pipe pairs scroll in from the
//! right with a gap at one of a fixed set of heights.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, first_overlap};
use super::scroll::{ScrollConfig, ScrollPolicy, ScrollWorld, Scroller};
use super::state::GameId;
use crate::consts::*;

/// One flap impulse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flap;

/// The player-controlled bird
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Centre of the bird
    pub pos: Vec2,
    pub vel: Vec2,
}

impl Default for Bird {
    fn default() -> Self {
        Self {
            pos: Vec2::new(BIRD_X, PIPES_HEIGHT / 2.0),
            vel: Vec2::ZERO,
        }
    }
}

impl Bird {
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(BIRD_SIZE))
    }
}

/// A pipe pair with a gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PipePair {
    /// Left edge
    pub x: f32,
    /// Top of the gap
    pub gap_top: f32,
    /// Already credited for being passed
    pub passed: bool,
}

impl PipePair {
    pub fn upper(&self) -> Rect {
        Rect::new(self.x, 0.0, PIPE_WIDTH, self.gap_top)
    }

    pub fn lower(&self) -> Rect {
        let top = self.gap_top + PIPE_GAP;
        Rect::new(self.x, top, PIPE_WIDTH, PIPES_HEIGHT - top)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + PIPE_WIDTH
    }
}

/// Rules of the pipe game
#[derive(Debug, Clone, Copy, Default)]
pub struct PipeRules;

impl ScrollPolicy for PipeRules {
    type Actor = Bird;
    type Entity = PipePair;
    type Command = Flap;

    const ID: GameId = GameId::Pipes;

    fn config(&self) -> ScrollConfig {
        ScrollConfig {
            spawn_every: PIPE_SPAWN_TICKS,
            start_speed: PIPE_SPEED,
            ramp: None,
        }
    }

    fn initial_actor(&self) -> Bird {
        Bird::default()
    }

    fn starts_on(&self, _cmd: &Flap) -> bool {
        true
    }

    fn apply(&self, bird: &mut Bird, _cmd: Flap) {
        bird.vel.y = FLAP_VELOCITY;
    }

    fn move_actor(&self, bird: &mut Bird) {
        // Velocity first, then position
        bird.vel.y += GRAVITY;
        bird.pos += bird.vel;
    }

    fn move_entity(&self, pipe: &mut PipePair, speed: f32) {
        pipe.x -= speed;
    }

    fn spawn(&self, _speed: f32, rng: &mut Pcg32) -> PipePair {
        let slot = rng.random_range(0..PIPE_GAP_SLOTS);
        PipePair {
            x: PIPES_WIDTH,
            gap_top: PIPE_GAP_MIN + slot as f32 * PIPE_GAP_STEP,
            passed: false,
        }
    }

    fn credit(&self, bird: &Bird, pipe: &mut PipePair) -> u32 {
        if !pipe.passed && pipe.right() < bird.bounds().left() {
            pipe.passed = true;
            1
        } else {
            0
        }
    }

    fn has_exited(&self, pipe: &PipePair) -> bool {
        pipe.right() < 0.0
    }

    fn collides(&self, bird: &Bird, pipe: &PipePair) -> bool {
        first_overlap(&bird.bounds(), &[pipe.upper(), pipe.lower()]).is_some()
    }

    fn out_of_bounds(&self, bird: &Bird) -> bool {
        bird.bounds().touches_vertical_bounds(PIPES_HEIGHT)
    }
}

pub type PipesWorld = ScrollWorld<Bird, PipePair>;
pub type Pipes = Scroller<PipeRules>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{SpawnRng, StepEnd};

    fn pipe_at(x: f32, gap_top: f32) -> PipePair {
        PipePair {
            x,
            gap_top,
            passed: false,
        }
    }

    /// Gap centred on the bird's starting height
    const ALIGNED_GAP: f32 = PIPES_HEIGHT / 2.0 - PIPE_GAP / 2.0;

    #[test]
    fn test_gravity_without_flap() {
        let mut game = Pipes::default();
        let mut rng = SpawnRng::new(1);
        let y0 = game.world.actor.pos.y;

        let step = game.advance(&mut rng);
        assert_eq!(step.end, StepEnd::Continue);
        assert_eq!(game.world.actor.vel.y, GRAVITY);
        assert_eq!(game.world.actor.pos.y, y0 + GRAVITY);
    }

    #[test]
    fn test_flap_then_tick() {
        let mut game = Pipes::default();
        let mut rng = SpawnRng::new(1);
        let y0 = game.world.actor.pos.y;

        game.policy.apply(&mut game.world.actor, Flap);
        game.advance(&mut rng);
        assert_eq!(game.world.actor.vel.y, FLAP_VELOCITY + GRAVITY);
        assert_eq!(game.world.actor.pos.y, y0 + FLAP_VELOCITY + GRAVITY);
    }

    #[test]
    fn test_first_tick_spawns_at_right_edge() {
        let mut game = Pipes::default();
        let mut rng = SpawnRng::new(7);
        game.advance(&mut rng);

        assert_eq!(game.world.entities.len(), 1);
        let pipe = game.world.entities[0];
        assert_eq!(pipe.x, PIPES_WIDTH);
        let max_gap = PIPE_GAP_MIN + (PIPE_GAP_SLOTS - 1) as f32 * PIPE_GAP_STEP;
        assert!(pipe.gap_top >= PIPE_GAP_MIN && pipe.gap_top <= max_gap);
        assert_eq!((pipe.gap_top - PIPE_GAP_MIN) % PIPE_GAP_STEP, 0.0);
    }

    #[test]
    fn test_spawn_interval() {
        let mut game = Pipes::default();
        let mut rng = SpawnRng::new(3);
        for _ in 0..PIPE_SPAWN_TICKS {
            // Keep the bird aloft and inside every gap so no tick ends early
            game.world.actor = Bird::default();
            game.advance(&mut rng);
            for pipe in &mut game.world.entities {
                pipe.gap_top = ALIGNED_GAP;
            }
        }
        assert_eq!(game.world.entities.len(), 1);

        game.world.actor = Bird::default();
        game.advance(&mut rng);
        assert_eq!(game.world.entities.len(), 2);
    }

    #[test]
    fn test_pass_credits_once() {
        let mut game = Pipes::default();
        game.world.tick = 1;
        game.world.entities.push(pipe_at(101.0, ALIGNED_GAP));
        let mut rng = SpawnRng::new(1);

        let step = game.advance(&mut rng);
        assert_eq!(step.scored, 1);
        assert!(game.world.entities[0].passed);

        game.world.actor = Bird::default();
        let step = game.advance(&mut rng);
        assert_eq!(step.scored, 0);
    }

    #[test]
    fn test_pipe_collision_ends_tick() {
        let mut game = Pipes::default();
        game.world.tick = 1;
        // Gap far above the bird, pipe column over the bird
        game.world.entities.push(pipe_at(BIRD_X - 10.0, PIPE_GAP_MIN));
        let mut rng = SpawnRng::new(1);

        let step = game.advance(&mut rng);
        assert_eq!(step.end, StepEnd::Collided);
        assert_eq!(game.world.tick, 1);
    }

    #[test]
    fn test_upper_pipe_collision() {
        let mut game = Pipes::default();
        game.world.tick = 1;
        // Gap starts below the bird, so the upper pipe covers it
        game.world.entities.push(pipe_at(BIRD_X - 10.0, PIPES_HEIGHT / 2.0 + 30.0));
        let mut rng = SpawnRng::new(1);

        assert_eq!(game.advance(&mut rng).end, StepEnd::Collided);
    }

    #[test]
    fn test_pipe_touching_edge_is_safe() {
        let mut game = Pipes::default();
        game.world.tick = 1;
        // After moving 2px the pipe's left edge sits exactly on the bird's right edge
        let bird_right = game.world.actor.bounds().right();
        game.world.entities.push(pipe_at(bird_right + PIPE_SPEED, PIPE_GAP_MIN));
        let mut rng = SpawnRng::new(1);

        let step = game.advance(&mut rng);
        assert_eq!(step.end, StepEnd::Continue);
    }

    #[test]
    fn test_falls_to_floor() {
        let mut game = Pipes::default();
        let mut rng = SpawnRng::new(1);
        let mut ticks = 0;
        loop {
            ticks += 1;
            if game.advance(&mut rng).is_terminal() {
                break;
            }
            assert!(ticks < 100, "bird never hit the floor");
        }
        assert!(game.world.actor.bounds().bottom() >= PIPES_HEIGHT);
    }

    #[test]
    fn test_exited_pipe_retired() {
        let mut game = Pipes::default();
        game.world.tick = 1;
        game.world.entities.push(PipePair {
            x: -PIPE_WIDTH + 1.0,
            gap_top: ALIGNED_GAP,
            passed: true,
        });
        let mut rng = SpawnRng::new(1);
        game.advance(&mut rng);
        assert!(game.world.entities.is_empty());
    }
}
