//! Shared update step for the continuously scrolling games
//!
//! Pipes and Racer run the same per-tick skeleton and differ only in the
//! policy plugged into it: how the actor and entities move, what gets
//! spawned, what scores, and what counts as a hit.

use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{GameId, SpawnRng, Step};

/// Periodic speed increase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ramp {
    /// Ticks between increases
    pub every: u64,
    /// Added to the world speed each time
    pub step: f32,
}

/// Per-game timing and difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollConfig {
    /// Ticks between spawns (first running tick always spawns)
    pub spawn_every: u64,
    /// World speed at reset
    pub start_speed: f32,
    /// None for games without a difficulty ramp
    pub ramp: Option<Ramp>,
}

/// Strategy for one scrolling game
pub trait ScrollPolicy {
    type Actor: Clone + std::fmt::Debug;
    type Entity: Clone + std::fmt::Debug;
    type Command: Copy + std::fmt::Debug;

    const ID: GameId;

    fn config(&self) -> ScrollConfig;

    /// Actor in its documented starting configuration
    fn initial_actor(&self) -> Self::Actor;

    /// Whether `cmd` may start the game from NotStarted
    fn starts_on(&self, cmd: &Self::Command) -> bool;

    /// Apply one buffered command; out-of-range requests are clamped or ignored
    fn apply(&self, actor: &mut Self::Actor, cmd: Self::Command);

    /// Integrate the actor's own motion for one tick
    fn move_actor(&self, actor: &mut Self::Actor);

    /// Advance an entity by one tick. `speed` is the current world speed;
    /// entities that fixed their own speed at spawn may ignore it.
    fn move_entity(&self, entity: &mut Self::Entity, speed: f32);

    /// Build a new entity from one of the valid spawn slots
    fn spawn(&self, speed: f32, rng: &mut Pcg32) -> Self::Entity;

    /// Score earned by `entity` this tick while still live. Implementations
    /// mark the entity so it never credits twice.
    fn credit(&self, _actor: &Self::Actor, _entity: &mut Self::Entity) -> u32 {
        0
    }

    /// Entity has fully left the visible area on the trailing side
    fn has_exited(&self, entity: &Self::Entity) -> bool;

    /// Score for retiring an exited entity
    fn retire_credit(&self, _entity: &Self::Entity) -> u32 {
        0
    }

    /// Collision predicate between actor and one live entity
    fn collides(&self, actor: &Self::Actor, entity: &Self::Entity) -> bool;

    /// Actor has hit the world bounds
    fn out_of_bounds(&self, actor: &Self::Actor) -> bool;
}

/// World of a scrolling game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrollWorld<A, E> {
    pub actor: A,
    /// Live entities in spawn order
    pub entities: Vec<E>,
    /// Completed ticks
    pub tick: u64,
    /// Global speed scalar
    pub speed: f32,
    /// Total distance scrolled, drives track decorations
    pub distance: f32,
}

/// A scrolling game: its policy plus the world it drives
#[derive(Debug, Clone)]
pub struct Scroller<P: ScrollPolicy> {
    pub policy: P,
    pub world: ScrollWorld<P::Actor, P::Entity>,
}

impl<P: ScrollPolicy + Default> Default for Scroller<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P: ScrollPolicy> Scroller<P> {
    pub fn new(policy: P) -> Self {
        let world = ScrollWorld {
            actor: policy.initial_actor(),
            entities: Vec::new(),
            tick: 0,
            speed: policy.config().start_speed,
            distance: 0.0,
        };
        Self { policy, world }
    }

    /// Advance the world by one tick. Queued input must already be applied.
    pub fn advance(&mut self, rng: &mut SpawnRng) -> Step {
        let policy = &self.policy;
        let world = &mut self.world;
        let config = policy.config();

        policy.move_actor(&mut world.actor);
        for entity in &mut world.entities {
            policy.move_entity(entity, world.speed);
        }
        world.distance += world.speed;

        if world.tick % config.spawn_every == 0 {
            let entity = policy.spawn(world.speed, &mut rng.next_rng());
            log::debug!("{}: spawn at tick {}: {:?}", P::ID, world.tick, entity);
            world.entities.push(entity);
        }

        let mut scored = 0;
        for entity in &mut world.entities {
            scored += policy.credit(&world.actor, entity);
        }
        world.entities.retain(|entity| {
            if policy.has_exited(entity) {
                scored += policy.retire_credit(entity);
                false
            } else {
                true
            }
        });

        if policy.out_of_bounds(&world.actor)
            || world
                .entities
                .iter()
                .any(|entity| policy.collides(&world.actor, entity))
        {
            return Step::collided(scored);
        }

        if let Some(ramp) = config.ramp {
            // First ramp lands on tick `every`; tick 0 keeps the starting speed
            if world.tick > 0 && world.tick % ramp.every == 0 {
                world.speed += ramp.step;
                log::debug!("{}: speed ramped to {}", P::ID, world.speed);
            }
        }

        world.tick += 1;
        Step {
            scored,
            ..Default::default()
        }
    }
}
