//! Grid growth game
//!
//! The snake moves one cell per tick in its committed heading. Eating food
//! grows it by exactly one segment; the food then moves to a free cell.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::state::{SpawnRng, Step};
use crate::consts::*;

/// Grid heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Cell offset, y grows downward
    pub fn delta(&self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

#[inline]
pub fn on_board(cell: IVec2) -> bool {
    (0..GRID_CELLS).contains(&cell.x) && (0..GRID_CELLS).contains(&cell.y)
}

/// Snake world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snake {
    /// Segments, head first
    pub body: VecDeque<IVec2>,
    /// Heading used by the last tick
    pub heading: Direction,
    /// Heading the next tick will commit
    pub next_heading: Direction,
    /// None once the board is full
    pub food: Option<IVec2>,
    /// Completed ticks
    pub tick: u64,
}

impl Default for Snake {
    fn default() -> Self {
        let (sx, sy) = SNAKE_START;
        let (fx, fy) = FOOD_START;
        Self {
            body: VecDeque::from([IVec2::new(sx, sy)]),
            heading: Direction::Right,
            next_heading: Direction::Right,
            food: Some(IVec2::new(fx, fy)),
            tick: 0,
        }
    }
}

impl Snake {
    pub fn head(&self) -> IVec2 {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// A heading is accepted unless it reverses the committed heading
    pub fn accepts(&self, dir: Direction) -> bool {
        dir != self.heading.opposite()
    }

    /// Record the heading for the next tick; reversals are ignored
    pub fn set_heading(&mut self, dir: Direction) {
        if self.accepts(dir) {
            self.next_heading = dir;
        }
    }

    pub fn occupies(&self, cell: IVec2) -> bool {
        self.body.contains(&cell)
    }

    /// Move one cell. Returns a terminal step on wall or self collision, or
    /// when growth leaves no free cell for the next food.
    pub fn advance(&mut self, rng: &mut SpawnRng) -> Step {
        self.heading = self.next_heading;
        let head = self.head() + self.heading.delta();

        if !on_board(head) {
            return Step::collided(0);
        }

        let eats = self.food == Some(head);
        // The tail cell is vacated this tick unless the snake grows
        let solid = if eats {
            self.body.len()
        } else {
            self.body.len() - 1
        };
        if self.body.iter().take(solid).any(|&cell| cell == head) {
            return Step::collided(0);
        }

        self.body.push_front(head);
        self.tick += 1;
        if !eats {
            self.body.pop_back();
            return Step::default();
        }

        self.food = self.place_food(&mut rng.next_rng());
        match self.food {
            Some(food) => {
                log::debug!("snake: length {}, food moved to {}", self.len(), food);
                Step {
                    scored: FOOD_SCORE,
                    ..Default::default()
                }
            }
            None => {
                log::info!("snake: board full at length {}", self.len());
                Step::cleared(FOOD_SCORE)
            }
        }
    }

    /// Uniformly pick a cell not covered by the body. Rejection sampling
    /// first; if that keeps hitting the body, choose among the free cells
    /// directly. None only when the board is full.
    pub fn place_food(&self, rng: &mut Pcg32) -> Option<IVec2> {
        for _ in 0..FOOD_SAMPLE_ATTEMPTS {
            let cell = IVec2::new(
                rng.random_range(0..GRID_CELLS),
                rng.random_range(0..GRID_CELLS),
            );
            if !self.occupies(cell) {
                return Some(cell);
            }
        }

        let free: Vec<IVec2> = (0..GRID_CELLS)
            .flat_map(|y| (0..GRID_CELLS).map(move |x| IVec2::new(x, y)))
            .filter(|&cell| !self.occupies(cell))
            .collect();
        if free.is_empty() {
            None
        } else {
            Some(free[rng.random_range(0..free.len())])
        }
    }
}
