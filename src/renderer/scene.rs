//! Scene painting for each game
//!
//! Painting is a pure read of the world; everything is a rectangle fill.

use super::{Surface, colors};
use crate::consts::*;
use crate::sim::{Lifecycle, Pipes, Racer, Rect, Snake};

/// A world that knows how to draw itself
pub trait Paint {
    /// Canvas size in pixels
    const CANVAS: (u32, u32);

    fn paint(&self, surface: &mut dyn Surface);
}

/// Paint one frame: the world, then a dimming overlay unless the game is
/// running
pub fn paint_frame<P: Paint>(world: &P, lifecycle: Lifecycle, surface: &mut dyn Surface) {
    world.paint(surface);
    if lifecycle != Lifecycle::Running {
        let (w, h) = P::CANVAS;
        surface.fill_rect(Rect::new(0.0, 0.0, w as f32, h as f32), colors::OVERLAY);
    }
}

impl Paint for Pipes {
    const CANVAS: (u32, u32) = (PIPES_WIDTH as u32, PIPES_HEIGHT as u32);

    fn paint(&self, surface: &mut dyn Surface) {
        surface.clear(colors::SKY);
        for pipe in &self.world.entities {
            surface.fill_rect(pipe.upper(), colors::PIPE);
            surface.fill_rect(pipe.lower(), colors::PIPE);
        }
        surface.fill_rect(self.world.actor.bounds(), colors::BIRD);
    }
}

/// Car body with its two windows
fn paint_car(surface: &mut dyn Surface, body: Rect, color: super::Color) {
    surface.fill_rect(body, color);
    surface.fill_rect(
        Rect::new(body.left() + 5.0, body.top() + 5.0, 20.0, 10.0),
        colors::WINDOW,
    );
    surface.fill_rect(
        Rect::new(body.left() + 5.0, body.top() + 35.0, 20.0, 10.0),
        colors::WINDOW,
    );
}

impl Paint for Racer {
    const CANVAS: (u32, u32) = (RACER_WIDTH as u32, RACER_HEIGHT as u32);

    fn paint(&self, surface: &mut dyn Surface) {
        surface.clear(colors::GRASS);
        surface.fill_rect(
            Rect::new(ROAD_X, 0.0, ROAD_WIDTH, RACER_HEIGHT),
            colors::ROAD,
        );

        // Centre line scrolls with distance travelled
        let offset = self.world.distance.rem_euclid(LANE_MARK_PERIOD);
        let x = ROAD_X + ROAD_WIDTH / 2.0 - LANE_MARK_WIDTH / 2.0;
        let marks = (RACER_HEIGHT / LANE_MARK_PERIOD) as i32;
        for i in -1..=marks {
            let y = offset + i as f32 * LANE_MARK_PERIOD;
            surface.fill_rect(
                Rect::new(x, y, LANE_MARK_WIDTH, LANE_MARK_LENGTH),
                colors::LANE_MARK,
            );
        }

        surface.fill_rect(
            Rect::new(ROAD_X - 5.0, 0.0, 5.0, RACER_HEIGHT),
            colors::ROAD_EDGE,
        );
        surface.fill_rect(
            Rect::new(ROAD_X + ROAD_WIDTH, 0.0, 5.0, RACER_HEIGHT),
            colors::ROAD_EDGE,
        );

        for car in &self.world.entities {
            paint_car(surface, car.bounds(), colors::ENEMY_CAR);
        }
        paint_car(surface, self.world.actor.bounds(), colors::PLAYER_CAR);
    }
}

fn cell_rect(cell: glam::IVec2) -> Rect {
    Rect::new(
        cell.x as f32 * CELL_SIZE,
        cell.y as f32 * CELL_SIZE,
        CELL_SIZE - 1.0,
        CELL_SIZE - 1.0,
    )
}

impl Paint for Snake {
    const CANVAS: (u32, u32) = (GRID_CANVAS as u32, GRID_CANVAS as u32);

    fn paint(&self, surface: &mut dyn Surface) {
        surface.clear(colors::BOARD);
        for (i, segment) in self.body.iter().enumerate() {
            let color = if i == 0 {
                colors::SNAKE_HEAD
            } else {
                colors::SNAKE_BODY
            };
            surface.fill_rect(cell_rect(*segment), color);
        }
        if let Some(food) = self.food {
            surface.fill_rect(cell_rect(food), colors::FOOD);
        }
    }
}
