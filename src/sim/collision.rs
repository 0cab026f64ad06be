//! Axis-aligned rectangle collision
//!
//! Every continuous game reduces its actors and obstacles to rectangles in
//! canvas pixels. Overlap is strict on all four sides: boxes that only share
//! an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle, top-left origin, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of the given size centred on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Strict overlap test; touching edges is not a collision
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// True if the rectangle reaches or crosses the top or bottom of a
    /// `height`-tall field (ceiling and floor are solid)
    #[inline]
    pub fn touches_vertical_bounds(&self, height: f32) -> bool {
        self.top() <= 0.0 || self.bottom() >= height
    }

    /// Degenerate rectangles (zero width or height) never overlap anything
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }
}

/// First rectangle in `others` that overlaps `actor`
pub fn first_overlap<'a, I>(actor: &Rect, others: I) -> Option<Rect>
where
    I: IntoIterator<Item = &'a Rect>,
{
    others
        .into_iter()
        .find(|r| !r.is_empty() && actor.overlaps(r))
        .copied()
}
