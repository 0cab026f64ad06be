//! Render step
//!
//! Games paint themselves with rectangle fills only, onto anything that
//! implements `Surface`: the software `Framebuffer`, a recorded `DrawList`,
//! or the WebGPU backend (which replays a `DrawList` as quads).

pub mod framebuffer;
pub mod pipeline;
pub mod scene;
pub mod vertex;

pub use framebuffer::Framebuffer;
pub use pipeline::RenderState;
pub use scene::{Paint, paint_frame};

use crate::sim::Rect;

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque colour from `0xRRGGBB`
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
            a: 255,
        }
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// Normalized components for GPU vertices
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

/// Colours for game elements
pub mod colors {
    use super::Color;

    pub const BLACK: Color = Color::hex(0x000000);
    pub const WHITE: Color = Color::hex(0xffffff);
    /// Dims the board behind start/game-over prompts
    pub const OVERLAY: Color = Color::rgba(0, 0, 0, 160);

    pub const SKY: Color = BLACK;
    pub const PIPE: Color = Color::hex(0x00ff00);
    pub const BIRD: Color = Color::hex(0xffff00);

    pub const GRASS: Color = Color::hex(0x228b22);
    pub const ROAD: Color = Color::hex(0x333333);
    pub const LANE_MARK: Color = WHITE;
    pub const ROAD_EDGE: Color = WHITE;
    pub const ENEMY_CAR: Color = Color::hex(0xff0000);
    pub const PLAYER_CAR: Color = Color::hex(0x00ff00);
    pub const WINDOW: Color = BLACK;

    pub const BOARD: Color = BLACK;
    pub const SNAKE_HEAD: Color = Color::hex(0x00ff88);
    pub const SNAKE_BODY: Color = Color::hex(0x00ff00);
    pub const FOOD: Color = Color::hex(0xff0000);
}

/// A 2D raster target that can only fill rectangles
pub trait Surface {
    /// Size in pixels
    fn size(&self) -> (u32, u32);

    /// A surface that is not ready makes the host skip the whole frame
    fn is_ready(&self) -> bool {
        true
    }

    fn clear(&mut self, color: Color);

    fn fill_rect(&mut self, rect: Rect, color: Color);
}

/// One recorded fill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillCommand {
    pub rect: Rect,
    pub color: Color,
}

/// Surface that records fills for a backend to replay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub width: u32,
    pub height: u32,
    pub clear: Option<Color>,
    pub fills: Vec<FillCommand>,
}

impl DrawList {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            clear: None,
            fills: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.fills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fills.is_empty()
    }

    /// Fills painted in a given colour, in paint order
    pub fn with_color(&self, color: Color) -> impl Iterator<Item = &Rect> {
        self.fills
            .iter()
            .filter(move |f| f.color == color)
            .map(|f| &f.rect)
    }

    /// Replay onto another surface
    pub fn replay(&self, target: &mut dyn Surface) {
        if let Some(color) = self.clear {
            target.clear(color);
        }
        for fill in &self.fills {
            target.fill_rect(fill.rect, fill.color);
        }
    }
}

impl Surface for DrawList {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self, color: Color) {
        self.clear = Some(color);
        self.fills.clear();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        if rect.is_empty() || color.a == 0 {
            return;
        }
        self.fills.push(FillCommand { rect, color });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(colors::ROAD, Color::rgba(0x33, 0x33, 0x33, 255));
        assert_eq!(colors::SNAKE_HEAD, Color::rgba(0, 0xff, 0x88, 255));
        assert!(!colors::OVERLAY.is_opaque());
        assert_eq!(colors::WHITE.to_f32(), [1.0; 4]);
    }

    #[test]
    fn test_draw_list_records_and_clears() {
        let mut list = DrawList::new(10, 10);
        list.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), colors::FOOD);
        list.fill_rect(Rect::new(0.0, 0.0, 0.0, 0.0), colors::FOOD);
        assert_eq!(list.len(), 1);

        list.clear(colors::BLACK);
        assert!(list.is_empty());
        assert_eq!(list.clear, Some(colors::BLACK));
    }
}
