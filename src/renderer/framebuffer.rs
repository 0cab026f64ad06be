//! Software RGBA raster
//!
//! Used by the headless host and by tests that check what a frame looks
//! like. Edges are snapped to the nearest pixel; fills are clipped to the
//! surface and alpha-blended over what is already there.

use super::{Color, Surface};
use crate::sim::Rect;

#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    ready: bool,
}

impl Framebuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::default(); (width * height) as usize],
            ready: true,
        }
    }

    /// Mark the target (un)available; an unavailable target skips frames
    pub fn set_ready(&mut self, ready: bool) {
        self.ready = ready;
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Pixels equal to `color`
    pub fn count(&self, color: Color) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Raw RGBA bytes, row-major
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, c.a])
            .collect()
    }

    /// Clip a rectangle to pixel spans
    fn span(&self, rect: &Rect) -> Option<(u32, u32, u32, u32)> {
        let snap = |v: f32, max: u32| v.round().clamp(0.0, max as f32) as u32;
        let x0 = snap(rect.left(), self.width);
        let x1 = snap(rect.right(), self.width);
        let y0 = snap(rect.top(), self.height);
        let y1 = snap(rect.bottom(), self.height);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0, x1, y0, y1))
    }
}

fn blend(dst: Color, src: Color) -> Color {
    if src.is_opaque() {
        return src;
    }
    let a = src.a as u32;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * (255 - a)) / 255) as u8;
    Color {
        r: mix(src.r, dst.r),
        g: mix(src.g, dst.g),
        b: mix(src.b, dst.b),
        a: 255,
    }
}

impl Surface for Framebuffer {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn is_ready(&self) -> bool {
        self.ready
    }

    fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, x1, y0, y1)) = self.span(&rect) else {
            return;
        };
        for y in y0..y1 {
            let row = (y * self.width) as usize;
            for x in x0..x1 {
                let p = &mut self.pixels[row + x as usize];
                *p = blend(*p, color);
            }
        }
    }
}
