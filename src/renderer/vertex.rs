//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use super::{Color, DrawList};
use crate::sim::Rect;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Map canvas pixels (origin top-left, y down) to NDC
pub fn pixel_to_ndc(x: f32, y: f32, canvas: (u32, u32)) -> (f32, f32) {
    let (w, h) = (canvas.0.max(1) as f32, canvas.1.max(1) as f32);
    (x / w * 2.0 - 1.0, 1.0 - y / h * 2.0)
}

/// Two triangles covering `rect`
pub fn quad(rect: &Rect, color: Color, canvas: (u32, u32)) -> [Vertex; 6] {
    let c = color.to_f32();
    let (l, t) = pixel_to_ndc(rect.left(), rect.top(), canvas);
    let (r, b) = pixel_to_ndc(rect.right(), rect.bottom(), canvas);
    [
        Vertex::new(l, t, c),
        Vertex::new(l, b, c),
        Vertex::new(r, b, c),
        Vertex::new(l, t, c),
        Vertex::new(r, b, c),
        Vertex::new(r, t, c),
    ]
}

/// Triangle list for every fill in a draw list, in paint order
pub fn tessellate(list: &DrawList) -> Vec<Vertex> {
    let canvas = (list.width, list.height);
    list.fills
        .iter()
        .flat_map(|f| quad(&f.rect, f.color, canvas))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Surface, colors};

    #[test]
    fn test_pixel_to_ndc_corners() {
        assert_eq!(pixel_to_ndc(0.0, 0.0, (320, 480)), (-1.0, 1.0));
        assert_eq!(pixel_to_ndc(320.0, 480.0, (320, 480)), (1.0, -1.0));
        assert_eq!(pixel_to_ndc(160.0, 240.0, (320, 480)), (0.0, 0.0));
    }

    #[test]
    fn test_tessellate_six_per_fill() {
        let mut list = DrawList::new(100, 100);
        list.fill_rect(Rect::new(0.0, 0.0, 50.0, 50.0), colors::PIPE);
        list.fill_rect(Rect::new(50.0, 50.0, 50.0, 50.0), colors::BIRD);

        let verts = tessellate(&list);
        assert_eq!(verts.len(), 12);
        assert_eq!(verts[0].position, [-1.0, 1.0]);
        assert_eq!(verts[8].position, [1.0, -1.0]);
        assert_eq!(verts[6].color, colors::BIRD.to_f32());
    }
}
