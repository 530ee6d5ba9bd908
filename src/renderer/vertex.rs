//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

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

/// Colors for scene elements (before ambient light)
pub mod colors {
    pub const ROAD_DAY: [f32; 4] = [0.42, 0.44, 0.46, 1.0];
    pub const ROAD_NIGHT: [f32; 4] = [0.16, 0.17, 0.24, 1.0];
    pub const VERGE_DAY: [f32; 4] = [0.35, 0.62, 0.3, 1.0];
    pub const VERGE_NIGHT: [f32; 4] = [0.1, 0.22, 0.16, 1.0];
    pub const LANE_MARK: [f32; 4] = [0.95, 0.95, 0.85, 1.0];
    pub const BIKE_DAY: [f32; 4] = [0.15, 0.45, 0.9, 1.0];
    pub const BIKE_NIGHT: [f32; 4] = [0.55, 0.85, 1.0, 1.0];
    pub const RIDER: [f32; 4] = [0.95, 0.8, 0.6, 1.0];
    pub const CAR: [f32; 4] = [0.85, 0.2, 0.2, 1.0];
    pub const CAR_WINDOW: [f32; 4] = [0.6, 0.8, 0.95, 1.0];
    pub const HURDLE: [f32; 4] = [0.95, 0.6, 0.1, 1.0];
    pub const HURDLE_STRIPE: [f32; 4] = [0.98, 0.98, 0.98, 1.0];
    pub const HEADLIGHT: [f32; 4] = [1.0, 0.95, 0.7, 0.35];
    pub const SKY_DAY: [f32; 4] = [0.53, 0.75, 0.92, 1.0];
    pub const SKY_NIGHT: [f32; 4] = [0.03, 0.03, 0.1, 1.0];
}
