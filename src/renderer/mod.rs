//! WebGPU rendering module
//!
//! Flat-colored triangles built on the CPU each frame from the session.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use shapes::{scene_vertices, sky_color};
pub use vertex::Vertex;
