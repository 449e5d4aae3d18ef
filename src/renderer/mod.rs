//! WebGPU rendering module
//!
//! Tessellates the scene's draw list into flat-colored triangles.

pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, surface_to_ndc};
pub use vertex::Vertex;
