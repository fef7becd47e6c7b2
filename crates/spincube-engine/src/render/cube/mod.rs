//! Rotating cube renderer.
//!
//! - `mesh`: inline cube geometry (8 corners, 8 colors, 36 indices)
//! - `transform`: camera, model/view/projection matrices and the spin angle
//! - `shader`: loads, compiles and links the two WGSL stages from disk
//! - `vertex_array`: GPU buffers plus the attribute layout bound at draw time
//! - `renderer`: `CubeRenderer`, the `core::App` hosted by the window runtime

mod config;
mod mesh;
mod renderer;
mod shader;
mod transform;
mod vertex_array;

pub use config::CubeConfig;
pub use mesh::{Mesh, CUBE_COLORS, CUBE_INDICES, CUBE_POSITIONS};
pub use renderer::{CubeRenderer, RendererState};
pub use shader::{ShaderError, ShaderProgram, ShaderStage};
pub use transform::{rotation, Camera, MvpUniform, Spin, Transforms};
pub use vertex_array::VertexArray;
