//! GPU rendering subsystem.
//!
//! Each renderer is responsible for its own GPU resources (pipelines, buffers)
//! and records its passes into the frame's [`RenderTarget`].
//!
//! Convention:
//! - right-handed world space, +Y up
//! - clip-space depth in `[0, 1]` (wgpu), cleared to 1.0 each frame

mod ctx;
pub mod cube;

pub use ctx::{RenderCtx, RenderTarget};
