//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - owning the depth and multisample attachments that track the surface size
//! - acquiring frames and providing encoders/views for rendering

mod gpu;
mod targets;

pub use gpu::{Gpu, GpuFrame, GpuInit, SurfaceErrorAction};
pub use targets::{choose_sample_count, FrameTargets, DEPTH_FORMAT};
