//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the single render window, wires them to the
//! GPU layer and drives the fixed-interval tick source.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
