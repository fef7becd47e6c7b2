//! Spincube engine crate.
//!
//! Owns the window runtime, the GPU device layer and the cube renderer hosted
//! by them. The viewer binary only wires configuration together.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
