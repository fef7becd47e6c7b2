//! Paint model shared by the runtime and renderers.
//!
//! Scope is limited to clear/background colors; per-vertex colors live with
//! the mesh data that uses them.

pub mod color;

pub use color::Color;
