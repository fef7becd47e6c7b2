//! Surface-space types shared by the runtime and renderers.
//!
//! Canonical space is physical pixels with the origin at the top-left of the
//! drawable area.

mod viewport;

pub use viewport::Viewport;
