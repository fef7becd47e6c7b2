//! Time subsystem.
//!
//! Provides a fixed-interval tick source without coupling to the runtime.
//! Intended usage:
//! - one `FixedTicker` per render loop
//! - call `poll()` when the event loop wakes; feed `deadline()` back into `WaitUntil`

mod ticker;

pub use ticker::{FixedTicker, DEFAULT_TICK_INTERVAL};
