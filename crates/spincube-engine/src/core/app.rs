use anyhow::Result;
use winit::event::WindowEvent;
use winit::window::WindowId;

use crate::render::RenderCtx;
use crate::window::RuntimeCtx;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Surface-hosted application contract.
///
/// Call order: `on_init` once the GPU context exists, `on_resize` with the
/// initial size, then any interleaving of `on_resize`, `on_frame` and `on_tick`.
/// Everything runs on the event-loop thread.
pub trait App {
    /// Called once when the render surface becomes ready.
    ///
    /// An error is logged by the runtime; the window stays open and frames
    /// keep being delivered.
    fn on_init(&mut self, ctx: &RenderCtx<'_>) -> Result<()>;

    /// Called whenever the drawable area changes, in physical pixels.
    ///
    /// Either dimension may be zero (minimized window).
    fn on_resize(&mut self, width: u32, height: u32) {
        let _ = (width, height);
    }

    /// Called for every redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Called by the fixed-interval tick source.
    fn on_tick(&mut self, runtime: &mut RuntimeCtx) {
        let _ = runtime;
    }

    /// Called for window events before the runtime handles them.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }
}
