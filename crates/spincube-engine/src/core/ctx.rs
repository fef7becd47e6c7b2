use winit::window::{Window, WindowId};

use crate::coords::Viewport;
use crate::device::{Gpu, SurfaceErrorAction, DEPTH_FORMAT};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id:     WindowId,
    pub window: &'a Window,
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window:  WindowCtx<'a>,
    pub gpu:     &'a mut Gpu<'w>,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Clears color and depth, calls `draw` with a ready [`RenderCtx`] and
    /// [`RenderTarget`], then presents the frame.
    ///
    /// The clear happens even when `draw` records nothing.
    pub fn render<F>(&mut self, clear: Color, draw: F) -> AppControl
    where
        F: FnOnce(&RenderCtx<'_>, &mut RenderTarget<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                log::debug!("frame skipped: {action:?}");
                if action == SurfaceErrorAction::Fatal {
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        {
            let gpu: &Gpu<'w> = &*self.gpu;
            let targets = gpu.targets();
            let size = gpu.configured_size();

            let (color_view, resolve_target) = match targets.msaa_view.as_ref() {
                Some(msaa) => (msaa, Some(&frame.view)),
                None => (&frame.view, None),
            };

            let mut target = RenderTarget::new(
                &mut frame.encoder,
                color_view,
                resolve_target,
                &targets.depth_view,
                (size.width, size.height),
            );

            // Clear pass; dropped before `draw` records its own passes.
            {
                let _rpass = target.begin_pass("spincube clear", Some(clear));
            }

            let rctx = render_ctx(gpu);
            draw(&rctx, &mut target);
        }

        self.window.window.pre_present_notify();
        self.gpu.submit(frame);

        AppControl::Continue
    }
}

/// Builds a [`RenderCtx`] describing `gpu`'s device and attachments.
pub(crate) fn render_ctx<'g>(gpu: &'g Gpu<'_>) -> RenderCtx<'g> {
    let size = gpu.size();
    RenderCtx::new(
        gpu.device(),
        gpu.queue(),
        gpu.surface_format(),
        DEPTH_FORMAT,
        gpu.sample_count(),
        Viewport::from_physical(size.width, size.height),
    )
}
