use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::core::{render_ctx, App as CoreApp, AppControl, FrameCtx, WindowCtx};
use crate::device::{Gpu, GpuInit};
use crate::time::{FixedTicker, DEFAULT_TICK_INTERVAL};

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,

    /// Period of the tick source driving `App::on_tick`.
    pub tick_interval: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "spincube".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

/// Runtime context passed to the application.
///
/// Commands are buffered and applied after the current callback returns.
#[derive(Debug, Default)]
pub struct RuntimeCtx {
    commands: Vec<Command>,
}

impl RuntimeCtx {
    /// Schedules a redraw of the render window. Repeated requests coalesce.
    pub fn request_redraw(&mut self) {
        if !self.redraw_requested() {
            self.commands.push(Command::RequestRedraw);
        }
    }

    pub fn exit(&mut self) {
        self.commands.push(Command::Exit);
    }

    pub fn redraw_requested(&self) -> bool {
        self.commands.contains(&Command::RequestRedraw)
    }

    pub fn exit_requested(&self) -> bool {
        self.commands.contains(&Command::Exit)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Command {
    RequestRedraw,
    Exit,
}

/// Entry point for the runtime.
pub struct Runtime;

impl Runtime {
    pub fn run<A>(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Result<()>
    where
        A: 'static + CoreApp,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = AppState::new(config, gpu_init, app);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        Ok(())
    }
}

#[self_referencing]
struct WindowEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct AppState<A>
where
    A: CoreApp + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    app: A,

    window: Option<WindowEntry>,
    ticker: FixedTicker,
    exit_requested: bool,
}

impl<A> AppState<A>
where
    A: CoreApp + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, app: A) -> Self {
        let ticker = FixedTicker::new(config.tick_interval);
        Self {
            config,
            gpu_init,
            app,
            window: None,
            ticker,
            exit_requested: false,
        }
    }

    fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    /// Creates the window and its GPU context, then runs the app's init and
    /// first resize callbacks.
    fn create_window_entry(&mut self, event_loop: &ActiveEventLoop) -> Result<WindowId> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let id = window.id();
        let gpu_init = self.gpu_init.clone();

        let entry = WindowEntryTryBuilder {
            window,
            gpu_builder: |w| pollster::block_on(Gpu::new(w, gpu_init)),
        }
        .try_build()
        .context("GPU initialization failed for window")?;

        let app = &mut self.app;
        entry.with_gpu(|gpu| {
            if let Err(e) = app.on_init(&render_ctx(gpu)) {
                log::error!("renderer initialization failed: {e:#}");
            }
        });

        let size = entry.with_gpu(|gpu| gpu.size());
        self.app.on_resize(size.width, size.height);

        self.window = Some(entry);
        Ok(id)
    }

    fn handle_resize(&mut self, new_size: PhysicalSize<u32>) {
        let Some(entry) = self.window.as_mut() else { return };
        entry.with_gpu_mut(|gpu| gpu.resize(new_size));
        self.app.on_resize(new_size.width, new_size.height);
        entry.with_window(|w| w.request_redraw());
    }

    fn apply_commands(&mut self, event_loop: &ActiveEventLoop, mut ctx: RuntimeCtx) {
        for cmd in ctx.commands.drain(..) {
            match cmd {
                Command::RequestRedraw => {
                    if let Some(entry) = self.window.as_ref() {
                        entry.with_window(|w| w.request_redraw());
                    }
                }
                Command::Exit => self.request_exit(),
            }
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

impl<A> ApplicationHandler for AppState<A>
where
    A: CoreApp + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        if let Err(e) = self.create_window_entry(event_loop) {
            log::error!("failed to create render window: {e:#}");
            self.request_exit();
            event_loop.exit();
            return;
        }

        self.ticker.reset(Instant::now());
        if let Some(entry) = self.window.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.window.is_some() && self.ticker.poll(Instant::now()) {
            let mut runtime_ctx = RuntimeCtx::default();
            self.app.on_tick(&mut runtime_ctx);
            self.apply_commands(event_loop, runtime_ctx);
        }

        // Redraws happen only on request; wake up for the next tick.
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.ticker.deadline()));
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if self.exit_requested {
            event_loop.exit();
            return;
        }

        if self.app.on_window_event(window_id, &event) == AppControl::Exit {
            self.request_exit();
            event_loop.exit();
            return;
        }

        match &event {
            WindowEvent::CloseRequested => {
                // Drop GPU resources before the loop winds down.
                self.window = None;
                self.request_exit();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => self.handle_resize(*new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                let new_size = self
                    .window
                    .as_ref()
                    .map(|entry| entry.with_window(|w| w.inner_size()));
                if let Some(new_size) = new_size {
                    self.handle_resize(new_size);
                }
            }

            WindowEvent::RedrawRequested => {
                let mut runtime_ctx = RuntimeCtx::default();
                let mut app_control = AppControl::Continue;

                let (app, window) = (&mut self.app, &mut self.window);
                if let Some(entry) = window.as_mut() {
                    entry.with_mut(|fields| {
                        let mut ctx = FrameCtx {
                            window: WindowCtx {
                                id: window_id,
                                window: fields.window,
                            },
                            gpu: fields.gpu,
                            runtime: &mut runtime_ctx,
                        };

                        app_control = app.on_frame(&mut ctx);
                    });
                }

                if app_control == AppControl::Exit {
                    runtime_ctx.exit();
                }

                self.apply_commands(event_loop, runtime_ctx);
            }

            _ => {}
        }

        if self.exit_requested {
            event_loop.exit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redraw_requests_coalesce() {
        let mut ctx = RuntimeCtx::default();
        assert!(!ctx.redraw_requested());
        ctx.request_redraw();
        ctx.request_redraw();
        assert!(ctx.redraw_requested());
        assert_eq!(ctx.commands.len(), 1);
    }

    #[test]
    fn exit_is_recorded() {
        let mut ctx = RuntimeCtx::default();
        ctx.exit();
        assert!(ctx.exit_requested());
        assert!(!ctx.redraw_requested());
    }

    #[test]
    fn default_config_ticks_every_60ms() {
        let cfg = RuntimeConfig::default();
        assert_eq!(cfg.tick_interval, Duration::from_millis(60));
        assert_eq!(cfg.initial_size, LogicalSize::new(800.0, 600.0));
    }
}
