use anyhow::{Context, Result};
use glam::Mat4;

use crate::coords::Viewport;
use crate::core::{App, AppControl, FrameCtx};
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};
use crate::window::RuntimeCtx;

use super::config::CubeConfig;
use super::mesh::Mesh;
use super::shader::ShaderProgram;
use super::transform::{MvpUniform, Spin, Transforms};
use super::vertex_array::VertexArray;

/// Lifecycle state of a [`CubeRenderer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RendererState {
    /// No linked program; frames only clear.
    Uninitialized,
    /// Program linked and geometry uploaded.
    Ready,
}

/// Renders one colored cube spinning about +Y.
///
/// Host callbacks come through [`App`]: `on_init` uploads the mesh and links
/// the shaders, `on_resize` refreshes the projection, `on_frame` draws, and
/// every tick advances the spin via [`CubeRenderer::advance_animation`].
pub struct CubeRenderer {
    config: CubeConfig,
    clear_color: Color,
    viewport: Viewport,
    transforms: Transforms,
    spin: Spin,

    /// Unset until `on_init` links the program and uploads the mesh.
    program: Option<CubeProgram>,
}

impl CubeRenderer {
    pub fn new(config: CubeConfig) -> Self {
        let spin = Spin::new(config.degrees_per_tick);
        let clear_color = if config.clear_color.is_finite() {
            config.clear_color.clamped()
        } else {
            log::warn!("clear color {:?} is not finite; using black", config.clear_color);
            Color::black()
        };
        Self {
            clear_color,
            config,
            viewport: Viewport::default(),
            transforms: Transforms::default(),
            spin,
            program: None,
        }
    }

    pub fn state(&self) -> RendererState {
        if self.program.is_some() {
            RendererState::Ready
        } else {
            RendererState::Uninitialized
        }
    }

    pub fn transforms(&self) -> &Transforms {
        &self.transforms
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Current spin in degrees.
    pub fn angle(&self) -> f32 {
        self.spin.degrees()
    }

    /// Number of indices uploaded to the GPU, once ready.
    pub fn index_count(&self) -> Option<u32> {
        self.program.as_ref().map(|p| p.vertex_array.index_count())
    }

    /// Matrix the next frame uploads as `MVP`.
    pub fn frame_mvp(&self) -> Mat4 {
        self.transforms.mvp(self.spin.degrees())
    }

    /// Recomputes model, view and projection for the current viewport.
    ///
    /// The view does not depend on the viewport; recomputing it here keeps the
    /// three matrices in one place.
    pub fn init_view(&mut self) {
        self.transforms.update(&self.config.camera, self.viewport);
    }

    /// Loads, compiles and links both shader stages for a device exposing
    /// `features`. Touches no GPU state.
    pub fn load_shaders(&self, features: wgpu::Features) -> Result<ShaderProgram> {
        ShaderProgram::load_for(&self.config.vertex_shader, &self.config.fragment_shader, features)
            .context("failed to build the cube shader program")
    }

    /// Links the shader program and uploads the cube.
    ///
    /// On failure nothing is kept and the previous state is unchanged.
    pub fn init_program(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        let program = self.load_shaders(ctx.device.features())?;
        let gpu = CubeProgram::new(ctx, &program, &Mesh::cube())
            .context("the device rejected the cube shader program")?;

        self.program = Some(gpu);
        Ok(())
    }

    /// Advances the spin by one step and asks the host for a redraw.
    pub fn advance_animation(&mut self, runtime: &mut RuntimeCtx) {
        self.spin.advance();
        log::trace!("spin: {:.1} deg", self.spin.degrees());
        runtime.request_redraw();
    }

    /// Records the cube pass into `target`, after the frame clear.
    ///
    /// Returns `false` without touching `target` when no program exists or
    /// the viewport has no area.
    pub fn draw(&self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) -> bool {
        let Some(program) = self.program.as_ref() else { return false };
        let Some((w, h)) = self.viewport.clamped_to(target.width, target.height) else {
            return false;
        };

        let uniform = MvpUniform::from(self.frame_mvp());
        ctx.queue.write_buffer(&program.mvp_ubo, 0, bytemuck::bytes_of(&uniform));

        let mut rpass = target.begin_pass("spincube cube pass", None);
        rpass.set_viewport(0.0, 0.0, w, h, 0.0, 1.0);

        rpass.set_pipeline(&program.pipeline);
        rpass.set_bind_group(0, &program.bind_group, &[]);
        program.vertex_array.bind(&mut rpass);
        rpass.draw_indexed(0..program.vertex_array.index_count(), 0, 0..1);

        true
    }
}

impl App for CubeRenderer {
    fn on_init(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        self.viewport = ctx.viewport;
        self.init_view();

        if let Err(e) = self.init_program(ctx) {
            self.program = None;
            return Err(e);
        }

        log::info!(
            "cube renderer ready ({} indices, {}x MSAA, depth {:?})",
            self.index_count().unwrap_or(0),
            ctx.sample_count,
            ctx.depth_format,
        );
        Ok(())
    }

    fn on_resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::from_physical(width, height);
        self.init_view();
        log::debug!("resized to {width}x{height} (aspect {:.3})", self.viewport.aspect_ratio());
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let this = &*self;
        ctx.render(this.clear_color, |rctx, target| {
            this.draw(rctx, target);
        })
    }

    fn on_tick(&mut self, runtime: &mut RuntimeCtx) {
        self.advance_animation(runtime);
    }
}

/// GPU side of a linked program: pipeline, `MVP` uniform and uploaded mesh.
struct CubeProgram {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    mvp_ubo: wgpu::Buffer,
    vertex_array: VertexArray,
}

impl CubeProgram {
    /// Creates every GPU object inside one validation scope, so a module the
    /// device refuses surfaces as an error instead of an uncaptured panic.
    fn new(ctx: &RenderCtx<'_>, program: &ShaderProgram, mesh: &Mesh<'_>) -> Result<Self> {
        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vs_module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("spincube cube vertex shader"),
            source: wgpu::ShaderSource::Wgsl(program.vertex.source.as_str().into()),
        });
        let fs_module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("spincube cube fragment shader"),
            source: wgpu::ShaderSource::Wgsl(program.fragment.source.as_str().into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("spincube cube bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: program.mvp_binding,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(mvp_ubo_min_binding_size()),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("spincube cube pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let vertex_array = VertexArray::new(
            ctx.device,
            mesh,
            program.vertex_location,
            program.color_location,
        );

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("spincube cube pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &vs_module,
                entry_point: Some(program.vertex_entry.as_str()),
                compilation_options: Default::default(),
                buffers: &vertex_array.layouts(),
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs_module,
                entry_point: Some(program.fragment_entry.as_str()),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            // Culling stays off; winding is still outward CCW.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: Some(wgpu::DepthStencilState {
                format: ctx.depth_format,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),

            multisample: wgpu::MultisampleState {
                count: ctx.sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },

            multiview_mask: None,
            cache: None,
        });

        let mvp_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("spincube cube mvp ubo"),
            size: std::mem::size_of::<MvpUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("spincube cube bind group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: program.mvp_binding,
                resource: mvp_ubo.as_entire_binding(),
            }],
        });

        if let Some(err) = pollster::block_on(scope.pop()) {
            anyhow::bail!("{err}");
        }

        Ok(Self {
            pipeline,
            bind_group,
            mvp_ubo,
            vertex_array,
        })
    }
}

/// `MvpUniform` is a 4x4 f32 matrix, so its size is non-zero.
fn mvp_ubo_min_binding_size() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<MvpUniform>() as u64)
        .expect("MvpUniform has non-zero size by construction")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::cube::test_support::{FS, VS};

    const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
    const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
    const SIZE: u32 = 64;

    fn renderer_with_shaders(dir: &std::path::Path) -> CubeRenderer {
        CubeRenderer::new(CubeConfig::with_shader_dir(dir))
    }

    fn write_shaders(dir: &std::path::Path, vs: &str, fs: &str) {
        std::fs::write(dir.join("basic.vert.wgsl"), vs).unwrap();
        std::fs::write(dir.join("basic.frag.wgsl"), fs).unwrap();
    }

    /// Offscreen device with a single-sample 64x64 color + depth target.
    struct Headless {
        device: wgpu::Device,
        queue: wgpu::Queue,
        color: wgpu::TextureView,
        depth: wgpu::TextureView,
    }

    impl Headless {
        fn new() -> Self {
            let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
            let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions::default()))
                .expect("no wgpu adapter available");
            let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor::default()))
                .expect("device request failed");
            let color = attachment(&device, COLOR_FORMAT);
            let depth = attachment(&device, DEPTH_FORMAT);
            Self { device, queue, color, depth }
        }

        fn ctx(&self, viewport: Viewport) -> RenderCtx<'_> {
            RenderCtx::new(&self.device, &self.queue, COLOR_FORMAT, DEPTH_FORMAT, 1, viewport)
        }

        /// Clears, lets `renderer` draw, submits. Returns whether a draw was issued.
        fn frame(&self, renderer: &CubeRenderer) -> bool {
            let ctx = self.ctx(renderer.viewport());
            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
            let drew = {
                let mut target = RenderTarget::new(&mut encoder, &self.color, None, &self.depth, (SIZE, SIZE));
                drop(target.begin_pass("test clear", Some(Color::black())));
                renderer.draw(&ctx, &mut target)
            };
            self.queue.submit(std::iter::once(encoder.finish()));
            drew
        }
    }

    fn attachment(device: &wgpu::Device, format: wgpu::TextureFormat) -> wgpu::TextureView {
        device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some("test attachment"),
                size: wgpu::Extent3d { width: SIZE, height: SIZE, depth_or_array_layers: 1 },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    // ── state without a GPU ───────────────────────────────────────────────

    #[test]
    fn starts_uninitialized() {
        let renderer = CubeRenderer::new(CubeConfig::default());
        assert_eq!(renderer.state(), RendererState::Uninitialized);
        assert_eq!(renderer.index_count(), None);
        assert_eq!(renderer.angle(), 0.0);
    }

    #[test]
    fn missing_shader_fails_before_any_gpu_work() {
        let dir = tempfile::tempdir().unwrap();
        let renderer = renderer_with_shaders(dir.path());

        let err = renderer.load_shaders(wgpu::Features::empty()).unwrap_err();
        assert!(format!("{err:#}").contains("basic.vert.wgsl"));
        assert_eq!(renderer.state(), RendererState::Uninitialized);
        assert_eq!(renderer.index_count(), None);
    }

    #[test]
    fn load_shaders_reads_configured_paths() {
        let dir = tempfile::tempdir().unwrap();
        write_shaders(dir.path(), VS, FS);
        let renderer = renderer_with_shaders(dir.path());

        let program = renderer.load_shaders(wgpu::Features::empty()).expect("shaders load");
        assert_eq!(program.vertex.path, dir.path().join("basic.vert.wgsl"));
        assert_eq!(renderer.state(), RendererState::Uninitialized);
    }

    #[test]
    fn non_finite_clear_color_falls_back_to_black() {
        let config = CubeConfig {
            clear_color: Color::new(f32::NAN, 0.0, 0.1, 1.0),
            ..CubeConfig::default()
        };
        assert_eq!(CubeRenderer::new(config).clear_color, Color::black());
        assert_eq!(CubeRenderer::new(CubeConfig::default()).clear_color, Color::rgb(0.0, 0.0, 0.1));
    }

    #[test]
    fn advance_animation_steps_and_requests_redraw() {
        let mut renderer = CubeRenderer::new(CubeConfig::default());
        let mut runtime = RuntimeCtx::default();
        for _ in 0..36 {
            renderer.advance_animation(&mut runtime);
        }
        assert_eq!(renderer.angle(), 36.0);
        assert!(runtime.redraw_requested());
    }

    #[test]
    fn tick_delegates_to_advance_animation() {
        let mut renderer = CubeRenderer::new(CubeConfig::default());
        let mut runtime = RuntimeCtx::default();
        renderer.on_tick(&mut runtime);
        assert_eq!(renderer.angle(), 1.0);
        assert!(runtime.redraw_requested());
    }

    #[test]
    fn resize_updates_viewport_and_projection() {
        let mut renderer = CubeRenderer::new(CubeConfig::default());
        renderer.on_resize(800, 600);
        let first = *renderer.transforms();
        assert_eq!(renderer.viewport(), Viewport::new(800.0, 600.0));

        renderer.on_resize(400, 300);
        assert!(renderer.transforms().projection.abs_diff_eq(first.projection, 1e-6));
        assert_eq!(renderer.transforms().view, first.view);

        renderer.on_resize(1600, 600);
        assert_ne!(renderer.transforms().projection, first.projection);
    }

    #[test]
    fn zero_height_resize_keeps_matrices_finite() {
        let mut renderer = CubeRenderer::new(CubeConfig::default());
        renderer.on_resize(100, 0);
        assert!(renderer.transforms().projection.is_finite());
        assert!(renderer.frame_mvp().is_finite());
        assert_eq!(renderer.viewport().clamped_to(SIZE, SIZE), None);
    }

    #[test]
    fn frame_mvp_follows_spin() {
        let mut renderer = CubeRenderer::new(CubeConfig::default());
        renderer.on_resize(800, 600);
        let mut runtime = RuntimeCtx::default();
        renderer.advance_animation(&mut runtime);
        let expected = renderer.transforms().mvp(1.0);
        assert_eq!(renderer.frame_mvp(), expected);
    }

    // ── GPU-backed ────────────────────────────────────────────────────────

    #[test]
    #[ignore = "needs a wgpu adapter"]
    fn missing_shader_leaves_program_unset() {
        let gpu = Headless::new();
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = renderer_with_shaders(dir.path());

        let err = renderer.on_init(&gpu.ctx(Viewport::from_physical(SIZE, SIZE))).unwrap_err();
        assert!(format!("{err:#}").contains("basic.vert.wgsl"));
        assert_eq!(renderer.state(), RendererState::Uninitialized);
        assert!(!gpu.frame(&renderer));
    }

    #[test]
    #[ignore = "needs a wgpu adapter"]
    fn init_uploads_cube_and_draws() {
        let gpu = Headless::new();
        let dir = tempfile::tempdir().unwrap();
        write_shaders(dir.path(), VS, FS);
        let mut renderer = renderer_with_shaders(dir.path());

        renderer
            .on_init(&gpu.ctx(Viewport::from_physical(SIZE, SIZE)))
            .expect("renderer initializes");
        assert_eq!(renderer.state(), RendererState::Ready);
        assert_eq!(renderer.index_count(), Some(36));
        assert!(gpu.frame(&renderer));
    }

    #[test]
    #[ignore = "needs a wgpu adapter"]
    fn pipeline_rejected_by_device_is_an_init_error() {
        // Links fine, but an integer output cannot feed a unorm color target.
        let fs = r#"
@fragment
fn fs_main(@location(0) color: vec3<f32>) -> @location(0) vec4<i32> {
    return vec4<i32>(vec3<i32>(color), 1);
}
"#;
        let gpu = Headless::new();
        let dir = tempfile::tempdir().unwrap();
        write_shaders(dir.path(), VS, fs);
        let mut renderer = renderer_with_shaders(dir.path());
        renderer.load_shaders(gpu.device.features()).expect("stages link");

        let err = renderer.on_init(&gpu.ctx(Viewport::from_physical(SIZE, SIZE))).unwrap_err();
        assert!(format!("{err:#}").contains("rejected"));
        assert_eq!(renderer.state(), RendererState::Uninitialized);
        assert!(!gpu.frame(&renderer));
    }

    #[test]
    #[ignore = "needs a wgpu adapter"]
    fn zero_area_viewport_skips_the_draw() {
        let gpu = Headless::new();
        let dir = tempfile::tempdir().unwrap();
        write_shaders(dir.path(), VS, FS);
        let mut renderer = renderer_with_shaders(dir.path());
        renderer
            .on_init(&gpu.ctx(Viewport::from_physical(SIZE, SIZE)))
            .expect("renderer initializes");

        renderer.on_resize(SIZE, 0);
        assert!(!gpu.frame(&renderer));

        renderer.on_resize(SIZE, SIZE);
        assert!(gpu.frame(&renderer));
    }
}
