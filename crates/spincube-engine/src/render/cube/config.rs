use std::path::PathBuf;

use crate::paint::Color;

use super::transform::Camera;

/// Cube renderer configuration.
#[derive(Debug, Clone)]
pub struct CubeConfig {
    /// WGSL file with the `vs_main` entry point.
    pub vertex_shader: PathBuf,

    /// WGSL file with the `fs_main` entry point.
    pub fragment_shader: PathBuf,

    pub clear_color: Color,
    pub camera: Camera,

    /// Rotation applied per animation tick, in degrees.
    pub degrees_per_tick: f32,
}

impl CubeConfig {
    /// Default configuration with both shader files resolved inside `dir`.
    pub fn with_shader_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            vertex_shader: dir.join("basic.vert.wgsl"),
            fragment_shader: dir.join("basic.frag.wgsl"),
            ..Self::default()
        }
    }
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            vertex_shader: PathBuf::from("shaders/basic.vert.wgsl"),
            fragment_shader: PathBuf::from("shaders/basic.frag.wgsl"),
            clear_color: Color::rgb(0.0, 0.0, 0.1),
            camera: Camera::default(),
            degrees_per_tick: 1.0,
        }
    }
}
