use std::path::PathBuf;

use anyhow::Result;

use spincube_engine::device::GpuInit;
use spincube_engine::logging::{init_logging, LoggingConfig};
use spincube_engine::render::cube::{CubeConfig, CubeRenderer};
use spincube_engine::window::{Runtime, RuntimeConfig};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let dir = shader_dir();
    log::info!("loading shaders from {}", dir.display());

    let renderer = CubeRenderer::new(CubeConfig::with_shader_dir(dir));
    Runtime::run(RuntimeConfig::default(), GpuInit::default(), renderer)
}

/// `./shaders` when launched from a directory that has them, otherwise the
/// copies shipped next to this crate's manifest.
fn shader_dir() -> PathBuf {
    let local = PathBuf::from("shaders");
    if local.join("basic.vert.wgsl").is_file() {
        local
    } else {
        PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/shaders"))
    }
}
