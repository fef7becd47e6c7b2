use std::path::{Path, PathBuf};

use thiserror::Error;

/// Attribute input carrying vertex positions.
pub const VERTEX_ATTRIBUTE: &str = "vertex";

/// Attribute input carrying vertex colors.
pub const COLOR_ATTRIBUTE: &str = "color";

/// Uniform holding the model-view-projection matrix.
pub const MVP_UNIFORM: &str = "MVP";

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to read shader {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to compile {}:\n{message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{} failed validation: {message}", .path.display())]
    Validation { path: PathBuf, message: String },

    #[error("link failed: {0}")]
    Link(String),
}

/// Shader capabilities a device with `features` accepts.
///
/// Only features that change what WGSL may declare are mapped; everything
/// else stays disabled, so modules using it are rejected at compile time.
pub fn device_capabilities(features: wgpu::Features) -> naga::valid::Capabilities {
    use naga::valid::Capabilities as Caps;

    let mut caps = Caps::empty();
    caps.set(Caps::FLOAT64, features.contains(wgpu::Features::SHADER_F64));
    caps.set(Caps::SHADER_FLOAT16, features.contains(wgpu::Features::SHADER_F16));
    caps.set(Caps::SHADER_INT64, features.contains(wgpu::Features::SHADER_INT64));
    caps.set(Caps::PRIMITIVE_INDEX, features.contains(wgpu::Features::SHADER_PRIMITIVE_INDEX));
    caps.set(Caps::MULTIVIEW, features.contains(wgpu::Features::MULTIVIEW));
    caps.set(Caps::EARLY_DEPTH_TEST, features.contains(wgpu::Features::SHADER_EARLY_DEPTH_TEST));
    caps
}

/// One compiled WGSL stage.
///
/// Compilation is parse + validation through naga, the front end wgpu uses,
/// against the capabilities of the target device.
#[derive(Debug)]
pub struct ShaderStage {
    pub path: PathBuf,
    pub source: String,
    module: naga::Module,
}

impl ShaderStage {
    /// Reads and compiles the WGSL file at `path`.
    pub fn load(path: &Path, capabilities: naga::valid::Capabilities) -> Result<Self, ShaderError> {
        let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::compile(path, source, capabilities)
    }

    /// Compiles `source`; `path` is only used in diagnostics.
    pub fn compile(
        path: impl Into<PathBuf>,
        source: String,
        capabilities: naga::valid::Capabilities,
    ) -> Result<Self, ShaderError> {
        let path = path.into();

        let module = naga::front::wgsl::parse_str(&source).map_err(|e| ShaderError::Parse {
            message: e.emit_to_string(&source),
            path: path.clone(),
        })?;

        let mut validator = naga::valid::Validator::new(naga::valid::ValidationFlags::all(), capabilities);
        validator
            .validate(&module)
            .map_err(|e| ShaderError::Validation {
                message: e.as_inner().to_string(),
                path: path.clone(),
            })?;

        Ok(Self { path, source, module })
    }

    fn entry_point(&self, stage: naga::ShaderStage) -> Option<&naga::EntryPoint> {
        self.module.entry_points.iter().find(|ep| ep.stage == stage)
    }
}

/// Vertex + fragment stages checked against each other and against the
/// renderer's interface: `vertex` and `color` inputs (`vec3<f32>`), `MVP`
/// uniform, and no other resource bindings.
#[derive(Debug)]
pub struct ShaderProgram {
    pub vertex: ShaderStage,
    pub fragment: ShaderStage,
    pub vertex_entry: String,
    pub fragment_entry: String,

    /// Shader location of the `vertex` input.
    pub vertex_location: u32,

    /// Shader location of the `color` input.
    pub color_location: u32,

    /// Binding index of `MVP` within bind group 0.
    pub mvp_binding: u32,
}

impl ShaderProgram {
    /// Loads, compiles and links the two stage files for a device without
    /// optional shader features.
    pub fn load(vertex_path: &Path, fragment_path: &Path) -> Result<Self, ShaderError> {
        Self::load_for(vertex_path, fragment_path, wgpu::Features::empty())
    }

    /// Loads, compiles and links the two stage files for a device exposing `features`.
    pub fn load_for(
        vertex_path: &Path,
        fragment_path: &Path,
        features: wgpu::Features,
    ) -> Result<Self, ShaderError> {
        let capabilities = device_capabilities(features);
        let vertex = ShaderStage::load(vertex_path, capabilities)?;
        let fragment = ShaderStage::load(fragment_path, capabilities)?;
        Self::link(vertex, fragment)
    }

    pub fn link(vertex: ShaderStage, fragment: ShaderStage) -> Result<Self, ShaderError> {
        let vs = vertex.entry_point(naga::ShaderStage::Vertex).ok_or_else(|| {
            ShaderError::Link(format!("{} has no vertex entry point", vertex.path.display()))
        })?;
        let fs = fragment.entry_point(naga::ShaderStage::Fragment).ok_or_else(|| {
            ShaderError::Link(format!("{} has no fragment entry point", fragment.path.display()))
        })?;

        let mut inputs = Vec::new();
        for arg in &vs.function.arguments {
            collect_locations(&vertex.module, arg.name.as_deref(), arg.ty, arg.binding.as_ref(), &mut inputs);
        }
        let attribute = |name: &str| -> Result<u32, ShaderError> {
            let input = inputs
                .iter()
                .find(|io| io.name == Some(name))
                .ok_or_else(|| ShaderError::Link(format!("vertex stage has no `{name}` input")))?;
            if vertex.module.types[input.ty].inner != FLOAT3 {
                return Err(ShaderError::Link(format!("`{name}` input must be vec3<f32>")));
            }
            Ok(input.location)
        };
        let vertex_location = attribute(VERTEX_ATTRIBUTE)?;
        let color_location = attribute(COLOR_ATTRIBUTE)?;

        let mvp = find_mvp(&vertex.module)?;
        let mvp_binding = mvp_binding(&vertex.module.global_variables[mvp])?;

        // The pipeline layout holds a single bind group with `MVP` in it.
        let stray = vertex
            .module
            .global_variables
            .iter()
            .filter(|&(handle, _)| handle != mvp)
            .chain(fragment.module.global_variables.iter())
            .find(|(_, var)| var.binding.is_some());
        if let Some((_, var)) = stray {
            return Err(ShaderError::Link(format!(
                "resource `{}` is not provided by the renderer; only `{MVP_UNIFORM}` is bound",
                var.name.as_deref().unwrap_or("?"),
            )));
        }

        // Every fragment input must be produced by the vertex stage, with the same type.
        let mut outputs = Vec::new();
        if let Some(result) = &vs.function.result {
            collect_locations(&vertex.module, None, result.ty, result.binding.as_ref(), &mut outputs);
        }

        let mut consumed = Vec::new();
        for arg in &fs.function.arguments {
            collect_locations(&fragment.module, arg.name.as_deref(), arg.ty, arg.binding.as_ref(), &mut consumed);
        }
        for input in &consumed {
            let name = input.name.unwrap_or("?");
            let Some(output) = outputs.iter().find(|out| out.location == input.location) else {
                return Err(ShaderError::Link(format!(
                    "fragment input `{name}` at location {} is not written by the vertex stage",
                    input.location,
                )));
            };
            if vertex.module.types[output.ty].inner != fragment.module.types[input.ty].inner {
                return Err(ShaderError::Link(format!(
                    "fragment input `{name}` at location {} does not match the vertex output type",
                    input.location,
                )));
            }
        }

        let vertex_entry = vs.name.clone();
        let fragment_entry = fs.name.clone();

        Ok(Self {
            vertex,
            fragment,
            vertex_entry,
            fragment_entry,
            vertex_location,
            color_location,
            mvp_binding,
        })
    }
}

/// Type the renderer's position and color buffers feed (`Float32x3`).
const FLOAT3: naga::TypeInner = naga::TypeInner::Vector {
    size: naga::VectorSize::Tri,
    scalar: naga::Scalar::F32,
};

/// A user-defined stage input or output.
struct StageIo<'m> {
    name: Option<&'m str>,
    location: u32,
    ty: naga::Handle<naga::Type>,
}

/// Appends every location-bound input or output, flattening struct members.
fn collect_locations<'m>(
    module: &'m naga::Module,
    name: Option<&'m str>,
    ty: naga::Handle<naga::Type>,
    binding: Option<&'m naga::Binding>,
    out: &mut Vec<StageIo<'m>>,
) {
    match binding {
        Some(naga::Binding::Location { location, .. }) => out.push(StageIo {
            name,
            location: *location,
            ty,
        }),
        Some(_) => {}
        None => {
            if let naga::TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for m in members {
                    collect_locations(module, m.name.as_deref(), m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}

fn find_mvp(module: &naga::Module) -> Result<naga::Handle<naga::GlobalVariable>, ShaderError> {
    let (handle, var) = module
        .global_variables
        .iter()
        .find(|(_, v)| v.name.as_deref() == Some(MVP_UNIFORM))
        .ok_or_else(|| ShaderError::Link(format!("vertex stage has no `{MVP_UNIFORM}` uniform")))?;

    if var.space != naga::AddressSpace::Uniform {
        return Err(ShaderError::Link(format!("`{MVP_UNIFORM}` is not in the uniform address space")));
    }

    let is_mat4 = matches!(
        module.types[var.ty].inner,
        naga::TypeInner::Matrix {
            columns: naga::VectorSize::Quad,
            rows: naga::VectorSize::Quad,
            scalar: naga::Scalar::F32,
        }
    );
    if !is_mat4 {
        return Err(ShaderError::Link(format!("`{MVP_UNIFORM}` must be a mat4x4<f32>")));
    }

    Ok(handle)
}

fn mvp_binding(var: &naga::GlobalVariable) -> Result<u32, ShaderError> {
    match &var.binding {
        Some(rb) if rb.group == 0 => Ok(rb.binding),
        Some(rb) => Err(ShaderError::Link(format!(
            "`{MVP_UNIFORM}` must live in bind group 0, found group {}",
            rb.group
        ))),
        None => Err(ShaderError::Link(format!("`{MVP_UNIFORM}` has no binding"))),
    }
}
