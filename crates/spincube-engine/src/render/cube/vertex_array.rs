use wgpu::util::DeviceExt;

use super::mesh::Mesh;

/// GPU-resident mesh plus the attribute layout describing it.
///
/// Positions and colors live in separate tightly packed buffers (3 x f32, no
/// offset), each feeding one shader location. The layout is baked into the
/// pipeline; [`VertexArray::bind`] attaches the buffers to a render pass, and
/// the binding ends with that pass.
pub struct VertexArray {
    positions: wgpu::Buffer,
    colors: wgpu::Buffer,
    indices: wgpu::Buffer,

    position_attrs: [wgpu::VertexAttribute; 1],
    color_attrs: [wgpu::VertexAttribute; 1],
}

impl VertexArray {
    const STRIDE: u64 = std::mem::size_of::<[f32; 3]>() as u64;
    const INDEX_SIZE: u64 = std::mem::size_of::<u32>() as u64;

    /// Uploads `mesh` once; buffers are never written again.
    pub fn new(
        device: &wgpu::Device,
        mesh: &Mesh<'_>,
        vertex_location: u32,
        color_location: u32,
    ) -> Self {
        debug_assert!(mesh.is_valid());

        let positions = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spincube cube positions"),
            contents: bytemuck::cast_slice(mesh.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let colors = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spincube cube colors"),
            contents: bytemuck::cast_slice(mesh.colors),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("spincube cube indices"),
            contents: bytemuck::cast_slice(mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let vertex_array = Self {
            positions,
            colors,
            indices,
            position_attrs: [float3_at(vertex_location)],
            color_attrs: [float3_at(color_location)],
        };
        debug_assert_eq!(vertex_array.index_count(), mesh.index_count());
        vertex_array
    }

    /// Number of `u32` indices held by the uploaded index buffer.
    #[inline]
    pub fn index_count(&self) -> u32 {
        (self.indices.size() / Self::INDEX_SIZE) as u32
    }

    /// Buffer layouts in slot order: 0 = positions, 1 = colors.
    pub fn layouts(&self) -> [wgpu::VertexBufferLayout<'_>; 2] {
        [
            wgpu::VertexBufferLayout {
                array_stride: Self::STRIDE,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &self.position_attrs,
            },
            wgpu::VertexBufferLayout {
                array_stride: Self::STRIDE,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &self.color_attrs,
            },
        ]
    }

    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.positions.slice(..));
        rpass.set_vertex_buffer(1, self.colors.slice(..));
        rpass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint32);
    }
}

fn float3_at(shader_location: u32) -> wgpu::VertexAttribute {
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 0,
        shader_location,
    }
}
