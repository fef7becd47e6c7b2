/// Cube corners: front face (z = +1) then back face (z = -1).
pub const CUBE_POSITIONS: [[f32; 3]; 8] = [
    // front
    [-1.0, -1.0,  1.0],
    [ 1.0, -1.0,  1.0],
    [ 1.0,  1.0,  1.0],
    [-1.0,  1.0,  1.0],
    // back
    [-1.0, -1.0, -1.0],
    [ 1.0, -1.0, -1.0],
    [ 1.0,  1.0, -1.0],
    [-1.0,  1.0, -1.0],
];

/// Per-vertex colors, paired with [`CUBE_POSITIONS`] by index.
pub const CUBE_COLORS: [[f32; 3]; 8] = [
    // front
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    // back
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Two counter-clockwise triangles per face, outward facing.
pub const CUBE_INDICES: [u32; 36] = [
    // front
    0, 1, 2,
    2, 3, 0,
    // right
    1, 5, 6,
    6, 2, 1,
    // back
    7, 6, 5,
    5, 4, 7,
    // left
    4, 0, 3,
    3, 7, 4,
    // bottom
    4, 5, 1,
    1, 0, 4,
    // top
    3, 2, 6,
    6, 7, 3,
];

/// Borrowed indexed triangle-list mesh with one color per vertex.
#[derive(Debug, Copy, Clone)]
pub struct Mesh<'a> {
    pub positions: &'a [[f32; 3]],
    pub colors: &'a [[f32; 3]],
    pub indices: &'a [u32],
}

impl Mesh<'static> {
    pub const fn cube() -> Self {
        Self {
            positions: &CUBE_POSITIONS,
            colors: &CUBE_COLORS,
            indices: &CUBE_INDICES,
        }
    }
}

impl Mesh<'_> {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Positions and colors pair up, indices form whole triangles, and every
    /// index refers to an existing vertex.
    pub fn is_valid(&self) -> bool {
        let n = self.vertex_count();
        self.colors.len() == n
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
    }
}
