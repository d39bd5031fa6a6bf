use bytemuck::{Pod, Zeroable};

/// Vertices in the non-indexed unit cube: 6 faces × 2 triangles × 3.
pub const CUBE_VERTEX_COUNT: u32 = 36;

/// Interleaved vertex: position, normal, uv (8 floats).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Unit cube centred on the origin, counter-clockwise front faces.
pub fn cube_vertices() -> Vec<Vertex> {
    let p = 0.5_f32;
    // Corners per face in CCW order seen from outside, starting bottom-left.
    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        ([0.0, 0.0, 1.0],  [[-p, -p,  p], [ p, -p,  p], [ p,  p,  p], [-p,  p,  p]]), // +Z
        ([0.0, 0.0, -1.0], [[ p, -p, -p], [-p, -p, -p], [-p,  p, -p], [ p,  p, -p]]), // -Z
        ([1.0, 0.0, 0.0],  [[ p, -p,  p], [ p, -p, -p], [ p,  p, -p], [ p,  p,  p]]), // +X
        ([-1.0, 0.0, 0.0], [[-p, -p, -p], [-p, -p,  p], [-p,  p,  p], [-p,  p, -p]]), // -X
        ([0.0, 1.0, 0.0],  [[-p,  p,  p], [ p,  p,  p], [ p,  p, -p], [-p,  p, -p]]), // +Y
        ([0.0, -1.0, 0.0], [[-p, -p, -p], [ p, -p, -p], [ p, -p,  p], [-p, -p,  p]]), // -Y
    ];
    // Texture v grows downwards.
    let uvs = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];

    let mut vertices = Vec::with_capacity(CUBE_VERTEX_COUNT as usize);
    for (normal, corners) in faces {
        for i in [0, 1, 2, 2, 3, 0] {
            vertices.push(Vertex {
                position: corners[i],
                normal,
                uv: uvs[i],
            });
        }
    }
    vertices
}
