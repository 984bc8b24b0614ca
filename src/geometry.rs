// Static cube mesh shared by every cube in the scene

use glam::Vec3;

/// Interleaved vertex: position, normal, uv. 32 bytes per vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Number of vertices in the non-indexed cube mesh (6 faces, 2 triangles each).
pub const CUBE_VERTEX_COUNT: u32 = 36;

struct Face {
    normal: [f32; 3],
    // Counter-clockwise when viewed from outside the cube.
    corners: [[f32; 3]; 4],
}

#[rustfmt::skip]
const FACES: [Face; 6] = [
    // Front
    Face { normal: [0.0, 0.0, 1.0], corners: [[-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5]] },
    // Back
    Face { normal: [0.0, 0.0, -1.0], corners: [[-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5]] },
    // Top
    Face { normal: [0.0, 1.0, 0.0], corners: [[-0.5,  0.5, -0.5], [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5]] },
    // Bottom
    Face { normal: [0.0, -1.0, 0.0], corners: [[-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5]] },
    // Right
    Face { normal: [1.0, 0.0, 0.0], corners: [[ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5], [ 0.5, -0.5,  0.5]] },
    // Left
    Face { normal: [-1.0, 0.0, 0.0], corners: [[-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5]] },
];

const CORNER_UVS: [[f32; 2]; 4] = [[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]];
const QUAD_TRIANGLES: [usize; 6] = [0, 1, 2, 2, 3, 0];

/// Unit cube centred on the origin, expanded to a triangle list.
pub fn cube_vertices() -> Vec<Vertex> {
    FACES
        .iter()
        .flat_map(|face| {
            QUAD_TRIANGLES.iter().map(move |&corner| Vertex {
                position: face.corners[corner],
                normal: face.normal,
                uv: CORNER_UVS[corner],
            })
        })
        .collect()
}

/// The unit cube with `scale` multiplied into every position.
/// Normals are left untouched.
pub fn scaled_cube_vertices(scale: Vec3) -> Vec<Vertex> {
    cube_vertices()
        .into_iter()
        .map(|v| Vertex {
            position: (Vec3::from(v.position) * scale).to_array(),
            ..v
        })
        .collect()
}
