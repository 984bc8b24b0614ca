// GPU-side uniform layouts and the buffers shared by every cube

use glam::{Mat4, Vec3};

use crate::camera::Camera;
use crate::math::{align_to, Transform};
use crate::scene::Scene;

/// Size of one column-major 4x4 f32 matrix.
pub const MATRIX_SIZE: u64 = 4 * 16;

/// Per-object uniform regions are padded to this many bytes, the
/// `min_uniform_buffer_offset_alignment` every wgpu backend guarantees.
pub const UNIFORM_ALIGNMENT: u64 = 256;

/// Transform matrix followed by the rotation-only matrix.
pub const OBJECT_UNIFORM_SIZE: u64 = 2 * MATRIX_SIZE;
pub const OBJECT_BUFFER_SIZE: u64 = align_to(OBJECT_UNIFORM_SIZE, UNIFORM_ALIGNMENT);

/// vec3 padded out to a vec4.
pub const LIGHT_DATA_SIZE: u64 = (3 + 1) * 4;
pub const COLOR_DATA_SIZE: u64 = (3 + 1) * 4;

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniforms {
    pub transform: [[f32; 4]; 4],
    pub rotation: [[f32; 4]; 4],
}

impl ObjectUniforms {
    pub fn from_transform(transform: &Transform) -> Self {
        Self {
            transform: transform.matrix().to_cols_array_2d(),
            rotation: transform.rotation_matrix().to_cols_array_2d(),
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }

    pub fn from_camera(camera: &Camera) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
        }
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// `w` is reserved and always zero.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub position: [f32; 4],
}

impl LightUniform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position: position.extend(0.0).to_array(),
        }
    }
}

/// Opaque rgb, alpha fixed at 1.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ColorUniform {
    pub rgba: [f32; 4],
}

/// Snapshot of everything the shared buffers hold for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameUniforms {
    pub camera: CameraUniform,
    pub light: LightUniform,
}

impl FrameUniforms {
    pub fn capture<T>(camera: &Camera, scene: &Scene<T>) -> Self {
        Self {
            camera: CameraUniform::from_camera(camera),
            light: LightUniform::from_position(scene.light.position),
        }
    }
}

/// Camera and light buffers, written once per frame and read by every cube.
pub struct SharedUniforms {
    camera_buffer: wgpu::Buffer,
    light_buffer: wgpu::Buffer,
    current: FrameUniforms,
}

impl SharedUniforms {
    pub fn new(device: &wgpu::Device) -> Self {
        let usage = wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST;

        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniform Buffer"),
            size: MATRIX_SIZE,
            usage,
            mapped_at_creation: false,
        });

        let light_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Light Data Buffer"),
            size: LIGHT_DATA_SIZE,
            usage,
            mapped_at_creation: false,
        });

        Self {
            camera_buffer,
            light_buffer,
            current: FrameUniforms::default(),
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, frame: FrameUniforms) {
        queue.write_buffer(&self.camera_buffer, 0, bytemuck::bytes_of(&frame.camera));
        queue.write_buffer(&self.light_buffer, 0, bytemuck::bytes_of(&frame.light));
        self.current = frame;
    }

    pub fn camera_buffer(&self) -> &wgpu::Buffer {
        &self.camera_buffer
    }

    pub fn light_buffer(&self) -> &wgpu::Buffer {
        &self.light_buffer
    }

    /// Values uploaded by the most recent [`SharedUniforms::write`].
    pub fn current(&self) -> &FrameUniforms {
        &self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_match_shader_layouts() {
        assert_eq!(std::mem::size_of::<ObjectUniforms>() as u64, OBJECT_UNIFORM_SIZE);
        assert_eq!(std::mem::size_of::<CameraUniform>() as u64, MATRIX_SIZE);
        assert_eq!(std::mem::size_of::<LightUniform>() as u64, LIGHT_DATA_SIZE);
        assert_eq!(std::mem::size_of::<ColorUniform>() as u64, COLOR_DATA_SIZE);
    }

    #[test]
    fn object_region_is_256_aligned() {
        assert_eq!(OBJECT_BUFFER_SIZE, 256);
        assert_eq!(OBJECT_BUFFER_SIZE % UNIFORM_ALIGNMENT, 0);
        assert!(OBJECT_BUFFER_SIZE >= OBJECT_UNIFORM_SIZE);
    }

    #[test]
    fn rotation_follows_transform_in_memory() {
        let t = Transform::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.1, 0.2, 0.3), Vec3::ONE);
        let uniforms = ObjectUniforms::from_transform(&t);
        let bytes = bytemuck::bytes_of(&uniforms);
        let rotation: &[f32] = bytemuck::cast_slice(&bytes[MATRIX_SIZE as usize..]);
        assert_eq!(rotation, &t.rotation_matrix().to_cols_array()[..]);
        // Translation lives in the fourth column of the transform only.
        assert_eq!(uniforms.transform[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniforms.rotation[3], [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn capture_reads_camera_and_light() {
        let mut camera = Camera::new(1.5);
        camera.position.z = 10.0;
        let mut scene: Scene<()> = Scene::new();
        scene.light.position = Vec3::new(1.0, -1.0, 2.0);

        let frame = FrameUniforms::capture(&camera, &scene);
        assert_eq!(
            frame.camera.view_proj,
            camera.view_projection_matrix().to_cols_array_2d()
        );
        assert_eq!(frame.light.position, [1.0, -1.0, 2.0, 0.0]);
    }
}
