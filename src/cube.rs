// A drawable cube with its own transform and color buffers

use std::sync::Arc;

use glam::Vec3;
use serde::Deserialize;
use wgpu::util::DeviceExt;

use crate::geometry::{scaled_cube_vertices, CUBE_VERTEX_COUNT};
use crate::math::{Transform, TransformParams};
use crate::renderer::pipeline::CubePipeline;
use crate::renderer::uniforms::{
    ColorUniform, ObjectUniforms, SharedUniforms, COLOR_DATA_SIZE, LIGHT_DATA_SIZE, MATRIX_SIZE,
    OBJECT_BUFFER_SIZE, OBJECT_UNIFORM_SIZE,
};
use crate::scene::Drawable;

/// Linear rgb, each channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WARM: Color = Color::new(0.9, 0.6, 0.1);
    pub const YELLOW: Color = Color::new(1.0, 1.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    fn to_uniform(self) -> ColorUniform {
        ColorUniform {
            rgba: [self.r, self.g, self.b, 1.0],
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WARM
    }
}

/// A unit cube instance.
///
/// `translation` and `rotation` may be changed freely between frames and are
/// picked up by the next [`Drawable::draw`]. Scale is baked into the vertex
/// buffer when the cube is built and cannot change afterwards.
pub struct Cube {
    pub translation: Vec3,
    pub rotation: Vec3,
    scale: Vec3,
    pipeline: Arc<CubePipeline>,
    vertex_buffer: wgpu::Buffer,
    transform_buffer: wgpu::Buffer,
    // Never written after creation; held so it lives as long as the bind group.
    _color_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Cube {
    /// Allocates the cube's private buffers and binds them together with the
    /// renderer's shared camera and light buffers.
    pub fn new(
        device: &wgpu::Device,
        pipeline: Arc<CubePipeline>,
        shared: &SharedUniforms,
        params: &TransformParams,
        color: Option<Color>,
    ) -> Self {
        let Transform {
            translation,
            rotation,
            scale,
        } = params.resolve();
        let color = color.unwrap_or_default();

        let vertices = scaled_cube_vertices(scale);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let transform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Cube Transform Buffer"),
            size: OBJECT_BUFFER_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let color_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Color Buffer"),
            contents: bytemuck::bytes_of(&color.to_uniform()),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cube Bind Group"),
            layout: pipeline.bind_group_layout(),
            entries: &[
                buffer_entry(0, &transform_buffer, OBJECT_UNIFORM_SIZE),
                buffer_entry(1, &color_buffer, COLOR_DATA_SIZE),
                buffer_entry(2, shared.camera_buffer(), MATRIX_SIZE),
                buffer_entry(3, shared.light_buffer(), LIGHT_DATA_SIZE),
            ],
        });

        Self {
            translation,
            rotation,
            scale,
            pipeline,
            vertex_buffer,
            transform_buffer,
            _color_buffer: color_buffer,
            bind_group,
        }
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.translation, self.rotation, self.scale)
    }

    /// Matrices as they will be uploaded on the next draw.
    pub fn uniforms(&self) -> ObjectUniforms {
        ObjectUniforms::from_transform(&self.transform())
    }
}

fn buffer_entry(binding: u32, buffer: &wgpu::Buffer, size: u64) -> wgpu::BindGroupEntry<'_> {
    wgpu::BindGroupEntry {
        binding,
        resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer,
            offset: 0,
            size: wgpu::BufferSize::new(size),
        }),
    }
}

impl Drawable for Cube {
    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, queue: &wgpu::Queue) {
        // Transform at offset 0, rotation-only matrix right after it.
        queue.write_buffer(&self.transform_buffer, 0, bytemuck::bytes_of(&self.uniforms()));

        pass.set_pipeline(self.pipeline.pipeline());
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..CUBE_VERTEX_COUNT, 0..1);
    }
}
