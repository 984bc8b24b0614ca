// The single render pipeline shared by every cube

use std::borrow::Cow;

use crate::error::RenderError;
use crate::geometry::Vertex;

use super::depth::DepthTarget;
use super::uniforms::{COLOR_DATA_SIZE, LIGHT_DATA_SIZE, MATRIX_SIZE, OBJECT_UNIFORM_SIZE};

/// Raw WGSL for the two shader stages.
#[derive(Debug, Clone)]
pub struct ShaderSource {
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

impl Default for ShaderSource {
    fn default() -> Self {
        Self {
            vertex: Cow::Borrowed(include_str!("../shaders/vertex.wgsl")),
            fragment: Cow::Borrowed(include_str!("../shaders/fragment.wgsl")),
        }
    }
}

/// Shader stages, vertex layout, depth and cull state plus the bind group
/// layout every cube builds its bindings against. Created once.
pub struct CubePipeline {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    depth_test: bool,
}

fn uniform_entry(
    binding: u32,
    visibility: wgpu::ShaderStages,
    size: u64,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(size),
        },
        count: None,
    }
}

impl CubePipeline {
    /// Compiles both shader stages and builds the pipeline for `format`.
    ///
    /// Runs inside a validation error scope so that a broken shader surfaces
    /// as [`RenderError::Pipeline`] instead of tripping the device's
    /// uncaptured-error handler.
    pub async fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        shaders: &ShaderSource,
        depth_test: bool,
    ) -> Result<Self, RenderError> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vertex_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cube Vertex Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders.vertex.clone()),
        });
        let fragment_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cube Fragment Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders.fragment.clone()),
        });

        // Binding order is fixed: object transform, object color, camera, light.
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cube Bind Group Layout"),
            entries: &[
                uniform_entry(0, wgpu::ShaderStages::VERTEX, OBJECT_UNIFORM_SIZE),
                uniform_entry(1, wgpu::ShaderStages::FRAGMENT, COLOR_DATA_SIZE),
                uniform_entry(2, wgpu::ShaderStages::VERTEX, MATRIX_SIZE),
                uniform_entry(3, wgpu::ShaderStages::FRAGMENT, LIGHT_DATA_SIZE),
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cube Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let depth_stencil = depth_test.then(|| wgpu::DepthStencilState {
            format: DepthTarget::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Cube Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: "vs_main",
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        if let Some(err) = device.pop_error_scope().await {
            return Err(RenderError::Pipeline(err.to_string()));
        }

        log::info!("cube pipeline ready (format {format:?}, depth test {depth_test})");

        Ok(Self {
            pipeline,
            bind_group_layout,
            depth_test,
        })
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn depth_test(&self) -> bool {
        self.depth_test
    }
}
