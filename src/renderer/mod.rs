// Renderer module: shared GPU state and per-frame submission

pub mod depth;
pub mod pipeline;
pub mod uniforms;
pub mod viewport;

use std::sync::Arc;

use crate::camera::Camera;
use crate::context::GpuContext;
use crate::cube::{Color, Cube};
use crate::error::RenderError;
use crate::math::TransformParams;
use crate::scene::{Drawable, Scene};

use depth::DepthTarget;
use pipeline::{CubePipeline, ShaderSource};
use uniforms::{FrameUniforms, SharedUniforms};
use viewport::Viewport;

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.25,
    g: 0.25,
    b: 0.25,
    a: 1.0,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererSettings {
    pub clear_color: wgpu::Color,
    pub depth_test: bool,
}

impl Default for RendererSettings {
    fn default() -> Self {
        Self {
            clear_color: CLEAR_COLOR,
            depth_test: true,
        }
    }
}

/// Everything needed to draw a scene into an arbitrary color target:
/// the shared pipeline, the camera/light buffers and the depth attachment.
///
/// [`Renderer`] wraps this with a presentation surface; tests drive it
/// directly against an offscreen texture.
pub struct SceneRenderer {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    pipeline: Arc<CubePipeline>,
    uniforms: SharedUniforms,
    depth: Option<DepthTarget>,
    viewport: Viewport,
    clear_color: wgpu::Color,
}

impl SceneRenderer {
    pub async fn new(
        ctx: &GpuContext,
        format: wgpu::TextureFormat,
        viewport: Viewport,
        settings: &RendererSettings,
        shaders: &ShaderSource,
    ) -> Result<Self, RenderError> {
        let pipeline =
            CubePipeline::new(&ctx.device, format, shaders, settings.depth_test).await?;
        let uniforms = SharedUniforms::new(&ctx.device);

        let mut renderer = Self {
            device: ctx.device.clone(),
            queue: ctx.queue.clone(),
            pipeline: Arc::new(pipeline),
            uniforms,
            depth: None,
            viewport,
            clear_color: settings.clear_color,
        };
        renderer.update();
        Ok(renderer)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.update();
    }

    /// Brings the depth attachment in line with the current viewport.
    /// Idempotent; does nothing when depth testing is off.
    pub fn update(&mut self) {
        if !self.pipeline.depth_test() {
            return;
        }
        let (width, height) = self.viewport.physical_size();
        let wanted = (width.max(1), height.max(1));
        if self.depth.as_ref().map(DepthTarget::size) == Some(wanted) {
            return;
        }
        log::debug!("recreating depth attachment at {}x{}", wanted.0, wanted.1);
        self.depth = Some(DepthTarget::new(&self.device, width, height));
    }

    pub fn depth_size(&self) -> Option<(u32, u32)> {
        self.depth.as_ref().map(DepthTarget::size)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn device(&self) -> &Arc<wgpu::Device> {
        &self.device
    }

    pub fn queue(&self) -> &Arc<wgpu::Queue> {
        &self.queue
    }

    pub fn uniforms(&self) -> &SharedUniforms {
        &self.uniforms
    }

    /// Builds a cube bound to this renderer's pipeline and shared buffers.
    pub fn create_cube(&self, params: &TransformParams, color: Option<Color>) -> Cube {
        Cube::new(
            &self.device,
            self.pipeline.clone(),
            &self.uniforms,
            params,
            color,
        )
    }

    /// Uploads the camera's view-projection and the scene's light position.
    pub fn write_uniforms<T>(&mut self, camera: &Camera, scene: &Scene<T>) {
        let frame = FrameUniforms::capture(camera, scene);
        self.uniforms.write(&self.queue, frame);
    }

    /// Records one render pass over `scene` into `target`, drawing objects in
    /// insertion order.
    pub fn encode<T: Drawable>(
        &self,
        target: &wgpu::TextureView,
        scene: &Scene<T>,
    ) -> wgpu::CommandBuffer {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let depth_stencil_attachment =
                self.depth
                    .as_ref()
                    .map(|depth| wgpu::RenderPassDepthStencilAttachment {
                        view: depth.view(),
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(0),
                            store: wgpu::StoreOp::Store,
                        }),
                    });

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            for object in scene.objects() {
                object.draw(&mut render_pass, &self.queue);
            }
        }

        encoder.finish()
    }

    /// Uploads uniforms, records the pass and submits it.
    pub fn render_to<T: Drawable>(
        &mut self,
        target: &wgpu::TextureView,
        camera: &Camera,
        scene: &Scene<T>,
    ) {
        self.write_uniforms(camera, scene);
        let commands = self.encode(target, scene);
        self.queue.submit(std::iter::once(commands));
    }
}

/// Picks the presentation format. Linear (non-sRGB) formats come first so
/// colors are stored exactly as the shaders and clear value produce them.
pub fn preferred_surface_format(formats: &[wgpu::TextureFormat]) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .copied()
        .find(|f| !f.is_srgb())
        .or_else(|| formats.first().copied())
}

/// What [`Renderer::frame`] does when the surface texture can't be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameAction {
    /// Reconfigure the surface and skip this frame.
    Reconfigure,
    /// Skip this frame and try again on the next one.
    Skip,
    /// Give up; the error goes back to the caller.
    Fail,
}

pub fn surface_error_action(err: &wgpu::SurfaceError) -> FrameAction {
    match err {
        wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => FrameAction::Reconfigure,
        wgpu::SurfaceError::Timeout => FrameAction::Skip,
        // OutOfMemory, and anything newer the backend reports.
        _ => FrameAction::Fail,
    }
}

/// Presents frames to a window surface.
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    scene_renderer: SceneRenderer,
}

impl Renderer {
    /// Configures `surface`, compiles the pipeline and allocates the shared
    /// buffers and depth attachment.
    pub async fn new(
        ctx: &GpuContext,
        surface: wgpu::Surface<'static>,
        viewport: Viewport,
        settings: &RendererSettings,
        shaders: &ShaderSource,
    ) -> Result<Self, RenderError> {
        let surface_caps = surface.get_capabilities(&ctx.adapter);
        let format = preferred_surface_format(&surface_caps.formats)
            .ok_or(RenderError::UnsupportedSurface)?;
        log::info!("surface format {format:?}");

        let (width, height) = viewport.physical_size();
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        if !viewport.is_empty() {
            surface.configure(&ctx.device, &config);
        }

        let scene_renderer = SceneRenderer::new(ctx, format, viewport, settings, shaders).await?;

        Ok(Self {
            surface,
            config,
            scene_renderer,
        })
    }

    /// Reconfigures the surface and depth attachment for a new window size.
    /// A zero-sized viewport is remembered but not applied to the surface.
    pub fn resize(&mut self, viewport: Viewport) {
        self.scene_renderer.set_viewport(viewport);
        if viewport.is_empty() {
            return;
        }
        let (width, height) = viewport.physical_size();
        self.config.width = width;
        self.config.height = height;
        self.surface
            .configure(self.scene_renderer.device(), &self.config);
    }

    /// Recomputes the depth attachment from the current viewport.
    pub fn update(&mut self) {
        self.scene_renderer.update();
    }

    /// Draws one frame: shared uniforms, surface acquisition, one pass over
    /// the scene, submit, present.
    ///
    /// A lost or outdated surface is reconfigured and the frame skipped, as is
    /// a timed-out acquisition. Only out-of-memory is reported as an error.
    pub fn frame<T: Drawable>(
        &mut self,
        camera: &Camera,
        scene: &Scene<T>,
    ) -> Result<(), RenderError> {
        if self.scene_renderer.viewport().is_empty() {
            return Ok(());
        }

        self.scene_renderer.write_uniforms(camera, scene);

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(err) => {
                return match surface_error_action(&err) {
                    FrameAction::Reconfigure => {
                        log::warn!("{err}; reconfiguring surface");
                        self.surface
                            .configure(self.scene_renderer.device(), &self.config);
                        Ok(())
                    }
                    FrameAction::Skip => {
                        log::warn!("{err}; skipping frame");
                        Ok(())
                    }
                    FrameAction::Fail => Err(err.into()),
                };
            }
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let commands = self.scene_renderer.encode(&view, scene);
        self.scene_renderer
            .queue()
            .submit(std::iter::once(commands));
        frame.present();
        Ok(())
    }

    pub fn create_cube(&self, params: &TransformParams, color: Option<Color>) -> Cube {
        self.scene_renderer.create_cube(params, color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat;

    #[test]
    fn lost_or_outdated_surface_is_reconfigured() {
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::Lost),
            FrameAction::Reconfigure
        );
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::Outdated),
            FrameAction::Reconfigure
        );
    }

    #[test]
    fn timeout_skips_the_frame() {
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::Timeout),
            FrameAction::Skip
        );
    }

    #[test]
    fn out_of_memory_is_fatal() {
        assert_eq!(
            surface_error_action(&wgpu::SurfaceError::OutOfMemory),
            FrameAction::Fail
        );
    }

    #[test]
    fn linear_surface_format_is_preferred() {
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(preferred_surface_format(&formats), Some(TextureFormat::Bgra8Unorm));
    }

    #[test]
    fn srgb_only_surface_still_gets_a_format() {
        let formats = [TextureFormat::Rgba8UnormSrgb];
        assert_eq!(
            preferred_surface_format(&formats),
            Some(TextureFormat::Rgba8UnormSrgb)
        );
        assert_eq!(preferred_surface_format(&[]), None);
    }
}
