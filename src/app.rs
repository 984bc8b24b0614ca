// Application context and the winit event loop that drives it

use std::sync::Arc;

use glam::Vec3;
use winit::{
    error::EventLoopError,
    event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget},
    window::Window,
};

use crate::camera::Camera;
use crate::config::ViewerConfig;
use crate::context::GpuContext;
use crate::cube::Color;
use crate::error::RenderError;
use crate::input::{PointerDrag, PIXELS_PER_LINE};
use crate::math::TransformParams;
use crate::renderer::pipeline::ShaderSource;
use crate::renderer::viewport::Viewport;
use crate::renderer::Renderer;
use crate::scene::{ObjectId, Scene};

/// Builds the scene described by `config`, creating each object with `make`.
///
/// Returns the handle of the light marker cube when one is configured. It is
/// added last so it draws after the layout.
pub fn populate_scene<T>(
    config: &ViewerConfig,
    mut make: impl FnMut(&TransformParams, Option<Color>) -> T,
) -> (Scene<T>, Option<ObjectId>) {
    let mut scene = Scene::new();
    scene.light.position = Vec3::from(config.light.position);

    for spec in &config.cubes {
        scene.add(make(&spec.params, spec.color));
    }

    let marker = config.light.show_marker.then(|| {
        let [rot_x, rot_y, rot_z] = config.light.marker_rotation;
        let params = TransformParams {
            rot_x: Some(rot_x),
            rot_y: Some(rot_y),
            rot_z: Some(rot_z),
            ..TransformParams::uniform_scale(config.light.marker_scale)
        };
        scene.add(make(&params, Some(config.light.marker_color)))
    });

    (scene, marker)
}

/// Owns the camera, scene and renderer for one window, in construction order:
/// the renderer first, since every cube binds its shared buffers.
pub struct Viewer {
    pub camera: Camera,
    pub scene: Scene,
    renderer: Renderer,
    light_marker: Option<ObjectId>,
    pointer: PointerDrag,
}

impl Viewer {
    pub async fn new(
        ctx: &GpuContext,
        surface: wgpu::Surface<'static>,
        viewport: Viewport,
        config: &ViewerConfig,
    ) -> Result<Self, RenderError> {
        let renderer = Renderer::new(
            ctx,
            surface,
            viewport,
            &config.renderer_settings(),
            &ShaderSource::default(),
        )
        .await?;

        let mut camera = Camera::with_projection(
            viewport.aspect(),
            config.camera.fov_y_degrees.to_radians(),
            config.camera.znear,
            config.camera.zfar,
        );
        camera.position.z = config.camera.distance;

        let (scene, light_marker) =
            populate_scene(config, |params, color| renderer.create_cube(params, color));
        log::info!("scene populated with {} cubes", scene.len());

        Ok(Self {
            camera,
            scene,
            renderer,
            light_marker,
            pointer: PointerDrag::new(&config.input),
        })
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.camera.set_aspect(viewport.aspect());
        self.renderer.resize(viewport);
    }

    /// Moves the marker cube onto the light.
    pub fn sync_light_marker(&mut self) {
        let position = self.scene.light.position;
        if let Some(marker) = self.light_marker.and_then(|id| self.scene.get_mut(id)) {
            marker.translation = position;
        }
    }

    pub fn render(&mut self) -> Result<(), RenderError> {
        self.sync_light_marker();
        self.renderer.frame(&self.camera, &self.scene)
    }

    pub fn pointer_pressed(&mut self) {
        self.pointer.press(None);
    }

    pub fn pointer_released(&mut self) {
        self.pointer.release();
    }

    pub fn pointer_moved(&mut self, x: f64, y: f64) {
        self.pointer.cursor_moved(x, y, &mut self.camera);
    }

    /// `pixels` > 0 zooms out.
    pub fn wheel(&mut self, pixels: f32) {
        self.pointer.wheel(pixels, &mut self.camera);
    }
}

/// Window shell. `viewer` is `None` when initialisation failed; the window
/// then stays open and blank until closed.
pub struct App {
    window: Arc<Window>,
    viewer: Option<Viewer>,
}

impl App {
    pub fn new(window: Arc<Window>, viewer: Option<Viewer>) -> Self {
        Self { window, viewer }
    }

    pub fn run(mut self, event_loop: EventLoop<()>) -> Result<(), EventLoopError> {
        event_loop.run(move |event, target| {
            target.set_control_flow(if self.viewer.is_some() {
                ControlFlow::Poll
            } else {
                ControlFlow::Wait
            });

            match event {
                Event::WindowEvent { window_id, event } if window_id == self.window.id() => {
                    self.window_event(event, target);
                }
                Event::AboutToWait => {
                    if self.viewer.is_some() {
                        self.window.request_redraw();
                    }
                }
                _ => {}
            }
        })
    }

    fn window_event(&mut self, event: WindowEvent, target: &EventLoopWindowTarget<()>) {
        if let WindowEvent::CloseRequested = event {
            target.exit();
            return;
        }
        let Some(viewer) = self.viewer.as_mut() else {
            return;
        };

        match event {
            WindowEvent::Resized(size) => {
                viewer.resize(Viewport::from_physical(
                    size.width,
                    size.height,
                    self.window.scale_factor(),
                ));
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let size = self.window.inner_size();
                viewer.resize(Viewport::from_physical(size.width, size.height, scale_factor));
            }
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => viewer.pointer_pressed(),
                ElementState::Released => viewer.pointer_released(),
            },
            WindowEvent::CursorMoved { position, .. } => {
                viewer.pointer_moved(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                // Scrolling towards the user zooms out.
                let pixels = match delta {
                    MouseScrollDelta::LineDelta(_, y) => -y * PIXELS_PER_LINE,
                    MouseScrollDelta::PixelDelta(position) => -position.y as f32,
                };
                viewer.wheel(pixels);
            }
            WindowEvent::RedrawRequested => {
                if let Err(err) = viewer.render() {
                    log::error!("frame failed: {err}");
                    target.exit();
                }
            }
            _ => {}
        }
    }
}
