// Headless frame tests. Each test returns early when no adapter is present.

use std::cell::RefCell;
use std::rc::Rc;

use cube_scene::config::default_grid;
use cube_scene::renderer::pipeline::ShaderSource;
use cube_scene::renderer::uniforms::{CameraUniform, FrameUniforms};
use cube_scene::renderer::viewport::Viewport;
use cube_scene::{
    Camera, Color, Cube, Drawable, GpuContext, RenderError, RendererSettings, Scene, SceneRenderer,
    TransformParams,
};
use glam::Vec3;

// Linear, like the format the windowed renderer prefers, so clear and
// shader values land in the texture unconverted.
const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const WIDTH: u32 = 64;
const HEIGHT: u32 = 48;

async fn gpu() -> Option<GpuContext> {
    match GpuContext::headless().await {
        Ok(ctx) => Some(ctx),
        Err(err) => {
            eprintln!("skipping GPU test: {err}");
            None
        }
    }
}

async fn scene_renderer(
    ctx: &GpuContext,
    viewport: Viewport,
    settings: RendererSettings,
) -> SceneRenderer {
    SceneRenderer::new(ctx, FORMAT, viewport, &settings, &ShaderSource::default())
        .await
        .expect("default shaders compile")
}

fn color_target(ctx: &GpuContext) -> wgpu::Texture {
    ctx.device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Test Color Target"),
        size: wgpu::Extent3d {
            width: WIDTH,
            height: HEIGHT,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
        view_formats: &[],
    })
}

fn map_staging(ctx: &GpuContext, staging: &wgpu::Buffer) -> Vec<u8> {
    let slice = staging.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    ctx.device.poll(wgpu::Maintain::Wait);
    rx.recv().unwrap().unwrap();
    let data = slice.get_mapped_range().to_vec();
    staging.unmap();
    data
}

/// RGBA8 pixels, rows tightly packed (64 * 4 bytes is already 256-aligned).
fn read_pixels(ctx: &GpuContext, texture: &wgpu::Texture) -> Vec<u8> {
    let bytes_per_row = WIDTH * 4;
    let staging = ctx.device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Pixel Readback Buffer"),
        size: u64::from(bytes_per_row * HEIGHT),
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    let mut encoder = ctx
        .device
        .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
    encoder.copy_texture_to_buffer(
        wgpu::ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        wgpu::ImageCopyBuffer {
            buffer: &staging,
            layout: wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(HEIGHT),
            },
        },
        texture.size(),
    );
    ctx.queue.submit(std::iter::once(encoder.finish()));
    map_staging(ctx, &staging)
}

fn pixel(pixels: &[u8], x: u32, y: u32) -> [u8; 4] {
    let i = ((y * WIDTH + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

/// Logs its position in the draw order, then draws the wrapped cube.
struct Recorded {
    cube: Cube,
    index: usize,
    log: Rc<RefCell<Vec<usize>>>,
}

impl Drawable for Recorded {
    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, queue: &wgpu::Queue) {
        self.log.borrow_mut().push(self.index);
        self.cube.draw(pass, queue);
    }
}

fn grid_scene(renderer: &SceneRenderer, log: &Rc<RefCell<Vec<usize>>>) -> Scene<Recorded> {
    let mut params: Vec<(TransformParams, Option<Color>)> =
        default_grid().into_iter().map(|c| (c.params, c.color)).collect();
    params.push((TransformParams::uniform_scale(0.1), Some(Color::YELLOW)));

    let mut scene = Scene::new();
    for (index, (params, color)) in params.iter().enumerate() {
        scene.add(Recorded {
            cube: renderer.create_cube(params, *color),
            index,
            log: log.clone(),
        });
    }
    scene.light.position = Vec3::new(0.0, 0.0, 2.0);
    scene
}

#[tokio::test]
async fn frame_draws_every_object_once_in_order() {
    let Some(ctx) = gpu().await else { return };
    let viewport = Viewport::new(f64::from(WIDTH), f64::from(HEIGHT), 1.0);
    let mut renderer = scene_renderer(&ctx, viewport, RendererSettings::default()).await;

    let log = Rc::new(RefCell::new(Vec::new()));
    let scene = grid_scene(&renderer, &log);
    assert_eq!(scene.len(), 10);
    assert_eq!(scene.objects()[9].cube.scale(), Vec3::splat(0.1));

    let mut camera = Camera::new(viewport.aspect());
    camera.position.z = 10.0;

    let target = color_target(&ctx);
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());
    renderer.render_to(&view, &camera, &scene);

    assert_eq!(*log.borrow(), (0..10).collect::<Vec<_>>());

    let pixels = read_pixels(&ctx, &target);
    // Corner shows the 0.25 gray clear color, 64 once quantised.
    let corner = pixel(&pixels, 0, 0);
    for channel in &corner[..3] {
        assert!(channel.abs_diff(64) <= 1, "corner pixel {corner:?}");
    }
    assert_eq!(corner[3], 255);
    // The centre cube is lit from the front in a warm color.
    let [r, g, b, _] = pixel(&pixels, WIDTH / 2, HEIGHT / 2);
    assert!(r > b + 50, "centre pixel {:?}", (r, g, b));
}

#[tokio::test]
async fn shared_uniforms_track_state_at_frame_time() {
    let Some(ctx) = gpu().await else { return };
    let viewport = Viewport::new(f64::from(WIDTH), f64::from(HEIGHT), 1.0);
    let mut renderer = scene_renderer(&ctx, viewport, RendererSettings::default()).await;

    let log = Rc::new(RefCell::new(Vec::new()));
    let mut scene = grid_scene(&renderer, &log);
    let mut camera = Camera::new(viewport.aspect());
    camera.position.z = 10.0;

    let target = color_target(&ctx);
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());
    renderer.render_to(&view, &camera, &scene);

    // Second frame with a moved camera and light must not see the old values.
    camera.rotate(0.3, -0.8);
    camera.zoom(2.0);
    scene.light.position = Vec3::new(1.0, 2.0, 3.0);
    if let Some(first) = scene.objects_mut().first_mut() {
        first.cube.rotation = Vec3::new(0.0, 1.0, 0.0);
    }
    renderer.render_to(&view, &camera, &scene);

    let expected = FrameUniforms::capture(&camera, &scene);
    assert_eq!(*renderer.uniforms().current(), expected);

    let uploaded = renderer.uniforms().current();
    assert_eq!(uploaded.camera, CameraUniform::from_camera(&camera));
    assert_eq!(uploaded.light.position, [1.0, 2.0, 3.0, 0.0]);

    assert_eq!(log.borrow().len(), 20);
}

#[tokio::test]
async fn update_resizes_depth_to_device_pixels() {
    let Some(ctx) = gpu().await else { return };
    let mut renderer = scene_renderer(
        &ctx,
        Viewport::new(32.0, 24.0, 1.0),
        RendererSettings::default(),
    )
    .await;

    // No frame has been rendered yet.
    renderer.update();
    renderer.update();
    assert_eq!(renderer.depth_size(), Some((32, 24)));

    renderer.set_viewport(Viewport::new(50.0, 40.0, 2.0));
    assert_eq!(renderer.depth_size(), Some((100, 80)));
    renderer.update();
    assert_eq!(renderer.depth_size(), Some((100, 80)));
}

#[tokio::test]
async fn depth_attachment_is_optional() {
    let Some(ctx) = gpu().await else { return };
    let settings = RendererSettings {
        depth_test: false,
        ..RendererSettings::default()
    };
    let viewport = Viewport::new(f64::from(WIDTH), f64::from(HEIGHT), 1.0);
    let mut renderer = scene_renderer(&ctx, viewport, settings).await;
    assert_eq!(renderer.depth_size(), None);

    let mut scene = Scene::new();
    scene.add(renderer.create_cube(&TransformParams::default(), None));
    let mut camera = Camera::new(viewport.aspect());
    camera.position.z = 10.0;

    let target = color_target(&ctx);
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());
    renderer.render_to(&view, &camera, &scene);

    let pixels = read_pixels(&ctx, &target);
    let [r, _, b, _] = pixel(&pixels, WIDTH / 2, HEIGHT / 2);
    assert!(r > b);
}

#[tokio::test]
async fn broken_shader_fails_initialisation() {
    let Some(ctx) = gpu().await else { return };
    let shaders = ShaderSource {
        vertex: "this is not wgsl".into(),
        ..ShaderSource::default()
    };
    let result = SceneRenderer::new(
        &ctx,
        FORMAT,
        Viewport::new(8.0, 8.0, 1.0),
        &RendererSettings::default(),
        &shaders,
    )
    .await;
    assert!(matches!(result, Err(RenderError::Pipeline(_))));
}
