// Cube Scene: a grid of lit cubes with an orbiting camera

use std::sync::Arc;

use cube_scene::app::{App, Viewer};
use cube_scene::config::ViewerConfig;
use cube_scene::renderer::viewport::Viewport;
use cube_scene::GpuContext;
use winit::{event_loop::EventLoop, window::WindowBuilder};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    env_logger::init();

    let config = ViewerConfig::from_env()?;

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(&config.window_title)
            .build(&event_loop)?,
    );

    let instance = GpuContext::create_instance();
    let surface = instance.create_surface(window.clone())?;

    let ctx = match GpuContext::new(instance, Some(&surface)).await {
        Ok(ctx) => ctx,
        Err(err) => {
            log::error!("no usable GPU found, please run on a machine with a supported graphics adapter");
            return Err(err.into());
        }
    };

    let size = window.inner_size();
    let viewport = Viewport::from_physical(size.width, size.height, window.scale_factor());

    let viewer = match Viewer::new(&ctx, surface, viewport, &config).await {
        Ok(viewer) => Some(viewer),
        Err(err) => {
            log::error!("renderer initialisation failed: {err}");
            None
        }
    };

    App::new(window, viewer).run(event_loop)?;
    Ok(())
}
