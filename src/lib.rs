//! Real-time renderer for a small grid of lit cubes.
//!
//! [`renderer::Renderer`] owns the shared pipeline and the per-frame camera
//! and light buffers; each [`cube::Cube`] owns its transform and color
//! buffers and records its own draw. [`app`] wires a winit window to them.

pub mod app;
pub mod camera;
pub mod config;
pub mod context;
pub mod cube;
pub mod error;
pub mod geometry;
pub mod input;
pub mod math;
pub mod renderer;
pub mod scene;

pub use camera::Camera;
pub use context::GpuContext;
pub use cube::{Color, Cube};
pub use error::{ConfigError, RenderError};
pub use math::{Transform, TransformParams};
pub use renderer::{Renderer, RendererSettings, SceneRenderer};
pub use scene::{Drawable, ObjectId, PointLight, Scene};
