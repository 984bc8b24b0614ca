//! Viewer configuration, read from an optional TOML file.

use std::f32::consts::FRAC_PI_4;
use std::path::Path;

use serde::Deserialize;

use crate::cube::Color;
use crate::error::ConfigError;
use crate::math::TransformParams;
use crate::renderer::{RendererSettings, CLEAR_COLOR};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "CUBE_SCENE_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_title: String,
    pub camera: CameraConfig,
    pub input: InputConfig,
    pub light: LightConfig,
    pub clear_color: [f64; 4],
    pub depth_test: bool,
    pub cubes: Vec<CubeSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    pub fov_y_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Radians of camera rotation per pixel dragged.
    pub drag_sensitivity: f32,
    /// Camera distance per pixel of wheel scroll.
    pub wheel_sensitivity: f32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
    /// Draw a small cube at the light position.
    pub show_marker: bool,
    pub marker_scale: f32,
    pub marker_color: Color,
    /// Euler angles (radians) of the marker cube.
    pub marker_rotation: [f32; 3],
}

/// One cube of the layout: partial transform plus optional color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct CubeSpec {
    #[serde(flatten)]
    pub params: TransformParams,
    #[serde(default)]
    pub color: Option<Color>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_title: "Cube Scene".to_string(),
            camera: CameraConfig::default(),
            input: InputConfig::default(),
            light: LightConfig::default(),
            clear_color: [CLEAR_COLOR.r, CLEAR_COLOR.g, CLEAR_COLOR.b, CLEAR_COLOR.a],
            depth_test: true,
            cubes: default_grid(),
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 10.0,
            fov_y_degrees: FRAC_PI_4.to_degrees(),
            znear: 0.1,
            zfar: 100.0,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            drag_sensitivity: 0.01,
            wheel_sensitivity: 0.01,
        }
    }
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 2.0],
            show_marker: true,
            marker_scale: 0.1,
            marker_color: Color::YELLOW,
            marker_rotation: [FRAC_PI_4, 0.0, FRAC_PI_4],
        }
    }
}

/// 3x3 grid on the XY plane at -2, 0 and 2.
pub fn default_grid() -> Vec<CubeSpec> {
    let steps = [-2.0, 0.0, 2.0];
    steps
        .iter()
        .flat_map(|&y| {
            steps.iter().map(move |&x| CubeSpec {
                params: TransformParams::at(x, y),
                color: None,
            })
        })
        .collect()
}

impl ViewerConfig {
    pub fn from_toml(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml(&source)
    }

    /// Loads the file named by [`CONFIG_ENV`], or the defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                log::info!("loading config from {}", Path::new(&path).display());
                Self::load(path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn renderer_settings(&self) -> RendererSettings {
        let [r, g, b, a] = self.clear_color;
        RendererSettings {
            clear_color: wgpu::Color { r, g, b, a },
            depth_test: self.depth_test,
        }
    }
}
