use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("no GPU adapter available")]
    AdapterUnavailable,
    #[error("failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),
    #[error("failed to create presentation surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("surface reports no supported texture formats on this adapter")]
    UnsupportedSurface,
    #[error("pipeline creation failed: {0}")]
    Pipeline(String),
    #[error("could not acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
}
