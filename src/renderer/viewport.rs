/// Surface size in logical pixels plus the display's device-pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    pub scale_factor: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            scale_factor,
        }
    }

    /// Builds a viewport from a size that is already in physical pixels.
    pub fn from_physical(width: u32, height: u32, scale_factor: f64) -> Self {
        let scale_factor = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        Self::new(
            f64::from(width) / scale_factor,
            f64::from(height) / scale_factor,
            scale_factor,
        )
    }

    /// Device-pixel-scaled size, rounded to whole pixels.
    pub fn physical_size(&self) -> (u32, u32) {
        let scale = |v: f64| (v * self.scale_factor).round().max(0.0) as u32;
        (scale(self.width), scale(self.height))
    }

    pub fn is_empty(&self) -> bool {
        let (w, h) = self.physical_size();
        w == 0 || h == 0
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            (self.width / self.height) as f32
        } else {
            1.0
        }
    }
}
