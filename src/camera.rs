use glam::{Mat4, Vec3};

/// Orbit-style camera.
///
/// The camera sits at `position` inside a frame that is first pitched about X
/// (`rotation_x`) and then yawed about Y (`rotation_y`) around the origin.
/// Projection parameters (fov, near/far) are fixed at construction; only the
/// aspect ratio changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub rotation_x: f32,
    pub rotation_y: f32,
    aspect: f32,
    fov_y: f32,
    znear: f32,
    zfar: f32,
}

impl Camera {
    pub const DEFAULT_FOV_Y: f32 = std::f32::consts::FRAC_PI_4;
    pub const DEFAULT_ZNEAR: f32 = 0.1;
    pub const DEFAULT_ZFAR: f32 = 100.0;

    pub fn new(aspect: f32) -> Self {
        Self::with_projection(
            aspect,
            Self::DEFAULT_FOV_Y,
            Self::DEFAULT_ZNEAR,
            Self::DEFAULT_ZFAR,
        )
    }

    /// `fov_y` is in radians. A non-positive `aspect` falls back to 1.0.
    pub fn with_projection(aspect: f32, fov_y: f32, znear: f32, zfar: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            rotation_x: 0.0,
            rotation_y: 0.0,
            aspect: 1.0,
            fov_y,
            znear,
            zfar,
        };
        camera.set_aspect(aspect);
        camera
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Ignores values that would break the projection (zero, negative, NaN).
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        } else {
            log::warn!("ignoring invalid camera aspect ratio {aspect}");
        }
    }

    /// Adds `pitch` radians about X and `yaw` radians about Y.
    pub fn rotate(&mut self, pitch: f32, yaw: f32) {
        self.rotation_x += pitch;
        self.rotation_y += yaw;
    }

    /// Moves the camera along its view axis by `delta`.
    ///
    /// The move is rejected when it would put the camera on or behind the
    /// origin. Returns whether it was applied.
    pub fn zoom(&mut self, delta: f32) -> bool {
        if self.position.z + delta > 0.0 {
            self.position.z += delta;
            true
        } else {
            false
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        let world = Mat4::from_rotation_y(self.rotation_y)
            * Mat4::from_rotation_x(self.rotation_x)
            * Mat4::from_translation(self.position);
        world.inverse()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.znear, self.zfar)
    }

    /// Build the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
