// Pointer and wheel glue that turns raw deltas into camera motion

use crate::camera::Camera;
use crate::config::InputConfig;

/// Pixels per wheel "line" for devices that report line deltas.
pub const PIXELS_PER_LINE: f32 = 100.0;

/// Tracks a drag gesture and converts pointer motion into camera rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerDrag {
    pressed: bool,
    last: Option<(f64, f64)>,
    drag_sensitivity: f32,
    wheel_sensitivity: f32,
}

impl PointerDrag {
    pub fn new(config: &InputConfig) -> Self {
        Self {
            pressed: false,
            last: None,
            drag_sensitivity: config.drag_sensitivity,
            wheel_sensitivity: config.wheel_sensitivity,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.pressed
    }

    /// `position` is the cursor position at press time, if known.
    pub fn press(&mut self, position: Option<(f64, f64)>) {
        self.pressed = true;
        if position.is_some() {
            self.last = position;
        }
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Records the cursor position; while pressed, horizontal motion yaws and
    /// vertical motion pitches the camera.
    pub fn cursor_moved(&mut self, x: f64, y: f64, camera: &mut Camera) {
        if self.pressed {
            if let Some((last_x, last_y)) = self.last {
                let dx = (x - last_x) as f32;
                let dy = (y - last_y) as f32;
                camera.rotate(dy * self.drag_sensitivity, dx * self.drag_sensitivity);
            }
        }
        self.last = Some((x, y));
    }

    /// Scroll by `pixels`; positive moves the camera away from the origin.
    pub fn wheel(&mut self, pixels: f32, camera: &mut Camera) {
        if !camera.zoom(pixels * self.wheel_sensitivity) {
            log::debug!("zoom rejected at distance {}", camera.position.z);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn setup() -> (PointerDrag, Camera) {
        let mut camera = Camera::new(1.0);
        camera.position.z = 10.0;
        (PointerDrag::new(&InputConfig::default()), camera)
    }

    #[test]
    fn motion_without_press_does_not_rotate() {
        let (mut drag, mut camera) = setup();
        drag.cursor_moved(10.0, 10.0, &mut camera);
        drag.cursor_moved(60.0, 90.0, &mut camera);
        assert_eq!(camera.rotation_x, 0.0);
        assert_eq!(camera.rotation_y, 0.0);
    }

    #[test]
    fn drag_rotates_by_pixel_delta() {
        let (mut drag, mut camera) = setup();
        drag.press(Some((100.0, 100.0)));
        drag.cursor_moved(150.0, 80.0, &mut camera);
        assert_relative_eq!(camera.rotation_y, 0.5, epsilon = 1e-6);
        assert_relative_eq!(camera.rotation_x, -0.2, epsilon = 1e-6);

        drag.release();
        assert!(!drag.is_dragging());
        drag.cursor_moved(500.0, 500.0, &mut camera);
        assert_relative_eq!(camera.rotation_y, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn first_move_after_unknown_press_only_records() {
        let (mut drag, mut camera) = setup();
        drag.press(None);
        drag.cursor_moved(40.0, 40.0, &mut camera);
        assert_eq!(camera.rotation_y, 0.0);
        drag.cursor_moved(50.0, 40.0, &mut camera);
        assert_relative_eq!(camera.rotation_y, 0.1, epsilon = 1e-6);
    }

    #[test]
    fn wheel_zooms_and_respects_origin_guard() {
        let (mut drag, mut camera) = setup();
        drag.wheel(300.0, &mut camera);
        assert_relative_eq!(camera.position.z, 13.0, epsilon = 1e-6);
        drag.wheel(-2000.0, &mut camera);
        assert_relative_eq!(camera.position.z, 13.0, epsilon = 1e-6);
    }
}
