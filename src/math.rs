// Math utilities for the cube scene

use glam::{Mat4, Vec3};
use serde::Deserialize;

/// Represents a 3D transformation.
///
/// `rotation` holds Euler angles in radians. They are applied in object space
/// as X, then Y, then Z, before the translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    /// Create a new transform
    pub fn new(translation: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Create an identity transform
    pub fn identity() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// `translate * rotate_x * rotate_y * rotate_z`.
    ///
    /// Scale is deliberately left out; cubes bake it into their vertices.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation) * self.rotation_matrix()
    }

    /// Rotation-only part of [`Transform::matrix`], used to carry normals.
    pub fn rotation_matrix(&self) -> Mat4 {
        Mat4::from_rotation_x(self.rotation.x)
            * Mat4::from_rotation_y(self.rotation.y)
            * Mat4::from_rotation_z(self.rotation.z)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Per-axis transform overrides. Every field left as `None` keeps the
/// identity value for that axis, so `{ x: -2 }` resolves to a translation
/// of `(-2, 0, 0)` with no rotation and unit scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TransformParams {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,

    pub rot_x: Option<f32>,
    pub rot_y: Option<f32>,
    pub rot_z: Option<f32>,

    pub scale_x: Option<f32>,
    pub scale_y: Option<f32>,
    pub scale_z: Option<f32>,
}

impl TransformParams {
    /// Overrides only the X/Y position.
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// Overrides all three scale axes with the same factor.
    pub fn uniform_scale(factor: f32) -> Self {
        Self {
            scale_x: Some(factor),
            scale_y: Some(factor),
            scale_z: Some(factor),
            ..Self::default()
        }
    }

    pub fn resolve(&self) -> Transform {
        Transform {
            translation: Vec3::new(
                self.x.unwrap_or(0.0),
                self.y.unwrap_or(0.0),
                self.z.unwrap_or(0.0),
            ),
            rotation: Vec3::new(
                self.rot_x.unwrap_or(0.0),
                self.rot_y.unwrap_or(0.0),
                self.rot_z.unwrap_or(0.0),
            ),
            scale: Vec3::new(
                self.scale_x.unwrap_or(1.0),
                self.scale_y.unwrap_or(1.0),
                self.scale_z.unwrap_or(1.0),
            ),
        }
    }
}

/// Rounds `value` up to the next multiple of `alignment`.
pub const fn align_to(value: u64, alignment: u64) -> u64 {
    value.div_ceil(alignment) * alignment
}
