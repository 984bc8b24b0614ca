// Scene module: ordered drawables plus one point light

use glam::{Vec3, Vec4};

use crate::cube::Cube;

/// Anything the renderer can ask to record itself into the active pass.
pub trait Drawable {
    /// Uploads per-object data through `queue` and enqueues draw commands.
    fn draw<'a>(&'a self, pass: &mut wgpu::RenderPass<'a>, queue: &wgpu::Queue);
}

/// The scene's single point light. Not tied to any drawn object.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
}

/// Stable handle returned by [`Scene::add`]. Objects are never removed, so
/// a handle stays valid for the scene's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

/// Represents the entire 3D scene.
///
/// Insertion order is draw order.
#[derive(Debug)]
pub struct Scene<T = Cube> {
    objects: Vec<T>,
    pub light: PointLight,
}

impl<T> Scene<T> {
    /// Creates a new, empty scene with the light at the origin.
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            light: PointLight::default(),
        }
    }

    /// Appends an object to the end of the draw order.
    pub fn add(&mut self, object: T) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn objects(&self) -> &[T] {
        &self.objects
    }

    /// Objects may be moved or rotated in place; the set itself is fixed.
    pub fn objects_mut(&mut self) -> &mut [T] {
        &mut self.objects
    }

    pub fn get(&self, id: ObjectId) -> Option<&T> {
        self.objects.get(id.0)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> {
        self.objects.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Light position as uploaded to the GPU, `w` reserved.
    pub fn point_light_position(&self) -> Vec4 {
        self.light.position.extend(0.0)
    }
}

impl<T> Default for Scene<T> {
    fn default() -> Self {
        Self::new()
    }
}
