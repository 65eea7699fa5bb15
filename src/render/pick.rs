//! Pointer picking
//!
//! Turns a pointer-down at screen coordinates into the scene object under the
//! cursor. The CPU picker casts a camera ray against each object's
//! world-space bounds and keeps the nearest hit.

use glam::Vec3;

use super::camera::CameraController;
use crate::scene::{ObjectId, SceneState};

/// Pointer button that produced the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// A pointer-down in physical pixels, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub screen_x: f32,
    pub screen_y: f32,
    pub button: PointerButton,
}

impl PointerEvent {
    pub fn primary(screen_x: f32, screen_y: f32) -> Self {
        Self {
            screen_x,
            screen_y,
            button: PointerButton::Primary,
        }
    }
}

/// Anything that can answer "what is under the pointer".
pub trait SelectionSource {
    fn pick(&self, event: &PointerEvent) -> Option<ObjectId>;
}

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }
}

/// World-space axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_extent(center: [f32; 3], extent: [f32; 3]) -> Self {
        let center = Vec3::from(center);
        let extent = Vec3::from(extent);
        Self {
            min: center - extent,
            max: center + extent,
        }
    }

    /// Slab test. Distance along the ray to the nearest hit.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let mut tmin = f32::NEG_INFINITY;
        let mut tmax = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];
            if direction.abs() < 1e-8 {
                if origin < self.min[axis] || origin > self.max[axis] {
                    return None;
                }
                continue;
            }
            let inv = 1.0 / direction;
            let mut t1 = (self.min[axis] - origin) * inv;
            let mut t2 = (self.max[axis] - origin) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            tmin = tmin.max(t1);
            tmax = tmax.min(t2);
            if tmin > tmax {
                return None;
            }
        }

        if tmax < 0.0 {
            None
        } else {
            Some(tmin.max(0.0))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub object: ObjectId,
    pub distance: f32,
}

/// CPU ray picker over the objects of a scene.
pub struct ScenePicker<'a> {
    scene: &'a SceneState,
    camera: &'a CameraController,
    viewport: [u32; 2],
}

impl<'a> ScenePicker<'a> {
    pub fn new(scene: &'a SceneState, camera: &'a CameraController, viewport: [u32; 2]) -> Self {
        Self {
            scene,
            camera,
            viewport,
        }
    }

    pub fn cast(&self, event: &PointerEvent) -> Option<PickHit> {
        let ray = self
            .camera
            .ray_through(event.screen_x, event.screen_y, self.viewport);

        let mut best: Option<PickHit> = None;
        for object in self.scene.objects() {
            let bounds = Aabb::from_center_extent(object.center, object.extent);
            if let Some(distance) = bounds.intersect(&ray) {
                if best.map_or(true, |hit| distance < hit.distance) {
                    best = Some(PickHit {
                        object: object.id,
                        distance,
                    });
                }
            }
        }
        best
    }
}

impl SelectionSource for ScenePicker<'_> {
    fn pick(&self, event: &PointerEvent) -> Option<ObjectId> {
        if event.button != PointerButton::Primary {
            return None;
        }
        let hit = self.cast(event);
        match hit {
            Some(hit) => log::debug!(
                "Pick at ({:.0}, {:.0}) hit {:?} at distance {:.3}",
                event.screen_x,
                event.screen_y,
                hit.object,
                hit.distance
            ),
            None => log::debug!(
                "Pick at ({:.0}, {:.0}) hit nothing",
                event.screen_x,
                event.screen_y
            ),
        }
        hit.map(|hit| hit.object)
    }
}
