use glam::Vec3;

use super::pick::Ray;

/// Free-look perspective camera used to turn pointer positions into rays.
#[derive(Debug, Clone, Copy)]
pub struct CameraController {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub fov_y_deg: f32,
}

impl CameraController {
    pub fn new(position: impl Into<Vec3>, yaw: f32, pitch: f32) -> Self {
        Self {
            position: position.into(),
            yaw,
            pitch,
            fov_y_deg: 45.0,
        }
    }

    /// Camera at `position` turned toward `target`.
    pub fn looking_at(position: impl Into<Vec3>, target: impl Into<Vec3>) -> Self {
        let position = position.into();
        let (yaw, pitch) = forward_to_yaw_pitch(target.into() - position);
        Self::new(position, yaw, pitch)
    }

    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        camera_basis(self.yaw, self.pitch)
    }

    /// World-space ray through a pixel. `screen_x`/`screen_y` are top-left origin.
    pub fn ray_through(&self, screen_x: f32, screen_y: f32, viewport: [u32; 2]) -> Ray {
        let (width, height) = viewport_dims(viewport);
        let ndc_x = 2.0 * screen_x / width - 1.0;
        let ndc_y = 1.0 - 2.0 * screen_y / height;
        let tan_half = (self.fov_y_deg.to_radians() * 0.5).tan();
        let aspect = width / height;

        let (forward, right, up) = self.basis();
        let direction = forward + right * (ndc_x * tan_half * aspect) + up * (ndc_y * tan_half);
        Ray::new(self.position, direction)
    }

    /// Pixel position of a world point, or `None` when it is behind the camera.
    pub fn project(&self, point: impl Into<Vec3>, viewport: [u32; 2]) -> Option<(f32, f32)> {
        let (width, height) = viewport_dims(viewport);
        let (forward, right, up) = self.basis();
        let rel = point.into() - self.position;
        let depth = rel.dot(forward);
        if depth <= 1e-6 {
            return None;
        }
        let tan_half = (self.fov_y_deg.to_radians() * 0.5).tan();
        let aspect = width / height;
        let ndc_x = rel.dot(right) / (depth * tan_half * aspect);
        let ndc_y = rel.dot(up) / (depth * tan_half);
        Some(((ndc_x + 1.0) * 0.5 * width, (1.0 - ndc_y) * 0.5 * height))
    }
}

fn viewport_dims(viewport: [u32; 2]) -> (f32, f32) {
    (viewport[0].max(1) as f32, viewport[1].max(1) as f32)
}

fn forward_to_yaw_pitch(forward: Vec3) -> (f32, f32) {
    let n = forward.try_normalize().unwrap_or(Vec3::X);
    let yaw = n.z.atan2(n.x);
    let pitch = n.y.clamp(-1.0, 1.0).asin();
    (yaw, pitch)
}

fn camera_basis(yaw: f32, pitch: f32) -> (Vec3, Vec3, Vec3) {
    let cos_pitch = pitch.cos();
    let forward = Vec3::new(yaw.cos() * cos_pitch, pitch.sin(), yaw.sin() * cos_pitch);
    let right = Vec3::new(-yaw.sin(), 0.0, yaw.cos());
    let up = right.cross(forward).normalize_or_zero();
    (forward, right, up)
}
