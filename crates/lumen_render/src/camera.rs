//! Camera for ray generation.

use lumen_math::{Ray, Vec3};

/// A pinhole camera mapping normalized image coordinates to world rays.
///
/// `get_ray(x, y)` takes coordinates in [0, 1] with (0, 0) the top-left
/// corner of the image; sub-pixel jitter is the caller's concern, so ray
/// generation itself is deterministic.
#[derive(Debug, Clone)]
pub struct Camera {
    origin: Vec3,
    upper_left: Vec3,
    horizontal: Vec3,
    vertical: Vec3,
}

impl Camera {
    /// Create a camera.
    ///
    /// - `look_from` / `look_at`: eye position and target point
    /// - `vup`: world up reference for the camera basis
    /// - `vfov`: vertical field of view in degrees
    /// - `aspect_ratio`: image width over height
    pub fn new(look_from: Vec3, look_at: Vec3, vup: Vec3, vfov: f32, aspect_ratio: f32) -> Self {
        let theta = vfov.to_radians();
        let h = (theta / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * aspect_ratio;

        let w = (look_from - look_at).normalize();
        let u = vup.cross(w).normalize();
        let v = w.cross(u);

        let horizontal = viewport_width * u;
        let vertical = viewport_height * v;
        let upper_left = look_from - w - horizontal / 2.0 + vertical / 2.0;

        Self {
            origin: look_from,
            upper_left,
            horizontal,
            vertical,
        }
    }

    /// Generate the ray through normalized image coordinates (x, y).
    pub fn get_ray(&self, x: f32, y: f32) -> Ray {
        let target = self.upper_left + x * self.horizontal - y * self.vertical;
        Ray::new(self.origin, target - self.origin)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::Y,
            90.0,
            16.0 / 9.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y, 90.0, 1.0);
        let ray = camera.get_ray(0.5, 0.5);

        let dir = ray.direction().normalize();
        assert!((dir - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        assert_eq!(ray.origin(), Vec3::ZERO);
    }

    #[test]
    fn test_image_y_grows_downward() {
        let camera = Camera::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y, 90.0, 1.0);

        let top = camera.get_ray(0.5, 0.0);
        let bottom = camera.get_ray(0.5, 1.0);
        assert!(top.direction().y > 0.0);
        assert!(bottom.direction().y < 0.0);
    }

    #[test]
    fn test_offset_eye_position() {
        let eye = Vec3::new(3.0, 2.0, 1.0);
        let camera = Camera::new(eye, Vec3::ZERO, Vec3::Y, 60.0, 2.0);
        let ray = camera.get_ray(0.5, 0.5);

        assert_eq!(ray.origin(), eye);
        // Center ray points from the eye toward the target
        let dir = ray.direction().normalize();
        let expected = (Vec3::ZERO - eye).normalize();
        assert!((dir - expected).length() < 1e-5);
    }
}
