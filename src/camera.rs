use crate::geometry::{to_radians, Fp, Ray, Vec3f, EPS};

/// Pinhole look-at camera. The render loop hands it normalized, jittered
/// viewport coordinates and gets primary rays back; the core integrator
/// never constructs one itself.
#[derive(Clone, Debug)]
pub struct Camera {
    origin: Vec3f,
    horizontal: Vec3f,
    vertical: Vec3f,
    lower_left_corner: Vec3f,
}

impl Camera {
    pub fn new(origin: Vec3f, target: Vec3f, fov_degrees: Fp, aspect_ratio: Fp) -> Camera {
        let theta = to_radians(fov_degrees);
        let viewport_height = 2.0 * (theta / 2.0).tan();
        let viewport_width = viewport_height * aspect_ratio;

        let w = (origin - target).normalize();
        // fall back to a Z up vector when the view is (anti)parallel to
        // world up, where the cross product degenerates
        let mut up = Vec3f::new(0.0, 1.0, 0.0);
        if up.cross(&w).norm_squared() < EPS {
            up = Vec3f::new(0.0, 0.0, 1.0);
        }
        let u = up.cross(&w).normalize();
        let v = w.cross(&u);

        let horizontal = u * viewport_width;
        let vertical = v * viewport_height;
        let lower_left_corner = origin - horizontal / 2.0 - vertical / 2.0 - w;
        Camera {
            origin,
            horizontal,
            vertical,
            lower_left_corner,
        }
    }

    // u, v are viewport coordinates in roughly [0, 1); the caller jitters
    // them per sample for antialiasing
    pub fn cast_ray(&self, u: Fp, v: Fp) -> Ray {
        let direction =
            self.lower_left_corner + self.horizontal * u + self.vertical * v - self.origin;
        Ray::new(self.origin, direction)
    }
}
