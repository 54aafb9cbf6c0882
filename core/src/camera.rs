//! Camera

use crate::geometry::*;
use crate::math::*;
use itertools::iproduct;

/// Camera trait supplies one ray per pixel. Pixel `(0, 0)` is the top-left
/// corner of the image.
pub trait Camera {
    /// Returns the image resolution as `(width, height)`.
    fn resolution(&self) -> (usize, usize);

    /// Returns the ray through the centre of a pixel.
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    fn generate_ray(&self, x: usize, y: usize) -> Ray;

    /// Returns a ray through an offset position inside a pixel. Cameras that
    /// do not support jitter return the pixel centre ray.
    ///
    /// * `x`      - Column.
    /// * `y`      - Row.
    /// * `offset` - Offset from the pixel centre in pixels, each in `[-0.5, 0.5)`.
    fn generate_jittered_ray(&self, x: usize, y: usize, _offset: (Float, Float)) -> Ray {
        self.generate_ray(x, y)
    }
}

/// Pinhole perspective camera with cached per-pixel ray directions.
#[derive(Clone, Debug)]
pub struct PinholeCamera {
    /// Camera position.
    pub position: Point3f,

    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov: Float,
    width: usize,
    height: usize,
    directions: Vec<Vector3f>,
}

impl PinholeCamera {
    /// Create a new camera.
    ///
    /// * `position`     - Camera position.
    /// * `look_at`      - Point the camera faces.
    /// * `up`           - Approximate up vector.
    /// * `vertical_fov` - Vertical field of view in degrees.
    /// * `width`        - Image width.
    /// * `height`       - Image height.
    pub fn new(
        position: Point3f,
        look_at: Point3f,
        up: Vector3f,
        vertical_fov: Float,
        width: usize,
        height: usize,
    ) -> Self {
        let forward = (look_at - position).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward);

        let mut camera = Self {
            position,
            forward,
            right,
            up,
            tan_half_fov: (0.5 * vertical_fov.to_radians()).tan(),
            width: 0,
            height: 0,
            directions: vec![],
        };
        camera.resize(width, height);
        camera
    }

    /// Recompute cached directions when the resolution changes.
    ///
    /// * `width`  - Image width.
    /// * `height` - Image height.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;

        self.directions = iproduct!(0..height, 0..width)
            .map(|(y, x)| self.direction_at(x as Float + 0.5, y as Float + 0.5))
            .collect();
        debug!("Camera directions recomputed for {}x{}", width, height);
    }

    /// Unit direction through continuous raster position `(px, py)`.
    fn direction_at(&self, px: Float, py: Float) -> Vector3f {
        let aspect = self.width as Float / self.height as Float;
        let sx = (2.0 * px / self.width as Float - 1.0) * self.tan_half_fov * aspect;
        let sy = (1.0 - 2.0 * py / self.height as Float) * self.tan_half_fov;
        (self.forward + sx * self.right + sy * self.up).normalize()
    }
}

impl Camera for PinholeCamera {
    fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn generate_ray(&self, x: usize, y: usize) -> Ray {
        Ray::new(self.position, self.directions[y * self.width + x])
    }

    fn generate_jittered_ray(&self, x: usize, y: usize, offset: (Float, Float)) -> Ray {
        let d = self.direction_at(x as Float + 0.5 + offset.0, y as Float + 0.5 + offset.1);
        Ray::new(self.position, d)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn camera(w: usize, h: usize) -> PinholeCamera {
        PinholeCamera::new(
            Point3f::new(0.0, 0.0, 5.0),
            Point3f::ZERO,
            Vector3f::new(0.0, 1.0, 0.0),
            45.0,
            w,
            h,
        )
    }

    #[test]
    fn centre_pixel_looks_forward() {
        let c = camera(3, 3);
        let r = c.generate_ray(1, 1);
        assert_eq!(r.o, Point3f::new(0.0, 0.0, 5.0));
        assert!(approx_eq!(f32, r.d.z, -1.0, epsilon = 1e-6));
    }

    #[test]
    fn top_left_pixel_points_up_and_left() {
        let c = camera(4, 4);
        let r = c.generate_ray(0, 0);
        assert!(r.d.x < 0.0);
        assert!(r.d.y > 0.0);
    }

    #[test]
    fn resize_recomputes_directions() {
        let mut c = camera(2, 2);
        c.resize(8, 4);
        assert_eq!(c.resolution(), (8, 4));
        let r = c.generate_ray(7, 3);
        assert!(approx_eq!(f32, r.d.length(), 1.0, epsilon = 1e-6));
    }

    #[test]
    fn zero_jitter_matches_cached_direction() {
        let c = camera(5, 3);
        let a = c.generate_ray(4, 2);
        let b = c.generate_jittered_ray(4, 2, (0.0, 0.0));
        assert!(approx_eq!(f32, a.d.x, b.d.x, epsilon = 1e-6));
        assert!(approx_eq!(f32, a.d.y, b.d.y, epsilon = 1e-6));
    }
}
