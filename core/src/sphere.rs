//! Sphere

use crate::geometry::*;
use crate::math::*;

/// An implicit sphere.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere {
    /// Centre in world space.
    pub center: Point3f,

    /// Radius.
    pub radius: Float,

    /// Index into the scene's material list.
    pub material_index: u32,
}

impl Sphere {
    /// Create a new sphere.
    ///
    /// * `center`         - Centre in world space.
    /// * `radius`         - Radius.
    /// * `material_index` - Index into the scene's material list.
    pub fn new(center: Point3f, radius: Float, material_index: u32) -> Self {
        debug_assert!(radius > 0.0);
        Self {
            center,
            radius,
            material_index,
        }
    }

    /// Returns the smallest positive ray parameter at which the ray meets the
    /// sphere. The far root is returned when the origin is inside.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &Ray) -> Option<Float> {
        let o = ray.o - self.center;
        let a = ray.d.dot(&ray.d);
        let b = 2.0 * o.dot(&ray.d);
        let c = o.dot(&o) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant <= 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let t0 = (-b - root) / (2.0 * a);
        if t0 >= 0.0 {
            return Some(t0);
        }
        let t1 = (-b + root) / (2.0 * a);
        if t1 >= 0.0 {
            Some(t1)
        } else {
            None
        }
    }

    /// Outward unit normal at a point on the surface.
    ///
    /// * `p` - Point on the surface.
    pub fn normal_at(&self, p: &Point3f) -> Normal3f {
        (*p - self.center).normalize()
    }

    /// Returns the bounding box.
    pub fn bounds(&self) -> Bounds3f {
        Bounds3f::new(self.center, Vector3f::new(self.radius, self.radius, self.radius))
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
