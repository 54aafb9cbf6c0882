//! Ray intersection kernels shared by the acceleration structure and the
//! integrator.

use super::{Bounds3f, Normal3f, Point3f, Vector3f};
use crate::math::{Float, TRIANGLE_EPSILON};

/// Parametric entry and exit distances of a ray through a box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoxHit {
    /// Entry distance. Zero when the origin is inside the box.
    pub t_near: Float,

    /// Exit distance.
    pub t_far: Float,
}

/// Result of a successful ray/triangle test.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct TriangleHit {
    /// Distance along the ray.
    pub t: Float,

    /// Barycentric weight of the second vertex.
    pub u: Float,

    /// Barycentric weight of the third vertex.
    pub v: Float,
}

/// Slab test of a ray against a box.
///
/// Zero direction components produce infinite reciprocals which resolve
/// through IEEE arithmetic. A ray lying exactly in a slab plane produces a NaN
/// that `f32::min`/`f32::max` drop, so such grazing rays may go either way.
///
/// * `bounds` - The box.
/// * `o`      - Ray origin.
/// * `inv_d`  - Reciprocal of the ray direction.
pub fn ray_box_intersect(bounds: &Bounds3f, o: &Point3f, inv_d: &Vector3f) -> Option<BoxHit> {
    let p_min = bounds.p_min();
    let p_max = bounds.p_max();

    let mut t_near = -Float::INFINITY;
    let mut t_far = Float::INFINITY;
    for axis in 0..3 {
        let t1 = (p_min[axis] - o[axis]) * inv_d[axis];
        let t2 = (p_max[axis] - o[axis]) * inv_d[axis];
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
    }

    if bounds.contains(o) {
        return Some(BoxHit { t_near: 0.0, t_far });
    }

    // Box entirely behind the ray, or the slabs don't overlap.
    if t_far < 0.0 || t_near > t_far {
        return None;
    }

    Some(BoxHit { t_near, t_far })
}

/// Möller–Trumbore ray/triangle test. Hits closer than `TRIANGLE_EPSILON`
/// and near-parallel rays are rejected.
///
/// * `o`  - Ray origin.
/// * `d`  - Ray direction.
/// * `v0` - First vertex.
/// * `v1` - Second vertex.
/// * `v2` - Third vertex.
pub fn ray_triangle_intersect(
    o: &Point3f,
    d: &Vector3f,
    v0: &Point3f,
    v1: &Point3f,
    v2: &Point3f,
) -> Option<TriangleHit> {
    let e1 = *v1 - *v0;
    let e2 = *v2 - *v0;

    let h = d.cross(&e2);
    let a = e1.dot(&h);
    if a.abs() < TRIANGLE_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = *o - *v0;
    let u = f * s.dot(&h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(&e1);
    let v = f * d.dot(&q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * e2.dot(&q);
    if t > TRIANGLE_EPSILON {
        Some(TriangleHit { t, u, v })
    } else {
        None
    }
}

/// Returns the unit geometric normal of a triangle, wound counter-clockwise.
///
/// * `p0` - First vertex.
/// * `p1` - Second vertex.
/// * `p2` - Third vertex.
pub fn triangle_normal(p0: &Point3f, p1: &Point3f, p2: &Point3f) -> Normal3f {
    (*p1 - *p0).cross(&(*p2 - *p0)).normalize()
}

/// Interpolates vertex normals with barycentric weights and renormalizes.
///
/// * `n` - Vertex normals.
/// * `u` - Weight of `n[1]`.
/// * `v` - Weight of `n[2]`.
pub fn interpolate_normal(n: &[Normal3f; 3], u: Float, v: Float) -> Normal3f {
    ((1.0 - u - v) * n[0] + u * n[1] + v * n[2]).normalize()
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
