//! 3-D Axis Aligned Bounding Boxes.

use super::{Point3f, Vector3f};
use crate::math::{Axis, Float};
use std::fmt;

/// Axis aligned box stored as a center and non-negative half extents.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Bounds3f {
    /// Center of the box.
    pub center: Point3f,

    /// Half the side length along each axis.
    pub half_extents: Vector3f,
}

impl Bounds3f {
    /// Creates a new bounding box.
    ///
    /// * `center`       - Center of the box.
    /// * `half_extents` - Half extents (must be non-negative).
    pub fn new(center: Point3f, half_extents: Vector3f) -> Self {
        debug_assert!(
            half_extents.x >= 0.0 && half_extents.y >= 0.0 && half_extents.z >= 0.0,
            "negative half extents {half_extents}"
        );
        Self {
            center,
            half_extents,
        }
    }

    /// Creates a bounding box from its minimum and maximum corners.
    ///
    /// * `p_min` - Minimum corner.
    /// * `p_max` - Maximum corner.
    pub fn from_corners(p_min: Point3f, p_max: Point3f) -> Self {
        Self::new(0.5 * (p_min + p_max), 0.5 * (p_max - p_min))
    }

    /// Returns the tightest box around a set of points. No points yields a
    /// degenerate box at the origin.
    ///
    /// * `points` - The points.
    pub fn from_points<'a, I>(points: I) -> Self
    where
        I: IntoIterator<Item = &'a Point3f>,
    {
        let mut iter = points.into_iter();
        match iter.next() {
            None => Self::default(),
            Some(first) => {
                let (p_min, p_max) = iter.fold((*first, *first), |(lo, hi), p| (lo.min(p), hi.max(p)));
                Self::from_corners(p_min, p_max)
            }
        }
    }

    /// Returns the minimum corner.
    pub fn p_min(&self) -> Point3f {
        self.center - self.half_extents
    }

    /// Returns the maximum corner.
    pub fn p_max(&self) -> Point3f {
        self.center + self.half_extents
    }

    /// Returns the lower and upper coordinate of the box along an axis.
    ///
    /// * `axis` - The axis.
    pub fn range(&self, axis: Axis) -> (Float, Float) {
        (
            self.center[axis] - self.half_extents[axis],
            self.center[axis] + self.half_extents[axis],
        )
    }

    /// Returns a copy of this box whose extent along `axis` is replaced by
    /// `[lo, hi]`. The other two axes are kept.
    ///
    /// * `axis` - The axis to replace.
    /// * `lo`   - New lower coordinate.
    /// * `hi`   - New upper coordinate.
    pub fn with_range(&self, axis: Axis, lo: Float, hi: Float) -> Self {
        debug_assert!(lo <= hi);
        let mut b = *self;
        let half = (hi - lo) * 0.5;
        b.half_extents[axis] = half;
        b.center[axis] = hi - half;
        b
    }

    /// Returns a box containing both boxes.
    ///
    /// * `other` - The other bounding box.
    pub fn union(&self, other: &Self) -> Self {
        Self::from_corners(self.p_min().min(&other.p_min()), self.p_max().max(&other.p_max()))
    }

    /// Returns the surface area of the box.
    pub fn surface_area(&self) -> Float {
        let e = self.half_extents;
        8.0 * (e.x * e.y + e.y * e.z + e.x * e.z)
    }

    /// Returns true if a point is inside the box or on its boundary.
    ///
    /// * `p` - The point.
    pub fn contains(&self, p: &Point3f) -> bool {
        let d = (*p - self.center).abs();
        d.x <= self.half_extents.x && d.y <= self.half_extents.y && d.z <= self.half_extents.z
    }
}

impl fmt::Display for Bounds3f {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[ {} - {} ]", self.p_min(), self.p_max())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn from_points_of_nothing_is_degenerate_origin_box() {
        let b = Bounds3f::from_points(&[]);
        assert_eq!(b.center, Point3f::ZERO);
        assert_eq!(b.half_extents, Vector3f::ZERO);
    }

    #[test]
    fn from_points_is_tight() {
        let pts = [
            Point3f::new(-1.0, 2.0, 0.5),
            Point3f::new(3.0, -2.0, 0.0),
            Point3f::new(0.0, 0.0, 4.5),
        ];
        let b = Bounds3f::from_points(&pts);
        assert_eq!(b.p_min(), Point3f::new(-1.0, -2.0, 0.0));
        assert_eq!(b.p_max(), Point3f::new(3.0, 2.0, 4.5));
    }

    #[test]
    fn surface_area_of_unit_cube() {
        let b = Bounds3f::from_corners(Point3f::ZERO, Point3f::ONE);
        assert!(approx_eq!(f32, b.surface_area(), 6.0, ulps = 2));
    }

    #[test]
    fn with_range_replaces_one_axis() {
        let b = Bounds3f::new(Point3f::ZERO, Vector3f::ONE);
        let left = b.with_range(Axis::Y, -1.0, 0.25);
        assert_eq!(left.range(Axis::Y), (-1.0, 0.25));
        assert_eq!(left.range(Axis::X), (-1.0, 1.0));
        assert_eq!(left.range(Axis::Z), (-1.0, 1.0));
    }

    prop_compose! {
        fn point3_f32()(x in -100.0..100.0f32, y in -100.0..100.0f32, z in -100.0..100.0f32) -> Point3f {
            Point3f::new(x, y, z)
        }
    }

    proptest! {
        #[test]
        fn from_points_contains_every_point(pts in prop::collection::vec(point3_f32(), 1..32)) {
            let b = Bounds3f::from_points(&pts);
            prop_assert!(b.half_extents.min_component() >= 0.0);
            for p in pts.iter() {
                // Center/extent round trip may lose an ulp or two.
                let grown = Bounds3f::new(b.center, b.half_extents + Vector3f::ONE * 1e-3);
                prop_assert!(grown.contains(p));
            }
        }

        #[test]
        fn union_contains_both(
            a in point3_f32(), b in point3_f32(), c in point3_f32(), d in point3_f32(),
        ) {
            let b1 = Bounds3f::from_corners(a.min(&b), a.max(&b));
            let b2 = Bounds3f::from_corners(c.min(&d), c.max(&d));
            let u = b1.union(&b2);
            let grown = Bounds3f::new(u.center, u.half_extents + Vector3f::ONE * 1e-3);
            for p in [a, b, c, d].iter() {
                prop_assert!(grown.contains(p));
            }
        }
    }
}
