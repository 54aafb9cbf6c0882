//! Aggregates

use crate::geometry::*;
use crate::math::*;
use std::sync::Arc;

/// Nearest triangle intersection found by an aggregate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct MeshHit {
    /// Ray parameter of the hit.
    pub t: Float,

    /// Index of the triangle that was hit.
    pub triangle_index: u32,

    /// Barycentric weight of the triangle's second vertex.
    pub u: Float,

    /// Barycentric weight of the triangle's third vertex.
    pub v: Float,
}

/// Aggregate trait defines common behaviours for ray intersection accelerators
/// over a triangle mesh.
pub trait Aggregate {
    /// Returns a bounding box in the world space.
    fn world_bound(&self) -> Bounds3f;

    /// Returns the nearest triangle hit along the ray, if any. Never mutates
    /// the aggregate.
    ///
    /// * `ray` - The ray.
    fn intersect(&self, ray: &Ray) -> Option<MeshHit>;
}

/// Atomic reference counted `Aggregate`.
pub type ArcAggregate = Arc<dyn Aggregate + Send + Sync>;

/// Tests every triangle of a mesh; the reference every accelerator must agree
/// with.
///
/// * `vertices` - Vertex positions.
/// * `indices`  - Vertex indices, one entry per triangle.
/// * `ray`      - The ray.
pub fn brute_force_intersect(vertices: &[Point3f], indices: &[[u32; 3]], ray: &Ray) -> Option<MeshHit> {
    let mut nearest: Option<MeshHit> = None;
    for (i, tri) in indices.iter().enumerate() {
        let [a, b, c] = *tri;
        let hit = ray_triangle_intersect(
            &ray.o,
            &ray.d,
            &vertices[a as usize],
            &vertices[b as usize],
            &vertices[c as usize],
        );
        if let Some(h) = hit {
            if nearest.map_or(true, |n| h.t < n.t) {
                nearest = Some(MeshHit {
                    t: h.t,
                    triangle_index: i as u32,
                    u: h.u,
                    v: h.v,
                });
            }
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn brute_force_picks_nearest_triangle() {
        let vertices = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 0.0),
            Point3f::new(0.0, 0.0, 0.5),
            Point3f::new(1.0, 0.0, 0.5),
            Point3f::new(0.0, 1.0, 0.5),
        ];
        let indices = vec![[0, 1, 2], [3, 4, 5]];
        let ray = Ray::new(Point3f::new(0.25, 0.25, 1.0), Vector3f::new(0.0, 0.0, -1.0));
        let hit = brute_force_intersect(&vertices, &indices, &ray).expect("hit");
        assert_eq!(hit.triangle_index, 1);
        assert!(approx_eq!(f32, hit.t, 0.5, epsilon = 1e-6));
    }

    #[test]
    fn brute_force_on_empty_mesh_misses() {
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, -1.0));
        assert!(brute_force_intersect(&[], &[], &ray).is_none());
    }
}
