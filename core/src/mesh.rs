//! Triangle meshes

use crate::geometry::*;
use crate::math::*;
use std::sync::Arc;

/// Triangle mesh with optional per-vertex normals and per-triangle materials.
#[derive(Clone, Debug, Default)]
pub struct TriangleMesh {
    /// Vertex positions.
    pub vertices: Vec<Point3f>,

    /// Vertex indices, one entry per triangle.
    pub indices: Vec<[u32; 3]>,

    /// Vertex normals; parallel to `vertices` when present.
    pub normals: Option<Vec<Normal3f>>,

    /// Material index per triangle. Empty means material 0 everywhere.
    pub material_indices: Vec<u32>,
}

/// Atomic reference counted `TriangleMesh`.
pub type ArcTriangleMesh = Arc<TriangleMesh>;

impl TriangleMesh {
    /// Create a new triangle mesh.
    ///
    /// * `vertices` - Vertex positions.
    /// * `indices`  - Vertex indices, one entry per triangle. Every index must
    ///                be less than `vertices.len()`.
    pub fn new(vertices: Vec<Point3f>, indices: Vec<[u32; 3]>) -> Self {
        let n = vertices.len();
        assert!(
            indices.iter().flatten().all(|&i| (i as usize) < n),
            "triangle index out of range for {} vertices",
            n
        );
        Self {
            vertices,
            indices,
            normals: None,
            material_indices: vec![],
        }
    }

    /// Attach per-vertex normals.
    ///
    /// * `normals` - One unit normal per vertex.
    pub fn with_normals(mut self, normals: Vec<Normal3f>) -> Self {
        assert_eq!(normals.len(), self.vertices.len());
        self.normals = Some(normals);
        self
    }

    /// Attach per-triangle material indices.
    ///
    /// * `material_indices` - One material index per triangle.
    pub fn with_material_indices(mut self, material_indices: Vec<u32>) -> Self {
        assert_eq!(material_indices.len(), self.indices.len());
        self.material_indices = material_indices;
        self
    }

    /// Returns the number of triangles.
    pub fn n_triangles(&self) -> usize {
        self.indices.len()
    }

    /// Returns the three vertex positions of a triangle.
    ///
    /// * `triangle_index` - The triangle.
    pub fn triangle(&self, triangle_index: usize) -> [Point3f; 3] {
        let [a, b, c] = self.indices[triangle_index];
        [
            self.vertices[a as usize],
            self.vertices[b as usize],
            self.vertices[c as usize],
        ]
    }

    /// Returns the material index of a triangle.
    ///
    /// * `triangle_index` - The triangle.
    pub fn material_index(&self, triangle_index: usize) -> u32 {
        self.material_indices
            .get(triangle_index)
            .copied()
            .unwrap_or(0)
    }

    /// Returns the shading normal at barycentric `(u, v)`; interpolated from
    /// vertex normals when present, otherwise the geometric normal.
    ///
    /// * `triangle_index` - The triangle.
    /// * `u`              - Barycentric weight of the second vertex.
    /// * `v`              - Barycentric weight of the third vertex.
    pub fn shading_normal(&self, triangle_index: usize, u: Float, v: Float) -> Normal3f {
        match &self.normals {
            Some(normals) => {
                let [a, b, c] = self.indices[triangle_index];
                interpolate_normal(
                    &[normals[a as usize], normals[b as usize], normals[c as usize]],
                    u,
                    v,
                )
            }
            None => {
                let [p0, p1, p2] = self.triangle(triangle_index);
                triangle_normal(&p0, &p1, &p2)
            }
        }
    }

    /// Returns the tight bounding box of all vertices.
    pub fn bounds(&self) -> Bounds3f {
        Bounds3f::from_points(&self.vertices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    fn quad() -> TriangleMesh {
        TriangleMesh::new(
            vec![
                Point3f::new(0.0, 0.0, 0.0),
                Point3f::new(1.0, 0.0, 0.0),
                Point3f::new(1.0, 1.0, 0.0),
                Point3f::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    #[should_panic]
    fn out_of_range_index_is_rejected() {
        TriangleMesh::new(vec![Point3f::ZERO], vec![[0, 0, 1]]);
    }

    #[test]
    fn geometric_normal_without_vertex_normals() {
        let n = quad().shading_normal(1, 0.3, 0.3);
        assert_eq!(n, Normal3f::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn interpolated_normal_with_vertex_normals() {
        let up = Normal3f::new(0.0, 0.0, 1.0);
        let tilted = Normal3f::new(1.0, 0.0, 1.0).normalize();
        let mesh = quad().with_normals(vec![up, tilted, up, up]);
        let n = mesh.shading_normal(0, 1.0, 0.0);
        assert!(approx_eq!(f32, n.x, tilted.x, epsilon = 1e-6));
        assert!(approx_eq!(f32, n.length(), 1.0, epsilon = 1e-6));
    }

    #[test]
    fn material_defaults_to_zero() {
        let mesh = quad();
        assert_eq!(mesh.material_index(1), 0);
        let mesh = mesh.with_material_indices(vec![3, 4]);
        assert_eq!(mesh.material_index(1), 4);
    }

    #[test]
    fn bounds_cover_vertices() {
        let b = quad().bounds();
        assert_eq!(b.p_min(), Point3f::new(0.0, 0.0, 0.0));
        assert_eq!(b.p_max(), Point3f::new(1.0, 1.0, 0.0));
    }
}
