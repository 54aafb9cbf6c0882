//! Scene

use crate::aggregate::*;
use crate::geometry::*;
use crate::material::*;
use crate::math::*;
use crate::mesh::*;
use crate::sphere::*;

/// Which primitive set answers ray queries for a frame. Only one is ever
/// queried per ray.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GeometryMode {
    /// Brute-force test of the sphere list.
    #[default]
    Spheres,

    /// Nearest-hit query against the mesh aggregate.
    Mesh,
}

/// Surface point found by a scene query.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SurfaceHit {
    /// Ray parameter.
    pub t: Float,

    /// Hit position.
    pub p: Point3f,

    /// Outward unit shading normal; not yet flipped toward the ray.
    pub n: Normal3f,

    /// Material index.
    pub material_index: u32,
}

/// Scene.
#[derive(Clone, Default)]
pub struct Scene {
    /// Implicit spheres.
    pub spheres: Vec<Sphere>,

    /// Materials referenced by spheres and triangles.
    pub materials: Vec<Material>,

    /// Triangle mesh used for shading data.
    pub mesh: Option<ArcTriangleMesh>,

    /// Accelerator built over `mesh`.
    pub aggregate: Option<ArcAggregate>,
}

impl Scene {
    /// Creates a new `Scene` with spheres only.
    ///
    /// * `spheres`   - Implicit spheres.
    /// * `materials` - Materials.
    pub fn new(spheres: Vec<Sphere>, materials: Vec<Material>) -> Self {
        Self {
            spheres,
            materials,
            mesh: None,
            aggregate: None,
        }
    }

    /// Attach a triangle mesh and the accelerator built over it.
    ///
    /// * `mesh`      - Mesh supplying normals and materials.
    /// * `aggregate` - Accelerator built over the same triangles.
    pub fn with_mesh(mut self, mesh: ArcTriangleMesh, aggregate: ArcAggregate) -> Self {
        self.mesh = Some(mesh);
        self.aggregate = Some(aggregate);
        self
    }

    /// Returns the material at `index`.
    ///
    /// * `index` - Material index.
    pub fn material(&self, index: u32) -> &Material {
        &self.materials[index as usize]
    }

    /// Returns the nearest surface along the ray in the given mode.
    ///
    /// * `ray`  - The ray.
    /// * `mode` - Which primitives to query.
    pub fn intersect(&self, ray: &Ray, mode: GeometryMode) -> Option<SurfaceHit> {
        match mode {
            GeometryMode::Spheres => self.intersect_spheres(ray),
            GeometryMode::Mesh => self.intersect_mesh(ray),
        }
    }

    fn intersect_spheres(&self, ray: &Ray) -> Option<SurfaceHit> {
        let mut closest: Option<(Float, &Sphere)> = None;
        for sphere in self.spheres.iter() {
            if let Some(t) = sphere.intersect(ray) {
                if closest.map_or(true, |(best, _)| t < best) {
                    closest = Some((t, sphere));
                }
            }
        }

        closest.map(|(t, sphere)| {
            let p = ray.at(t);
            SurfaceHit {
                t,
                p,
                n: sphere.normal_at(&p),
                material_index: sphere.material_index,
            }
        })
    }

    fn intersect_mesh(&self, ray: &Ray) -> Option<SurfaceHit> {
        let (mesh, aggregate) = match (&self.mesh, &self.aggregate) {
            (Some(mesh), Some(aggregate)) => (mesh, aggregate),
            _ => return None,
        };

        aggregate.intersect(ray).map(|hit| {
            let tri = hit.triangle_index as usize;
            SurfaceHit {
                t: hit.t,
                p: ray.at(hit.t),
                n: mesh.shading_normal(tri, hit.u, hit.v),
                material_index: mesh.material_index(tri),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::*;
    use std::sync::Arc;

    struct BruteForce(TriangleMesh);

    impl Aggregate for BruteForce {
        fn world_bound(&self) -> Bounds3f {
            self.0.bounds()
        }

        fn intersect(&self, ray: &Ray) -> Option<MeshHit> {
            brute_force_intersect(&self.0.vertices, &self.0.indices, ray)
        }
    }

    fn scene() -> Scene {
        let mesh = TriangleMesh::new(
            vec![
                Point3f::new(-1.0, -1.0, -2.0),
                Point3f::new(1.0, -1.0, -2.0),
                Point3f::new(0.0, 1.0, -2.0),
            ],
            vec![[0, 1, 2]],
        )
        .with_material_indices(vec![1]);
        let aggregate = Arc::new(BruteForce(mesh.clone()));
        Scene::new(
            vec![Sphere::new(Point3f::new(0.0, 0.0, -10.0), 1.0, 0)],
            vec![Material::default(), Material::emissive(Spectrum::ONE)],
        )
        .with_mesh(Arc::new(mesh), aggregate)
    }

    #[test]
    fn modes_are_mutually_exclusive() {
        let s = scene();
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, -1.0));

        let sphere_hit = s.intersect(&ray, GeometryMode::Spheres).expect("sphere");
        assert_eq!(sphere_hit.material_index, 0);
        assert_eq!(sphere_hit.n, Normal3f::new(0.0, 0.0, 1.0));

        let mesh_hit = s.intersect(&ray, GeometryMode::Mesh).expect("mesh");
        assert_eq!(mesh_hit.material_index, 1);
        assert!(s.material(mesh_hit.material_index).is_emissive());
    }

    #[test]
    fn nearest_sphere_wins() {
        let mut s = scene();
        s.spheres.push(Sphere::new(Point3f::new(0.0, 0.0, -5.0), 1.0, 1));
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, -1.0));
        let hit = s.intersect(&ray, GeometryMode::Spheres).expect("hit");
        assert_eq!(hit.material_index, 1);
        assert_eq!(hit.p, Point3f::new(0.0, 0.0, -4.0));
    }

    #[test]
    fn mesh_mode_without_mesh_misses() {
        let s = Scene::new(vec![], vec![Material::default()]);
        let ray = Ray::new(Point3f::ZERO, Vector3f::new(0.0, 0.0, -1.0));
        assert!(s.intersect(&ray, GeometryMode::Mesh).is_none());
    }
}
