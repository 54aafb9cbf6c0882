//! Demo scene
//!
//! A Cornell-style box authored procedurally in two forms: large implicit
//! spheres standing in for the walls, and a triangle mesh of the same room.

use pt_core::camera::PinholeCamera;
use pt_core::geometry::*;
use pt_core::material::Material;
use pt_core::math::*;
use pt_core::mesh::TriangleMesh;
use pt_core::scene::GeometryMode;
use pt_core::spectrum::Spectrum;
use pt_core::sphere::Sphere;

/// Scale applied to the unit room of the mesh scene.
const MESH_SCALE: Float = 7.0;

/// Vertical field of view in degrees.
const FOV: Float = 80.0;

const FLOOR: u32 = 0;
const GREEN: u32 = 1;
const RED: u32 = 2;
const BLUE: u32 = 3;
const YELLOW: u32 = 4;
const LIGHT: u32 = 5;
const MIRROR: u32 = 6;
const GLASS: u32 = 7;

/// Returns the materials shared by both scene forms.
pub fn materials() -> Vec<Material> {
    let mut materials = vec![Material::default(); 8];
    materials[FLOOR as usize] = Material::diffuse(Spectrum::new(0.8));
    materials[GREEN as usize] = Material::diffuse(Spectrum::from_rgb(0.35, 1.0, 0.17));
    materials[RED as usize] = Material::diffuse(Spectrum::from_rgb(1.0, 0.0, 0.0));
    materials[BLUE as usize] = Material::glossy(Spectrum::from_rgb(0.0, 0.5, 1.0), 0.9);
    materials[YELLOW as usize] = Material::glossy(Spectrum::from_rgb(1.0, 0.8, 0.0), 0.9);
    materials[LIGHT as usize] = Material {
        emission: Spectrum::new(20.0),
        ..Material::default()
    };
    materials[MIRROR as usize] = Material::glossy(Spectrum::ONE, 0.0);
    materials[GLASS as usize] = Material::dielectric(Spectrum::ONE, 1.0, 1.5);
    materials
}

/// Returns the room built from implicit spheres.
pub fn spheres() -> Vec<Sphere> {
    let wall = |x: Float, y: Float, z: Float, material: u32| {
        Sphere::new(Point3f::new(x, y, z), 1000.0, material)
    };

    vec![
        wall(0.0, -1000.0, 0.0, FLOOR),
        wall(0.0, 1010.0, 0.0, FLOOR),
        wall(0.0, 0.0, -1005.0, FLOOR),
        wall(0.0, 0.0, 1005.0, FLOOR),
        wall(-1005.0, 0.0, 0.0, GREEN),
        wall(1005.0, 0.0, 0.0, RED),
        Sphere::new(Point3f::new(2.0, 2.0, -2.5), 2.0, BLUE),
        Sphere::new(Point3f::new(-2.0, 2.0, 0.0), 2.0, YELLOW),
        Sphere::new(Point3f::new(1.0, 0.5, 1.0), 1.0, MIRROR),
        Sphere::new(Point3f::new(2.5, 0.75, 2.5), 0.75, GLASS),
        Sphere::new(Point3f::new(0.0, 29.88, 0.0), 20.0, LIGHT),
    ]
}

/// Returns the room as a triangle mesh.
pub fn mesh() -> TriangleMesh {
    let mut b = MeshBuilder::default();

    let p = |x: Float, y: Float, z: Float| Point3f::new(x, y, z) * MESH_SCALE;

    // Floor, ceiling and back wall.
    b.quad([p(-1.0, 0.0, 1.0), p(1.0, 0.0, 1.0), p(1.0, 0.0, -1.0), p(-1.0, 0.0, -1.0)], FLOOR);
    b.quad([p(-1.0, 2.0, -1.0), p(1.0, 2.0, -1.0), p(1.0, 2.0, 1.0), p(-1.0, 2.0, 1.0)], FLOOR);
    b.quad([p(-1.0, 0.0, -1.0), p(1.0, 0.0, -1.0), p(1.0, 2.0, -1.0), p(-1.0, 2.0, -1.0)], FLOOR);

    // Side walls.
    b.quad([p(-1.0, 0.0, 1.0), p(-1.0, 0.0, -1.0), p(-1.0, 2.0, -1.0), p(-1.0, 2.0, 1.0)], GREEN);
    b.quad([p(1.0, 0.0, -1.0), p(1.0, 0.0, 1.0), p(1.0, 2.0, 1.0), p(1.0, 2.0, -1.0)], RED);

    // Ceiling light.
    b.quad([p(-0.24, 1.98, -0.22), p(0.24, 1.98, -0.22), p(0.24, 1.98, 0.16), p(-0.24, 1.98, 0.16)], LIGHT);

    b.uv_sphere(p(-0.42, 0.33, -0.28), 0.33 * MESH_SCALE, 24, 48, MIRROR);
    b.uv_sphere(p(0.45, 0.33, 0.38), 0.33 * MESH_SCALE, 24, 48, BLUE);

    b.build()
}

/// Returns the camera for a scene form.
///
/// * `mode`   - Which scene form is rendered.
/// * `width`  - Image width.
/// * `height` - Image height.
pub fn camera(mode: GeometryMode, width: usize, height: usize) -> PinholeCamera {
    let up = Vector3f::new(0.0, 1.0, 0.0);
    match mode {
        GeometryMode::Spheres => PinholeCamera::new(
            Point3f::new(0.0, 5.0, 4.5),
            Point3f::new(0.0, 3.0, 0.0),
            up,
            FOV,
            width,
            height,
        ),
        GeometryMode::Mesh => PinholeCamera::new(
            Point3f::new(0.0, MESH_SCALE, 2.5 * MESH_SCALE),
            Point3f::new(0.0, MESH_SCALE, 0.0),
            up,
            FOV,
            width,
            height,
        ),
    }
}

/// Accumulates triangles with per-vertex normals and per-triangle materials.
#[derive(Default)]
struct MeshBuilder {
    vertices: Vec<Point3f>,
    normals: Vec<Normal3f>,
    indices: Vec<[u32; 3]>,
    materials: Vec<u32>,
}

impl MeshBuilder {
    /// Add a planar quad given counter-clockwise corners.
    ///
    /// * `corners`  - Quad corners.
    /// * `material` - Material index.
    fn quad(&mut self, corners: [Point3f; 4], material: u32) {
        let n = (corners[1] - corners[0])
            .cross(&(corners[2] - corners[0]))
            .normalize();
        let base = self.vertices.len() as u32;
        for c in corners {
            self.vertices.push(c);
            self.normals.push(n);
        }
        self.indices.push([base, base + 1, base + 2]);
        self.indices.push([base, base + 2, base + 3]);
        self.materials.extend([material, material]);
    }

    /// Add a latitude/longitude tessellated sphere with smooth normals.
    ///
    /// * `center`   - Centre.
    /// * `radius`   - Radius.
    /// * `stacks`   - Latitude bands.
    /// * `slices`   - Longitude segments.
    /// * `material` - Material index.
    fn uv_sphere(&mut self, center: Point3f, radius: Float, stacks: u32, slices: u32, material: u32) {
        let base = self.vertices.len() as u32;
        for i in 0..=stacks {
            let theta = PI * i as Float / stacks as Float;
            for j in 0..=slices {
                let phi = TWO_PI * j as Float / slices as Float;
                let n = Normal3f::new(
                    theta.sin() * phi.cos(),
                    theta.cos(),
                    theta.sin() * phi.sin(),
                );
                self.vertices.push(center + n * radius);
                self.normals.push(n);
            }
        }

        let row = slices + 1;
        for i in 0..stacks {
            for j in 0..slices {
                let a = base + i * row + j;
                let b = a + row;
                // Skip the triangles that collapse onto a pole.
                if i != stacks - 1 {
                    self.indices.push([a, b, b + 1]);
                    self.materials.push(material);
                }
                if i != 0 {
                    self.indices.push([a, b + 1, a + 1]);
                    self.materials.push(material);
                }
            }
        }
    }

    fn build(self) -> TriangleMesh {
        TriangleMesh::new(self.vertices, self.indices)
            .with_normals(self.normals)
            .with_material_indices(self.materials)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn material_indices_are_valid() {
        let n = materials().len() as u32;
        assert!(spheres().iter().all(|s| s.material_index < n));
        assert!(mesh().material_indices.iter().all(|&m| m < n));
    }

    #[test]
    fn mesh_has_one_material_per_triangle_and_unit_normals() {
        let mesh = mesh();
        assert_eq!(mesh.material_indices.len(), mesh.n_triangles());
        let normals = mesh.normals.as_ref().expect("normals");
        assert_eq!(normals.len(), mesh.vertices.len());
        for n in normals.iter() {
            assert!(approx_eq!(f32, n.length(), 1.0, epsilon = 1e-4));
        }
    }

    #[test]
    fn uv_sphere_has_no_pole_slivers() {
        let mut b = MeshBuilder::default();
        b.uv_sphere(Point3f::ZERO, 1.0, 4, 8, 0);
        // Two triangles per band segment, less one per segment at each pole.
        assert_eq!(b.indices.len(), 2 * 4 * 8 - 2 * 8);
        for tri in b.indices.iter() {
            let [a, c, d] = tri.map(|i| b.vertices[i as usize]);
            assert!((c - a).cross(&(d - a)).length() > 0.0);
        }
    }

    #[test]
    fn cameras_face_their_rooms() {
        let cam = camera(GeometryMode::Spheres, 4, 4);
        assert!(spheres()[..6]
            .iter()
            .all(|wall| (cam.position - wall.center).length() > wall.radius));

        let bounds = mesh().bounds();
        let cam = camera(GeometryMode::Mesh, 4, 4);
        let (lo, hi) = bounds.range(Axis::X);
        assert!(cam.position.x > lo && cam.position.x < hi);
        let (_, front) = bounds.range(Axis::Z);
        assert!(cam.position.z > front);
    }
}
