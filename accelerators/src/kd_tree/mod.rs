//! KD Tree.

use pt_core::aggregate::*;
use pt_core::geometry::*;
use pt_core::math::*;
use pt_core::mesh::*;

mod common;
mod sah;

pub use common::*;
use sah::find_split;

/// KD Tree Accelerator over a triangle mesh.
///
/// The tree keeps its own copy of the vertex and triangle arrays. It is
/// immutable once built, so any number of threads may query it at once.
#[derive(Clone, Debug)]
pub struct KdTreeAccel {
    /// Vertex positions.
    vertices: Vec<Point3f>,

    /// Vertex indices per triangle.
    triangles: Vec<[u32; 3]>,

    /// The tree root.
    root: KdTreeNode,

    /// Deepest level reached; the root is level 1.
    n_levels: usize,

    /// Number of leaf nodes.
    n_leaves: usize,

    /// Number of nodes.
    n_nodes: usize,

    /// Build parameters.
    config: KdTreeConfig,
}

/// Counters and borrowed mesh data used during construction.
struct Builder<'a> {
    config: &'a KdTreeConfig,
    vertices: &'a [Point3f],
    triangles: &'a [[u32; 3]],
    n_levels: usize,
    n_leaves: usize,
    n_nodes: usize,
}

impl<'a> Builder<'a> {
    /// Returns the tight bounds of the given triangles' vertices.
    ///
    /// * `tri_indices` - The triangles.
    fn tight_bounds(&self, tri_indices: &[u32]) -> Bounds3f {
        let points: Vec<Point3f> = tri_indices
            .iter()
            .flat_map(|&t| self.triangles[t as usize])
            .map(|v| self.vertices[v as usize])
            .collect();
        Bounds3f::from_points(&points)
    }

    /// Recursively partition triangle references.
    ///
    /// * `tri_indices` - Triangles referenced by this node.
    /// * `bounds`      - Loose bounds handed down from the parent.
    /// * `depth`       - Depth of this node; the root is at depth 1.
    fn build_node(&mut self, tri_indices: Vec<u32>, bounds: Bounds3f, depth: usize) -> KdTreeNode {
        let n_triangles = tri_indices.len();
        let node_bounds = if self.config.tight_bounds {
            self.tight_bounds(&tri_indices)
        } else {
            bounds
        };

        let split = if n_triangles <= self.config.max_tris_per_node || depth >= self.config.max_depth {
            None
        } else {
            find_split(
                self.config,
                self.vertices,
                self.triangles,
                &tri_indices,
                &bounds,
                &node_bounds,
            )
            // A split that copies every reference into both children can
            // never terminate by count.
            .filter(|s| s.n_left < n_triangles || s.n_right < n_triangles)
        };

        let split = match split {
            Some(split) => split,
            None => return self.make_leaf(tri_indices, node_bounds, n_triangles, depth),
        };

        let axis = split.axis;
        let (min_before, max_before) = bounds.range(axis);

        let mut left_tris = Vec::with_capacity(split.n_left);
        let mut right_tris = Vec::with_capacity(split.n_right);
        for &t in tri_indices.iter() {
            let (lo, hi) = triangle_range(self.vertices, &self.triangles[t as usize], axis);
            if lo < split.pos {
                left_tris.push(t);
            }
            if hi >= split.pos {
                right_tris.push(t);
            }
        }

        let left_bounds = node_bounds.with_range(axis, min_before, split.pos);
        let right_bounds = node_bounds.with_range(axis, split.pos, max_before);

        debug!(
            "Depth {}: split {} triangles on {} at {} into {} / {}",
            depth,
            n_triangles,
            axis,
            split.pos,
            left_tris.len(),
            right_tris.len()
        );

        let left = self.build_node(left_tris, left_bounds, depth + 1);
        let right = self.build_node(right_tris, right_bounds, depth + 1);

        let id = self.n_nodes;
        self.n_nodes += 1;

        KdTreeNode {
            bounds: node_bounds,
            id,
            n_triangles,
            kind: KdNodeKind::Interior {
                split_axis: axis,
                split_pos: split.pos,
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    /// Finish a leaf node.
    fn make_leaf(&mut self, triangles: Vec<u32>, bounds: Bounds3f, n_triangles: usize, depth: usize) -> KdTreeNode {
        self.n_levels = max(self.n_levels, depth);

        let id = self.n_nodes;
        self.n_nodes += 1;
        self.n_leaves += 1;

        KdTreeNode {
            bounds,
            id,
            n_triangles,
            kind: KdNodeKind::Leaf { triangles },
        }
    }
}

impl KdTreeAccel {
    /// Build a tree over a triangle mesh. Every vertex index must be in range.
    ///
    /// * `triangles` - Vertex indices per triangle.
    /// * `vertices`  - Vertex positions.
    /// * `config`    - Build parameters.
    pub fn new(triangles: Vec<[u32; 3]>, vertices: Vec<Point3f>, config: KdTreeConfig) -> Self {
        let n_vertices = vertices.len();
        assert!(
            triangles.iter().flatten().all(|&i| (i as usize) < n_vertices),
            "triangle index out of range for {} vertices",
            n_vertices
        );

        let bounds = Bounds3f::from_points(&vertices);
        let tri_indices: Vec<u32> = (0..triangles.len() as u32).collect();

        let mut builder = Builder {
            config: &config,
            vertices: &vertices,
            triangles: &triangles,
            n_levels: 0,
            n_leaves: 0,
            n_nodes: 0,
        };
        let root = builder.build_node(tri_indices, bounds, 1);
        let (n_levels, n_leaves, n_nodes) = (builder.n_levels, builder.n_leaves, builder.n_nodes);

        info!(
            "KD tree created with {} nodes, {} leaves, {} levels for {} triangles",
            n_nodes,
            n_leaves,
            n_levels,
            triangles.len()
        );

        Self {
            vertices,
            triangles,
            root,
            n_levels,
            n_leaves,
            n_nodes,
            config,
        }
    }

    /// Build a tree over a copy of a mesh's geometry.
    ///
    /// * `mesh`   - The mesh.
    /// * `config` - Build parameters.
    pub fn from_mesh(mesh: &TriangleMesh, config: KdTreeConfig) -> Self {
        Self::new(mesh.indices.clone(), mesh.vertices.clone(), config)
    }

    /// Returns the root node.
    pub fn root(&self) -> &KdTreeNode {
        &self.root
    }

    /// Returns the build parameters.
    pub fn config(&self) -> &KdTreeConfig {
        &self.config
    }

    /// Returns the deepest level reached during construction.
    pub fn n_levels(&self) -> usize {
        self.n_levels
    }

    /// Returns the number of leaf nodes.
    pub fn n_leaves(&self) -> usize {
        self.n_leaves
    }

    /// Returns the number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Returns the retained vertex positions.
    pub fn vertices(&self) -> &[Point3f] {
        &self.vertices
    }

    /// Returns the retained triangle indices.
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the number of retained vertices.
    pub fn n_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the number of retained triangles.
    pub fn n_triangles(&self) -> usize {
        self.triangles.len()
    }

    /// Returns the total number of triangle references held by leaves. At
    /// least `n_triangles()`; larger when triangles straddle split planes.
    pub fn leaf_reference_count(&self) -> usize {
        let mut total = 0;
        self.root.visit(1, &mut |node: &KdTreeNode, _: usize| total += node.triangle_indices().len());
        total
    }

    /// Returns the summed triangle references per level, index 0 being the root.
    pub fn triangles_per_level(&self) -> Vec<usize> {
        let mut levels = vec![0; self.n_levels];
        self.root.visit(1, &mut |node: &KdTreeNode, depth: usize| levels[depth - 1] += node.n_triangles);
        levels
    }

    /// Logs the triangle count of every node along with its level.
    pub fn log_triangles_per_level(&self) {
        self.root
            .visit(1, &mut |node: &KdTreeNode, depth: usize| info!("Level: {}, Triangles: {}", depth, node.n_triangles));
    }

    /// Returns `(id, bounds)` for every node in depth first order.
    pub fn node_ids_and_bounds(&self) -> Vec<(usize, Bounds3f)> {
        let mut nodes = Vec::with_capacity(self.n_nodes);
        self.root.visit(1, &mut |node: &KdTreeNode, _: usize| nodes.push((node.id, node.bounds)));
        nodes
    }

    /// Logs every node's id and bounding box corners.
    pub fn log_node_ids_and_bounds(&self) {
        for (id, bounds) in self.node_ids_and_bounds() {
            info!("Node ID: {} min: {} max: {}", id, bounds.p_min(), bounds.p_max());
        }
    }

    /// Returns the nearest triangle hit using recursive traversal.
    ///
    /// * `ray` - The ray.
    pub fn intersect(&self, ray: &Ray) -> Option<MeshHit> {
        let mut nearest = None;
        self.intersect_node(&self.root, ray, &mut nearest);
        nearest
    }

    /// Visit a node and its children, pruning boxes that start beyond the
    /// nearest hit so far. Returns true if any triangle below it was hit.
    fn intersect_node(&self, node: &KdTreeNode, ray: &Ray, nearest: &mut Option<MeshHit>) -> bool {
        let t_best = nearest.map_or(INFINITY, |h| h.t);
        match ray_box_intersect(&node.bounds, &ray.o, &ray.inv_d) {
            Some(b) if b.t_near <= t_best => match node.children() {
                None => self.intersect_leaf(node.triangle_indices(), ray, nearest),
                Some((left, right)) => {
                    let hit_left = self.intersect_node(left, ray, nearest);
                    let hit_right = self.intersect_node(right, ray, nearest);
                    hit_left || hit_right
                }
            },
            _ => false,
        }
    }

    /// Returns the nearest triangle hit using an explicit stack instead of
    /// recursion. Results match `intersect` exactly.
    ///
    /// * `ray` - The ray.
    pub fn intersect_stackless(&self, ray: &Ray) -> Option<MeshHit> {
        let mut nearest = None;
        let mut stack: Vec<&KdTreeNode> = Vec::with_capacity(2 * self.n_levels);
        stack.push(&self.root);

        while let Some(node) = stack.pop() {
            let t_best = nearest.map_or(INFINITY, |h: MeshHit| h.t);
            match ray_box_intersect(&node.bounds, &ray.o, &ray.inv_d) {
                Some(b) if b.t_near <= t_best => {}
                _ => continue,
            }

            match node.children() {
                None => {
                    self.intersect_leaf(node.triangle_indices(), ray, &mut nearest);
                }
                Some((left, right)) => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }

        nearest
    }

    /// Test every triangle of a leaf, keeping the closest hit. Equal distances
    /// resolve to the lower triangle index so traversal order never matters.
    fn intersect_leaf(&self, tri_indices: &[u32], ray: &Ray, nearest: &mut Option<MeshHit>) -> bool {
        let mut hit_any = false;
        for &t in tri_indices {
            let [a, b, c] = self.triangles[t as usize];
            let hit = ray_triangle_intersect(
                &ray.o,
                &ray.d,
                &self.vertices[a as usize],
                &self.vertices[b as usize],
                &self.vertices[c as usize],
            );

            if let Some(h) = hit {
                hit_any = true;
                let closer = nearest.map_or(true, |n| h.t < n.t || (h.t == n.t && t < n.triangle_index));
                if closer {
                    *nearest = Some(MeshHit {
                        t: h.t,
                        triangle_index: t,
                        u: h.u,
                        v: h.v,
                    });
                }
            }
        }
        hit_any
    }
}

impl Aggregate for KdTreeAccel {
    fn world_bound(&self) -> Bounds3f {
        self.root.bounds
    }

    fn intersect(&self, ray: &Ray) -> Option<MeshHit> {
        if self.config.stackless {
            self.intersect_stackless(ray)
        } else {
            KdTreeAccel::intersect(self, ray)
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
