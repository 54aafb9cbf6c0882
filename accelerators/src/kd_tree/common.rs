//! KD Tree Common

use pt_core::geometry::*;
use pt_core::math::*;

/// Build parameters for `KdTreeAccel`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KdTreeConfig {
    /// A node with at most this many triangle references becomes a leaf.
    pub max_tris_per_node: usize,

    /// Nodes at this depth become leaves; the root is at depth 1.
    pub max_depth: usize,

    /// SAH cost of traversing an interior node.
    pub traversal_cost: Float,

    /// SAH cost of one ray/triangle test.
    pub isect_cost: Float,

    /// Candidate split planes are spaced this fraction of the node extent apart.
    pub split_step: Float,

    /// Refit each node's box tightly around its own triangles.
    pub tight_bounds: bool,

    /// Answer `Aggregate` queries with the explicit-stack traversal.
    pub stackless: bool,
}

impl Default for KdTreeConfig {
    fn default() -> Self {
        Self {
            max_tris_per_node: 10,
            max_depth: 40,
            traversal_cost: 5.0,
            isect_cost: 2000.0,
            split_step: 0.02,
            tight_bounds: false,
            stackless: false,
        }
    }
}

/// Node contents.
#[derive(Clone, Debug)]
pub enum KdNodeKind {
    Leaf {
        /// Indices of the triangles overlapping the leaf.
        triangles: Vec<u32>,
    },

    Interior {
        /// Split axis.
        split_axis: Axis,

        /// Position of split along `split_axis`. Recorded for diagnostics;
        /// traversal tests both child boxes instead.
        split_pos: Float,

        /// Child below the split plane.
        left: Box<KdTreeNode>,

        /// Child at or above the split plane.
        right: Box<KdTreeNode>,
    },
}

/// A node of the tree. Parents own their children.
#[derive(Clone, Debug)]
pub struct KdTreeNode {
    /// Node bounds.
    pub bounds: Bounds3f,

    /// Post-order id assigned when the node finished construction.
    pub id: usize,

    /// Number of triangle references that reached this node.
    pub n_triangles: usize,

    /// Leaf or interior data.
    pub kind: KdNodeKind,
}

impl KdTreeNode {
    /// Returns true for leaf nodes.
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, KdNodeKind::Leaf { .. })
    }

    /// Returns the triangles stored in a leaf; empty for interior nodes.
    pub fn triangle_indices(&self) -> &[u32] {
        match &self.kind {
            KdNodeKind::Leaf { triangles } => triangles.as_slice(),
            KdNodeKind::Interior { .. } => &[],
        }
    }

    /// Returns the `(left, right)` children of an interior node.
    pub fn children(&self) -> Option<(&KdTreeNode, &KdTreeNode)> {
        match &self.kind {
            KdNodeKind::Leaf { .. } => None,
            KdNodeKind::Interior { left, right, .. } => Some((left.as_ref(), right.as_ref())),
        }
    }

    /// Returns the split axis and position of an interior node.
    pub fn split(&self) -> Option<(Axis, Float)> {
        match &self.kind {
            KdNodeKind::Leaf { .. } => None,
            KdNodeKind::Interior {
                split_axis, split_pos, ..
            } => Some((*split_axis, *split_pos)),
        }
    }

    /// Visits this node and its descendants depth first, passing each node's
    /// depth (the root is at depth 1).
    ///
    /// * `depth` - Depth of this node.
    /// * `f`     - Visitor.
    pub fn visit<F>(&self, depth: usize, f: &mut F)
    where
        F: FnMut(&KdTreeNode, usize),
    {
        f(self, depth);
        if let Some((left, right)) = self.children() {
            left.visit(depth + 1, f);
            right.visit(depth + 1, f);
        }
    }
}

/// Returns the `(min, max)` coordinates of a triangle along an axis.
///
/// * `vertices` - Vertex positions.
/// * `triangle` - Vertex indices of the triangle.
/// * `axis`     - The axis.
#[inline]
pub(crate) fn triangle_range(vertices: &[Point3f], triangle: &[u32; 3], axis: Axis) -> (Float, Float) {
    let a = vertices[triangle[0] as usize][axis];
    let b = vertices[triangle[1] as usize][axis];
    let c = vertices[triangle[2] as usize][axis];
    (min(a, min(b, c)), max(a, max(b, c)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(id: usize, triangles: Vec<u32>) -> KdTreeNode {
        KdTreeNode {
            bounds: Bounds3f::default(),
            id,
            n_triangles: triangles.len(),
            kind: KdNodeKind::Leaf { triangles },
        }
    }

    #[test]
    fn visit_reports_depths() {
        let root = KdTreeNode {
            bounds: Bounds3f::default(),
            id: 2,
            n_triangles: 3,
            kind: KdNodeKind::Interior {
                split_axis: Axis::Y,
                split_pos: 0.5,
                left: Box::new(leaf(0, vec![0, 1])),
                right: Box::new(leaf(1, vec![1, 2])),
            },
        };

        let mut seen = vec![];
        root.visit(1, &mut |n, d| seen.push((n.id, d)));
        assert_eq!(seen, vec![(2, 1), (0, 2), (1, 2)]);
        assert_eq!(root.split(), Some((Axis::Y, 0.5)));
        assert!(root.triangle_indices().is_empty());
        assert!(!root.is_leaf());
    }

    #[test]
    fn triangle_range_orders_coordinates() {
        let v = vec![
            Point3f::new(3.0, 0.0, 0.0),
            Point3f::new(-1.0, 2.0, 0.0),
            Point3f::new(2.0, 1.0, 0.0),
        ];
        assert_eq!(triangle_range(&v, &[0, 1, 2], Axis::X), (-1.0, 3.0));
        assert_eq!(triangle_range(&v, &[0, 1, 2], Axis::Y), (0.0, 2.0));
    }
}
