//! Surface Area Heuristic Split Search

use super::common::*;
use pt_core::geometry::*;
use pt_core::math::*;

/// The cheapest split plane found for a node.
#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct SplitCandidate {
    /// Split axis.
    pub(crate) axis: Axis,

    /// Plane position along `axis`.
    pub(crate) pos: Float,

    /// SAH cost of the split.
    pub(crate) cost: Float,

    /// Triangles whose minimum lies below the plane.
    pub(crate) n_left: usize,

    /// Triangles whose maximum lies at or above the plane.
    pub(crate) n_right: usize,
}

/// Scan evenly spaced planes across `bounds` on every axis and return the one
/// with the lowest cost
/// `traversal + area_left * n_left * isect + area_right * n_right * isect`.
/// Ties keep the earliest axis and plane. Returns `None` when no plane was
/// sampled.
///
/// * `config`     - Build parameters.
/// * `vertices`   - Vertex positions.
/// * `triangles`  - Vertex indices per triangle.
/// * `tri_indices`- Triangles referenced by the node.
/// * `bounds`     - Loose bounds handed down from the parent; planes are placed
///                  across this range.
/// * `node_bounds`- The node's own box; child areas are measured from it.
pub(crate) fn find_split(
    config: &KdTreeConfig,
    vertices: &[Point3f],
    triangles: &[[u32; 3]],
    tri_indices: &[u32],
    bounds: &Bounds3f,
    node_bounds: &Bounds3f,
) -> Option<SplitCandidate> {
    let mut best: Option<SplitCandidate> = None;

    for axis in Axis::ALL {
        let ranges: Vec<(Float, Float)> = tri_indices
            .iter()
            .map(|&t| triangle_range(vertices, &triangles[t as usize], axis))
            .collect();

        let (min_s, max_s) = bounds.range(axis);
        let s_length = max_s - min_s;

        // Accumulate the offset the same way on every axis so each scan
        // samples identical planes.
        let mut delta = config.split_step;
        while delta < 1.0 {
            let plane = min_s + s_length * delta;

            let area_left = node_bounds.with_range(axis, min_s, plane).surface_area();
            let area_right = node_bounds.with_range(axis, plane, max_s).surface_area();

            let n_left = ranges.iter().filter(|(lo, _)| *lo < plane).count();
            let n_right = ranges.iter().filter(|(_, hi)| *hi >= plane).count();

            let cost = config.traversal_cost
                + area_left * n_left as Float * config.isect_cost
                + area_right * n_right as Float * config.isect_cost;

            if best.map_or(true, |b| cost < b.cost) {
                best = Some(SplitCandidate {
                    axis,
                    pos: plane,
                    cost,
                    n_left,
                    n_right,
                });
            }

            delta += config.split_step;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    /// Two clusters of small triangles separated along x.
    fn two_clusters() -> (Vec<Point3f>, Vec<[u32; 3]>) {
        let mut vertices = vec![];
        let mut triangles = vec![];
        for (i, x) in [0.0, 0.1, 0.2, 9.7, 9.8, 9.9].iter().enumerate() {
            let base = 3 * i as u32;
            vertices.push(Point3f::new(*x, 0.0, 0.0));
            vertices.push(Point3f::new(*x + 0.05, 1.0, 0.0));
            vertices.push(Point3f::new(*x, 0.0, 1.0));
            triangles.push([base, base + 1, base + 2]);
        }
        (vertices, triangles)
    }

    #[test]
    fn separates_clusters_on_long_axis() {
        let (vertices, triangles) = two_clusters();
        let indices: Vec<u32> = (0..triangles.len() as u32).collect();
        let bounds = Bounds3f::from_points(&vertices);

        let split = find_split(
            &KdTreeConfig::default(),
            &vertices,
            &triangles,
            &indices,
            &bounds,
            &bounds,
        )
        .expect("split");

        assert_eq!(split.axis, Axis::X);
        assert!(split.pos > 0.25 && split.pos <= 9.7);
        assert_eq!(split.n_left, 3);
        assert_eq!(split.n_right, 3);
    }

    #[test]
    fn straddling_triangle_counts_on_both_sides() {
        let vertices = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 1.0),
        ];
        let triangles = vec![[0, 1, 2]];
        let bounds = Bounds3f::from_points(&vertices);
        let split = find_split(&KdTreeConfig::default(), &vertices, &triangles, &[0], &bounds, &bounds)
            .expect("split");
        assert_eq!(split.n_left, 1);
        assert_eq!(split.n_right, 1);
    }

    #[test]
    fn cost_uses_configured_constants() {
        let vertices = vec![
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(0.0, 1.0, 1.0),
        ];
        let triangles = vec![[0, 1, 2]];
        let bounds = Bounds3f::from_points(&vertices);
        let config = KdTreeConfig {
            traversal_cost: 7.0,
            isect_cost: 0.0,
            ..KdTreeConfig::default()
        };
        let split = find_split(&config, &vertices, &triangles, &[0], &bounds, &bounds).expect("split");
        assert!(approx_eq!(f32, split.cost, 7.0, epsilon = 1e-6));
        // All costs tie, so the first sampled plane on x wins.
        assert_eq!(split.axis, Axis::X);
        assert!(approx_eq!(f32, split.pos, 0.02, epsilon = 1e-6));
    }

    #[test]
    fn no_planes_without_a_step_below_one() {
        let vertices = vec![Point3f::ZERO, Point3f::new(1.0, 0.0, 0.0), Point3f::new(0.0, 1.0, 0.0)];
        let triangles = vec![[0, 1, 2]];
        let bounds = Bounds3f::from_points(&vertices);
        let config = KdTreeConfig {
            split_step: 1.0,
            ..KdTreeConfig::default()
        };
        assert!(find_split(&config, &vertices, &triangles, &[0], &bounds, &bounds).is_none());
    }
}
