//! Sampling

use crate::geometry::*;
use crate::math::*;

const PI_OVER_TWO: Float = PI / 2.0;
const PI_OVER_FOUR: Float = PI / 4.0;

/// Sample a point on a unit disk by mapping from a unit square to the unit
/// circle. Returns `(x, y)` on the disk.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: [Float; 2]) -> (Float, Float) {
    // Map uniform random numbers to [-1,1]^2.
    let ox = 2.0 * u[0] - 1.0;
    let oy = 2.0 * u[1] - 1.0;

    if ox == 0.0 && oy == 0.0 {
        return (0.0, 0.0);
    }

    let (r, theta) = if abs(ox) > abs(oy) {
        (ox, PI_OVER_FOUR * (oy / ox))
    } else {
        (oy, PI_OVER_TWO - PI_OVER_FOUR * (ox / oy))
    };

    (r * theta.cos(), r * theta.sin())
}

/// Cosine-weighted direction on the hemisphere around `+z`.
///
/// * `u` - The random sample point.
pub fn cosine_sample_hemisphere(u: [Float; 2]) -> Vector3f {
    let (x, y) = concentric_sample_disk(u);
    let z = max(0.0, 1.0 - x * x - y * y).sqrt();
    Vector3f::new(x, y, z)
}

/// Cosine-weighted direction on the hemisphere around the unit normal `n`.
///
/// * `n` - Unit normal.
/// * `u` - The random sample point.
pub fn cosine_sample_hemisphere_around(n: &Normal3f, u: [Float; 2]) -> Vector3f {
    let (s, t) = coordinate_system(n);
    let local = cosine_sample_hemisphere(u);
    local.x * s + local.y * t + local.z * *n
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
    fn disk_centre_maps_to_origin() {
        assert_eq!(concentric_sample_disk([0.5, 0.5]), (0.0, 0.0));
    }

    #[test]
    fn cosine_hemisphere_mean_cosine() {
        // E[cos θ] = 2/3 under a cosine-weighted density.
        let mut rng = crate::rng::RNG::new(3);
        let n = 50_000;
        let sum: f64 = (0..n)
            .map(|_| cosine_sample_hemisphere([rng.uniform_float(), rng.uniform_float()]).z as f64)
            .sum();
        let mean = sum / n as f64;
        assert!((mean - 2.0 / 3.0).abs() < 0.01, "mean {mean}");
    }

    proptest! {
        #[test]
        fn disk_samples_stay_in_disk(u0 in 0.0..1.0f32, u1 in 0.0..1.0f32) {
            let (x, y) = concentric_sample_disk([u0, u1]);
            prop_assert!(x * x + y * y <= 1.0 + 1e-5);
        }

        #[test]
        fn hemisphere_samples_face_normal(
            nx in -1.0..1.0f32, ny in -1.0..1.0f32, nz in -1.0..1.0f32,
            u0 in 0.0..1.0f32, u1 in 0.0..1.0f32,
        ) {
            let n = Vector3f::new(nx, ny, nz);
            prop_assume!(n.length() > 0.1);
            let n = n.normalize();
            let d = cosine_sample_hemisphere_around(&n, [u0, u1]);
            prop_assert!(d.dot(&n) >= -1e-5);
            prop_assert!(approx_eq!(f32, d.length(), 1.0, epsilon = 1e-3));
        }
    }
}
