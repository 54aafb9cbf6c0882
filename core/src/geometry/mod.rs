//! Geometry

mod bounds3;
mod intersect;
mod ray;
mod vector3;

use crate::math::Float;

// Re-export
pub use bounds3::*;
pub use intersect::*;
pub use ray::*;
pub use vector3::*;

/// Builds an orthonormal basis `(v2, v3)` around a unit vector `v1`.
///
/// * `v1` - Unit vector.
pub fn coordinate_system(v1: &Vector3f) -> (Vector3f, Vector3f) {
    let v2 = if v1.x.abs() > v1.y.abs() {
        Vector3f::new(-v1.z, 0.0, v1.x) / (v1.x * v1.x + v1.z * v1.z).sqrt()
    } else {
        Vector3f::new(0.0, v1.z, -v1.y) / (v1.y * v1.y + v1.z * v1.z).sqrt()
    };
    (v2, v1.cross(&v2))
}

/// Mirrors `d` about the normal `n`.
///
/// * `d` - Incoming direction.
/// * `n` - Unit normal.
pub fn reflect(d: &Vector3f, n: &Normal3f) -> Vector3f {
    *d - 2.0 * d.dot(n) * *n
}

/// Refracts unit direction `d` through a surface with unit normal `n` facing
/// the incoming side, using relative index of refraction `eta`. Returns
/// `None` on total internal reflection.
///
/// * `d`   - Unit incoming direction.
/// * `n`   - Unit normal on the incident side.
/// * `eta` - Ratio of incident to transmitted index of refraction.
pub fn refract(d: &Vector3f, n: &Normal3f, eta: Float) -> Option<Vector3f> {
    let cos_i = -d.dot(n);
    let k = 1.0 - eta * eta * (1.0 - cos_i * cos_i);
    if k < 0.0 {
        None
    } else {
        Some(eta * *d + (eta * cos_i - k.sqrt()) * *n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn coordinate_system_is_orthonormal() {
        let v1 = Vector3f::new(0.3, -0.8, 0.52).normalize();
        let (v2, v3) = coordinate_system(&v1);
        assert!(approx_eq!(f32, v1.dot(&v2), 0.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, v1.dot(&v3), 0.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, v2.dot(&v3), 0.0, epsilon = 1e-5));
        assert!(approx_eq!(f32, v3.length(), 1.0, epsilon = 1e-5));
    }

    #[test]
    fn reflect_flips_normal_component() {
        let d = Vector3f::new(1.0, -1.0, 0.0);
        let n = Normal3f::new(0.0, 1.0, 0.0);
        assert_eq!(reflect(&d, &n), Vector3f::new(1.0, 1.0, 0.0));
    }

    #[test]
    fn refract_at_normal_incidence_passes_straight() {
        let d = Vector3f::new(0.0, -1.0, 0.0);
        let n = Normal3f::new(0.0, 1.0, 0.0);
        let t = refract(&d, &n, 1.0 / 1.5).expect("transmits");
        assert!(approx_eq!(f32, t.y, -1.0, epsilon = 1e-6));
    }

    #[test]
    fn refract_past_critical_angle_reflects_totally() {
        // Leaving glass (eta = 1.5) at a grazing angle.
        let d = Vector3f::new(0.9, -0.1, 0.0).normalize();
        let n = Normal3f::new(0.0, 1.0, 0.0);
        assert!(refract(&d, &n, 1.5).is_none());
    }

    #[test]
    fn refract_obeys_snell() {
        let d = Vector3f::new(0.5, -0.5, 0.0).normalize();
        let n = Normal3f::new(0.0, 1.0, 0.0);
        let eta = 1.0 / 1.33;
        let t = refract(&d, &n, eta).expect("transmits").normalize();
        let sin_i = d.x;
        let sin_t = t.x;
        assert!(approx_eq!(f32, sin_t, eta * sin_i, epsilon = 1e-5));
    }
}
