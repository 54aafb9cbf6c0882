//! Material

use crate::math::*;
use crate::spectrum::*;

/// Surface description shared by spheres and triangles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    /// Reflectance multiplied into the path throughput at each bounce.
    pub albedo: Spectrum,

    /// Radiance emitted by the surface.
    pub emission: Spectrum,

    /// Blend between mirror (0) and diffuse (1) reflection.
    pub roughness: Float,

    /// Transparency; any non-zero value makes the surface refract.
    pub transparency: Float,

    /// Index of refraction of the medium inside the surface.
    pub ior: Float,
}

impl Default for Material {
    /// White, non-emissive, fully rough and opaque.
    fn default() -> Self {
        Self {
            albedo: Spectrum::ONE,
            emission: Spectrum::ZERO,
            roughness: 1.0,
            transparency: 0.0,
            ior: 1.0,
        }
    }
}

impl Material {
    /// Returns a diffuse material with the given albedo.
    ///
    /// * `albedo` - Surface colour.
    pub fn diffuse(albedo: Spectrum) -> Self {
        Self {
            albedo,
            ..Self::default()
        }
    }

    /// Returns a light emitting material.
    ///
    /// * `emission` - Emitted radiance.
    pub fn emissive(emission: Spectrum) -> Self {
        Self {
            albedo: Spectrum::ZERO,
            emission,
            ..Self::default()
        }
    }

    /// Returns a polished reflector.
    ///
    /// * `albedo`    - Surface colour.
    /// * `roughness` - Roughness in `[0, 1]`.
    pub fn glossy(albedo: Spectrum, roughness: Float) -> Self {
        Self {
            albedo,
            roughness: clamp(roughness, 0.0, 1.0),
            ..Self::default()
        }
    }

    /// Returns a refracting dielectric.
    ///
    /// * `albedo`       - Tint applied to transmitted light.
    /// * `transparency` - Transparency in `[0, 1]`.
    /// * `ior`          - Index of refraction.
    pub fn dielectric(albedo: Spectrum, transparency: Float, ior: Float) -> Self {
        Self {
            albedo,
            roughness: 0.0,
            transparency: clamp(transparency, 0.0, 1.0),
            ior,
            ..Self::default()
        }
    }

    /// Returns true if the surface emits light.
    pub fn is_emissive(&self) -> bool {
        !self.emission.is_black()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_white_rough_opaque() {
        let m = Material::default();
        assert_eq!(m.albedo, Spectrum::ONE);
        assert!(!m.is_emissive());
        assert_eq!(m.roughness, 1.0);
        assert_eq!(m.transparency, 0.0);
        assert_eq!(m.ior, 1.0);
    }

    #[test]
    fn constructors_clamp_ranges() {
        assert_eq!(Material::glossy(Spectrum::ONE, 3.0).roughness, 1.0);
        assert_eq!(Material::dielectric(Spectrum::ONE, -1.0, 1.5).transparency, 0.0);
        assert!(Material::emissive(Spectrum::new(4.0)).is_emissive());
    }
}
