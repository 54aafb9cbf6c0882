//! Spectrum

mod rgb_spectrum;

// Re-export
pub use rgb_spectrum::*;

/// Radiance, throughput and reflectance are carried as RGB triples.
pub type Spectrum = RGBSpectrum;
