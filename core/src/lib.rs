//! Core

#[macro_use]
extern crate log;

// Re-export.
pub mod aggregate;
pub mod camera;
pub mod film;
pub mod geometry;
pub mod image_io;
pub mod material;
pub mod math;
pub mod mesh;
pub mod rng;
pub mod sampling;
pub mod scene;
pub mod spectrum;
pub mod sphere;
