//! Integrators

#[macro_use]
extern crate log;

mod path;
mod settings;

// Re-export.
pub use path::*;
pub use settings::*;
