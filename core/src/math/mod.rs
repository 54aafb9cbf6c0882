//! Scalar math shared by every crate in the workspace.

mod axis;
mod common;

// Re-export
pub use axis::*;
pub use common::*;
