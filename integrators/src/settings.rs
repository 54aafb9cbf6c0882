//! Render Settings

use pt_core::scene::GeometryMode;

/// Per-frame knobs consulted by the path integrator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderSettings {
    /// Render gate. When false, frames are skipped entirely.
    pub render: bool,

    /// Keep summing frames into the accumulation buffer.
    pub accumulate: bool,

    /// Maximum number of bounces per path.
    pub bounces: u32,

    /// Which primitive set is queried.
    pub geometry: GeometryMode,

    /// Apply the ACES filmic curve before display encoding.
    pub tone_map: bool,

    /// Jitter camera rays inside each pixel.
    pub anti_aliasing: bool,

    /// Diamond blur radius applied to the resolved image; 0 disables it.
    pub denoise_radius: usize,

    /// Base seed for the per-pixel random streams.
    pub seed: u64,

    /// Number of worker threads.
    pub threads: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            render: true,
            accumulate: true,
            bounces: 8,
            geometry: GeometryMode::Mesh,
            tone_map: true,
            anti_aliasing: false,
            denoise_radius: 0,
            seed: 1337,
            threads: num_cpus::get(),
        }
    }
}

impl RenderSettings {
    /// Returns the worker count, never less than one.
    pub fn n_threads(&self) -> usize {
        self.threads.max(1)
    }
}
