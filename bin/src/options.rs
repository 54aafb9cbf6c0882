//! Command line options

use clap::Parser;
use pt_accelerators::KdTreeConfig;
use pt_core::scene::GeometryMode;
use pt_integrators::RenderSettings;

/// Command line options.
#[derive(Parser, Clone, Debug)]
#[command(author, version, about = "Progressive path tracer over a k-d tree.", long_about = None)]
pub struct Options {
    /// Image width.
    #[arg(long, value_name = "PIXELS", default_value_t = 640, help = "Image width in pixels.")]
    pub width: usize,

    /// Image height.
    #[arg(long, value_name = "PIXELS", default_value_t = 480, help = "Image height in pixels.")]
    pub height: usize,

    /// Number of frames to render.
    #[arg(
        long,
        short = 'f',
        value_name = "NUM",
        default_value_t = 16,
        help = "Number of progressive frames to render."
    )]
    pub frames: u32,

    /// Maximum path length.
    #[arg(
        long,
        short = 'b',
        value_name = "NUM",
        default_value_t = 8,
        help = "Maximum number of bounces per path."
    )]
    pub bounces: u32,

    /// Number of threads to use for rendering.
    #[arg(
        long = "nthreads",
        short = 't',
        value_name = "NUM",
        help = "Use specified number of threads for rendering. Defaults to all logical CPUs."
    )]
    n_threads: Option<usize>,

    /// Render the implicit sphere scene instead of the triangle mesh.
    #[arg(long, help = "Render the sphere scene instead of the triangle mesh.")]
    pub spheres: bool,

    /// Render every frame from scratch.
    #[arg(long = "no-accumulate", help = "Do not accumulate frames.")]
    pub no_accumulate: bool,

    /// Write untone-mapped display values.
    #[arg(long = "no-tonemap", help = "Skip the ACES filmic tone curve.")]
    pub no_tone_map: bool,

    /// Jitter camera rays.
    #[arg(long = "aa", help = "Jitter camera rays inside each pixel.")]
    pub anti_aliasing: bool,

    /// Blur radius for the denoiser.
    #[arg(
        long,
        value_name = "RADIUS",
        default_value_t = 0,
        help = "Diamond blur radius applied to the final image (0 disables)."
    )]
    pub denoise: usize,

    /// Random seed.
    #[arg(long, value_name = "NUM", default_value_t = 1337, help = "Seed for the pixel random streams.")]
    pub seed: u64,

    /// Maximum triangles per k-d tree leaf.
    #[arg(
        long = "max-leaf",
        value_name = "NUM",
        default_value_t = 10,
        help = "Maximum triangle references per k-d tree leaf."
    )]
    pub max_tris_per_node: usize,

    /// Maximum k-d tree depth.
    #[arg(
        long = "max-depth",
        value_name = "NUM",
        default_value_t = 40,
        help = "Maximum k-d tree depth."
    )]
    pub max_depth: usize,

    /// Refit node boxes around their triangles.
    #[arg(long = "tight-bounds", help = "Shrink each k-d tree node box around its triangles.")]
    pub tight_bounds: bool,

    /// Use the explicit-stack traversal.
    #[arg(long, help = "Traverse the k-d tree with an explicit stack instead of recursion.")]
    pub stackless: bool,

    /// Log k-d tree statistics after construction.
    #[arg(long = "tree-stats", help = "Log per-level and per-node k-d tree statistics.")]
    pub tree_stats: bool,

    /// Path to the image file.
    #[arg(
        long = "outfile",
        short = 'o',
        value_name = "FILE",
        default_value = "render.png",
        help = "Write the final image to the given filename (.png, .tga or .exr)."
    )]
    pub image_file: String,
}

impl Options {
    /// Returns the number of threads to use.
    pub fn threads(&self) -> usize {
        let max_threads = num_cpus::get();
        match self.n_threads {
            None => max_threads,
            Some(0) => {
                warn!("Invalid nthreads");
                1
            }
            Some(n) if n > max_threads => {
                warn!("Num threads > max logical CPUs {}", max_threads);
                max_threads
            }
            Some(n) => n,
        }
    }

    /// Reject options no render can proceed with.
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!("Invalid resolution {}x{}", self.width, self.height));
        }
        if self.max_tris_per_node == 0 {
            return Err("Invalid max-leaf 0".to_string());
        }
        Ok(())
    }

    /// Returns the k-d tree build parameters.
    pub fn kd_tree_config(&self) -> KdTreeConfig {
        KdTreeConfig {
            max_tris_per_node: self.max_tris_per_node,
            max_depth: self.max_depth,
            tight_bounds: self.tight_bounds,
            stackless: self.stackless,
            ..KdTreeConfig::default()
        }
    }

    /// Returns the integrator settings.
    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            render: true,
            accumulate: !self.no_accumulate,
            bounces: self.bounces,
            geometry: self.geometry(),
            tone_map: !self.no_tone_map,
            anti_aliasing: self.anti_aliasing,
            denoise_radius: self.denoise,
            seed: self.seed,
            threads: self.threads(),
        }
    }

    /// Returns which primitive set to render.
    pub fn geometry(&self) -> GeometryMode {
        if self.spheres {
            GeometryMode::Spheres
        } else {
            GeometryMode::Mesh
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_render_settings() {
        let options = Options::parse_from(["kd-path-tracer"]);
        let settings = options.render_settings();
        assert_eq!(settings.bounces, 8);
        assert_eq!(settings.seed, 1337);
        assert!(settings.accumulate);
        assert_eq!(settings.geometry, GeometryMode::Mesh);
        assert_eq!(options.kd_tree_config(), KdTreeConfig::default());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn flags_are_mapped() {
        let options = Options::parse_from([
            "kd-path-tracer",
            "--spheres",
            "--no-accumulate",
            "--stackless",
            "--tight-bounds",
            "-t",
            "1",
            "-o",
            "out.exr",
        ]);
        let settings = options.render_settings();
        assert_eq!(settings.geometry, GeometryMode::Spheres);
        assert!(!settings.accumulate);
        assert_eq!(settings.threads, 1);
        let config = options.kd_tree_config();
        assert!(config.stackless && config.tight_bounds);
        assert_eq!(options.image_file, "out.exr");
    }

    #[test]
    fn zero_sized_image_is_rejected() {
        let options = Options::parse_from(["kd-path-tracer", "--width", "0"]);
        assert!(options.validate().is_err());
    }
}
