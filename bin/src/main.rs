#[macro_use]
extern crate log;

mod demo;
mod options;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use options::Options;
use pt_accelerators::KdTreeAccel;
use pt_core::aggregate::ArcAggregate;
use pt_core::image_io::write_image;
use pt_core::scene::Scene;
use pt_integrators::PathIntegrator;
use std::sync::Arc;

#[cfg(all(feature = "dhat-rs", feature = "jemalloc"))]
compile_error!("feature 'dhat-rs' and feature 'jemalloc' cannot be enabled at the same time");

#[cfg(feature = "dhat-rs")]
use dhat::{Dhat, DhatAlloc};

#[cfg(feature = "dhat-rs")]
#[global_allocator]
static ALLOCATOR: DhatAlloc = DhatAlloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static ALLOCATOR: Jemalloc = Jemalloc;

fn main() {
    #[cfg(feature = "dhat-rs")]
    let _dhat = Dhat::start_heap_profiling();

    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    if let Err(e) = render(&options) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn render(options: &Options) -> Result<(), String> {
    options.validate()?;

    let scene = build_scene(options);
    let camera = demo::camera(options.geometry(), options.width, options.height);
    let settings = options.render_settings();
    info!(
        "Rendering {} frames at {}x{} with {} threads",
        options.frames, options.width, options.height, settings.threads
    );

    let mut integrator = PathIntegrator::new(options.width, options.height, settings);

    let progress = ProgressBar::new(options.frames as u64 + 1); // Frames + image write
    progress.set_style(
        ProgressStyle::with_template("{msg} [{elapsed_precise}] [{wide_bar}] {pos}/{len} {eta}")
            .map_err(|e| format!("Invalid progress template. {e}"))?,
    );
    progress.set_message("Rendering scene");

    let mut last = None;
    for _ in 0..options.frames {
        if let Some(frame) = integrator.render_frame(&scene, &camera)? {
            last = Some(frame);
        }
        progress.inc(1);
    }
    let frame = last.ok_or_else(|| "No frames rendered".to_string())?;

    progress.set_message("Writing image");
    write_image(
        &options.image_file,
        &frame.radiance,
        frame.width,
        frame.height,
        settings.tone_map,
    )?;
    progress.inc(1);
    progress.finish_with_message("Render complete");

    info!("Wrote {} ({} frames averaged)", options.image_file, frame.frames);
    Ok(())
}

/// Builds the demo scene; the k-d tree is only constructed for mesh renders.
///
/// * `options` - Command line options.
fn build_scene(options: &Options) -> Scene {
    let scene = Scene::new(demo::spheres(), demo::materials());
    if options.spheres {
        return scene;
    }

    let mesh = demo::mesh();
    let tree = KdTreeAccel::from_mesh(&mesh, options.kd_tree_config());
    info!(
        "k-d tree: {} triangles, {} nodes, {} leaves, {} levels, {} leaf references",
        tree.n_triangles(),
        tree.n_nodes(),
        tree.n_leaves(),
        tree.n_levels(),
        tree.leaf_reference_count()
    );
    if options.tree_stats {
        tree.log_triangles_per_level();
        tree.log_node_ids_and_bounds();
    }

    let aggregate: ArcAggregate = Arc::new(tree);
    scene.with_mesh(Arc::new(mesh), aggregate)
}
