//! Path Integrator

use crate::settings::*;
use pt_core::camera::*;
use pt_core::film::*;
use pt_core::geometry::*;
use pt_core::math::*;
use pt_core::rng::*;
use pt_core::sampling::*;
use pt_core::scene::*;
use pt_core::spectrum::*;
use std::time::Instant;

/// A resolved frame ready for display or writing.
#[derive(Clone, Debug)]
pub struct RenderedFrame {
    /// Image width.
    pub width: usize,

    /// Image height.
    pub height: usize,

    /// Number of frames averaged into `radiance`.
    pub frames: u32,

    /// Averaged linear radiance, top row first.
    pub radiance: Vec<Spectrum>,

    /// Display pixels packed as `0xAABBGGRR`.
    pub rgba: Vec<u32>,
}

/// Implements the progressive path tracing algorithm. Owns the accumulation
/// film so successive frames converge while the view is unchanged.
pub struct PathIntegrator {
    /// Render settings.
    pub settings: RenderSettings,

    /// Accumulation film.
    film: Film,
}

impl PathIntegrator {
    /// Create a new `PathIntegrator`.
    ///
    /// * `width`    - Image width.
    /// * `height`   - Image height.
    /// * `settings` - Render settings.
    pub fn new(width: usize, height: usize, settings: RenderSettings) -> Self {
        Self {
            settings,
            film: Film::new(width, height),
        }
    }

    /// Returns the film.
    pub fn film(&self) -> &Film {
        &self.film
    }

    /// Returns the number of the frame that will be rendered next.
    pub fn frame_index(&self) -> u32 {
        self.film.frame_index()
    }

    /// Reallocate the film for a new resolution. Must not be called while a
    /// frame is in flight, which `&mut self` guarantees.
    ///
    /// * `width`  - New width.
    /// * `height` - New height.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.film.resize(width, height);
    }

    /// Discard accumulated frames, e.g. after the camera or scene changed.
    pub fn reset_frame_index(&mut self) {
        self.film.reset_frame_index();
    }

    /// Render one frame of the scene into the accumulation film and return the
    /// averaged result. Returns `Ok(None)` when the render gate is closed.
    ///
    /// * `scene`  - The scene.
    /// * `camera` - The camera; its resolution must match the film.
    pub fn render_frame<C>(
        &mut self,
        scene: &Scene,
        camera: &C,
    ) -> Result<Option<RenderedFrame>, String>
    where
        C: Camera + Sync + ?Sized,
    {
        if !self.settings.render {
            return Ok(None);
        }

        let (width, height) = self.film.resolution();
        if camera.resolution() != (width, height) {
            return Err(format!(
                "Camera resolution {:?} does not match film resolution {:?}",
                camera.resolution(),
                (width, height)
            ));
        }

        let start = Instant::now();
        self.film.begin_frame();

        let frame_index = self.film.frame_index();
        let settings = self.settings;
        let n_threads = settings.n_threads();
        let rows = self.film.rows_mut();

        crossbeam::scope(|scope| {
            let (tx, rx) = crossbeam_channel::bounded::<(usize, &mut [Spectrum])>(n_threads);

            for _ in 0..n_threads {
                let rxc = rx.clone();
                let settings = &settings;
                scope.spawn(move |_| {
                    for (y, row) in rxc.iter() {
                        render_row(y, row, width, frame_index, settings, scene, camera);
                    }
                });
            }
            drop(rx);

            for job in rows.enumerate() {
                if tx.send(job).is_err() {
                    break;
                }
            }
        })
        .map_err(|_| format!("Render worker panicked in frame {}", frame_index))?;

        let radiance = self.film.resolve(settings.denoise_radius);
        let rgba = Film::to_rgba8(&radiance, settings.tone_map);
        self.film.end_frame(settings.accumulate);

        debug!(
            "Frame {} ({}x{}) rendered in {:.3?}",
            frame_index,
            width,
            height,
            start.elapsed()
        );

        Ok(Some(RenderedFrame {
            width,
            height,
            frames: frame_index,
            radiance,
            rgba,
        }))
    }

    /// Returns the radiance estimate carried back along a camera ray.
    ///
    /// * `ray`      - Camera ray with unit direction.
    /// * `scene`    - The scene.
    /// * `settings` - Bounce limit and geometry mode.
    /// * `rng`      - Random stream for this pixel.
    pub fn li(ray: &Ray, scene: &Scene, settings: &RenderSettings, rng: &mut RNG) -> Spectrum {
        let mut l = Spectrum::ZERO;
        let mut contribution = Spectrum::ONE;
        let mut ray = *ray;

        for _bounce in 0..settings.bounces {
            let hit = match scene.intersect(&ray, settings.geometry) {
                Some(hit) => hit,
                None => break,
            };
            let material = scene.material(hit.material_index);

            // Face the normal toward the incoming ray.
            let exiting = ray.d.dot(&hit.n) > 0.0;
            let n = if exiting { -hit.n } else { hit.n };

            let transmitted = if material.transparency > 0.0 {
                let eta = if exiting {
                    material.ior
                } else {
                    1.0 / material.ior
                };
                refract(&ray.d, &n, eta).map(|d| Ray::new(hit.p - n * SHADOW_EPSILON, d.normalize()))
            } else {
                None
            };

            let next = transmitted.unwrap_or_else(|| {
                let mirror = reflect(&ray.d, &n);
                let diffuse =
                    cosine_sample_hemisphere_around(&n, [rng.uniform_float(), rng.uniform_float()]);
                let roughness = material.roughness * material.roughness;
                let d = lerp(roughness, mirror, diffuse).normalize();
                Ray::new(hit.p + n * SHADOW_EPSILON, d)
            });

            l += material.emission * contribution;
            contribution *= material.albedo;

            // Russian roulette.
            let p = min(contribution.max_component_value(), 1.0);
            if p <= 0.0 || rng.uniform_float() > p {
                break;
            }
            contribution /= p;

            ray = next;
        }

        l
    }
}

/// Render one scanline into its slice of the accumulation film.
///
/// * `y`           - Row.
/// * `row`         - Accumulation slots for the row.
/// * `width`       - Image width.
/// * `frame_index` - Frame counter seeding the pixel streams.
/// * `settings`    - Render settings.
/// * `scene`       - The scene.
/// * `camera`      - The camera.
fn render_row<C>(
    y: usize,
    row: &mut [Spectrum],
    width: usize,
    frame_index: u32,
    settings: &RenderSettings,
    scene: &Scene,
    camera: &C,
) where
    C: Camera + ?Sized,
{
    for (x, px) in row.iter_mut().enumerate() {
        let mut rng = RNG::for_pixel(settings.seed, frame_index, y * width + x);
        let ray = if settings.anti_aliasing {
            let offset = (rng.uniform_float() - 0.5, rng.uniform_float() - 0.5);
            camera.generate_jittered_ray(x, y, offset)
        } else {
            camera.generate_ray(x, y)
        };

        let l = PathIntegrator::li(&ray, scene, settings, &mut rng);
        *px += checked_radiance(l, x, y, frame_index);
    }
}

/// Replace unusable radiance estimates with black.
///
/// * `l`           - Radiance estimate.
/// * `x`           - Column.
/// * `y`           - Row.
/// * `frame_index` - Frame counter.
fn checked_radiance(l: Spectrum, x: usize, y: usize, frame_index: u32) -> Spectrum {
    if l.has_nans() {
        error!(
            "Not-a-number radiance value returned for pixel ({}, {}), frame {}. Setting to black.",
            x, y, frame_index
        );
        Spectrum::ZERO
    } else if l.y() < -1e-5 {
        error!(
            "Negative luminance value, {}, returned for pixel ({}, {}), frame {}. Setting to black.",
            l.y(),
            x,
            y,
            frame_index
        );
        Spectrum::ZERO
    } else if !l.is_finite() {
        error!(
            "Infinite radiance value returned for pixel ({}, {}), frame {}. Setting to black.",
            x, y, frame_index
        );
        Spectrum::ZERO
    } else {
        l
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
