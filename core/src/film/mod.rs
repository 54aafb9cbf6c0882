//! Film

use crate::image_io::*;
use crate::math::*;
use crate::spectrum::*;
use std::slice::ChunksMut;

mod denoise;

// Re-export.
pub use denoise::*;

/// Per-pixel radiance accumulator that persists across frames while
/// accumulation is enabled.
#[derive(Clone, Debug)]
pub struct Film {
    width: usize,
    height: usize,
    accumulation: Vec<Spectrum>,
    frame_index: u32,
}

impl Film {
    /// Allocate a zeroed film.
    ///
    /// * `width`  - Width in pixels; must be non-zero.
    /// * `height` - Height in pixels; must be non-zero.
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "film must not be empty ({width}x{height})");
        Self {
            width,
            height,
            accumulation: vec![Spectrum::ZERO; width * height],
            frame_index: 1,
        }
    }

    /// Returns the resolution as `(width, height)`.
    pub fn resolution(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the number of frames summed into the buffer, counting the one
    /// in progress.
    pub fn frame_index(&self) -> u32 {
        self.frame_index
    }

    /// Reallocate for a new resolution. A no-op when the size is unchanged;
    /// otherwise the frame index restarts at 1.
    ///
    /// * `width`  - Width in pixels; must be non-zero.
    /// * `height` - Height in pixels; must be non-zero.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width && height == self.height {
            return;
        }
        debug!("Film resized {}x{} -> {}x{}", self.width, self.height, width, height);
        *self = Self::new(width, height);
    }

    /// Restart accumulation at frame 1.
    pub fn reset_frame_index(&mut self) {
        self.frame_index = 1;
    }

    /// Zero the accumulator when starting over at frame 1.
    pub fn begin_frame(&mut self) {
        if self.frame_index == 1 {
            self.accumulation.fill(Spectrum::ZERO);
        }
    }

    /// Advance the frame counter, or restart it when accumulation is off.
    ///
    /// * `accumulate` - Keep summing into the buffer next frame.
    pub fn end_frame(&mut self, accumulate: bool) {
        if accumulate {
            self.frame_index += 1;
        } else {
            self.frame_index = 1;
        }
    }

    /// Returns the accumulated (undivided) radiance.
    pub fn accumulation(&self) -> &[Spectrum] {
        &self.accumulation
    }

    /// Returns mutable rows of the accumulator, top row first.
    pub fn rows_mut(&mut self) -> ChunksMut<'_, Spectrum> {
        self.accumulation.chunks_mut(self.width)
    }

    /// Returns the averaged radiance, optionally blurred with the diamond
    /// kernel before dividing by the frame count.
    ///
    /// * `denoise_radius` - Kernel radius; 0 disables the blur.
    pub fn resolve(&self, denoise_radius: usize) -> Vec<Spectrum> {
        let inv_frames = 1.0 / self.frame_index as Float;
        let summed = if denoise_radius > 0 {
            diamond_blur(&self.accumulation, self.width, self.height, denoise_radius)
        } else {
            self.accumulation.clone()
        };
        summed.into_iter().map(|s| s * inv_frames).collect()
    }

    /// Converts resolved radiance to packed `0xAABBGGRR` display pixels.
    ///
    /// * `radiance` - Resolved radiance.
    /// * `tone_map` - Apply the ACES curve.
    pub fn to_rgba8(radiance: &[Spectrum], tone_map: bool) -> Vec<u32> {
        radiance
            .iter()
            .map(|l| pack_rgba8(&to_display(l, tone_map)))
            .collect()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
