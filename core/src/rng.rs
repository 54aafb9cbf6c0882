//! Random Number Generator.

use crate::math::*;
use hexf::hexf32;

/// Largest `Float` below one.
pub const ONE_MINUS_EPSILON: Float = hexf32!("0x1.fffffep-1"); // 0.99999994

const PCG32_DEFAULT_STATE: u64 = 0x853c49e6748fea9b;
const PCG32_DEFAULT_STREAM: u64 = 0xda3e39cb94b95bdb;
const PCG32_MULT: u64 = 0x5851f42d4c957f2d;

/// PCG32 pseudo-random number generator. Each render thread owns its own
/// instance; nothing is shared between pixels.
#[derive(Clone, Debug)]
pub struct RNG {
    state: u64,
    inc: u64,
}

impl Default for RNG {
    /// Return a new instance of `RNG` with default state and stream.
    fn default() -> Self {
        Self {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }
}

impl RNG {
    /// Create a new `RNG` by seeding it with the given starting sequence.
    ///
    /// * `sequence_index` - The starting sequence to seed with.
    pub fn new(sequence_index: u64) -> Self {
        let mut ret = Self { state: 0, inc: 0 };
        ret.set_sequence(sequence_index);
        ret
    }

    /// Create the generator for one pixel of one frame. The same inputs always
    /// yield the same stream, independent of which thread renders the pixel.
    ///
    /// * `seed`        - Per-run seed.
    /// * `frame_index` - Frame counter.
    /// * `pixel_index` - Linear pixel index.
    pub fn for_pixel(seed: u64, frame_index: u32, pixel_index: usize) -> Self {
        let key = mix64(seed ^ mix64(((frame_index as u64) << 32) ^ pixel_index as u64));
        Self::new(key)
    }

    /// Initialize the random number generator sequence.
    ///
    /// * `init_seq` - The starting sequence to seed with.
    fn set_sequence(&mut self, init_seq: u64) {
        self.state = 0;
        self.inc = (init_seq << 1) | 1;
        let _ = self.uniform_u32();
        self.state = self.state.wrapping_add(PCG32_DEFAULT_STATE);
        let _ = self.uniform_u32();
    }

    /// Returns a uniformly distributed u32 value.
    #[inline(always)]
    pub fn uniform_u32(&mut self) -> u32 {
        let old_state = self.state;
        self.state = old_state.wrapping_mul(PCG32_MULT).wrapping_add(self.inc);

        let xor_shifted = (((old_state >> 18) ^ old_state) >> 27) as u32;
        let rot = (old_state >> 59) as u32;
        xor_shifted.rotate_right(rot)
    }

    /// Returns a uniformly distributed value over the half open interval [0.0, 1.0).
    pub fn uniform_float(&mut self) -> Float {
        min(
            self.uniform_u32() as Float * hexf32!("0x1.0p-32"),
            ONE_MINUS_EPSILON,
        )
    }

    /// Returns a uniformly distributed value over `[low, high)`.
    ///
    /// * `low`  - Lower bound.
    /// * `high` - Upper bound.
    pub fn uniform_range(&mut self, low: Float, high: Float) -> Float {
        low + (high - low) * self.uniform_float()
    }
}

/// SplitMix64 finalizer; spreads nearby keys over the whole sequence space.
///
/// * `x` - Key.
fn mix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9e3779b97f4a7c15);
    x = (x ^ (x >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    x = (x ^ (x >> 27)).wrapping_mul(0x94d049bb133111eb);
    x ^ (x >> 31)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn same_sequence_same_stream() {
        let mut a = RNG::new(42);
        let mut b = RNG::new(42);
        for _ in 0..100 {
            assert_eq!(a.uniform_u32(), b.uniform_u32());
        }
    }

    #[test]
    fn pixel_streams_are_independent() {
        let mut a = RNG::for_pixel(1337, 1, 0);
        let mut b = RNG::for_pixel(1337, 1, 1);
        let mut c = RNG::for_pixel(1337, 2, 0);
        let sa: Vec<u32> = (0..8).map(|_| a.uniform_u32()).collect();
        let sb: Vec<u32> = (0..8).map(|_| b.uniform_u32()).collect();
        let sc: Vec<u32> = (0..8).map(|_| c.uniform_u32()).collect();
        assert_ne!(sa, sb);
        assert_ne!(sa, sc);
    }

    #[test]
    fn uniform_float_mean_is_one_half() {
        let mut rng = RNG::new(7);
        let n = 100_000;
        let mean = (0..n).map(|_| rng.uniform_float() as f64).sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.01, "mean {mean}");
    }

    proptest! {
        #[test]
        fn uniform_float_in_unit_interval(seq in any::<u64>()) {
            let mut rng = RNG::new(seq);
            for _ in 0..64 {
                let v = rng.uniform_float();
                prop_assert!((0.0..1.0).contains(&v));
            }
        }
    }
}
