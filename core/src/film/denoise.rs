//! Denoise

use crate::math::*;
use crate::spectrum::*;

/// Blur with a 3x3 diamond kernel. A neighbour at `(dx, dy)` contributes with
/// weight `1 - 0.5 * (|dx| + |dy|)` when `|dx| + |dy| <= radius`; weights are
/// renormalized so borders keep their brightness.
///
/// * `pixels` - Row major input.
/// * `width`  - Width in pixels.
/// * `height` - Height in pixels.
/// * `radius` - Manhattan radius of the kernel.
pub fn diamond_blur(pixels: &[Spectrum], width: usize, height: usize, radius: usize) -> Vec<Spectrum> {
    debug_assert_eq!(pixels.len(), width * height);

    let mut out = Vec::with_capacity(pixels.len());
    for y in 0..height as isize {
        for x in 0..width as isize {
            let mut sum = Spectrum::ZERO;
            let mut weight_sum = 0.0;

            for dy in -1..=1_isize {
                for dx in -1..=1_isize {
                    let manhattan = (dx.abs() + dy.abs()) as usize;
                    let weight = 1.0 - 0.5 * manhattan as Float;
                    if manhattan > radius || weight <= 0.0 {
                        continue;
                    }

                    let (sx, sy) = (x + dx, y + dy);
                    if sx < 0 || sy < 0 || sx >= width as isize || sy >= height as isize {
                        continue;
                    }

                    sum += pixels[sy as usize * width + sx as usize] * weight;
                    weight_sum += weight;
                }
            }

            out.push(sum / weight_sum);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;

    #[test]
    fn flat_image_is_unchanged() {
        let pixels = vec![Spectrum::new(2.0); 12];
        let out = diamond_blur(&pixels, 4, 3, 1);
        for p in out {
            assert!(approx_eq!(f32, p[0], 2.0, epsilon = 1e-6));
        }
    }

    #[test]
    fn impulse_spreads_to_direct_neighbours() {
        let mut pixels = vec![Spectrum::ZERO; 9];
        pixels[4] = Spectrum::new(3.0);
        let out = diamond_blur(&pixels, 3, 3, 1);
        // Centre: 3 * 1 / (1 + 4 * 0.5).
        assert!(approx_eq!(f32, out[4][0], 1.0, epsilon = 1e-6));
        // Edge neighbour (1, 0): 3 * 0.5 / (1 + 3 * 0.5).
        assert!(approx_eq!(f32, out[1][0], 0.6, epsilon = 1e-6));
        // Corners are outside the diamond.
        assert_eq!(out[0], Spectrum::ZERO);
    }

    #[test]
    fn zero_radius_is_identity() {
        let pixels: Vec<Spectrum> = (0..6).map(|i| Spectrum::new(i as Float)).collect();
        assert_eq!(diamond_blur(&pixels, 3, 2, 0), pixels);
    }
}
