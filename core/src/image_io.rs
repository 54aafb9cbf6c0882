//! Image I/O

use crate::math::*;
use crate::spectrum::*;
use exr::prelude::*;
use image::{ImageBuffer, ImageFormat, Rgb};
use regex::Regex;
use std::result::Result;
use std::sync::OnceLock;

const ACES_A: Float = 2.51;
const ACES_B: Float = 0.03;
const ACES_C: Float = 2.43;
const ACES_D: Float = 0.59;
const ACES_E: Float = 0.14;

/// Fitted ACES filmic curve, clamped to `[0, 1]`.
///
/// * `x` - Linear radiance.
#[inline]
pub fn aces_film(x: Float) -> Float {
    clamp(
        (x * (ACES_A * x + ACES_B)) / (x * (ACES_C * x + ACES_D) + ACES_E),
        0.0,
        1.0,
    )
}

/// Linear to sRGB encoding of a value clamped to `[0, 1]`.
///
/// * `x` - Linear value.
#[inline]
pub fn linear_to_srgb(x: Float) -> Float {
    gamma_correct(clamp(x, 0.0, 1.0))
}

/// Converts linear radiance to display values in `[0, 1]`.
///
/// * `l`        - Linear radiance.
/// * `tone_map` - Apply the ACES curve before encoding.
pub fn to_display(l: &Spectrum, tone_map: bool) -> [Float; 3] {
    let rgb = l.to_rgb();
    let curve = |v: Float| if tone_map { aces_film(v) } else { v };
    [
        linear_to_srgb(curve(rgb[0])),
        linear_to_srgb(curve(rgb[1])),
        linear_to_srgb(curve(rgb[2])),
    ]
}

/// Quantize a display value in `[0, 1]` to a byte.
///
/// * `v` - Display value.
#[inline]
fn to_byte(v: Float) -> u8 {
    (clamp(v, 0.0, 1.0) * 255.0) as u8
}

/// Packs an opaque display colour as `0xAABBGGRR`.
///
/// * `rgb` - Display values in `[0, 1]`.
pub fn pack_rgba8(rgb: &[Float; 3]) -> u32 {
    let r = to_byte(rgb[0]) as u32;
    let g = to_byte(rgb[1]) as u32;
    let b = to_byte(rgb[2]) as u32;
    (255 << 24) | (b << 16) | (g << 8) | r
}

/// Write an image to the given path. EXR files receive linear radiance; 8-bit
/// formats are tone mapped and sRGB encoded.
///
/// * `path`     - Output file path.
/// * `pixels`   - Linear radiance, row major, top row first.
/// * `width`    - Width of image.
/// * `height`   - Height of image.
/// * `tone_map` - Apply the ACES curve to 8-bit output.
pub fn write_image(
    path: &str,
    pixels: &[Spectrum],
    width: usize,
    height: usize,
    tone_map: bool,
) -> Result<(), String> {
    if width * height != pixels.len() {
        return Err(format!(
            "Image {path}: {} pixels do not match resolution {width}x{height}",
            pixels.len()
        ));
    }

    match get_extension_from_filename(path) {
        Some(".exr") => write_exr(path, pixels, width, height),
        Some(".tga") => write_8_bit(path, pixels, width, height, tone_map, ImageFormat::Tga),
        Some(".png") => write_8_bit(path, pixels, width, height, tone_map, ImageFormat::Png),
        Some(extension) => Err(format!("Extension {extension} is not supported")),
        None => Err(format!("Can't determine file type from suffix of filename {path}")),
    }
}

/// Returns regular expression for extracting the file extension: the last
/// period followed by no periods or slashes.
fn regex_file_ext() -> &'static Regex {
    static DATA: OnceLock<Regex> = OnceLock::new();
    DATA.get_or_init(|| Regex::new(r"(\.[^./\\]+)$").expect("valid file extension regex"))
}

/// Retrieve the extension from a file path.
///
/// * `path` - The file path.
fn get_extension_from_filename(path: &str) -> Option<&str> {
    regex_file_ext()
        .captures(path)
        .map(|c| c.get(1).map_or("", |m| m.as_str()))
}

/// Writes the image in OpenEXR format.
///
/// * `path`   - Output file path.
/// * `pixels` - Linear radiance.
/// * `width`  - Width of image.
/// * `height` - Height of image.
fn write_exr(path: &str, pixels: &[Spectrum], width: usize, height: usize) -> Result<(), String> {
    info!("Writing image {path} with resolution {width}x{height}");

    let size = Vec2(width, height);
    let layer = Layer::new(
        size,
        LayerAttributes::named("render"),
        Encoding::SMALL_LOSSLESS,
        SpecificChannels::rgb(|pos: Vec2<usize>| {
            let rgb = pixels[pos.1 * width + pos.0].to_rgb();
            (rgb[0], rgb[1], rgb[2])
        }),
    );

    let attributes = ImageAttributes::new(IntegerBounds::from_dimensions(size));
    Image::empty(attributes)
        .with_layer(layer)
        .write()
        .to_file(path)
        .map_err(|err| format!("Error saving output image {path}: {err}"))
}

/// Writes the image in an 8-bit image format.
///
/// * `path`         - Output file path.
/// * `pixels`       - Linear radiance.
/// * `width`        - Width of image.
/// * `height`       - Height of image.
/// * `tone_map`     - Apply the ACES curve.
/// * `image_format` - Image format.
fn write_8_bit(
    path: &str,
    pixels: &[Spectrum],
    width: usize,
    height: usize,
    tone_map: bool,
    image_format: ImageFormat,
) -> Result<(), String> {
    info!("Writing image {path} with resolution {width}x{height}");

    let imgbuf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let rgb = to_display(&pixels[y as usize * width + x as usize], tone_map);
        Rgb([to_byte(rgb[0]), to_byte(rgb[1]), to_byte(rgb[2])])
    });

    imgbuf
        .save_with_format(path, image_format)
        .map_err(|err| format!("Error saving output image {path}: {err}."))
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::*;
    use proptest::prelude::*;

    #[test]
    fn aces_maps_zero_to_zero_and_saturates() {
        assert_eq!(aces_film(0.0), 0.0);
        assert_eq!(aces_film(1000.0), 1.0);
        assert!(approx_eq!(f32, aces_film(1.0), 0.8037, epsilon = 1e-3));
    }

    #[test]
    fn packs_red_in_low_byte() {
        assert_eq!(pack_rgba8(&[1.0, 0.0, 0.0]), 0xff0000ff);
        assert_eq!(pack_rgba8(&[0.0, 0.0, 1.0]), 0xffff0000);
        assert_eq!(pack_rgba8(&[2.0, -1.0, 0.0]), 0xff0000ff);
    }

    #[test]
    fn extension_dispatch() {
        assert_eq!(get_extension_from_filename("out/render.png"), Some(".png"));
        assert_eq!(get_extension_from_filename("a.b/render.exr"), Some(".exr"));
        assert_eq!(get_extension_from_filename("render"), None);
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        let err = write_image("render.bmp", &[Spectrum::ZERO], 1, 1, false).unwrap_err();
        assert!(err.contains(".bmp"));
    }

    #[test]
    fn mismatched_resolution_is_an_error() {
        assert!(write_image("render.png", &[Spectrum::ZERO], 2, 2, false).is_err());
    }

    proptest! {
        #[test]
        fn aces_is_monotonic(a in 0.0..50.0f32, b in 0.0..50.0f32) {
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(aces_film(lo) <= aces_film(hi) + 1e-6);
        }

        #[test]
        fn display_values_in_unit_range(r in -10.0..100.0f32, g in -10.0..100.0f32, tone_map in any::<bool>()) {
            let d = to_display(&Spectrum::from_rgb(r, g, 0.5), tone_map);
            for v in d {
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
