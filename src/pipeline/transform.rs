//! Geometric and colour transforms between rasterisation and quantization.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use tracing::debug;

/// Convert the rendered page to single-channel luminance.
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Target size for a `width × height` image scaled by `factor`.
///
/// Each axis is `round(dim * factor)`, never below one pixel.
pub fn scaled_dimensions(width: u32, height: u32, factor: f32) -> (u32, u32) {
    let scale = |dim: u32| ((dim as f64) * (factor as f64)).round().max(1.0) as u32;
    (scale(width), scale(height))
}

/// Resample `img` by `factor` with a Lanczos3 filter.
///
/// A factor of exactly `1.0` returns the image untouched.
pub fn scale_image(img: GrayImage, factor: f32) -> GrayImage {
    if factor == 1.0 {
        return img;
    }
    let (w, h) = scaled_dimensions(img.width(), img.height(), factor);
    debug!("Resizing {}x{} → {}x{}", img.width(), img.height(), w, h);
    imageops::resize(&img, w, h, FilterType::Lanczos3)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage};

    #[test]
    fn scaled_dimensions_round_half_up() {
        assert_eq!(scaled_dimensions(101, 57, 0.8), (81, 46));
        assert_eq!(scaled_dimensions(10, 10, 0.25), (3, 3));
        assert_eq!(scaled_dimensions(1, 1, 0.1), (1, 1));
        assert_eq!(scaled_dimensions(100, 50, 2.0), (200, 100));
    }

    #[test]
    fn unit_factor_keeps_pixels() {
        let img = GrayImage::from_fn(7, 3, |x, y| Luma([(x * 30 + y) as u8]));
        let out = scale_image(img.clone(), 1.0);
        assert_eq!(out, img);
    }

    #[test]
    fn downscale_changes_dimensions() {
        let img = GrayImage::from_pixel(101, 57, Luma([200]));
        let out = scale_image(img, 0.8);
        assert_eq!(out.dimensions(), (81, 46));
    }

    #[test]
    fn grayscale_uses_luminance() {
        let white = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([255, 255, 255])));
        let black = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([0, 0, 0])));
        let green = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([0, 255, 0])));

        assert_eq!(to_grayscale(&white).get_pixel(0, 0)[0], 255);
        assert_eq!(to_grayscale(&black).get_pixel(0, 0)[0], 0);
        // Green dominates luminance but is not white.
        let g = to_grayscale(&green).get_pixel(0, 0)[0];
        assert!(g > 128 && g < 255, "got {g}");
    }
}
