use anyhow::{Context, Result};
use color_quant::NeuQuant;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, RgbImage};
use std::path::Path;

use super::Dimensions;

/// NeuQuant sampling factor: 1 is slowest/best, 30 is fastest
const QUANTIZE_SAMPLE_FACTOR: i32 = 10;

/// A frame reduced to an indexed image with its own adaptive palette
#[derive(Debug, Clone)]
pub struct PreparedFrame {
    pub width: u32,
    pub height: u32,
    /// RGB triplets, at most `colors` entries
    pub palette: Vec<u8>,
    /// One palette index per pixel, row-major
    pub indices: Vec<u8>,
}

impl PreparedFrame {
    /// Number of colors in the palette
    pub fn palette_len(&self) -> usize {
        self.palette.len() / 3
    }
}

/// Decode, normalise, resize and quantize one JPEG file
pub fn prepare_frame(
    path: &Path,
    resize: Option<Dimensions>,
    colors: u16,
) -> Result<PreparedFrame> {
    let img = image::ImageReader::open(path)
        .with_context(|| format!("Failed to open image: {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read image: {}", path.display()))?
        .decode()
        .with_context(|| format!("Failed to decode image: {}", path.display()))?;

    let rgb = to_rgb(img);

    let rgb = match resize {
        Some(size) => resize_image(&rgb, size.width, size.height)
            .with_context(|| format!("Failed to resize image: {}", path.display()))?,
        None => rgb,
    };

    Ok(quantize(&rgb, colors))
}

/// Convert any decoded color mode to plain 8-bit RGB
pub fn to_rgb(img: DynamicImage) -> RgbImage {
    match img {
        DynamicImage::ImageRgb8(rgb) => rgb,
        other => other.to_rgb8(),
    }
}

/// Resample to exactly `width` x `height` with a Lanczos3 filter
pub fn resize_image(img: &RgbImage, width: u32, height: u32) -> Result<RgbImage> {
    let (src_width, src_height) = img.dimensions();

    if src_width == width && src_height == height {
        return Ok(img.clone());
    }

    let src_image =
        Image::from_vec_u8(src_width, src_height, img.as_raw().clone(), PixelType::U8x3)
            .context("Failed to wrap source pixels for resizing")?;

    let mut dst_image = Image::new(width, height, PixelType::U8x3);

    let options =
        ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3));
    let mut resizer = Resizer::new();
    resizer
        .resize(&src_image, &mut dst_image, &options)
        .context("Failed to resize image")?;

    RgbImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| anyhow::anyhow!("Resized buffer does not match {}x{}", width, height))
}

/// Reduce an RGB image to an adaptive palette of at most `colors` entries
pub fn quantize(img: &RgbImage, colors: u16) -> PreparedFrame {
    let (width, height) = img.dimensions();

    let rgba: Vec<u8> = img
        .pixels()
        .flat_map(|p| [p[0], p[1], p[2], 0xFF])
        .collect();

    let quantizer = NeuQuant::new(QUANTIZE_SAMPLE_FACTOR, usize::from(colors), &rgba);
    let palette = quantizer.color_map_rgb();
    let indices = rgba
        .chunks_exact(4)
        .map(|pixel| quantizer.index_of(pixel) as u8)
        .collect();

    PreparedFrame {
        width,
        height,
        palette,
        indices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb};

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
        })
    }

    #[test]
    fn test_to_rgb_converts_grayscale() {
        let gray = GrayImage::from_pixel(3, 2, Luma([200]));
        let rgb = to_rgb(DynamicImage::ImageLuma8(gray));
        assert_eq!(rgb.dimensions(), (3, 2));
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([200, 200, 200]));
    }

    #[test]
    fn test_resize_to_exact_dimensions() {
        let img = gradient(64, 48);
        let resized = resize_image(&img, 20, 30).unwrap();
        assert_eq!(resized.dimensions(), (20, 30));

        let upscaled = resize_image(&img, 100, 100).unwrap();
        assert_eq!(upscaled.dimensions(), (100, 100));
    }

    #[test]
    fn test_quantize_respects_color_bound() {
        let img = gradient(32, 32);
        for colors in [2u16, 16, 256] {
            let frame = quantize(&img, colors);
            assert_eq!(frame.indices.len(), 32 * 32);
            assert!(frame.palette_len() <= usize::from(colors));
            assert!(frame
                .indices
                .iter()
                .all(|&i| usize::from(i) < frame.palette_len()));
        }
    }

    #[test]
    fn test_quantize_solid_color() {
        let img = RgbImage::from_pixel(8, 8, Rgb([10, 200, 30]));
        let frame = quantize(&img, 4);
        assert!(frame.indices.iter().all(|&i| i == frame.indices[0]));
    }
}
