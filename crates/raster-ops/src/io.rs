//! Loading plain (non geo-referenced) images.
//!
//! Buffers come back in row-major order, `(row, column[, channel])`; pass
//! them through [`normalize_orientation`](crate::normalize_orientation) to
//! get x-first indexing.

use std::path::Path;

use image::DynamicImage;
use ndarray::{Array2, Array3};
use terrain_common::{TerrainError, TerrainResult};
use tracing::debug;

use crate::buffer::RasterBuffer;
use crate::sample::SampleType;

/// Decode an image file into a row-major buffer.
pub fn load_image(path: impl AsRef<Path>) -> TerrainResult<RasterBuffer> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|e| image_error(path, e))?;
    let buffer = image_to_buffer(img)?;
    debug!(
        path = %path.display(),
        rows = buffer.width(),
        cols = buffer.height(),
        channels = buffer.channels(),
        sample_type = %buffer.sample_type(),
        "Loaded image"
    );
    Ok(buffer)
}

/// Convert a decoded image, dropping any alpha channel.
///
/// Gray images give a single-channel buffer and color images three
/// channels. 16-bit images keep their depth and float images become
/// Float32.
pub fn image_to_buffer(img: DynamicImage) -> TerrainResult<RasterBuffer> {
    match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageLumaA8(_) => {
            let gray = img.to_luma8();
            let (w, h) = gray.dimensions();
            let data = Array2::from_shape_fn((h as usize, w as usize), |(r, c)| {
                gray.get_pixel(c as u32, r as u32).0[0] as f64
            });
            Ok(RasterBuffer::gray(data, SampleType::UInt8))
        }
        DynamicImage::ImageLuma16(_) | DynamicImage::ImageLumaA16(_) => {
            let gray = img.to_luma16();
            let (w, h) = gray.dimensions();
            let data = Array2::from_shape_fn((h as usize, w as usize), |(r, c)| {
                gray.get_pixel(c as u32, r as u32).0[0] as f64
            });
            Ok(RasterBuffer::gray(data, SampleType::UInt16))
        }
        DynamicImage::ImageRgb16(_) | DynamicImage::ImageRgba16(_) => {
            let rgb = img.to_rgb16();
            let (w, h) = rgb.dimensions();
            let data = Array3::from_shape_fn((h as usize, w as usize, 3), |(r, c, ch)| {
                rgb.get_pixel(c as u32, r as u32).0[ch] as f64
            });
            RasterBuffer::multi(data, SampleType::UInt16)
        }
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            let rgb = img.to_rgb32f();
            let (w, h) = rgb.dimensions();
            let data = Array3::from_shape_fn((h as usize, w as usize, 3), |(r, c, ch)| {
                rgb.get_pixel(c as u32, r as u32).0[ch] as f64
            });
            RasterBuffer::multi(data, SampleType::Float32)
        }
        _ => {
            let rgb = img.to_rgb8();
            let (w, h) = rgb.dimensions();
            let data = Array3::from_shape_fn((h as usize, w as usize, 3), |(r, c, ch)| {
                rgb.get_pixel(c as u32, r as u32).0[ch] as f64
            });
            RasterBuffer::multi(data, SampleType::UInt8)
        }
    }
}

fn image_error(path: &Path, err: image::ImageError) -> TerrainError {
    match err {
        image::ImageError::IoError(e) => TerrainError::Io(format!("{}: {}", path.display(), e)),
        other => TerrainError::Image(format!("{}: {}", path.display(), other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    #[test]
    fn test_gray_image_is_row_major() {
        let mut img = GrayImage::new(3, 2);
        img.put_pixel(2, 0, Luma([7]));
        img.put_pixel(0, 1, Luma([9]));
        let buf = image_to_buffer(DynamicImage::ImageLuma8(img)).unwrap();
        assert!(buf.is_gray());
        assert_eq!((buf.width(), buf.height()), (2, 3));
        assert_eq!(buf.get(0, 2, 0), Some(7.0));
        assert_eq!(buf.get(1, 0, 0), Some(9.0));
    }

    #[test]
    fn test_rgb_image() {
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(1, 0, Rgb([1, 2, 3]));
        let buf = image_to_buffer(DynamicImage::ImageRgb8(img)).unwrap();
        assert_eq!(buf.channels(), 3);
        assert_eq!(buf.pixel(0, 1).unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_missing_file() {
        let err = load_image("/nonexistent/terrain.png").unwrap_err();
        assert!(matches!(err, TerrainError::Io(_)));
    }
}
