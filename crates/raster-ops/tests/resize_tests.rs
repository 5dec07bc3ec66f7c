//! Tests for resizing, orientation and geometry helpers.

use ndarray::Array3;
use raster_ops::{
    crop, flip, normalize_orientation, power_of_two_side, resize_to, resize_to_power_of_two_square,
    RasterBuffer, ResizeFilter, SampleType,
};
use terrain_common::TerrainError;
use test_utils::{gradient_gray, uniform_gray};

// ============================================================================
// resize_to
// ============================================================================

#[test]
fn test_output_shape_is_exact() {
    let buf = RasterBuffer::gray(gradient_gray(37, 21, 255.0), SampleType::UInt8);
    for filter in [ResizeFilter::Nearest, ResizeFilter::Bilinear, ResizeFilter::Cubic] {
        let out = resize_to(&buf, 50, 13, filter).unwrap();
        assert_eq!((out.width(), out.height(), out.channels()), (50, 13, 1));
        assert!(out.is_gray());
        assert_eq!(out.sample_type(), SampleType::UInt8);
        assert!(out.data().iter().all(|v| v.fract() == 0.0 && (0.0..=255.0).contains(v)));
    }
}

#[test]
fn test_multichannel_shape() {
    let data = Array3::from_shape_fn((8, 6, 3), |(x, y, c)| (x + y + c) as f64);
    let buf = RasterBuffer::multi(data, SampleType::UInt16).unwrap();
    let out = resize_to(&buf, 4, 3, ResizeFilter::Bilinear).unwrap();
    assert_eq!((out.width(), out.height(), out.channels()), (4, 3, 3));
}

#[test]
fn test_uniform_resize_stays_uniform() {
    let buf = RasterBuffer::gray(uniform_gray(5, 5, 0.5), SampleType::Float32);
    let out = resize_to(&buf, 17, 9, ResizeFilter::Cubic).unwrap();
    assert!(out.data().iter().all(|v| (*v - 0.5).abs() < 1e-6));
}

#[test]
fn test_same_size_is_identity() {
    let buf = RasterBuffer::gray(gradient_gray(6, 4, 80.0), SampleType::UInt8);
    let out = resize_to(&buf, 6, 4, ResizeFilter::Bilinear).unwrap();
    assert_eq!(out, buf);
}

#[test]
fn test_zero_target_is_shape_error() {
    let buf = RasterBuffer::gray(uniform_gray(3, 3, 1.0), SampleType::UInt8);
    assert!(matches!(
        resize_to(&buf, 0, 3, ResizeFilter::Nearest),
        Err(TerrainError::Shape(_))
    ));
}

// ============================================================================
// Power of two
// ============================================================================

#[test]
fn test_power_of_two_square_invariant() {
    for (w, h, margin) in [(1, 1, 0), (3, 7, 1), (100, 60, 1), (128, 128, 0), (129, 2, 1)] {
        let buf = RasterBuffer::gray(uniform_gray(w, h, 3.0), SampleType::UInt8);
        let out = resize_to_power_of_two_square(&buf, margin, ResizeFilter::Bilinear).unwrap();
        let expected = 2usize.pow((w.max(h) as f64).log2().ceil() as u32) + margin;
        assert_eq!(out.width(), expected);
        assert_eq!(out.height(), expected);
        assert_eq!(power_of_two_side(w, h, margin), expected);
    }
}

// ============================================================================
// Orientation, crop and flip
// ============================================================================

#[test]
fn test_orientation_then_flip() {
    // Row-major 2x3 image: rows are y
    let rows = ndarray::array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
    let buf = RasterBuffer::gray(rows, SampleType::UInt8);
    let xfirst = normalize_orientation(&buf);
    assert_eq!((xfirst.width(), xfirst.height()), (3, 2));

    let flipped = flip(&xfirst, true);
    assert_eq!(flipped.get(0, 0, 0), Some(4.0));
    assert_eq!(normalize_orientation(&normalize_orientation(&buf)), buf);
}

#[test]
fn test_crop_then_resize() {
    let buf = RasterBuffer::gray(gradient_gray(20, 20, 255.0), SampleType::UInt8);
    let cropped = crop(&buf, 5, 5, 15, 40);
    assert_eq!((cropped.width(), cropped.height()), (10, 15));
    assert_eq!(cropped.get(0, 0, 0), buf.get(5, 5, 0));
    let out = resize_to(&cropped, 5, 5, ResizeFilter::Nearest).unwrap();
    assert_eq!((out.width(), out.height()), (5, 5));
}
