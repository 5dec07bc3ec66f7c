//! Tests for heightfield to colormap conversion.

use ndarray::{array, Array3};
use raster_ops::{RasterBuffer, SampleType};
use renderer::{classify, heightfield_to_colormap};
use terrain_common::TerrainError;
use test_utils::{assert_approx_eq, gradient_gray};

#[test]
fn test_colormap_shape_and_type() {
    let heights = RasterBuffer::gray(gradient_gray(8, 5, 255.0).mapv(f64::round), SampleType::UInt8);
    let colors = heightfield_to_colormap(&heights).unwrap();

    assert_eq!(colors.width(), 8);
    assert_eq!(colors.height(), 5);
    assert_eq!(colors.channels(), 3);
    assert_eq!(colors.sample_type(), SampleType::Float64);
    assert!(colors.validate_range().is_ok());
}

#[test]
fn test_colormap_normalizes_by_sample_type() {
    let heights = RasterBuffer::gray(array![[0.0, 65535.0], [6553.5, 19660.5]], SampleType::UInt16);
    let colors = heightfield_to_colormap(&heights).unwrap();

    // Sea level
    assert_eq!(colors.pixel(0, 0).unwrap(), vec![0.0, 0.0, 1.0]);
    // Peak
    assert_eq!(colors.pixel(0, 1).unwrap(), classify(1.0).to_vec());
    // 0.1 lowland green
    let low = colors.pixel(1, 0).unwrap();
    assert_approx_eq!(low[1], 0.6, 1e-9);
    // 0.3 hills brown
    let hills = colors.pixel(1, 1).unwrap();
    assert_approx_eq!(hills[0], 0.3, 1e-9);
    assert_approx_eq!(hills[1], 0.15, 1e-9);
}

#[test]
fn test_multi_channel_rejected() {
    let buf = RasterBuffer::multi(Array3::zeros((2, 2, 3)), SampleType::UInt8).unwrap();
    assert!(matches!(heightfield_to_colormap(&buf), Err(TerrainError::Shape(_))));
}

#[test]
fn test_every_color_in_unit_range() {
    for i in -10..=100 {
        let rgb = classify(i as f64 / 100.0);
        assert!(rgb.iter().all(|c| (0.0..=1.0).contains(c)), "{:?}", rgb);
    }
}

#[test]
fn test_above_one_is_not_clamped() {
    let expected = 0.2 + 0.8 * (1.1 - 0.4) / 0.6;
    for c in classify(1.1) {
        assert_approx_eq!(c, expected, 1e-12);
    }
    assert!(expected > 1.0);
}
