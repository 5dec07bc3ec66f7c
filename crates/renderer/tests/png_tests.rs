//! Tests for 8-bit PNG output.
//!
//! Encoded images are decoded again with the `image` crate to check the
//! pixel layout, and the `tEXt` chunks are read back for extent metadata.

use ndarray::{array, Array3};
use raster_ops::{Orientation, RasterBuffer, SampleType};
use renderer::png::text_chunks;
use renderer::{encode_png, save_png};
use terrain_common::{GeoExtent, TerrainError};

// ============================================================================
// Orientation tests
// ============================================================================

#[test]
fn test_x_first_gray_is_transposed_back() {
    // 3 wide, 2 high
    let buf = RasterBuffer::gray(
        array![[10.0, 11.0], [20.0, 21.0], [30.0, 31.0]],
        SampleType::UInt8,
    );
    let png = encode_png(&buf, Orientation::XFirst, None).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_luma8();

    assert_eq!(img.dimensions(), (3, 2));
    for x in 0..3u32 {
        for y in 0..2u32 {
            let expected = buf.get(x as usize, y as usize, 0).unwrap() as u8;
            assert_eq!(img.get_pixel(x, y).0[0], expected, "pixel ({}, {})", x, y);
        }
    }
}

#[test]
fn test_row_major_is_written_as_is() {
    // 2 rows, 3 columns
    let buf = RasterBuffer::gray(
        array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]],
        SampleType::UInt8,
    );
    let png = encode_png(&buf, Orientation::RowMajor, None).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_luma8();

    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(2, 0).0[0], 3);
    assert_eq!(img.get_pixel(0, 1).0[0], 4);
}

#[test]
fn test_rgb_float_output() {
    let mut data = Array3::<f64>::zeros((2, 2, 3));
    data[[1, 0, 0]] = 1.0;
    data[[0, 1, 2]] = 0.5;
    let buf = RasterBuffer::multi(data, SampleType::Float64).unwrap();

    let png = encode_png(&buf, Orientation::XFirst, None).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgb8();

    assert_eq!(img.get_pixel(1, 0).0, [255, 0, 0]);
    assert_eq!(img.get_pixel(0, 1).0, [0, 0, 127]);
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
}

// ============================================================================
// Metadata tests
// ============================================================================

#[test]
fn test_extent_written_as_text_chunks() {
    let buf = RasterBuffer::gray(array![[0.0]], SampleType::UInt8);
    let extent = GeoExtent::new(74.0, 16.0, 75.0, 15.0);
    let png = encode_png(&buf, Orientation::XFirst, Some(&extent)).unwrap();

    let chunks = text_chunks(&png);
    let keys: Vec<&str> = chunks.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["GeoStartLon", "GeoStartLat", "GeoEndLon", "GeoEndLat"]);
    assert_eq!(chunks[0].1, "74");
    assert_eq!(chunks[3].1, "15");

    // Still a valid image for ordinary decoders
    assert!(image::load_from_memory(&png).is_ok());
}

#[test]
fn test_no_extent_no_text_chunks() {
    let buf = RasterBuffer::gray(array![[0.0]], SampleType::UInt8);
    let png = encode_png(&buf, Orientation::XFirst, None).unwrap();
    assert!(text_chunks(&png).is_empty());
}

// ============================================================================
// Error and file tests
// ============================================================================

#[test]
fn test_out_of_range_float_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.png");
    let buf = RasterBuffer::gray(array![[0.2, 1.2]], SampleType::Float32);

    let err = save_png(&path, &buf, Orientation::XFirst, None).unwrap_err();
    assert!(matches!(err, TerrainError::Range(_)));
    assert!(!path.exists());
}

#[test]
fn test_save_uint16() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hf.png");
    let buf = RasterBuffer::gray(array![[0.0, 65535.0]], SampleType::UInt16);

    save_png(&path, &buf, Orientation::XFirst, None).unwrap();

    let img = image::open(&path).unwrap().to_luma8();
    assert_eq!(img.dimensions(), (1, 2));
    assert_eq!(img.get_pixel(0, 0).0[0], 0);
    assert_eq!(img.get_pixel(0, 1).0[0], 255);
}
