//! Tests for cross-raster color mapping.

use georaster::{GeoRaster, GeoTransform};
use ndarray::{Array2, Array3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use raster_ops::{Orientation, RasterBuffer, SampleType};
use renderer::{map_across, map_across_raster, save_png, MapperConfig};
use terrain_common::TerrainError;
use test_utils::extent::DECCAN_QUARTER;
use test_utils::{checker_rgb, uniform_gray, write_geotiff_fixture, FixturePixels, GeoTags};

// ============================================================================
// Helper functions
// ============================================================================

/// Mapping with every post-processing stage switched off.
fn plain_config() -> MapperConfig {
    MapperConfig {
        more_bluey: false,
        add_noise: false,
        blur: false,
        flip: false,
        ..MapperConfig::default()
    }
}

/// 4x4 RGB reference over the Deccan quarter-degree grid.
///
/// Pixel (x, y) holds `(10x, 10y, 50)`.
fn reference_raster() -> GeoRaster {
    let (lon, lat, d_lon, d_lat) = DECCAN_QUARTER;
    let data = Array3::from_shape_fn((4, 4, 3), |(x, y, c)| match c {
        0 => 10.0 * x as f64,
        1 => 10.0 * y as f64,
        _ => 50.0,
    });
    GeoRaster::from_parts(
        RasterBuffer::multi(data, SampleType::UInt8).unwrap(),
        GeoTransform::new(lon, lat, d_lon, d_lat).unwrap(),
    )
}

/// 2x2 gray source whose pixel (0, 0) sits on reference pixel (1, 1).
fn inner_source() -> GeoRaster {
    GeoRaster::from_parts(
        RasterBuffer::gray(uniform_gray(2, 2, 0.0), SampleType::UInt16),
        GeoTransform::new(74.25, 15.75, 0.25, -0.25).unwrap(),
    )
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

// ============================================================================
// Lookup tests
// ============================================================================

#[test]
fn test_colors_come_from_reference() {
    let mapped = map_across(&inner_source(), &reference_raster(), &plain_config(), &mut rng()).unwrap();

    assert_eq!(mapped.width(), 2);
    assert_eq!(mapped.height(), 2);
    assert_eq!(mapped.channels(), 3);
    assert_eq!(mapped.sample_type(), SampleType::UInt8);
    assert_eq!(mapped.pixel(0, 0).unwrap(), vec![10.0, 10.0, 50.0]);
    assert_eq!(mapped.pixel(1, 0).unwrap(), vec![20.0, 10.0, 50.0]);
    assert_eq!(mapped.pixel(1, 1).unwrap(), vec![20.0, 20.0, 50.0]);
}

#[test]
fn test_source_outside_reference_is_lookup_error() {
    let source = GeoRaster::from_parts(
        RasterBuffer::gray(uniform_gray(3, 3, 0.0), SampleType::UInt8),
        GeoTransform::new(73.0, 16.0, 0.25, -0.25).unwrap(),
    );
    let err = map_across(&source, &reference_raster(), &plain_config(), &mut rng()).unwrap_err();
    assert!(matches!(err, TerrainError::Lookup { .. }));
    assert!(err.is_out_of_bounds());
}

#[test]
fn test_gray_reference_gives_gray_output() {
    let (lon, lat, d_lon, d_lat) = DECCAN_QUARTER;
    let reference = GeoRaster::from_parts(
        RasterBuffer::gray(uniform_gray(4, 4, 700.0), SampleType::UInt16),
        GeoTransform::new(lon, lat, d_lon, d_lat).unwrap(),
    );
    let config = MapperConfig {
        more_bluey: true,
        ..plain_config()
    };
    let mapped = map_across(&inner_source(), &reference, &config, &mut rng()).unwrap();
    assert!(mapped.is_gray());
    assert_eq!(mapped.sample_type(), SampleType::UInt16);
    assert!(mapped.data().iter().all(|v| *v == 700.0));
}

// ============================================================================
// Post-processing tests
// ============================================================================

#[test]
fn test_more_bluey_boosts_dim_water() {
    let (lon, lat, d_lon, d_lat) = DECCAN_QUARTER;
    let water = checker_rgb(4, 4, 2, [0.0, 0.0, 100.0], [0.0, 90.0, 100.0]);
    let reference = GeoRaster::from_parts(
        RasterBuffer::multi(water, SampleType::UInt8).unwrap(),
        GeoTransform::new(lon, lat, d_lon, d_lat).unwrap(),
    );
    let config = MapperConfig {
        more_bluey: true,
        ..plain_config()
    };
    let mapped = map_across(&inner_source(), &reference, &config, &mut rng()).unwrap();

    // Reference (1, 1) is pure blue, (2, 1) is not
    assert_eq!(mapped.pixel(0, 0).unwrap(), vec![0.0, 0.0, 183.0]);
    assert_eq!(mapped.pixel(1, 0).unwrap(), vec![0.0, 90.0, 100.0]);
}

#[test]
fn test_vertical_flip() {
    let config = MapperConfig {
        flip: true,
        flip_vertical: true,
        ..plain_config()
    };
    let mapped = map_across(&inner_source(), &reference_raster(), &config, &mut rng()).unwrap();
    assert_eq!(mapped.pixel(0, 0).unwrap(), vec![10.0, 20.0, 50.0]);
    assert_eq!(mapped.pixel(0, 1).unwrap(), vec![10.0, 10.0, 50.0]);
}

#[test]
fn test_seeded_noise_is_reproducible() {
    let config = MapperConfig {
        add_noise: true,
        noise_ratio: 0.2,
        ..plain_config()
    };
    let a = map_across(&inner_source(), &reference_raster(), &config, &mut rng()).unwrap();
    let b = map_across(&inner_source(), &reference_raster(), &config, &mut rng()).unwrap();
    assert_eq!(a, b);
    assert!(a.data().iter().all(|v| v.fract() == 0.0));
}

#[test]
fn test_blur_of_uniform_reference_is_uniform() {
    let (lon, lat, d_lon, d_lat) = DECCAN_QUARTER;
    let reference = GeoRaster::from_parts(
        RasterBuffer::gray(uniform_gray(4, 4, 120.0), SampleType::UInt8),
        GeoTransform::new(lon, lat, d_lon, d_lat).unwrap(),
    );
    let config = MapperConfig {
        blur: true,
        blur_radius: 2,
        ..plain_config()
    };
    let mapped = map_across(&inner_source(), &reference, &config, &mut rng()).unwrap();
    assert!(mapped.data().iter().all(|v| *v == 120.0));
}

#[test]
fn test_invalid_noise_ratio() {
    let config = MapperConfig {
        noise_ratio: -0.1,
        ..plain_config()
    };
    let err = map_across(&inner_source(), &reference_raster(), &config, &mut rng()).unwrap_err();
    assert!(matches!(err, TerrainError::Config(_)));
}

#[test]
fn test_oversized_blur_radius_is_config_error() {
    let config = MapperConfig {
        blur: true,
        blur_radius: 100_000,
        ..plain_config()
    };
    let err = map_across(&inner_source(), &reference_raster(), &config, &mut rng()).unwrap_err();
    assert!(matches!(err, TerrainError::Config(_)));
}

// ============================================================================
// Geo-referenced result tests
// ============================================================================

#[test]
fn test_map_across_raster_keeps_source_transform() {
    let source = inner_source();
    let mapped = map_across_raster(&source, &reference_raster(), &plain_config(), &mut rng()).unwrap();
    assert_eq!(mapped.extent(), source.extent());
    assert_eq!(mapped.to_geo(1, 1), source.to_geo(1, 1));
}

#[test]
fn test_map_across_raster_rejects_flip() {
    let config = MapperConfig {
        flip: true,
        ..plain_config()
    };
    let err = map_across_raster(&inner_source(), &reference_raster(), &config, &mut rng()).unwrap_err();
    assert!(matches!(err, TerrainError::Config(_)));
}

#[test]
fn test_geotiff_files_end_to_end() {
    let dir = tempfile::tempdir().unwrap();

    // Row-major: 4 rows, 6 columns
    let reference_pixels = Array3::<u8>::from_shape_fn((4, 6, 3), |(row, col, c)| {
        [col as u8 * 40, row as u8 * 60, 30][c]
    });
    let reference_path = write_geotiff_fixture(
        dir.path(),
        "reference.tif",
        FixturePixels::Rgb8(&reference_pixels),
        &GeoTags::tie_point(76.0, 13.0, 0.5, 0.5),
        Some("WGS 84|"),
    );

    let source_pixels = Array2::<u8>::zeros((2, 3));
    let source_path = write_geotiff_fixture(
        dir.path(),
        "source.tif",
        FixturePixels::Gray8(&source_pixels),
        &GeoTags::tie_point(76.5, 12.5, 0.5, 0.5),
        Some("WGS 84|"),
    );

    let reference = GeoRaster::open(&reference_path).unwrap();
    let source = GeoRaster::open(&source_path).unwrap();
    let mapped = map_across_raster(&source, &reference, &plain_config(), &mut rng()).unwrap();

    assert_eq!(mapped.width(), 3);
    assert_eq!(mapped.height(), 2);
    // Source (0, 0) is reference column 1, row 1
    assert_eq!(mapped.pixel_at(0, 0).unwrap(), vec![40.0, 60.0, 30.0]);

    let out = dir.path().join("source.cm.png");
    save_png(&out, mapped.buffer(), Orientation::XFirst, Some(&mapped.extent())).unwrap();
    let img = image::open(&out).unwrap().to_rgb8();
    assert_eq!(img.dimensions(), (3, 2));
    assert_eq!(img.get_pixel(2, 1).0, [120, 120, 30]);
}
