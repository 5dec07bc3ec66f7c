//! GeoTIFF fixture writer.
//!
//! Writes small geo-referenced TIFF files with the `tiff` encoder so that
//! loading code can be tested against real files instead of in-memory
//! rasters.
//!
//! # Example
//!
//! ```ignore
//! use test_utils::{write_geotiff_fixture, FixturePixels, GeoTags};
//!
//! let dir = tempfile::tempdir().unwrap();
//! let pixels = ndarray::Array2::<u8>::zeros((4, 6)); // 4 rows, 6 columns
//! let path = write_geotiff_fixture(
//!     dir.path(),
//!     "flat.tif",
//!     FixturePixels::Gray8(&pixels),
//!     &GeoTags::tie_point(76.0, 13.0, 0.5, 0.5),
//!     Some("WGS 84|"),
//! );
//! ```

use std::fs::File;
use std::io::{Seek, Write};
use std::path::{Path, PathBuf};

use ndarray::{Array2, Array3};
use tiff::encoder::colortype;
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;

/// Pixel data for a fixture, in row-major order `(rows, columns[, 3])`.
pub enum FixturePixels<'a> {
    Gray8(&'a Array2<u8>),
    Gray16(&'a Array2<u16>),
    GrayF32(&'a Array2<f32>),
    Rgb8(&'a Array3<u8>),
}

/// Geo-referencing tags written to a fixture.
#[derive(Debug, Clone, PartialEq)]
pub enum GeoTags {
    /// ModelTiepoint at raster (0, 0, 0) plus ModelPixelScale.
    ///
    /// `scale_y` is written as a positive magnitude, as GeoTIFF expects for
    /// north-up images.
    TiePoint {
        origin_lon: f64,
        origin_lat: f64,
        scale_x: f64,
        scale_y: f64,
    },
    /// Raw 16-value ModelTransformation.
    Transformation(Vec<f64>),
    /// Raw tie point values (possibly malformed) with an optional scale.
    RawTiePoint {
        tie_point: Vec<f64>,
        scale: Option<Vec<f64>>,
    },
    /// No geo-referencing at all.
    None,
}

impl GeoTags {
    pub fn tie_point(origin_lon: f64, origin_lat: f64, scale_x: f64, scale_y: f64) -> Self {
        GeoTags::TiePoint {
            origin_lon,
            origin_lat,
            scale_x,
            scale_y,
        }
    }

    /// Axis-aligned ModelTransformation for the given origin and deltas.
    pub fn transformation(origin_lon: f64, origin_lat: f64, d_lon: f64, d_lat: f64) -> Self {
        GeoTags::Transformation(vec![
            d_lon, 0.0, 0.0, origin_lon, //
            0.0, d_lat, 0.0, origin_lat, //
            0.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }
}

/// Write a fixture GeoTIFF into `dir` and return its path.
///
/// Panics on any encoder failure; this is test-only code.
pub fn write_geotiff_fixture(
    dir: &Path,
    name: &str,
    pixels: FixturePixels<'_>,
    tags: &GeoTags,
    ascii_params: Option<&str>,
) -> PathBuf {
    let path = dir.join(name);
    let file = File::create(&path).expect("create fixture file");
    let mut encoder = TiffEncoder::new(file).expect("create tiff encoder");

    match pixels {
        FixturePixels::Gray8(data) => {
            let (rows, cols) = data.dim();
            let flat: Vec<u8> = data.iter().copied().collect();
            let mut image = encoder
                .new_image::<colortype::Gray8>(cols as u32, rows as u32)
                .expect("new gray8 image");
            write_geo_tags(image.encoder(), tags, ascii_params);
            image.write_data(&flat).expect("write pixel data");
        }
        FixturePixels::Gray16(data) => {
            let (rows, cols) = data.dim();
            let flat: Vec<u16> = data.iter().copied().collect();
            let mut image = encoder
                .new_image::<colortype::Gray16>(cols as u32, rows as u32)
                .expect("new gray16 image");
            write_geo_tags(image.encoder(), tags, ascii_params);
            image.write_data(&flat).expect("write pixel data");
        }
        FixturePixels::GrayF32(data) => {
            let (rows, cols) = data.dim();
            let flat: Vec<f32> = data.iter().copied().collect();
            let mut image = encoder
                .new_image::<colortype::Gray32Float>(cols as u32, rows as u32)
                .expect("new gray32f image");
            write_geo_tags(image.encoder(), tags, ascii_params);
            image.write_data(&flat).expect("write pixel data");
        }
        FixturePixels::Rgb8(data) => {
            let (rows, cols, _) = data.dim();
            let flat: Vec<u8> = data.iter().copied().collect();
            let mut image = encoder
                .new_image::<colortype::RGB8>(cols as u32, rows as u32)
                .expect("new rgb8 image");
            write_geo_tags(image.encoder(), tags, ascii_params);
            image.write_data(&flat).expect("write pixel data");
        }
    }

    path
}

fn write_geo_tags<W, K>(dir: &mut DirectoryEncoder<'_, W, K>, tags: &GeoTags, ascii_params: Option<&str>)
where
    W: Write + Seek,
    K: TiffKind,
{
    match tags {
        GeoTags::TiePoint {
            origin_lon,
            origin_lat,
            scale_x,
            scale_y,
        } => {
            let tie_point = [0.0, 0.0, 0.0, *origin_lon, *origin_lat, 0.0];
            let scale = [*scale_x, *scale_y, 0.0];
            dir.write_tag(Tag::ModelTiepointTag, &tie_point[..])
                .expect("write tie point");
            dir.write_tag(Tag::ModelPixelScaleTag, &scale[..])
                .expect("write pixel scale");
        }
        GeoTags::Transformation(values) => {
            dir.write_tag(Tag::ModelTransformationTag, values.as_slice())
                .expect("write transformation");
        }
        GeoTags::RawTiePoint { tie_point, scale } => {
            dir.write_tag(Tag::ModelTiepointTag, tie_point.as_slice())
                .expect("write tie point");
            if let Some(scale) = scale {
                dir.write_tag(Tag::ModelPixelScaleTag, scale.as_slice())
                    .expect("write pixel scale");
            }
        }
        GeoTags::None => {}
    }
    if let Some(ascii) = ascii_params {
        dir.write_tag(Tag::GeoAsciiParamsTag, ascii)
            .expect("write ascii params");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let pixels = Array2::<u8>::from_elem((3, 5), 9);
        let path = write_geotiff_fixture(
            dir.path(),
            "f.tif",
            FixturePixels::Gray8(&pixels),
            &GeoTags::tie_point(1.0, 2.0, 0.1, 0.1),
            Some("WGS 84|"),
        );
        assert!(path.exists());
        assert!(std::fs::metadata(&path).unwrap().len() > 15);
    }

    #[test]
    fn test_transformation_layout() {
        match GeoTags::transformation(70.0, 30.0, 0.5, -0.25) {
            GeoTags::Transformation(t) => {
                assert_eq!(t.len(), 16);
                assert_eq!((t[0], t[3], t[5], t[7], t[15]), (0.5, 70.0, -0.25, 30.0, 1.0));
            }
            other => panic!("unexpected tags {:?}", other),
        }
    }
}
