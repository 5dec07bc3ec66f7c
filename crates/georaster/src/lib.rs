//! Geo-referenced rasters.
//!
//! A [`GeoRaster`] pairs an x-first [`raster_ops::RasterBuffer`] with a
//! [`GeoTransform`], an axis-aligned affine map between pixel and
//! geographic coordinates parsed from GeoTIFF tags:
//!
//! - ModelTiepoint (33922) + ModelPixelScale (33550), or
//! - ModelTransformation (34264), restricted to scale + translation.
//!
//! GeoAsciiParams (34737), when present, must name a WGS datum.

pub mod geotiff;
pub mod raster;
pub mod transform;

pub use geotiff::{read_geotiff, GeoTagValues};
pub use raster::GeoRaster;
pub use transform::GeoTransform;
