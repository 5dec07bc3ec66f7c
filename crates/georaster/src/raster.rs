//! Rasters with an attached geographic transform.

use std::path::Path;

use raster_ops::{RasterBuffer, SampleType};
use terrain_common::{GeoExtent, TerrainError, TerrainResult};
use tracing::debug;

use crate::geotiff::read_geotiff;
use crate::transform::GeoTransform;

/// A pixel buffer in x-first order plus its pixel <-> geographic transform.
///
/// Pixel `(0, 0)` sits at the transform origin. The raster covers
/// `origin + [0, width] * d_lon` by `origin + [0, height] * d_lat`.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRaster {
    buffer: RasterBuffer,
    transform: GeoTransform,
}

impl GeoRaster {
    /// Load a GeoTIFF, decoding its pixels and geo-referencing tags.
    pub fn open(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let path = path.as_ref();
        let (buffer, transform) = read_geotiff(path)?;
        let raster = Self::from_parts(buffer, transform);
        debug!(
            path = %path.display(),
            width = raster.width(),
            height = raster.height(),
            channels = raster.channels(),
            extent = %raster.extent(),
            "Loaded GeoRaster"
        );
        Ok(raster)
    }

    /// Pair an x-first buffer with a transform.
    pub fn from_parts(buffer: RasterBuffer, transform: GeoTransform) -> Self {
        Self { buffer, transform }
    }

    pub fn width(&self) -> usize {
        self.buffer.width()
    }

    pub fn height(&self) -> usize {
        self.buffer.height()
    }

    pub fn channels(&self) -> usize {
        self.buffer.channels()
    }

    pub fn sample_type(&self) -> SampleType {
        self.buffer.sample_type()
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn buffer(&self) -> &RasterBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut RasterBuffer {
        &mut self.buffer
    }

    pub fn into_buffer(self) -> RasterBuffer {
        self.buffer
    }

    /// Geographic area covered by the raster.
    pub fn extent(&self) -> GeoExtent {
        self.transform.extent(self.width(), self.height())
    }

    /// All channels of the pixel at `(x, y)`.
    pub fn pixel_at(&self, x: usize, y: usize) -> TerrainResult<Vec<f64>> {
        self.buffer.pixel(x, y)
    }

    /// Geographic `(lon, lat)` of pixel `(x, y)`.
    pub fn to_geo(&self, x: usize, y: usize) -> (f64, f64) {
        self.transform.to_geo(x as f64, y as f64)
    }

    /// Nearest pixel to `(lon, lat)`, or `None` outside the extent.
    ///
    /// Containment uses the closed interval between origin and end on each
    /// axis whatever the delta signs. The far edge belongs to the last
    /// pixel, hence the clamp after rounding.
    pub fn to_pixel(&self, lon: f64, lat: f64) -> Option<(usize, usize)> {
        if self.width() == 0 || self.height() == 0 || !self.extent().contains(lon, lat) {
            return None;
        }
        let fx = (lon - self.transform.origin_lon()) / self.transform.d_lon();
        let fy = (lat - self.transform.origin_lat()) / self.transform.d_lat();
        let x = fx.round_ties_even().clamp(0.0, (self.width() - 1) as f64) as usize;
        let y = fy.round_ties_even().clamp(0.0, (self.height() - 1) as f64) as usize;
        Some((x, y))
    }

    /// Fractional pixel coordinate of `(lon, lat)` through the inverse
    /// matrix, with no bounds check.
    pub fn fractional_pixel(&self, lon: f64, lat: f64) -> (f64, f64) {
        self.transform.fractional_pixel(lon, lat)
    }

    /// Pixel at a geographic coordinate; a lookup error outside the extent.
    pub fn pixel_at_geo(&self, lon: f64, lat: f64) -> TerrainResult<Vec<f64>> {
        let (x, y) = self.to_pixel(lon, lat).ok_or(TerrainError::Lookup { lon, lat })?;
        self.pixel_at(x, y)
    }

    /// One-line summary of the raster, also logged at debug level.
    pub fn describe(&self) -> String {
        let t = &self.transform;
        let summary = format!(
            "{}x{}x{} {} origin ({}, {}) delta ({}, {}) extent [{}]",
            self.width(),
            self.height(),
            self.channels(),
            self.sample_type(),
            t.origin_lon(),
            t.origin_lat(),
            t.d_lon(),
            t.d_lat(),
            self.extent()
        );
        debug!(
            min = self.buffer.min(),
            max = self.buffer.max(),
            "GeoRaster {}",
            summary
        );
        summary
    }
}
