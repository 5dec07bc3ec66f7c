//! Axis-aligned affine transform between pixel and geographic coordinates.
//!
//! The transform is kept as a 4x4 homogeneous matrix so it lines up with
//! the GeoTIFF ModelTransformation layout:
//!
//! ```text
//! | d_lon  0      0  origin_lon |   | x |   | lon |
//! | 0      d_lat  0  origin_lat | * | y | = | lat |
//! | 0      0      0  0          |   | 0 |   | 0   |
//! | 0      0      0  1          |   | 1 |   | 1   |
//! ```
//!
//! The third diagonal entry is set to 1 in the stored matrix so that it
//! can be inverted; it never affects the result since z is always 0.

use nalgebra::{Matrix4, Vector4};
use terrain_common::{GeoExtent, TerrainError, TerrainResult};

/// ModelTransformation indices that must be zero for scale + translation.
pub const ZERO_INDICES: [usize; 11] = [1, 2, 4, 6, 8, 9, 10, 11, 12, 13, 14];

/// Pixel <-> geographic transform with its precomputed inverse.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoTransform {
    origin_lon: f64,
    origin_lat: f64,
    d_lon: f64,
    d_lat: f64,
    forward: Matrix4<f64>,
    inverse: Matrix4<f64>,
}

impl GeoTransform {
    /// Build a transform from an origin (the coordinate of pixel (0, 0)) and
    /// signed per-pixel deltas.
    pub fn new(origin_lon: f64, origin_lat: f64, d_lon: f64, d_lat: f64) -> TerrainResult<Self> {
        let values = [origin_lon, origin_lat, d_lon, d_lat];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(TerrainError::format(format!(
                "non-finite geo transform values {:?}",
                values
            )));
        }

        #[rustfmt::skip]
        let forward = Matrix4::new(
            d_lon, 0.0,   0.0, origin_lon,
            0.0,   d_lat, 0.0, origin_lat,
            0.0,   0.0,   1.0, 0.0,
            0.0,   0.0,   0.0, 1.0,
        );
        let inverse = forward.try_inverse().ok_or_else(|| {
            TerrainError::format(format!(
                "geo transform is not invertible (d_lon={}, d_lat={})",
                d_lon, d_lat
            ))
        })?;

        Ok(Self {
            origin_lon,
            origin_lat,
            d_lon,
            d_lat,
            forward,
            inverse,
        })
    }

    /// Build from a 16-value GeoTIFF ModelTransformation.
    ///
    /// Only scale + translation is accepted; any rotation, shear or
    /// non-affine term is a format error.
    pub fn from_model_transformation(values: &[f64]) -> TerrainResult<Self> {
        if values.len() != 16 {
            return Err(TerrainError::format(format!(
                "ModelTransformation must have 16 values, got {}",
                values.len()
            )));
        }
        if let Some(i) = ZERO_INDICES.iter().copied().find(|&i| values[i] != 0.0) {
            return Err(TerrainError::format(format!(
                "ModelTransformation[{}] = {} (only axis aligned scale and translation is supported)",
                i, values[i]
            )));
        }
        if values[15] != 1.0 {
            return Err(TerrainError::format(format!(
                "ModelTransformation[15] must be 1, got {}",
                values[15]
            )));
        }
        Self::new(values[3], values[7], values[0], values[5])
    }

    /// Build from a ModelTiepoint and ModelPixelScale pair.
    ///
    /// The tie point must anchor raster point (0, 0, 0). The latitude scale
    /// is a magnitude and becomes a negative delta (row 0 is north).
    pub fn from_tie_point(tie_point: &[f64], pixel_scale: &[f64]) -> TerrainResult<Self> {
        if tie_point.len() < 6 {
            return Err(TerrainError::format(format!(
                "ModelTiepoint needs 6 values, got {}",
                tie_point.len()
            )));
        }
        if tie_point[..3] != [0.0, 0.0, 0.0] {
            return Err(TerrainError::format(format!(
                "ModelTiepoint must anchor raster point (0, 0, 0), got {:?}",
                &tie_point[..3]
            )));
        }
        if pixel_scale.len() < 2 {
            return Err(TerrainError::format(format!(
                "ModelPixelScale needs at least 2 values, got {}",
                pixel_scale.len()
            )));
        }
        Self::new(tie_point[3], tie_point[4], pixel_scale[0], -pixel_scale[1])
    }

    pub fn origin_lon(&self) -> f64 {
        self.origin_lon
    }

    pub fn origin_lat(&self) -> f64 {
        self.origin_lat
    }

    pub fn d_lon(&self) -> f64 {
        self.d_lon
    }

    pub fn d_lat(&self) -> f64 {
        self.d_lat
    }

    pub fn forward(&self) -> &Matrix4<f64> {
        &self.forward
    }

    pub fn inverse(&self) -> &Matrix4<f64> {
        &self.inverse
    }

    /// Geographic `(lon, lat)` of pixel coordinate `(x, y)`.
    pub fn to_geo(&self, x: f64, y: f64) -> (f64, f64) {
        let geo = self.forward * Vector4::new(x, y, 0.0, 1.0);
        (geo[0], geo[1])
    }

    /// Fractional pixel coordinate of `(lon, lat)`, without bounds checks.
    pub fn fractional_pixel(&self, lon: f64, lat: f64) -> (f64, f64) {
        let px = self.inverse * Vector4::new(lon, lat, 0.0, 1.0);
        (px[0], px[1])
    }

    /// Extent covered by a `width x height` raster using this transform.
    pub fn extent(&self, width: usize, height: usize) -> GeoExtent {
        GeoExtent::new(
            self.origin_lon,
            self.origin_lat,
            self.origin_lon + width as f64 * self.d_lon,
            self.origin_lat + height as f64 * self.d_lat,
        )
    }
}
