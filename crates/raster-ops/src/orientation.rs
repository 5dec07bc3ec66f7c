//! Conversion between row-major image storage and x-first raster indexing.

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};
use terrain_common::TerrainResult;
use tracing::debug;

use crate::buffer::RasterBuffer;

/// Axis order of a buffer's first two dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// `(row, column)` as stored in image files.
    RowMajor,
    /// `(x, y)` as used for geo-referenced rasters.
    #[default]
    XFirst,
}

/// Swap the first two axes of a buffer, keeping the channel axis in place.
///
/// Applying it twice yields the original buffer, so the same call converts
/// a freshly decoded image to x-first indexing and back again before saving.
pub fn normalize_orientation(buffer: &RasterBuffer) -> RasterBuffer {
    debug!(
        dim0 = buffer.width(),
        dim1 = buffer.height(),
        channels = buffer.channels(),
        "Normalizing orientation"
    );
    let swapped = buffer
        .data()
        .view()
        .permuted_axes([1, 0, 2])
        .as_standard_layout()
        .into_owned();
    // Channel count is unchanged so the rank invariant still holds.
    let mut out = buffer.clone();
    *out.data_mut() = swapped;
    out
}

/// Same as [`normalize_orientation`] for a dynamically shaped array.
///
/// Anything but a 2-D or 3-D array is a shape error.
pub fn normalize_orientation_dyn(
    data: ArrayD<f64>,
    sample_type: crate::SampleType,
) -> TerrainResult<ArrayD<f64>> {
    let buffer = RasterBuffer::from_dyn(data, sample_type)?;
    Ok(normalize_orientation(&buffer).to_dyn())
}
