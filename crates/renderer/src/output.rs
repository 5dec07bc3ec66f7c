//! 8-bit image output.
//!
//! Buffers of any sample type are scaled to 8 bits before encoding. Floating
//! point and signed buffers must already lie in their non-negative range;
//! nothing is clipped silently.

use std::path::Path;

use raster_ops::{Orientation, RasterBuffer, SampleType};
use terrain_common::{GeoExtent, TerrainError, TerrainResult};
use tracing::{debug, info};

use crate::png::{create_png, PngColor};

/// Convert a buffer to 8-bit samples.
///
/// Scaled values are truncated toward zero. Only 1- and 3-channel buffers
/// can be written.
pub fn to_u8_image(buffer: &RasterBuffer) -> TerrainResult<RasterBuffer> {
    let channels = buffer.channels();
    if channels != 1 && channels != 3 {
        return Err(TerrainError::shape(format!(
            "cannot write a {}-channel image, expected 1 or 3",
            channels
        )));
    }

    buffer.validate_range()?;

    let st = buffer.sample_type();
    debug!(
        dim0 = buffer.width(),
        dim1 = buffer.height(),
        channels,
        sample_type = %st,
        min = buffer.min().unwrap_or(0.0),
        max = buffer.max().unwrap_or(0.0),
        "Converting to 8 bits"
    );

    let divisor = match st {
        SampleType::UInt8 => None,
        SampleType::UInt16 => Some(65535.0),
        SampleType::Int32 => {
            if buffer.min().is_some_and(|m| m < 0.0) {
                return Err(TerrainError::range(
                    "negative Int32 samples cannot be written as an 8-bit image",
                ));
            }
            Some(i32::MAX as f64)
        }
        SampleType::Float32 | SampleType::Float64 => Some(1.0),
    };

    let data = match divisor {
        None => buffer.data().clone(),
        Some(d) => buffer.data().mapv(|v| (v / d * 255.0).trunc().clamp(0.0, 255.0)),
    };
    let out = buffer.with_data(data)?.cast(SampleType::UInt8);

    debug!(
        min = out.min().unwrap_or(0.0),
        max = out.max().unwrap_or(0.0),
        "Converted to 8 bits"
    );
    Ok(out)
}

/// Encode a buffer as PNG bytes.
///
/// An [`Orientation::XFirst`] buffer is transposed back to row-major order
/// so the image looks the same as the raster it came from. `extent`, when
/// given, is recorded as `tEXt` chunks.
pub fn encode_png(
    buffer: &RasterBuffer,
    orientation: Orientation,
    extent: Option<&GeoExtent>,
) -> TerrainResult<Vec<u8>> {
    let image = to_u8_image(buffer)?;
    let data = image.data();
    let (dim0, dim1, channels) = data.dim();

    let (width, height) = match orientation {
        Orientation::XFirst => (dim0, dim1),
        Orientation::RowMajor => (dim1, dim0),
    };

    let mut pixels = Vec::with_capacity(width * height * channels);
    for row in 0..height {
        for col in 0..width {
            for c in 0..channels {
                let v = match orientation {
                    Orientation::XFirst => data[[col, row, c]],
                    Orientation::RowMajor => data[[row, col, c]],
                };
                pixels.push(v as u8);
            }
        }
    }

    let color = if channels == 1 {
        PngColor::Gray
    } else {
        PngColor::Rgb
    };
    let text: Vec<(&str, String)> = extent
        .map(|e| e.metadata_pairs().to_vec())
        .unwrap_or_default();

    create_png(&pixels, width, height, color, &text).map_err(TerrainError::Image)
}

/// Write a buffer to `path` as an 8-bit PNG.
pub fn save_png(
    path: impl AsRef<Path>,
    buffer: &RasterBuffer,
    orientation: Orientation,
    extent: Option<&GeoExtent>,
) -> TerrainResult<()> {
    let path = path.as_ref();
    let png = encode_png(buffer, orientation, extent)?;
    std::fs::write(path, &png)?;
    info!(
        path = %path.display(),
        bytes = png.len(),
        georeferenced = extent.is_some(),
        "Saved image"
    );
    Ok(())
}
