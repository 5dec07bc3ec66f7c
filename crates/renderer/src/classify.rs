//! Height to color classification.
//!
//! Normalized elevation `v` in [0, 1] maps to an RGB triple in [0, 1]:
//!
//! | range            | color                                            |
//! |------------------|--------------------------------------------------|
//! | `v <= 0`         | pure blue                                        |
//! | `0 < v < 0.2`    | green `0.2 + 0.8 * v / 0.2`                      |
//! | `0.2 <= v < 0.4` | `(0.5, 0.25, 0) * (0.2 + 0.8 * (v - 0.2) / 0.2)` |
//! | `v >= 0.4`       | gray `0.2 + 0.8 * (v - 0.4) / 0.6`               |

use ndarray::Array3;
use raster_ops::{RasterBuffer, SampleType};
use terrain_common::{TerrainError, TerrainResult};
use tracing::debug;

const LOWLAND: f64 = 0.20;
const HILLS: f64 = 0.40;

/// Classify one normalized elevation sample.
pub fn classify(v: f64) -> [f64; 3] {
    if v <= 0.0 {
        [0.0, 0.0, 1.0]
    } else if v < LOWLAND {
        [0.0, 0.2 + 0.8 * (v / LOWLAND), 0.0]
    } else if v < HILLS {
        let shade = 0.2 + 0.8 * ((v - LOWLAND) / (HILLS - LOWLAND));
        [0.5 * shade, 0.25 * shade, 0.0]
    } else {
        let gray = 0.2 + 0.8 * ((v - HILLS) / (1.0 - HILLS));
        [gray, gray, gray]
    }
}

/// Build a colormap aligned pixel for pixel with a heightfield.
///
/// Samples are normalized by the sample type's maximum first. The result
/// is a three channel Float64 buffer in [0, 1].
pub fn heightfield_to_colormap(heights: &RasterBuffer) -> TerrainResult<RasterBuffer> {
    if heights.channels() != 1 {
        return Err(TerrainError::shape(format!(
            "heightfield must have one channel, got {}",
            heights.channels()
        )));
    }
    let max = heights.sample_type().max_value();
    debug!(
        width = heights.width(),
        height = heights.height(),
        sample_type = %heights.sample_type(),
        "Heightfield to colormap"
    );

    let data = heights.data();
    let colors = Array3::from_shape_fn((heights.width(), heights.height(), 3), |(x, y, c)| {
        classify(data[[x, y, 0]] / max)[c]
    });
    RasterBuffer::multi(colors, SampleType::Float64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rgb(actual: [f64; 3], expected: [f64; 3]) {
        for c in 0..3 {
            assert!(
                (actual[c] - expected[c]).abs() < 1e-12,
                "channel {}: {:?} vs {:?}",
                c,
                actual,
                expected
            );
        }
    }

    #[test]
    fn test_boundaries() {
        assert_rgb(classify(0.0), [0.0, 0.0, 1.0]);
        assert_rgb(classify(-0.5), [0.0, 0.0, 1.0]);
        assert_rgb(classify(0.10), [0.0, 0.6, 0.0]);
        assert_rgb(classify(0.30), [0.3, 0.15, 0.0]);
        assert_rgb(classify(1.0), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_breakpoints_belong_to_upper_band() {
        assert_rgb(classify(0.20), [0.1, 0.05, 0.0]);
        assert_rgb(classify(0.40), [0.2, 0.2, 0.2]);
    }

    #[test]
    fn test_deterministic() {
        for i in 0..=100 {
            let v = i as f64 / 100.0;
            assert_eq!(classify(v), classify(v));
        }
    }
}
