//! Shade reduction and histogram-based amplification.

use terrain_common::{TerrainError, TerrainResult};
use tracing::debug;

use crate::blur::box_blur;
use crate::buffer::RasterBuffer;
use crate::config::{AmplifyParams, ShadeConfig};
use crate::sample::SampleType;

/// Reduce the 8-bit value range to `levels` bands, then smooth.
///
/// Samples are first brought to an 8-bit scale: UInt8 as is, UInt16 and
/// Int32 divided by 256, floats multiplied by 255. The result is UInt8.
pub fn quantize_shades(
    buffer: &RasterBuffer,
    levels: usize,
    smoothing_radius: usize,
) -> TerrainResult<RasterBuffer> {
    if levels == 0 || levels > 256 {
        return Err(TerrainError::config(format!(
            "shade levels must be 1-256, got {}",
            levels
        )));
    }
    let step = 256.0 / levels as f64;
    let scale = match buffer.sample_type() {
        SampleType::UInt8 => 1.0,
        SampleType::UInt16 | SampleType::Int32 => 1.0 / 256.0,
        SampleType::Float32 | SampleType::Float64 => 255.0,
    };
    debug!(levels, step, smoothing_radius, "Reducing shades");

    let mut banded = buffer.clone();
    banded
        .data_mut()
        .mapv_inplace(|v| ((v * scale / step).round_ties_even() * step).clamp(0.0, 255.0));
    let banded = banded.cast(SampleType::UInt8);

    Ok(box_blur(&banded, smoothing_radius, true))
}

/// [`quantize_shades`] driven by a [`ShadeConfig`].
pub fn quantize_shades_with(buffer: &RasterBuffer, config: &ShadeConfig) -> TerrainResult<RasterBuffer> {
    config.validate().map_err(TerrainError::config)?;
    quantize_shades(buffer, config.levels, config.smoothing_radius)
}

/// Normalize to `[0, 1]` and optionally boost contrast.
///
/// Without `boost` this divides by the maximum. With it, the samples are
/// histogrammed and the smallest prefix of bins holding more than
/// `threshold` of all samples picks the multiplier
/// `floor(numerator / (prefix_len))`; the normalized values are multiplied
/// and clipped to `[0, 1]`. The result is always Float64.
pub fn amplify(buffer: &RasterBuffer, boost: bool, params: &AmplifyParams) -> TerrainResult<RasterBuffer> {
    params.validate().map_err(TerrainError::config)?;

    let max = buffer.max().unwrap_or(0.0);
    let mut out = buffer.clone().cast(SampleType::Float64);
    if max == 0.0 {
        debug!(boost, "Amplify skipped, buffer maximum is zero");
        out.data_mut().fill(0.0);
        return Ok(out);
    }

    let multiplier = if boost {
        amplify_multiplier(buffer, params)
    } else {
        1.0
    };
    debug!(boost, multiplier, "Amplifying");

    out.data_mut()
        .mapv_inplace(|v| (v / max * multiplier).clamp(0.0, 1.0));
    Ok(out)
}

/// Run [`amplify`] and convert the result back to the input's sample type.
pub fn amplify_to_sample_type(
    buffer: &RasterBuffer,
    boost: bool,
    params: &AmplifyParams,
) -> TerrainResult<RasterBuffer> {
    let st = buffer.sample_type();
    let mut out = amplify(buffer, boost, params)?;
    if !st.is_float() {
        let max = st.max_value();
        out.data_mut().mapv_inplace(|v| v * max);
    }
    Ok(out.cast(st))
}

/// Multiplier chosen from the histogram of `buffer`.
pub fn amplify_multiplier(buffer: &RasterBuffer, params: &AmplifyParams) -> f64 {
    let counts = histogram(buffer, params.bins);
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 1.0;
    }

    let mut cumulative = 0usize;
    for (i, count) in counts.iter().take(params.search_bins).enumerate() {
        cumulative += count;
        if cumulative as f64 / total as f64 > params.threshold {
            return (params.numerator / (i + 1) as f64).floor();
        }
    }
    1.0
}

/// Equal-width histogram over `[min, max]`.
///
/// The maximum falls into the last bin. A constant buffer is binned over
/// `[v - 0.5, v + 0.5]`.
pub fn histogram(buffer: &RasterBuffer, bins: usize) -> Vec<usize> {
    let mut counts = vec![0usize; bins];
    let (Some(mut lo), Some(mut hi)) = (buffer.min(), buffer.max()) else {
        return counts;
    };
    if bins == 0 {
        return counts;
    }
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let span = hi - lo;
    for v in buffer.data().iter() {
        let idx = (((v - lo) / span) * bins as f64).floor() as usize;
        counts[idx.min(bins - 1)] += 1;
    }
    counts
}
