//! Cross-raster color mapping.
//!
//! Every pixel of a source raster is placed geographically and colored with
//! whatever the reference raster holds at that coordinate. The result can
//! then go through the noise, blur and flip stages, in that order.

use georaster::GeoRaster;
use ndarray::Array3;
use raster_ops::{add_noise, box_blur, flip, RasterBuffer, SampleType};
use rand::Rng;
use terrain_common::{TerrainError, TerrainResult};
use tracing::{debug, info};

use crate::config::MapperConfig;

/// Threshold below which a pure-blue sample counts as washed out.
pub fn bluey_threshold(sample_type: SampleType) -> f64 {
    if sample_type.is_float() {
        0.5
    } else {
        (sample_type.max_value() / 2.0).floor()
    }
}

/// Boost the blue channel of a dim pure-blue color in place.
///
/// Only applies when red and green are both zero and blue is below the
/// threshold. Integer sample types truncate the boosted value.
pub fn boost_blue(color: &mut [f64], sample_type: SampleType) {
    if color.len() < 3 {
        return;
    }
    let threshold = bluey_threshold(sample_type);
    if color[0] == 0.0 && color[1] == 0.0 && color[2] < threshold {
        let boosted = 0.5 * threshold + 1.2 * color[2];
        color[2] = if sample_type.is_float() {
            boosted
        } else {
            boosted.trunc()
        };
    }
}

/// Color `source` from `reference` and post-process the result.
///
/// The output has the source's width and height and the reference's
/// channel count and sample type. A source pixel that falls outside the
/// reference extent aborts the whole mapping with a lookup error.
pub fn map_across<R: Rng + ?Sized>(
    source: &GeoRaster,
    reference: &GeoRaster,
    config: &MapperConfig,
    rng: &mut R,
) -> TerrainResult<RasterBuffer> {
    config.validate().map_err(TerrainError::config)?;

    let sample_type = reference.sample_type();
    let channels = reference.channels();
    let bluey = config.more_bluey && channels >= 3;
    info!(
        width = source.width(),
        height = source.height(),
        channels,
        sample_type = %sample_type,
        bluey,
        "Mapping source raster across reference"
    );
    if bluey {
        debug!(threshold = bluey_threshold(sample_type), "Blue threshold");
    }

    let mut data = Array3::<f64>::zeros((source.width(), source.height(), channels));
    for x in 0..source.width() {
        for y in 0..source.height() {
            let (lon, lat) = source.to_geo(x, y);
            let mut color = reference.pixel_at_geo(lon, lat)?;
            if bluey {
                boost_blue(&mut color, sample_type);
            }
            for (c, v) in color.into_iter().enumerate() {
                data[[x, y, c]] = v;
            }
        }
    }

    let mut mapped = RasterBuffer::new(data, sample_type, reference.buffer().rank())?;

    if config.add_noise {
        mapped = add_noise(&mapped, config.noise_ratio, rng)?;
    }
    if config.blur {
        mapped = box_blur(&mapped, config.blur_radius, config.blur_edges);
    }
    if config.flip {
        mapped = flip(&mapped, config.flip_vertical);
    }

    Ok(mapped)
}

/// [`map_across`], keeping the source's geo-referencing on the result.
///
/// Flipping breaks the pixel to coordinate alignment, so a config with
/// `flip` set is rejected.
pub fn map_across_raster<R: Rng + ?Sized>(
    source: &GeoRaster,
    reference: &GeoRaster,
    config: &MapperConfig,
    rng: &mut R,
) -> TerrainResult<GeoRaster> {
    if config.flip {
        return Err(TerrainError::config(
            "a flipped mapping cannot keep the source geo transform",
        ));
    }
    let buffer = map_across(source, reference, config, rng)?;
    Ok(GeoRaster::from_parts(buffer, source.transform().clone()))
}
