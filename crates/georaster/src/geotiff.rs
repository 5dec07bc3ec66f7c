//! GeoTIFF decoding: pixel data plus geo-referencing tags.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use ndarray::Array3;
use raster_ops::{RasterBuffer, Rank, SampleType};
use terrain_common::{TerrainError, TerrainResult};
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tiff::ColorType;
use tracing::{debug, warn};

use crate::transform::GeoTransform;

/// Raw geo-referencing tag values as found in the file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoTagValues {
    pub tie_point: Option<Vec<f64>>,
    pub pixel_scale: Option<Vec<f64>>,
    pub transformation: Option<Vec<f64>>,
    pub ascii_params: Option<String>,
}

impl GeoTagValues {
    /// Read the geo tags from an open decoder.
    pub fn read<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>) -> TerrainResult<Self> {
        Ok(Self {
            tie_point: f64_tag(decoder, Tag::ModelTiepointTag)?,
            pixel_scale: f64_tag(decoder, Tag::ModelPixelScaleTag)?,
            transformation: f64_tag(decoder, Tag::ModelTransformationTag)?,
            ascii_params: decoder
                .find_tag(Tag::GeoAsciiParamsTag)
                .map_err(tiff_error)?
                .map(|v| v.into_string())
                .transpose()
                .map_err(tiff_error)?,
        })
    }

    /// Turn the tag values into a transform.
    ///
    /// The datum marker must name WGS when present. ModelTransformation wins
    /// over the tie point / pixel scale pair when both exist.
    pub fn to_transform(&self) -> TerrainResult<GeoTransform> {
        match &self.ascii_params {
            Some(ascii) if !ascii.trim_start().to_uppercase().starts_with("WGS") => {
                return Err(TerrainError::format(format!(
                    "unsupported datum in GeoAsciiParams: {:?}",
                    ascii
                )));
            }
            Some(_) => {}
            None => warn!("GeoAsciiParams missing, assuming WGS 84"),
        }

        if let Some(t) = &self.transformation {
            return GeoTransform::from_model_transformation(t);
        }

        let tie_point = self
            .tie_point
            .as_deref()
            .ok_or_else(|| TerrainError::format("ModelTiepoint tag missing"))?;
        let pixel_scale = self
            .pixel_scale
            .as_deref()
            .ok_or_else(|| TerrainError::format("ModelPixelScale tag missing"))?;
        GeoTransform::from_tie_point(tie_point, pixel_scale)
    }
}

/// Decode a GeoTIFF into an x-first buffer and its transform.
pub fn read_geotiff(path: &Path) -> TerrainResult<(RasterBuffer, GeoTransform)> {
    let file = File::open(path).map_err(|e| TerrainError::Io(format!("{}: {}", path.display(), e)))?;
    let mut decoder = Decoder::new(BufReader::new(file)).map_err(tiff_error)?;

    let tags = GeoTagValues::read(&mut decoder)?;
    let transform = tags.to_transform()?;

    let (width, height) = decoder.dimensions().map_err(tiff_error)?;
    let color_type = decoder.colortype().map_err(tiff_error)?;
    let channels = match color_type {
        ColorType::Gray(_) => 1,
        ColorType::RGB(_) => 3,
        ColorType::Palette(8) => 1,
        other => {
            return Err(TerrainError::format(format!(
                "unsupported color type {:?}, need single channel or RGB",
                other
            )))
        }
    };
    debug!(
        path = %path.display(),
        width,
        height,
        color_type = ?color_type,
        "Decoding GeoTIFF"
    );

    let (samples, sample_type) = decode_samples(decoder.read_image().map_err(tiff_error)?)?;
    let (width, height) = (width as usize, height as usize);
    if samples.len() != width * height * channels {
        return Err(TerrainError::format(format!(
            "expected {} samples, decoded {}",
            width * height * channels,
            samples.len()
        )));
    }

    let buffer = match color_type {
        ColorType::Palette(_) => {
            let colormap = decoder.get_tag_u16_vec(Tag::ColorMap).map_err(tiff_error)?;
            expand_palette(&samples, width, height, &colormap)?
        }
        _ => {
            // Row-major file order straight into x-first indexing.
            let data = Array3::from_shape_fn((width, height, channels), |(x, y, c)| {
                samples[(y * width + x) * channels + c]
            });
            let rank = if channels == 1 { Rank::Gray } else { Rank::Multi };
            RasterBuffer::new(data, sample_type, rank)?
        }
    };

    Ok((buffer, transform))
}

/// Map palette indices through a TIFF ColorMap into an RGB8 buffer.
///
/// The ColorMap holds all reds, then all greens, then all blues, each as
/// 16-bit values.
pub fn expand_palette(indices: &[f64], width: usize, height: usize, colormap: &[u16]) -> TerrainResult<RasterBuffer> {
    if colormap.len() % 3 != 0 || colormap.is_empty() {
        return Err(TerrainError::format(format!(
            "ColorMap length {} is not a multiple of 3",
            colormap.len()
        )));
    }
    let entries = colormap.len() / 3;
    if let Some(bad) = indices.iter().find(|i| **i as usize >= entries) {
        return Err(TerrainError::format(format!(
            "palette index {} outside a {} entry ColorMap",
            bad, entries
        )));
    }

    let data = Array3::from_shape_fn((width, height, 3), |(x, y, c)| {
        let index = indices[y * width + x] as usize;
        (colormap[c * entries + index] >> 8) as f64
    });
    RasterBuffer::multi(data, SampleType::UInt8)
}

fn decode_samples(result: DecodingResult) -> TerrainResult<(Vec<f64>, SampleType)> {
    let decoded = match result {
        DecodingResult::U8(v) => (v.into_iter().map(f64::from).collect(), SampleType::UInt8),
        DecodingResult::U16(v) => (v.into_iter().map(f64::from).collect(), SampleType::UInt16),
        DecodingResult::I8(v) => (v.into_iter().map(f64::from).collect(), SampleType::Int32),
        DecodingResult::I16(v) => (v.into_iter().map(f64::from).collect(), SampleType::Int32),
        DecodingResult::I32(v) => (v.into_iter().map(f64::from).collect(), SampleType::Int32),
        DecodingResult::U32(v) => {
            if v.iter().any(|s| *s > i32::MAX as u32) {
                return Err(TerrainError::format("32-bit unsigned samples exceed the int32 range"));
            }
            (v.into_iter().map(f64::from).collect(), SampleType::Int32)
        }
        DecodingResult::F32(v) => (v.into_iter().map(f64::from).collect(), SampleType::Float32),
        DecodingResult::F64(v) => (v, SampleType::Float64),
        _ => return Err(TerrainError::format("64-bit integer samples are not supported")),
    };
    Ok(decoded)
}

fn f64_tag<R: std::io::Read + std::io::Seek>(decoder: &mut Decoder<R>, tag: Tag) -> TerrainResult<Option<Vec<f64>>> {
    decoder
        .find_tag(tag)
        .map_err(tiff_error)?
        .map(|v| v.into_f64_vec())
        .transpose()
        .map_err(tiff_error)
}

/// Convert a tiff error, keeping I/O failures distinct.
pub fn tiff_error(err: tiff::TiffError) -> TerrainError {
    match err {
        tiff::TiffError::IoError(e) => TerrainError::from(e),
        other => TerrainError::format(other.to_string()),
    }
}
