//! Dense raster buffers with an explicit sample type.
//!
//! A [`RasterBuffer`] always stores its samples as `Array3<f64>` indexed as
//! `(axis0, axis1, channel)`. Single-channel rasters keep a channel axis of
//! length one and are flagged [`Rank::Gray`] so they round-trip back to a
//! 2-D array.
//!
//! After orientation normalization axis 0 is x (width) and axis 1 is y
//! (height). Plain loaded images that were not normalized keep the
//! row-major layout, in which case `width()` reports the row count.

use ndarray::{Array2, Array3, ArrayD, Axis, Ix2, Ix3};
use terrain_common::{TerrainError, TerrainResult};

use crate::sample::SampleType;

/// Whether the buffer represents a 2-D or 3-D array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rank {
    Gray,
    Multi,
}

/// A raster sample array plus its sample type.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterBuffer {
    data: Array3<f64>,
    sample_type: SampleType,
    rank: Rank,
}

impl RasterBuffer {
    /// Wrap an existing 3-D array.
    ///
    /// `Rank::Gray` requires a channel axis of length one.
    pub fn new(data: Array3<f64>, sample_type: SampleType, rank: Rank) -> TerrainResult<Self> {
        if rank == Rank::Gray && data.dim().2 != 1 {
            return Err(TerrainError::shape(format!(
                "gray buffer must have one channel, got {}",
                data.dim().2
            )));
        }
        if data.dim().2 == 0 {
            return Err(TerrainError::shape("buffer has no channels"));
        }
        Ok(Self {
            data,
            sample_type,
            rank,
        })
    }

    /// Build a single-channel buffer from a 2-D array.
    pub fn gray(data: Array2<f64>, sample_type: SampleType) -> Self {
        Self {
            data: data.insert_axis(Axis(2)),
            sample_type,
            rank: Rank::Gray,
        }
    }

    /// Build a multi-channel buffer from a 3-D array.
    pub fn multi(data: Array3<f64>, sample_type: SampleType) -> TerrainResult<Self> {
        Self::new(data, sample_type, Rank::Multi)
    }

    /// Zero-filled buffer; `channels == None` gives a gray buffer.
    pub fn zeros(dim0: usize, dim1: usize, channels: Option<usize>, sample_type: SampleType) -> Self {
        match channels {
            None => Self::gray(Array2::zeros((dim0, dim1)), sample_type),
            Some(c) => Self {
                data: Array3::zeros((dim0, dim1, c.max(1))),
                sample_type,
                rank: Rank::Multi,
            },
        }
    }

    /// Convert a dynamically shaped array, rejecting anything but 2-D or 3-D.
    pub fn from_dyn(data: ArrayD<f64>, sample_type: SampleType) -> TerrainResult<Self> {
        match data.ndim() {
            2 => {
                let data = data
                    .into_dimensionality::<Ix2>()
                    .map_err(|e| TerrainError::shape(e.to_string()))?;
                Ok(Self::gray(data, sample_type))
            }
            3 => {
                let data = data
                    .into_dimensionality::<Ix3>()
                    .map_err(|e| TerrainError::shape(e.to_string()))?;
                Self::multi(data, sample_type)
            }
            n => Err(TerrainError::shape(format!(
                "expected a 2-D or 3-D raster, got rank {}",
                n
            ))),
        }
    }

    /// Convert back to a dynamically shaped array of the original rank.
    pub fn to_dyn(&self) -> ArrayD<f64> {
        match self.rank {
            Rank::Gray => self.data.index_axis(Axis(2), 0).to_owned().into_dyn(),
            Rank::Multi => self.data.clone().into_dyn(),
        }
    }

    /// Replace the samples, keeping the sample type and rank.
    ///
    /// The channel count must not change for gray buffers.
    pub fn with_data(&self, data: Array3<f64>) -> TerrainResult<Self> {
        Self::new(data, self.sample_type, self.rank)
    }

    pub fn width(&self) -> usize {
        self.data.dim().0
    }

    pub fn height(&self) -> usize {
        self.data.dim().1
    }

    pub fn channels(&self) -> usize {
        self.data.dim().2
    }

    pub fn sample_type(&self) -> SampleType {
        self.sample_type
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn is_gray(&self) -> bool {
        self.rank == Rank::Gray
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data(&self) -> &Array3<f64> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array3<f64> {
        &mut self.data
    }

    pub fn into_data(self) -> Array3<f64> {
        self.data
    }

    /// Sample at `(x, y, channel)`, `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize, channel: usize) -> Option<f64> {
        self.data.get((x, y, channel)).copied()
    }

    /// All channels of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> TerrainResult<Vec<f64>> {
        if x >= self.width() || y >= self.height() {
            return Err(self.index_error(x, y));
        }
        Ok((0..self.channels()).map(|c| self.data[[x, y, c]]).collect())
    }

    /// Overwrite the pixel at `(x, y)`; the slice length must match the channel count.
    pub fn set_pixel(&mut self, x: usize, y: usize, values: &[f64]) -> TerrainResult<()> {
        if x >= self.width() || y >= self.height() {
            return Err(self.index_error(x, y));
        }
        if values.len() != self.channels() {
            return Err(TerrainError::shape(format!(
                "pixel has {} channels, got {} values",
                self.channels(),
                values.len()
            )));
        }
        for (c, v) in values.iter().enumerate() {
            self.data[[x, y, c]] = *v;
        }
        Ok(())
    }

    fn index_error(&self, x: usize, y: usize) -> TerrainError {
        TerrainError::Index {
            x,
            y,
            width: self.width(),
            height: self.height(),
        }
    }

    /// Smallest sample, `None` for an empty buffer.
    pub fn min(&self) -> Option<f64> {
        self.data.iter().copied().reduce(f64::min)
    }

    /// Largest sample, `None` for an empty buffer.
    pub fn max(&self) -> Option<f64> {
        self.data.iter().copied().reduce(f64::max)
    }

    /// Re-tag the samples with another type, quantizing every value.
    pub fn cast(mut self, sample_type: SampleType) -> Self {
        self.data.mapv_inplace(|v| sample_type.quantize(v));
        self.sample_type = sample_type;
        self
    }

    /// Quantize every sample into the current sample type.
    pub(crate) fn requantize(&mut self) {
        let st = self.sample_type;
        self.data.mapv_inplace(|v| st.quantize(v));
    }

    /// Check every sample against the natural range of the sample type.
    pub fn validate_range(&self) -> TerrainResult<()> {
        let st = self.sample_type;
        match self.data.iter().find(|v| !st.in_range(**v)) {
            None => Ok(()),
            Some(v) => Err(TerrainError::range(format!(
                "sample {} outside the {} range [{}, {}]",
                v,
                st,
                st.min_value(),
                st.max_value()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, IxDyn};

    #[test]
    fn test_from_dyn_rank_checks() {
        let flat = ArrayD::<f64>::zeros(IxDyn(&[4]));
        assert!(matches!(
            RasterBuffer::from_dyn(flat, SampleType::UInt8),
            Err(TerrainError::Shape(_))
        ));

        let four = ArrayD::<f64>::zeros(IxDyn(&[2, 2, 2, 2]));
        assert!(RasterBuffer::from_dyn(four, SampleType::UInt8).is_err());

        let gray = ArrayD::<f64>::zeros(IxDyn(&[3, 2]));
        let buf = RasterBuffer::from_dyn(gray, SampleType::UInt8).unwrap();
        assert!(buf.is_gray());
        assert_eq!((buf.width(), buf.height(), buf.channels()), (3, 2, 1));
        assert_eq!(buf.to_dyn().shape(), &[3, 2]);
    }

    #[test]
    fn test_pixel_access() {
        let mut buf = RasterBuffer::gray(array![[1.0, 2.0], [3.0, 4.0]], SampleType::UInt8);
        assert_eq!(buf.pixel(1, 0).unwrap(), vec![3.0]);
        assert!(matches!(buf.pixel(2, 0), Err(TerrainError::Index { x: 2, .. })));
        buf.set_pixel(0, 1, &[9.0]).unwrap();
        assert_eq!(buf.get(0, 1, 0), Some(9.0));
        assert!(buf.set_pixel(0, 0, &[1.0, 2.0]).is_err());
    }

    #[test]
    fn test_min_max() {
        let buf = RasterBuffer::gray(array![[1.0, 7.0], [-3.0, 4.0]], SampleType::Int32);
        assert_eq!(buf.min(), Some(-3.0));
        assert_eq!(buf.max(), Some(7.0));
    }

    #[test]
    fn test_validate_range() {
        let ok = RasterBuffer::gray(array![[0.0, 1.0]], SampleType::Float32);
        assert!(ok.validate_range().is_ok());

        let bad = RasterBuffer::gray(array![[0.0, 1.5]], SampleType::Float64);
        assert!(matches!(bad.validate_range(), Err(TerrainError::Range(_))));

        let neg = RasterBuffer::gray(array![[-1.0]], SampleType::UInt16);
        assert!(neg.validate_range().is_err());
    }

    #[test]
    fn test_cast_quantizes() {
        let buf = RasterBuffer::gray(array![[0.5, 1.5, 300.0]], SampleType::Float64);
        let cast = buf.cast(SampleType::UInt8);
        assert_eq!(cast.data().as_slice().unwrap(), &[0.0, 2.0, 255.0]);
        assert_eq!(cast.sample_type(), SampleType::UInt8);
    }
}
