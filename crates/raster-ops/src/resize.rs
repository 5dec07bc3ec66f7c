//! Resampling a raster to a new size.

use ndarray::{Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use terrain_common::{TerrainError, TerrainResult};
use tracing::debug;

use crate::buffer::RasterBuffer;

/// Interpolation filter used when resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResizeFilter {
    Nearest,
    #[default]
    Bilinear,
    /// Catmull-Rom bicubic.
    Cubic,
}

impl ResizeFilter {
    /// Parse from string (case-insensitive), falling back to bilinear.
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "nearest" => Self::Nearest,
            "cubic" | "bicubic" => Self::Cubic,
            _ => Self::Bilinear,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nearest => "nearest",
            Self::Bilinear => "bilinear",
            Self::Cubic => "cubic",
        }
    }
}

impl std::fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resample to exactly `width x height` (channels unchanged).
pub fn resize_to(
    buffer: &RasterBuffer,
    width: usize,
    height: usize,
    filter: ResizeFilter,
) -> TerrainResult<RasterBuffer> {
    if width == 0 || height == 0 {
        return Err(TerrainError::shape(format!(
            "cannot resize to {}x{}",
            width, height
        )));
    }
    if buffer.is_empty() {
        return Err(TerrainError::shape("cannot resize an empty buffer"));
    }

    let (src_w, src_h, channels) = buffer.data().dim();
    debug!(src_w, src_h, width, height, filter = %filter, "Resizing");

    let st = buffer.sample_type();
    let mut out = Array3::<f64>::zeros((width, height, channels));

    for c in 0..channels {
        let plane = buffer.data().index_axis(Axis(2), c);
        for dx in 0..width {
            let sx = source_coord(dx, src_w, width);
            for dy in 0..height {
                let sy = source_coord(dy, src_h, height);
                let value = match filter {
                    ResizeFilter::Nearest => nearest_sample(&plane, sx, sy),
                    ResizeFilter::Bilinear => bilinear_sample(&plane, sx, sy),
                    ResizeFilter::Cubic => cubic_sample(&plane, sx, sy),
                };
                // Cubic can overshoot the input range.
                out[[dx, dy, c]] = st.quantize(value.clamp(st.min_value(), st.max_value()));
            }
        }
    }

    buffer.with_data(out)
}

/// Resize to a square of side `2^ceil(log2(max(w, h))) + margin`.
///
/// Terrain mesh builders commonly want heightfields of `2^n + 1` samples,
/// hence the margin.
pub fn resize_to_power_of_two_square(
    buffer: &RasterBuffer,
    margin: usize,
    filter: ResizeFilter,
) -> TerrainResult<RasterBuffer> {
    let side = power_of_two_side(buffer.width(), buffer.height(), margin);
    debug!(side, margin, "Resizing to power of two square");
    resize_to(buffer, side, side, filter)
}

/// Side length used by [`resize_to_power_of_two_square`].
pub fn power_of_two_side(width: usize, height: usize, margin: usize) -> usize {
    width.max(height).max(1).next_power_of_two() + margin
}

/// Pixel-centre aligned source coordinate for destination index `dst`.
fn source_coord(dst: usize, src_len: usize, dst_len: usize) -> f64 {
    let pos = (dst as f64 + 0.5) * src_len as f64 / dst_len as f64 - 0.5;
    pos.clamp(0.0, (src_len - 1) as f64)
}

fn nearest_sample(plane: &ArrayView2<f64>, x: f64, y: f64) -> f64 {
    let (w, h) = plane.dim();
    let col = (x.round() as usize).min(w - 1);
    let row = (y.round() as usize).min(h - 1);
    plane[[col, row]]
}

fn bilinear_sample(plane: &ArrayView2<f64>, x: f64, y: f64) -> f64 {
    let (w, h) = plane.dim();
    let x0 = (x.floor() as usize).min(w - 1);
    let y0 = (y.floor() as usize).min(h - 1);
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);

    let xf = x - x0 as f64;
    let yf = y - y0 as f64;

    let v00 = plane[[x0, y0]];
    let v10 = plane[[x1, y0]];
    let v01 = plane[[x0, y1]];
    let v11 = plane[[x1, y1]];

    let top = v00 * (1.0 - xf) + v10 * xf;
    let bottom = v01 * (1.0 - xf) + v11 * xf;
    top * (1.0 - yf) + bottom * yf
}

fn cubic_sample(plane: &ArrayView2<f64>, x: f64, y: f64) -> f64 {
    let (w, h) = plane.dim();
    let xi = x.floor() as isize;
    let yi = y.floor() as isize;
    let xf = x - xi as f64;
    let yf = y - yi as f64;

    let at = |i: isize, j: isize| {
        let px = i.clamp(0, w as isize - 1) as usize;
        let py = j.clamp(0, h as isize - 1) as usize;
        plane[[px, py]]
    };

    let mut column = [0.0f64; 4];
    for (k, slot) in column.iter_mut().enumerate() {
        let j = yi + k as isize - 1;
        *slot = cubic_1d(at(xi - 1, j), at(xi, j), at(xi + 1, j), at(xi + 2, j), xf);
    }
    cubic_1d(column[0], column[1], column[2], column[3], yf)
}

/// 1D cubic interpolation using Catmull-Rom spline.
fn cubic_1d(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;

    let a = -0.5 * p0 + 1.5 * p1 - 1.5 * p2 + 0.5 * p3;
    let b = p0 - 2.5 * p1 + 2.0 * p2 - 0.5 * p3;
    let c = -0.5 * p0 + 0.5 * p2;
    let d = p1;

    a * t3 + b * t2 + c * t + d
}
