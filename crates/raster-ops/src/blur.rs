//! Windowed box blur with selectable edge handling.
//!
//! Every sample is averaged over the `(2r+1)^2` window centred on it. Cells
//! closer than `r` to a border (the edge bands) cannot use that window, so
//! they get one of two treatments:
//!
//! * `blur_edges = true`: the cell is averaged together with a `2r x 2r`
//!   window that is pushed inward by `r` along each axis on which the cell
//!   sits in a band. The cell itself carries weight `2(r+1)` and the total
//!   weight is the denominator, so a flat buffer stays flat.
//! * `blur_edges = false`: edge cells are left as they are.
//!
//! Samples are normalized by the buffer's own maximum while blurring and
//! scaled back afterwards.

use ndarray::{Array2, Array3, ArrayView2, Axis};
use tracing::debug;

use crate::buffer::RasterBuffer;

/// Largest radius the blur configurations accept.
pub const MAX_BLUR_RADIUS: usize = 1024;

/// Blur `buffer` with the given window radius.
///
/// Radius 0 and all-zero buffers are returned unchanged.
pub fn box_blur(buffer: &RasterBuffer, radius: usize, blur_edges: bool) -> RasterBuffer {
    if radius == 0 || buffer.is_empty() {
        return buffer.clone();
    }
    let max = match buffer.max() {
        Some(m) if m != 0.0 => m,
        _ => return buffer.clone(),
    };
    debug!(radius, blur_edges, max, "Box blur");

    let st = buffer.sample_type();
    let (w, h, channels) = buffer.data().dim();
    let mut out = Array3::<f64>::zeros((w, h, channels));

    for c in 0..channels {
        let plane = buffer.data().index_axis(Axis(2), c).mapv(|v| v / max);
        let blurred = blur_plane(&plane.view(), radius, blur_edges);
        out.index_axis_mut(Axis(2), c)
            .assign(&blurred.mapv(|v| st.quantize(v * max)));
    }

    let mut result = buffer.clone();
    *result.data_mut() = out;
    result
}

fn blur_plane(plane: &ArrayView2<f64>, r: usize, blur_edges: bool) -> Array2<f64> {
    let (w, h) = plane.dim();
    let sat = summed_area(plane);
    let side = 2.0 * r as f64 + 1.0;
    let full = side * side;

    Array2::from_shape_fn((w, h), |(x, y)| {
        let interior = x >= r && x + r < w && y >= r && y + r < h;
        if interior {
            window_sum(&sat, x - r, y - r, x + r + 1, y + r + 1) / full
        } else if blur_edges {
            edge_mean(plane, x, y, r)
        } else {
            plane[[x, y]]
        }
    })
}

/// Weighted mean for a cell in an edge band.
fn edge_mean(plane: &ArrayView2<f64>, x: usize, y: usize, r: usize) -> f64 {
    let (w, h) = plane.dim();
    let ri = r as isize;
    let shift_x = band_shift(x, w, r);
    let shift_y = band_shift(y, h, r);
    let self_weight = 2.0 * (r as f64 + 1.0);

    let mut sum = self_weight * plane[[x, y]];
    for i in -ri..ri {
        let px = clamp_index(x as isize + shift_x + i, w);
        for j in -ri..ri {
            let py = clamp_index(y as isize + shift_y + j, h);
            sum += plane[[px, py]];
        }
    }
    sum / (self_weight + 4.0 * (r as f64) * (r as f64))
}

/// Inward shift for position `p` on an axis of length `len`.
fn band_shift(p: usize, len: usize, r: usize) -> isize {
    if p < r {
        r as isize
    } else if p + r >= len {
        -(r as isize)
    } else {
        0
    }
}

fn clamp_index(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Summed-area table with a zero first row and column.
fn summed_area(plane: &ArrayView2<f64>) -> Array2<f64> {
    let (w, h) = plane.dim();
    let mut sat = Array2::<f64>::zeros((w + 1, h + 1));
    for x in 0..w {
        for y in 0..h {
            sat[[x + 1, y + 1]] = plane[[x, y]] + sat[[x, y + 1]] + sat[[x + 1, y]] - sat[[x, y]];
        }
    }
    sat
}

/// Sum over `[x0, x1) x [y0, y1)`.
fn window_sum(sat: &Array2<f64>, x0: usize, y0: usize, x1: usize, y1: usize) -> f64 {
    sat[[x1, y1]] - sat[[x0, y1]] - sat[[x1, y0]] + sat[[x0, y0]]
}
