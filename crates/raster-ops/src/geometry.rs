//! Cropping and flipping.

use ndarray::{s, Axis};
use tracing::debug;

use crate::buffer::RasterBuffer;

/// Sub-buffer covering `[x0, x1) x [y0, y1)`.
///
/// Bounds behave like slicing: ends past the buffer are cut back to its
/// size and a start at or after its end gives an empty axis. Never fails.
pub fn crop(buffer: &RasterBuffer, x0: usize, y0: usize, x1: usize, y1: usize) -> RasterBuffer {
    let x1 = x1.min(buffer.width());
    let y1 = y1.min(buffer.height());
    let x0 = x0.min(x1);
    let y0 = y0.min(y1);
    debug!(x0, y0, x1, y1, "Cropping");

    let mut out = buffer.clone();
    *out.data_mut() = buffer.data().slice(s![x0..x1, y0..y1, ..]).to_owned();
    out
}

/// Reverse the buffer along y (`vertical`) or x.
pub fn flip(buffer: &RasterBuffer, vertical: bool) -> RasterBuffer {
    debug!(vertical, "Flipping");
    let axis = if vertical { Axis(1) } else { Axis(0) };
    let mut view = buffer.data().view();
    view.invert_axis(axis);

    let mut out = buffer.clone();
    *out.data_mut() = view.as_standard_layout().into_owned();
    out
}
