//! Synthetic raster generators.
//!
//! All generators return arrays in x-first order, shape `(width, height)`
//! (plus a channel axis for color), the layout raster buffers use after
//! orientation normalization.

use ndarray::{Array2, Array3};

/// Every sample set to `value`.
pub fn uniform_gray(width: usize, height: usize, value: f64) -> Array2<f64> {
    Array2::from_elem((width, height), value)
}

/// Diagonal ramp from 0 at `(0, 0)` to `max` at the far corner.
///
/// # Example
///
/// ```
/// use test_utils::gradient_gray;
///
/// let g = gradient_gray(3, 3, 100.0);
/// assert_eq!(g[[0, 0]], 0.0);
/// assert_eq!(g[[2, 2]], 100.0);
/// assert_eq!(g[[1, 1]], 50.0);
/// ```
pub fn gradient_gray(width: usize, height: usize, max: f64) -> Array2<f64> {
    let span = (width + height).saturating_sub(2).max(1) as f64;
    Array2::from_shape_fn((width, height), |(x, y)| max * (x + y) as f64 / span)
}

/// RGB checkerboard of `cell`-sized squares alternating `a` and `b`.
pub fn checker_rgb(width: usize, height: usize, cell: usize, a: [f64; 3], b: [f64; 3]) -> Array3<f64> {
    let cell = cell.max(1);
    Array3::from_shape_fn((width, height, 3), |(x, y, c)| {
        if ((x / cell) + (y / cell)) % 2 == 0 {
            a[c]
        } else {
            b[c]
        }
    })
}

/// Mostly flat low terrain with a single ridge of high samples.
///
/// Roughly 95% of samples are in the lowest tenth of `peak`, which makes
/// histogram-driven amplification pick its strongest multiplier.
pub fn flat_terrain_heights(width: usize, height: usize, peak: f64) -> Array2<f64> {
    let ridge = width / 2;
    Array2::from_shape_fn((width, height), |(x, y)| {
        if x == ridge && width >= 20 {
            peak
        } else {
            ((x * 7 + y * 3) % 10) as f64 * peak / 200.0
        }
    })
}
