//! Shared test utilities for the terrain-prep workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Synthetic raster generators
//! - A GeoTIFF fixture writer
//! - Sample feature catalog text and extents
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{gradient_gray, write_geotiff_fixture, FixturePixels, GeoTags};
//! ```

pub mod fixtures;
pub mod generators;
pub mod geotiff;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;
pub use geotiff::*;

/// Macro for approximate floating-point equality assertions.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(1.0001_f64, 1.0_f64, 0.001_f64); // passes
/// assert_approx_eq!(1.1_f32, 1.0_f32, 0.001_f32);    // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Macro for approximate equality of coordinate pairs, e.g. `(lon, lat)`.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_coords_approx_eq;
///
/// assert_coords_approx_eq!((76.5001, 12.0001), (76.5, 12.0), 0.001);
/// ```
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $epsilon:expr) => {{
        $crate::assert_approx_eq!($x1, $x2, $epsilon);
        $crate::assert_approx_eq!($y1, $y2, $epsilon);
    }};
}

/// Macro asserting that every sample of a slice-like collection is within
/// epsilon of a single value.
///
/// # Usage
///
/// ```ignore
/// use test_utils::assert_all_approx_eq;
///
/// assert_all_approx_eq!(buffer.data().iter(), 128.0, 1e-9);
/// ```
#[macro_export]
macro_rules! assert_all_approx_eq {
    ($iter:expr, $value:expr, $epsilon:expr) => {{
        for (i, v) in $iter.into_iter().enumerate() {
            let v: f64 = *v as f64;
            if (v - ($value as f64)).abs() > ($epsilon as f64) {
                panic!(
                    "assertion failed: sample {} is `{:?}`, expected `{:?}` within `{:?}`",
                    i, v, $value, $epsilon
                );
            }
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(1.0001, 1.0, 0.001);
        assert_approx_eq!(0.0, 0.0, 0.0001);
        assert_approx_eq!(-5.5, -5.500001, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(1.1, 1.0, 0.001);
    }

    #[test]
    fn test_assert_coords_approx_eq_passes() {
        assert_coords_approx_eq!((1.0001, 2.0001), (1.0, 2.0), 0.001);
    }

    #[test]
    fn test_assert_all_approx_eq() {
        let values = [3.0, 3.0000001, 2.9999999];
        assert_all_approx_eq!(values.iter(), 3.0, 1e-6);
    }

    #[test]
    #[should_panic(expected = "sample 1")]
    fn test_assert_all_approx_eq_fails() {
        let values = [3.0, 4.0];
        assert_all_approx_eq!(values.iter(), 3.0, 1e-6);
    }
}
