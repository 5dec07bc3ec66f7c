//! Geographic extent of a raster.

use serde::{Deserialize, Serialize};

/// The geographic area covered by a raster, as start and end coordinates.
///
/// Start is the coordinate of pixel (0, 0); end is
/// `start + size * delta` on each axis. Deltas may be negative (latitude
/// usually is, since row 0 is the northernmost row), so start is not
/// necessarily the minimum.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoExtent {
    pub start_lon: f64,
    pub start_lat: f64,
    pub end_lon: f64,
    pub end_lat: f64,
}

impl GeoExtent {
    /// Create a new extent from start and end coordinates.
    pub fn new(start_lon: f64, start_lat: f64, end_lon: f64, end_lat: f64) -> Self {
        Self {
            start_lon,
            start_lat,
            end_lon,
            end_lat,
        }
    }

    pub fn min_lon(&self) -> f64 {
        self.start_lon.min(self.end_lon)
    }

    pub fn max_lon(&self) -> f64 {
        self.start_lon.max(self.end_lon)
    }

    pub fn min_lat(&self) -> f64 {
        self.start_lat.min(self.end_lat)
    }

    pub fn max_lat(&self) -> f64 {
        self.start_lat.max(self.end_lat)
    }

    /// Width of the extent in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon() - self.min_lon()
    }

    /// Height of the extent in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat() - self.min_lat()
    }

    /// Check if a coordinate lies inside the extent (edges inclusive).
    ///
    /// Independent of the sign of either delta.
    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        lon >= self.min_lon() && lon <= self.max_lon() && lat >= self.min_lat() && lat <= self.max_lat()
    }

    /// Check if `other` lies completely inside this extent.
    pub fn contains_extent(&self, other: &GeoExtent) -> bool {
        other.min_lon() >= self.min_lon()
            && other.max_lon() <= self.max_lon()
            && other.min_lat() >= self.min_lat()
            && other.max_lat() <= self.max_lat()
    }

    /// Check if this extent intersects another.
    pub fn intersects(&self, other: &GeoExtent) -> bool {
        self.min_lon() <= other.max_lon()
            && self.max_lon() >= other.min_lon()
            && self.min_lat() <= other.max_lat()
            && self.max_lat() >= other.min_lat()
    }

    /// Key/value pairs recorded as textual metadata in output images.
    pub fn metadata_pairs(&self) -> [(&'static str, String); 4] {
        [
            ("GeoStartLon", self.start_lon.to_string()),
            ("GeoStartLat", self.start_lat.to_string()),
            ("GeoEndLon", self.end_lon.to_string()),
            ("GeoEndLat", self.end_lat.to_string()),
        ]
    }
}

impl std::fmt::Display for GeoExtent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lon {:.5} -> {:.5}, lat {:.5} -> {:.5}",
            self.start_lon, self.end_lon, self.start_lat, self.end_lat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_with_negative_lat_delta() {
        // Row 0 is north: start_lat > end_lat
        let extent = GeoExtent::new(70.0, 20.0, 80.0, 10.0);
        assert!(extent.contains(75.0, 15.0));
        assert!(extent.contains(70.0, 20.0));
        assert!(extent.contains(80.0, 10.0));
        assert!(!extent.contains(75.0, 20.5));
        assert!(!extent.contains(69.9, 15.0));
    }

    #[test]
    fn test_contains_extent() {
        let outer = GeoExtent::new(0.0, 10.0, 10.0, 0.0);
        let inner = GeoExtent::new(2.0, 8.0, 4.0, 6.0);
        assert!(outer.contains_extent(&inner));
        assert!(!inner.contains_extent(&outer));
    }
}
