//! Common test fixtures for terrain-prep tests.
//!
//! This module provides pre-defined data representing common scenarios in
//! terrain preparation.

/// Common raster extents as `(origin_lon, origin_lat, d_lon, d_lat)`.
pub mod extent {
    /// Quarter-degree pixels over southern India, north-up.
    pub const DECCAN_QUARTER: (f64, f64, f64, f64) = (74.0, 16.0, 0.25, -0.25);

    /// Tenth-degree pixels, south-up (positive latitude delta).
    pub const SOUTH_UP_TENTH: (f64, f64, f64, f64) = (10.0, -5.0, 0.1, 0.1);

    /// One degree pixels around the origin.
    pub const UNIT_DEGREE: (f64, f64, f64, f64) = (-2.0, 2.0, 1.0, -1.0);
}

/// An apt.dat style airport catalog.
///
/// Contains three airports, a heliport whose runways must be ignored, a
/// runway record outside any header, a header that arrives before the
/// previous group ended, an unparsable runway and an airport with no
/// terminating blank line.
pub const SAMPLE_CATALOG: &str = "\
I
1000 Version - data cycle 2021.01

1    2999 0 0 VOBL Kempegowda International
100 45.00 1 0 0.00 0 0 0 09L  13.20   77.70  0.00 0.00 1 0 0 0 27R 13.20 77.72 0.00 0.00 1 0 0 0
100 45.00 1 0 0.00 0 0 0 09R  13.19   77.69  0.00 0.00 1 0 0 0 27L 13.19 77.71 0.00 0.00 1 0 0 0

17   3000 0 0 VOHS Hyderabad Helipad
100 30.00 1 0 0.00 0 0 0 H1   17.24   78.43  0.00 0.00 1 0 0 0 H1 17.24 78.43 0.00 0.00 1 0 0 0

100 30.00 1 0 0.00 0 0 0 01   10.00   10.00  0.00 0.00 1 0 0 0 19 10.00 10.00 0.00 0.00 1 0 0 0

1     900 0 0 VOMM Chennai International
1     800 0 0 VOXX Header Before Blank
100 45.00 1 0 0.00 0 0 0 07   12.99   80.17  0.00 0.00 1 0 0 0 25 12.99 80.19 0.00 0.00 1 0 0 0

1     100 0 0 VOBR Broken Runway
100 45.00 1 0 0.00 0 0 0 07   north   east

1     600 0 0 VOMY Mysore
100 30.00 1 0 0.00 0 0 0 09   12.23   76.65  0.00 0.00 1 0 0 0 27 12.23 76.67 0.00 0.00 1 0 0 0
99
";

/// Identifiers that the sample catalog should yield.
pub const SAMPLE_CATALOG_IDS: [&str; 3] = ["VOBL", "VOMM", "VOMY"];
