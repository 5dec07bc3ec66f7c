//! Placing stored features on a geo-referenced raster.
//!
//! [`reproject_features`] walks every pixel and asks the store whether a
//! feature sits at that pixel's rounded coordinate. Rounding to two
//! decimals means a feature can match no pixel (raster finer than the
//! rounding step misses nothing but a coarser one may) or several pixels;
//! that is a property of the lookup, not an error.
//!
//! [`reproject_features_direct`] goes the other way and converts each
//! feature's coordinate through the inverse transform, which places every
//! feature inside the extent exactly once.

use georaster::GeoRaster;
use tracing::debug;

use crate::store::FeatureStore;

/// A feature located at pixel `(x, y)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureHit {
    pub x: usize,
    pub y: usize,
    pub id: String,
}

/// Lazy sequence of the feature hits of a raster.
///
/// Nothing is computed until iterated, and every call to
/// [`FeatureHits::iter`] starts a fresh pass over the pixels.
#[derive(Debug, Clone, Copy)]
pub struct FeatureHits<'a> {
    raster: &'a GeoRaster,
    store: &'a FeatureStore,
}

impl<'a> FeatureHits<'a> {
    pub fn iter(&self) -> FeatureHitIter<'a> {
        FeatureHitIter {
            raster: self.raster,
            store: self.store,
            x: 0,
            y: 0,
        }
    }
}

impl<'a> IntoIterator for FeatureHits<'a> {
    type Item = FeatureHit;
    type IntoIter = FeatureHitIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &FeatureHits<'a> {
    type Item = FeatureHit;
    type IntoIter = FeatureHitIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One pass over the pixels in x-major order.
#[derive(Debug, Clone)]
pub struct FeatureHitIter<'a> {
    raster: &'a GeoRaster,
    store: &'a FeatureStore,
    x: usize,
    y: usize,
}

impl Iterator for FeatureHitIter<'_> {
    type Item = FeatureHit;

    fn next(&mut self) -> Option<Self::Item> {
        let (width, height) = (self.raster.width(), self.raster.height());
        if height == 0 {
            return None;
        }
        while self.x < width {
            let (x, y) = (self.x, self.y);
            self.y += 1;
            if self.y == height {
                self.y = 0;
                self.x += 1;
            }

            let (lon, lat) = self.raster.to_geo(x, y);
            if let Some(feature) = self.store.get(lat, lon) {
                debug!(x, y, id = %feature.id, lon, lat, "Feature hit");
                return Some(FeatureHit {
                    x,
                    y,
                    id: feature.id.clone(),
                });
            }
        }
        None
    }
}

/// Features found by looking up every pixel's rounded coordinate.
pub fn reproject_features<'a>(raster: &'a GeoRaster, store: &'a FeatureStore) -> FeatureHits<'a> {
    FeatureHits { raster, store }
}

/// Features inside the raster extent converted straight to pixels, sorted
/// by `(x, y, id)`.
pub fn reproject_features_direct(raster: &GeoRaster, store: &FeatureStore) -> Vec<FeatureHit> {
    let extent = raster.extent();
    let (max_x, max_y) = (raster.width().saturating_sub(1), raster.height().saturating_sub(1));

    let mut hits: Vec<FeatureHit> = store
        .iter()
        .filter(|f| raster.width() > 0 && raster.height() > 0 && extent.contains(f.lon, f.lat))
        .map(|f| {
            let (fx, fy) = raster.fractional_pixel(f.lon, f.lat);
            FeatureHit {
                x: (fx.round_ties_even().max(0.0) as usize).min(max_x),
                y: (fy.round_ties_even().max(0.0) as usize).min(max_y),
                id: f.id.clone(),
            }
        })
        .collect();
    hits.sort();
    debug!(features = store.len(), hits = hits.len(), "Direct reprojection");
    hits
}
