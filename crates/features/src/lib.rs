//! Point features (airports) and their placement on rasters.
//!
//! Features are parsed from an apt.dat style catalog into a
//! [`FeatureStore`] keyed by rounded latitude and longitude, persisted as an
//! opaque binary blob, and located on a geo-referenced raster either by
//! walking its pixels ([`reproject_features`]) or by converting each
//! feature's coordinate directly ([`reproject_features_direct`]).

pub mod catalog;
pub mod reproject;
pub mod store;

pub use catalog::{parse_catalog, parse_catalog_file, parse_catalog_str, CatalogSummary};
pub use reproject::{reproject_features, reproject_features_direct, FeatureHit, FeatureHitIter, FeatureHits};
pub use store::{feature_key, Feature, FeatureStore};
