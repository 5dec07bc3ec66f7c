//! Feature store keyed by rounded coordinates.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use terrain_common::{TerrainError, TerrainResult};
use tracing::info;

/// A named point feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub lat: f64,
    pub lon: f64,
    /// Short identifier, e.g. an ICAO code.
    pub id: String,
    /// Free-form name, possibly empty.
    pub name: String,
}

impl Feature {
    pub fn new(lat: f64, lon: f64, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Store key for a coordinate: both values to two decimals, width six.
///
/// Features closer than the rounding step share a key; the later insert
/// wins.
pub fn feature_key(lat: f64, lon: f64) -> String {
    format!("{:6.2}-{:6.2}", lat, lon)
}

/// Features indexed by [`feature_key`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureStore {
    features: BTreeMap<String, Feature>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a feature, returning the one it replaced at the same key.
    pub fn insert(&mut self, feature: Feature) -> Option<Feature> {
        self.features.insert(feature_key(feature.lat, feature.lon), feature)
    }

    /// Feature whose rounded coordinate matches `(lat, lon)`.
    pub fn get(&self, lat: f64, lon: f64) -> Option<&Feature> {
        self.features.get(&feature_key(lat, lon))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Feature> {
        self.features.values()
    }

    /// Write the store to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> TerrainResult<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| persistence_error(path, e))?;
        bincode::serialize_into(BufWriter::new(file), self).map_err(|e| persistence_error(path, e))?;
        info!(path = %path.display(), features = self.len(), "Saved feature store");
        Ok(())
    }

    /// Read a store previously written by [`FeatureStore::save`].
    pub fn load(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| persistence_error(path, e))?;
        let store: Self =
            bincode::deserialize_from(BufReader::new(file)).map_err(|e| persistence_error(path, e))?;
        info!(path = %path.display(), features = store.len(), "Loaded feature store");
        Ok(store)
    }
}

fn persistence_error(path: &Path, err: impl std::fmt::Display) -> TerrainError {
    TerrainError::Persistence(format!("{}: {}", path.display(), err))
}
