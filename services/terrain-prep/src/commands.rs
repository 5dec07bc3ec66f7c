//! Pipelines behind each subcommand.
//!
//! Output files are written next to their input with a suffix appended to
//! the full file name (`dem.tif` becomes `dem.tif.hf.png`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use features::{
    parse_catalog_file, reproject_features, reproject_features_direct, CatalogSummary, FeatureHit,
    FeatureStore,
};
use georaster::GeoRaster;
use rand::rngs::StdRng;
use rand::SeedableRng;
use raster_ops::{
    amplify, load_image, quantize_shades_with, resize_to_power_of_two_square, Orientation, ShadeConfig,
};
use renderer::{heightfield_to_colormap, map_across, map_across_raster, save_png, MapperConfig};
use terrain_common::TerrainError;
use tracing::info;

use crate::config::HeightfieldConfig;

/// `src` with `suffix` appended to its file name.
pub fn derived_path(src: &Path, suffix: &str) -> PathBuf {
    let mut name = src.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Color `src` from `reference` and save `<src>.cm.png`.
///
/// Unless the result is flipped it keeps the source geo-referencing, which
/// is recorded in the PNG.
pub fn gray2color(src: &Path, reference: &Path, config: &MapperConfig, seed: Option<u64>) -> Result<PathBuf> {
    let reference = GeoRaster::open(reference).context("loading reference raster")?;
    info!(raster = %reference.describe(), "Reference");
    let source = GeoRaster::open(src).context("loading source raster")?;
    info!(raster = %source.describe(), "Source");

    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let out = derived_path(src, ".cm.png");
    if config.flip {
        let mapped = map_across(&source, &reference, config, &mut rng)?;
        save_png(&out, &mapped, Orientation::XFirst, None)?;
    } else {
        let mapped = map_across_raster(&source, &reference, config, &mut rng)?;
        save_png(&out, mapped.buffer(), Orientation::XFirst, Some(&mapped.extent()))?;
    }
    Ok(out)
}

/// Reduce the shades of a plain image and save `<src>.rs.png`.
pub fn reduce_shades(src: &Path, config: &ShadeConfig) -> Result<PathBuf> {
    config.validate().map_err(TerrainError::config)?;
    let image = load_image(src)?;
    let reduced = quantize_shades_with(&image, config)?;

    let out = derived_path(src, ".rs.png");
    save_png(&out, &reduced, Orientation::RowMajor, None)?;
    Ok(out)
}

/// Turn elevation data into a square terrain heightfield `<src>.hf.png`.
pub fn heightfield(src: &Path, config: &HeightfieldConfig) -> Result<PathBuf> {
    config.validate().map_err(TerrainError::config)?;
    let image = load_image(src)?;
    let amplified = amplify(&image, config.boost, &config.amplify_params())?;
    let resized = resize_to_power_of_two_square(&amplified, config.margin, config.filter)?;
    info!(
        side = resized.width(),
        boost = config.boost,
        filter = %config.filter,
        "Heightfield ready"
    );

    let out = derived_path(src, ".hf.png");
    save_png(&out, &resized, Orientation::RowMajor, None)?;
    Ok(out)
}

/// Classify a heightfield image into a colormap `<src>.cm.png`.
pub fn colormap(src: &Path) -> Result<PathBuf> {
    let heights = load_image(src)?;
    let colors = heightfield_to_colormap(&heights)?;

    let out = derived_path(src, ".cm.png");
    save_png(&out, &colors, Orientation::RowMajor, None)?;
    Ok(out)
}

/// Parse an airport catalog and persist the resulting store to `out`.
pub fn airports(catalog: &Path, out: &Path) -> Result<CatalogSummary> {
    let mut store = FeatureStore::new();
    let summary = parse_catalog_file(catalog, &mut store)?;
    store.save(out)?;
    Ok(summary)
}

/// Locate the stored features on a raster.
pub fn feature_hits(raster: &Path, store: &Path, direct: bool) -> Result<Vec<FeatureHit>> {
    let raster = GeoRaster::open(raster)?;
    let store = FeatureStore::load(store)?;

    let hits: Vec<FeatureHit> = if direct {
        reproject_features_direct(&raster, &store)
    } else {
        reproject_features(&raster, &store).into_iter().collect()
    };
    info!(features = store.len(), hits = hits.len(), direct, "Reprojected features");
    Ok(hits)
}

/// One-line description of a geo-referenced raster.
pub fn info(src: &Path) -> Result<String> {
    let raster = GeoRaster::open(src)?;
    Ok(raster.describe())
}
