//! Configuration for cross-raster color mapping.

use raster_ops::MAX_BLUR_RADIUS;
use serde::{Deserialize, Serialize};
use terrain_common::{OptionMap, TerrainError, TerrainResult};

/// Post-processing switches and parameters for `map_across`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Boost dim pure-blue reference colors (washed out water).
    pub more_bluey: bool,

    /// Apply multiplicative noise to the mapped raster.
    pub add_noise: bool,

    /// Noise ratio in [0, 1].
    pub noise_ratio: f64,

    /// Box blur the mapped raster.
    pub blur: bool,

    /// Box blur radius.
    pub blur_radius: usize,

    /// Blur the edge bands too.
    pub blur_edges: bool,

    /// Flip the mapped raster.
    pub flip: bool,

    /// Flip along y rather than x.
    pub flip_vertical: bool,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            more_bluey: true,
            add_noise: true,
            noise_ratio: 0.1,
            blur: true,
            blur_radius: 8,
            blur_edges: true,
            flip: true,
            flip_vertical: true,
        }
    }
}

impl MapperConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(val) = env_bool("MAPPER_MORE_BLUEY") {
            config.more_bluey = val;
        }

        if let Some(val) = env_bool("MAPPER_ADD_NOISE") {
            config.add_noise = val;
        }

        if let Ok(val) = std::env::var("MAPPER_NOISE_RATIO") {
            if let Ok(ratio) = val.parse() {
                config.noise_ratio = ratio;
            }
        }

        if let Some(val) = env_bool("MAPPER_BLUR") {
            config.blur = val;
        }

        if let Ok(val) = std::env::var("MAPPER_BLUR_RADIUS") {
            if let Ok(radius) = val.parse() {
                config.blur_radius = radius;
            }
        }

        if let Some(val) = env_bool("MAPPER_BLUR_EDGES") {
            config.blur_edges = val;
        }

        if let Some(val) = env_bool("MAPPER_FLIP") {
            config.flip = val;
        }

        if let Some(val) = env_bool("MAPPER_FLIP_VERTICAL") {
            config.flip_vertical = val;
        }

        config
    }

    /// Override fields from a parsed `--b/--i/--f` option map.
    ///
    /// Recognized keys: `bMoreBluey`, `bAddNoise`, `fNoiseRatio`, `bBlur`,
    /// `iBlurSize`, `bBlurEdges`, `bFlip`, `bFlipVert`. Other keys are left
    /// for the caller.
    pub fn apply_options(&mut self, options: &OptionMap) -> TerrainResult<()> {
        if let Some(v) = options.get_bool("bMoreBluey")? {
            self.more_bluey = v;
        }
        if let Some(v) = options.get_bool("bAddNoise")? {
            self.add_noise = v;
        }
        if let Some(v) = options.get_float("fNoiseRatio")? {
            self.noise_ratio = v;
        }
        if let Some(v) = options.get_bool("bBlur")? {
            self.blur = v;
        }
        if let Some(v) = options.get_int("iBlurSize")? {
            self.blur_radius = usize::try_from(v)
                .map_err(|_| TerrainError::config(format!("iBlurSize must be >= 0, got {}", v)))?;
        }
        if let Some(v) = options.get_bool("bBlurEdges")? {
            self.blur_edges = v;
        }
        if let Some(v) = options.get_bool("bFlip")? {
            self.flip = v;
        }
        if let Some(v) = options.get_bool("bFlipVert")? {
            self.flip_vertical = v;
        }
        Ok(())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=1.0).contains(&self.noise_ratio) {
            return Err("noise_ratio must be within [0, 1]".to_string());
        }

        if self.blur_radius > MAX_BLUR_RADIUS {
            return Err(format!("blur_radius must be <= {}", MAX_BLUR_RADIUS));
        }

        Ok(())
    }
}

fn env_bool(name: &str) -> Option<bool> {
    std::env::var(name)
        .ok()
        .map(|val| val.to_lowercase() == "true" || val == "1")
}
