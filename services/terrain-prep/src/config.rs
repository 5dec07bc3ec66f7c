//! Configuration for the heightfield flow.

use raster_ops::{AmplifyParams, ResizeFilter};
use serde::{Deserialize, Serialize};
use terrain_common::{OptionMap, TerrainError, TerrainResult};

/// Settings for turning elevation data into a terrain heightfield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightfieldConfig {
    /// Apply the histogram-driven contrast boost.
    pub boost: bool,

    /// Boost multiplier numerator.
    pub numerator: f64,

    /// Extra samples added to the power-of-two side.
    pub margin: usize,

    /// Resampling filter for the final resize.
    pub filter: ResizeFilter,
}

impl Default for HeightfieldConfig {
    fn default() -> Self {
        Self {
            boost: true,
            numerator: AmplifyParams::heightfield().numerator,
            margin: 1,
            filter: ResizeFilter::Bilinear,
        }
    }
}

impl HeightfieldConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("HEIGHTFIELD_BOOST") {
            config.boost = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(val) = std::env::var("HEIGHTFIELD_NUMERATOR") {
            if let Ok(numerator) = val.parse() {
                config.numerator = numerator;
            }
        }

        if let Ok(val) = std::env::var("HEIGHTFIELD_MARGIN") {
            if let Ok(margin) = val.parse() {
                config.margin = margin;
            }
        }

        if let Ok(val) = std::env::var("HEIGHTFIELD_FILTER") {
            config.filter = ResizeFilter::from_str(&val);
        }

        config
    }

    /// Override fields from `bBoost`, `fNumerator`, `iMargin` and `sFilter`.
    pub fn apply_options(&mut self, options: &OptionMap) -> TerrainResult<()> {
        if let Some(v) = options.get_bool("bBoost")? {
            self.boost = v;
        }
        if let Some(v) = options.get_float("fNumerator")? {
            self.numerator = v;
        }
        if let Some(v) = options.get_int("iMargin")? {
            self.margin = usize::try_from(v).map_err(|_| {
                TerrainError::config(format!("iMargin must be >= 0, got {}", v))
            })?;
        }
        if let Some(v) = options.get_str("sFilter")? {
            self.filter = ResizeFilter::from_str(v);
        }
        Ok(())
    }

    /// Histogram parameters for the boost.
    pub fn amplify_params(&self) -> AmplifyParams {
        AmplifyParams {
            numerator: self.numerator,
            ..AmplifyParams::heightfield()
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if !self.numerator.is_finite() || self.numerator < 1.0 {
            return Err("numerator must be at least 1".to_string());
        }

        self.amplify_params().validate()
    }
}
