//! Tunable parameters for the shade operations.

use serde::{Deserialize, Serialize};

use crate::blur::MAX_BLUR_RADIUS;

/// Parameters of the histogram-driven contrast boost used by `amplify`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmplifyParams {
    /// Number of equal-width histogram bins.
    pub bins: usize,

    /// Cumulative fraction of samples that the leading bins must exceed.
    pub threshold: f64,

    /// How many leading bin prefixes are searched before giving up.
    pub search_bins: usize,

    /// Multiplier numerator; the multiplier is `floor(numerator / (i + 1))`.
    pub numerator: f64,
}

impl Default for AmplifyParams {
    fn default() -> Self {
        Self {
            bins: 20,
            threshold: 0.9,
            search_bins: 4,
            numerator: 6.0,
        }
    }
}

impl AmplifyParams {
    /// Load parameters from environment variables.
    pub fn from_env() -> Self {
        let mut params = Self::default();

        if let Ok(val) = std::env::var("AMPLIFY_BINS") {
            if let Ok(bins) = val.parse() {
                params.bins = bins;
            }
        }

        if let Ok(val) = std::env::var("AMPLIFY_THRESHOLD") {
            if let Ok(threshold) = val.parse() {
                params.threshold = threshold;
            }
        }

        if let Ok(val) = std::env::var("AMPLIFY_SEARCH_BINS") {
            if let Ok(search) = val.parse() {
                params.search_bins = search;
            }
        }

        if let Ok(val) = std::env::var("AMPLIFY_NUMERATOR") {
            if let Ok(numerator) = val.parse() {
                params.numerator = numerator;
            }
        }

        params
    }

    /// Parameters used by the heightfield flow, which boosts harder.
    pub fn heightfield() -> Self {
        Self {
            numerator: 20.0,
            ..Self::default()
        }
    }

    /// Validate the parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.bins == 0 {
            return Err("bins must be > 0".to_string());
        }

        if self.search_bins > self.bins {
            return Err("search_bins must not exceed bins".to_string());
        }

        if self.threshold.is_nan() || self.threshold <= 0.0 || self.threshold > 1.0 {
            return Err("threshold must be in (0, 1]".to_string());
        }

        if self.numerator.is_nan() || self.numerator < 1.0 {
            return Err("numerator must be >= 1".to_string());
        }

        Ok(())
    }
}

/// Parameters of the shade reduction pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadeConfig {
    /// Number of bands the 8-bit range is reduced to.
    pub levels: usize,

    /// Radius of the box blur applied after quantization.
    pub smoothing_radius: usize,
}

impl Default for ShadeConfig {
    fn default() -> Self {
        Self {
            levels: 32,
            smoothing_radius: 4,
        }
    }
}

impl ShadeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SHADES_LEVELS") {
            if let Ok(levels) = val.parse() {
                config.levels = levels;
            }
        }

        if let Ok(val) = std::env::var("SHADES_SMOOTHING_RADIUS") {
            if let Ok(radius) = val.parse() {
                config.smoothing_radius = radius;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.levels == 0 || self.levels > 256 {
            return Err("levels must be 1-256".to_string());
        }

        if self.smoothing_radius > MAX_BLUR_RADIUS {
            return Err(format!("smoothing_radius must be <= {}", MAX_BLUR_RADIUS));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(AmplifyParams::default().validate().is_ok());
        assert!(AmplifyParams::heightfield().validate().is_ok());
        assert!(ShadeConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let params = AmplifyParams {
            bins: 2,
            search_bins: 4,
            ..AmplifyParams::default()
        };
        assert!(params.validate().is_err());

        let params = AmplifyParams {
            threshold: 0.0,
            ..AmplifyParams::default()
        };
        assert!(params.validate().is_err());

        let shades = ShadeConfig {
            levels: 0,
            smoothing_radius: 1,
        };
        assert!(shades.validate().is_err());

        let shades = ShadeConfig {
            smoothing_radius: MAX_BLUR_RADIUS + 1,
            ..ShadeConfig::default()
        };
        assert!(shades.validate().is_err());
    }
}
