//! Error types for terrain preparation.

use thiserror::Error;

/// Result type alias using TerrainError.
pub type TerrainResult<T> = Result<T, TerrainError>;

/// Primary error type for raster and geodata operations.
///
/// None of these are retried anywhere; every operation is a one-shot
/// transform and the caller re-runs with corrected input.
#[derive(Debug, Error)]
pub enum TerrainError {
    // === Input Errors ===
    /// Malformed or unsupported geo-referencing metadata or image layout.
    #[error("Unsupported format: {0}")]
    Format(String),

    /// Buffer rank or channel count not supported by the operation.
    #[error("Unsupported shape: {0}")]
    Shape(String),

    /// Sample values outside the natural range of their sample type.
    #[error("Sample values out of range: {0}")]
    Range(String),

    // === Lookup Errors ===
    /// Geographic coordinate outside a raster's extent.
    #[error("Coordinate ({lon}, {lat}) outside raster extent")]
    Lookup { lon: f64, lat: f64 },

    /// Raw pixel access outside the buffer.
    #[error("Pixel ({x}, {y}) out of bounds for {width}x{height} raster")]
    Index {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    // === Infrastructure Errors ===
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Image codec error: {0}")]
    Image(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl TerrainError {
    /// Create a Format error.
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Create a Shape error.
    pub fn shape(msg: impl Into<String>) -> Self {
        Self::Shape(msg.into())
    }

    /// Create a Range error.
    pub fn range(msg: impl Into<String>) -> Self {
        Self::Range(msg.into())
    }

    /// Create a Config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error means a coordinate or pixel fell outside a raster.
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::Lookup { .. } | Self::Index { .. })
    }
}

// Conversion from common error types
impl From<std::io::Error> for TerrainError {
    fn from(err: std::io::Error) -> Self {
        TerrainError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TerrainError {
    fn from(err: serde_json::Error) -> Self {
        TerrainError::Config(format!("JSON error: {}", err))
    }
}
