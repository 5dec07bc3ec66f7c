//! Common types and utilities shared across the terrain preparation crates.

pub mod error;
pub mod extent;
pub mod options;

pub use error::{TerrainError, TerrainResult};
pub use extent::GeoExtent;
pub use options::{parse_option_args, OptionMap, OptionValue, ParseOutcome};
