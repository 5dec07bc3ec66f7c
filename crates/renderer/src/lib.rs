//! Color rendering for prepared terrain rasters.
//!
//! Implements the color-producing stages of the pipeline:
//! - Height to color classification of normalized heightfields
//! - Cross-raster color mapping between geo-referenced rasters
//! - 8-bit conversion and PNG output with extent metadata

pub mod classify;
pub mod config;
pub mod mapper;
pub mod output;
pub mod png;

pub use classify::{classify, heightfield_to_colormap};
pub use config::MapperConfig;
pub use mapper::{bluey_threshold, boost_blue, map_across, map_across_raster};
pub use output::{encode_png, save_png, to_u8_image};
