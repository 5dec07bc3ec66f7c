//! Array-to-array raster transforms.
//!
//! Every operation takes a [`RasterBuffer`] by reference and returns a new
//! one; nothing here keeps state between calls or reads ambient
//! configuration. Parameters come in explicitly, either as arguments or as
//! the value objects in [`config`].
//!
//! # Pipeline stages
//!
//! ```text
//! load_image ──► normalize_orientation ──► crop / resize_to / flip
//!                                            │
//!                                            ├─► add_noise ──► box_blur
//!                                            │
//!                                            └─► quantize_shades / amplify
//! ```
//!
//! Integer samples are rounded back into their sample type after each
//! step; floating point buffers are expected to stay within `[0, 1]`.

pub mod blur;
pub mod buffer;
pub mod config;
pub mod geometry;
pub mod io;
pub mod noise;
pub mod orientation;
pub mod resize;
pub mod sample;
pub mod shades;

// Re-export commonly used types at crate root
pub use blur::{box_blur, MAX_BLUR_RADIUS};
pub use buffer::{RasterBuffer, Rank};
pub use config::{AmplifyParams, ShadeConfig};
pub use geometry::{crop, flip};
pub use io::{image_to_buffer, load_image};
pub use noise::add_noise;
pub use orientation::{normalize_orientation, normalize_orientation_dyn, Orientation};
pub use resize::{power_of_two_side, resize_to, resize_to_power_of_two_square, ResizeFilter};
pub use sample::SampleType;
pub use shades::{amplify, amplify_to_sample_type, histogram, quantize_shades, quantize_shades_with};
