//! Multiplicative noise.

use rand::Rng;
use terrain_common::{TerrainError, TerrainResult};
use tracing::debug;

use crate::buffer::RasterBuffer;

/// Multiply every sample by an independent factor drawn from
/// `[1 - ratio, 1 + ratio]`.
///
/// Results are clamped to the sample type's maximum before being rounded
/// back into it. Zero samples stay zero.
pub fn add_noise<R: Rng + ?Sized>(
    buffer: &RasterBuffer,
    ratio: f64,
    rng: &mut R,
) -> TerrainResult<RasterBuffer> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(TerrainError::config(format!(
            "noise ratio must be within [0, 1], got {}",
            ratio
        )));
    }
    debug!(ratio, "Adding noise");

    let st = buffer.sample_type();
    let max = st.max_value();
    let mut out = buffer.clone();
    out.data_mut().mapv_inplace(|v| {
        let factor = rng.gen_range(1.0 - ratio..=1.0 + ratio);
        st.quantize((v * factor).min(max))
    });
    Ok(out)
}
