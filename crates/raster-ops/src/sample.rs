//! Sample types carried alongside every raster buffer.

use serde::{Deserialize, Serialize};

/// Element type of a raster buffer.
///
/// Samples are held as `f64` internally; the sample type decides the
/// natural value range and how results are rounded back after each
/// operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleType {
    UInt8,
    UInt16,
    Int32,
    /// Floating point samples constrained to [0, 1].
    Float32,
    /// Floating point samples constrained to [0, 1].
    Float64,
}

impl SampleType {
    /// Largest representable sample value.
    pub fn max_value(&self) -> f64 {
        match self {
            SampleType::UInt8 => u8::MAX as f64,
            SampleType::UInt16 => u16::MAX as f64,
            SampleType::Int32 => i32::MAX as f64,
            SampleType::Float32 | SampleType::Float64 => 1.0,
        }
    }

    /// Smallest representable sample value.
    pub fn min_value(&self) -> f64 {
        match self {
            SampleType::UInt8 | SampleType::UInt16 => 0.0,
            SampleType::Int32 => i32::MIN as f64,
            SampleType::Float32 | SampleType::Float64 => 0.0,
        }
    }

    pub fn is_float(&self) -> bool {
        matches!(self, SampleType::Float32 | SampleType::Float64)
    }

    /// Bring a computed value back into this sample type.
    ///
    /// Integer types round half to even and saturate at their range;
    /// float types pass through (Float32 loses precision like a cast would).
    pub fn quantize(&self, value: f64) -> f64 {
        match self {
            SampleType::UInt8 | SampleType::UInt16 | SampleType::Int32 => value
                .round_ties_even()
                .clamp(self.min_value(), self.max_value()),
            SampleType::Float32 => value as f32 as f64,
            SampleType::Float64 => value,
        }
    }

    /// Whether `value` lies in the natural range of this type.
    pub fn in_range(&self, value: f64) -> bool {
        value >= self.min_value() && value <= self.max_value()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SampleType::UInt8 => "uint8",
            SampleType::UInt16 => "uint16",
            SampleType::Int32 => "int32",
            SampleType::Float32 => "float32",
            SampleType::Float64 => "float64",
        }
    }
}

impl std::fmt::Display for SampleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_rounds_half_to_even() {
        assert_eq!(SampleType::UInt8.quantize(2.5), 2.0);
        assert_eq!(SampleType::UInt8.quantize(3.5), 4.0);
        assert_eq!(SampleType::UInt8.quantize(300.2), 255.0);
        assert_eq!(SampleType::UInt16.quantize(-4.0), 0.0);
        assert_eq!(SampleType::Int32.quantize(-4.4), -4.0);
    }

    #[test]
    fn test_float_passthrough() {
        assert_eq!(SampleType::Float64.quantize(0.123456789), 0.123456789);
        assert!(SampleType::Float32.in_range(1.0));
        assert!(!SampleType::Float32.in_range(1.01));
    }

    #[test]
    fn test_max_values() {
        assert_eq!(SampleType::UInt8.max_value(), 255.0);
        assert_eq!(SampleType::UInt16.max_value(), 65535.0);
        assert_eq!(SampleType::Int32.max_value(), 2147483647.0);
        assert_eq!(SampleType::Float64.max_value(), 1.0);
    }
}
