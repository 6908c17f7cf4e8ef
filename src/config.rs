// In: src/config.rs

//! The single source of truth for all curve-rle compression configuration.
//!
//! `CompressionConfig` is created once at the application boundary (from a
//! JSON file, CLI flags, or code) and passed by reference into the container
//! layer. `DecodeOptions` carries the caller-side choices that the container
//! format itself does not record.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::container::format::{BUFFER_CAPACITY, METADATA_SIZE};
use crate::curves::CurveKind;
use crate::error::{CurveRleError, Result};

//==================================================================================
// 0. Constants
//==================================================================================

/// The largest threshold that still separates every pair of distinct 8-bit
/// intensities once they are normalized to `[0,1]`.
pub const LOSSLESS_THRESHOLD: f32 = 0.0039;

/// The default seed for visualize mode.
pub const DEFAULT_VISUALIZE_SEED: u64 = 5489;

//==================================================================================
// I. Padding Policy
//==================================================================================

/// Defines how each channel is grown before it is traversed.
///
/// Padded cells hold the sentinel value and are absorbed by whichever run is
/// open when the traversal reaches them.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum PaddingPolicy {
    /// Traverse the original grid as-is. The header records padding as disabled.
    None,

    /// **Default:** Pad to a square whose side is the smallest power of two
    /// covering both dimensions. This is the layout under which the Hilbert
    /// traversal is fully local.
    PowerOfTwo,

    /// Pad to an explicit size, which must cover the image.
    Exact { height: usize, width: usize },
}

// Implement `Default` manually because of the struct variant.
impl Default for PaddingPolicy {
    fn default() -> Self {
        PaddingPolicy::PowerOfTwo
    }
}

impl PaddingPolicy {
    /// Resolves the padded dimensions for an image of `height x width`.
    ///
    /// Returns `None` when padding is disabled.
    pub fn padded_dims(&self, height: usize, width: usize) -> Result<Option<(usize, usize)>> {
        match *self {
            PaddingPolicy::None => Ok(None),
            PaddingPolicy::PowerOfTwo => {
                let side = height.max(width).next_power_of_two();
                Ok(Some((side, side)))
            }
            PaddingPolicy::Exact {
                height: padded_height,
                width: padded_width,
            } => {
                if padded_height < height || padded_width < width {
                    return Err(CurveRleError::InvalidConfig(format!(
                        "Padded size {}x{} does not cover image size {}x{}",
                        padded_height, padded_width, height, width
                    )));
                }
                Ok(Some((padded_height, padded_width)))
            }
        }
    }
}

//==================================================================================
// II. The Unified CompressionConfig
//==================================================================================

/// The configuration for one encode operation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct CompressionConfig {
    /// The space-filling curve used to linearize each channel.
    #[serde(default)]
    pub curve: CurveKind,

    /// The merge threshold in `[0,1]`. Samples closer than this to the open
    /// run's mean are folded into it.
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// How channels are padded before traversal.
    #[serde(default)]
    pub padding: PaddingPolicy,

    /// Upper bound on the size of the serialized container, header included.
    /// Never above `BUFFER_CAPACITY`, the limit every decoder enforces.
    #[serde(default = "default_max_container_bytes")]
    pub max_container_bytes: usize,
}

impl Default for CompressionConfig {
    fn default() -> Self {
        Self {
            curve: CurveKind::default(),
            threshold: default_threshold(),
            padding: PaddingPolicy::default(),
            max_container_bytes: default_max_container_bytes(),
        }
    }
}

impl CompressionConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(CurveRleError::InvalidConfig(format!(
                "threshold must lie in [0, 1], got {}",
                self.threshold
            )));
        }
        // Decoders accept at most `BUFFER_CAPACITY`; anything larger could not be read back.
        if !(METADATA_SIZE..=BUFFER_CAPACITY).contains(&self.max_container_bytes) {
            return Err(CurveRleError::InvalidConfig(format!(
                "max_container_bytes must lie in [{}, {}], got {}",
                METADATA_SIZE, BUFFER_CAPACITY, self.max_container_bytes
            )));
        }
        Ok(())
    }
}

fn default_threshold() -> f32 {
    LOSSLESS_THRESHOLD
}

fn default_max_container_bytes() -> usize {
    BUFFER_CAPACITY
}

//==================================================================================
// III. Decode Options
//==================================================================================

/// Caller-side choices for decoding a container.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct DecodeOptions {
    /// Must match the curve the container was encoded with; it is not stored.
    #[serde(default)]
    pub curve: CurveKind,

    /// If true, channels come back at padded size instead of being cropped.
    #[serde(default)]
    pub show_padding: bool,

    /// Seed for the per-run random colors of visualize mode.
    #[serde(default = "default_visualize_seed")]
    pub visualize_seed: u64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            curve: CurveKind::default(),
            show_padding: false,
            visualize_seed: DEFAULT_VISUALIZE_SEED,
        }
    }
}

fn default_visualize_seed() -> u64 {
    DEFAULT_VISUALIZE_SEED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_json_defaults() {
        let config = CompressionConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CompressionConfig::default());
        assert_eq!(config.curve, CurveKind::Hilbert);
        assert_eq!(config.padding, PaddingPolicy::PowerOfTwo);
    }

    #[test]
    fn test_config_json_overrides() {
        let json = r#"{
            "curve": "morton",
            "threshold": 0.05,
            "padding": { "policy": "exact", "height": 10, "width": 12 }
        }"#;
        let config = CompressionConfig::from_json_str(json).unwrap();
        assert_eq!(config.curve, CurveKind::Morton);
        assert_eq!(config.threshold, 0.05);
        assert_eq!(config.padding, PaddingPolicy::Exact { height: 10, width: 12 });
    }

    #[test]
    fn test_config_rejects_out_of_range_threshold() {
        let result = CompressionConfig::from_json_str(r#"{ "threshold": 1.5 }"#);
        assert!(matches!(result, Err(CurveRleError::InvalidConfig(_))));
    }

    #[test]
    fn test_config_container_limit_stays_decodable() {
        let at_limit = CompressionConfig {
            max_container_bytes: BUFFER_CAPACITY,
            ..CompressionConfig::default()
        };
        assert!(at_limit.validate().is_ok());

        for bad in [METADATA_SIZE - 1, BUFFER_CAPACITY + 1, 1 << 30] {
            let config = CompressionConfig {
                max_container_bytes: bad,
                ..CompressionConfig::default()
            };
            assert!(
                matches!(config.validate(), Err(CurveRleError::InvalidConfig(_))),
                "max_container_bytes {}",
                bad
            );
        }
        let json = format!(r#"{{ "max_container_bytes": {} }}"#, 1u64 << 30);
        assert!(CompressionConfig::from_json_str(&json).is_err());
    }

    #[test]
    fn test_config_rejects_unknown_curve() {
        let result = CompressionConfig::from_json_str(r#"{ "curve": "peano" }"#);
        assert!(matches!(result, Err(CurveRleError::SerdeJson(_))));
    }

    #[test]
    fn test_padding_power_of_two() {
        let policy = PaddingPolicy::PowerOfTwo;
        assert_eq!(policy.padded_dims(3, 3).unwrap(), Some((4, 4)));
        assert_eq!(policy.padded_dims(5, 17).unwrap(), Some((32, 32)));
        assert_eq!(policy.padded_dims(8, 8).unwrap(), Some((8, 8)));
        assert_eq!(policy.padded_dims(1, 1).unwrap(), Some((1, 1)));
    }

    #[test]
    fn test_padding_exact_must_cover_image() {
        let policy = PaddingPolicy::Exact { height: 4, width: 2 };
        assert_eq!(policy.padded_dims(3, 2).unwrap(), Some((4, 2)));
        assert!(matches!(
            policy.padded_dims(3, 3),
            Err(CurveRleError::InvalidConfig(_))
        ));
        assert_eq!(PaddingPolicy::None.padded_dims(3, 3).unwrap(), None);
    }
}
