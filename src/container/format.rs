// In: src/container/format.rs

//! Defines all on-disk structures and constants for the curve-rle container.
//!
//! A container is a fixed 128-byte metadata block followed by one payload per
//! channel, in channel order. Every header field is a little-endian `u64`:
//!
//! ```text
//! offset  field
//!      0  channel_count
//!      8  height
//!     16  width
//!     24  padding_enabled (0 or 1)
//!     32  padded_height
//!     40  padded_width
//!     48  payload_bytes[0]   (one field per channel)
//!    ...  zero fill up to byte 128
//! ```
//!
//! Each payload is a flat sequence of 3-byte run records (see
//! `kernels::records`).

use std::ops::Range;

use crate::error::{CurveRleError, Result};
use crate::kernels::RUN_RECORD_SIZE;

//==================================================================================
// I. Format Constants
//==================================================================================

/// The size of the metadata block in bytes.
pub const METADATA_SIZE: usize = 128;
/// The largest number of channels a container can describe.
pub const MAX_CHANNELS: usize = 4;
/// The default upper bound on a whole container (64 MiB).
pub const BUFFER_CAPACITY: usize = 64 << 20;
/// The largest height or width accepted when reading a header.
pub const MAX_DIMENSION: usize = 1 << 20;

const FIELD_SIZE: usize = 8;
const FIXED_FIELDS: usize = 6;

//==================================================================================
// II. Frame Metadata
//==================================================================================

/// The decoded metadata block of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameMetadata {
    pub channel_count: usize,
    pub height: usize,
    pub width: usize,
    pub padding_enabled: bool,
    pub padded_height: usize,
    pub padded_width: usize,
    /// Serialized size of each channel's run sequence; always `3 * run_count`.
    pub payload_bytes: Vec<usize>,
}

impl FrameMetadata {
    /// The grid each channel is traversed over.
    pub fn traversal_dims(&self) -> (usize, usize) {
        (self.padded_height, self.padded_width)
    }

    /// The sum of all channel payloads.
    pub fn payload_len(&self) -> usize {
        self.payload_bytes.iter().sum()
    }

    /// The size of the whole container, header included.
    pub fn total_len(&self) -> usize {
        METADATA_SIZE + self.payload_len()
    }

    /// The byte range of each channel's payload within the container.
    pub fn payload_ranges(&self) -> Vec<Range<usize>> {
        let mut start = METADATA_SIZE;
        self.payload_bytes
            .iter()
            .map(|&len| {
                let range = start..start + len;
                start += len;
                range
            })
            .collect()
    }

    /// Serializes the metadata block. Call `validate` first; fields are
    /// written as they are.
    pub fn to_bytes(&self) -> [u8; METADATA_SIZE] {
        let mut block = [0u8; METADATA_SIZE];
        let fixed = [
            self.channel_count,
            self.height,
            self.width,
            usize::from(self.padding_enabled),
            self.padded_height,
            self.padded_width,
        ];
        for (slot, value) in block
            .chunks_exact_mut(FIELD_SIZE)
            .zip(fixed.iter().chain(self.payload_bytes.iter()))
        {
            slot.copy_from_slice(&(*value as u64).to_le_bytes());
        }
        block
    }

    /// Parses and validates the metadata block only, without requiring the
    /// payloads to be present.
    pub fn peek(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < METADATA_SIZE {
            return Err(CurveRleError::CorruptHeader(format!(
                "container is too small to hold a header. Minimum size: {}, got: {}",
                METADATA_SIZE,
                bytes.len()
            )));
        }

        let field = |index: usize| -> Result<usize> {
            let start = index * FIELD_SIZE;
            let mut raw = [0u8; FIELD_SIZE];
            raw.copy_from_slice(&bytes[start..start + FIELD_SIZE]);
            usize::try_from(u64::from_le_bytes(raw)).map_err(|_| {
                CurveRleError::CorruptHeader(format!(
                    "header field {} does not fit in usize",
                    index
                ))
            })
        };

        // Checked before `validate` because it bounds the payload-size fields
        // read below; a larger count would index past the header.
        let channel_count = field(0)?;
        if channel_count == 0 || channel_count > MAX_CHANNELS {
            return Err(CurveRleError::CorruptHeader(format!(
                "channel count must be 1..={}, got {}",
                MAX_CHANNELS, channel_count
            )));
        }

        let padding_enabled = match field(3)? {
            0 => false,
            1 => true,
            other => {
                return Err(CurveRleError::CorruptHeader(format!(
                    "padding flag must be 0 or 1, got {}",
                    other
                )))
            }
        };

        let payload_bytes = (0..channel_count)
            .map(|i| field(FIXED_FIELDS + i))
            .collect::<Result<Vec<_>>>()?;

        let metadata = Self {
            channel_count,
            height: field(1)?,
            width: field(2)?,
            padding_enabled,
            padded_height: field(4)?,
            padded_width: field(5)?,
            payload_bytes,
        };
        metadata.validate(BUFFER_CAPACITY)?;
        Ok(metadata)
    }

    /// Parses the metadata block and checks that every declared payload byte
    /// is present.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let metadata = Self::peek(bytes)?;
        let expected = metadata.total_len();
        if bytes.len() < expected {
            return Err(CurveRleError::TruncatedPayload {
                expected,
                actual: bytes.len(),
            });
        }
        Ok(metadata)
    }

    /// Checks the structural invariants of the header against `capacity`.
    pub fn validate(&self, capacity: usize) -> Result<()> {
        let corrupt = |msg: String| Err(CurveRleError::CorruptHeader(msg));

        if self.channel_count == 0 || self.channel_count > MAX_CHANNELS {
            return corrupt(format!(
                "channel count must be 1..={}, got {}",
                MAX_CHANNELS, self.channel_count
            ));
        }
        if self.payload_bytes.len() != self.channel_count {
            return corrupt(format!(
                "{} payload sizes for {} channels",
                self.payload_bytes.len(),
                self.channel_count
            ));
        }
        for (name, value) in [
            ("height", self.height),
            ("width", self.width),
            ("padded height", self.padded_height),
            ("padded width", self.padded_width),
        ] {
            if value == 0 || value > MAX_DIMENSION {
                return corrupt(format!("{} must be 1..={}, got {}", name, MAX_DIMENSION, value));
            }
        }
        if self.padded_height < self.height || self.padded_width < self.width {
            return corrupt(format!(
                "padded size {}x{} is smaller than image size {}x{}",
                self.padded_height, self.padded_width, self.height, self.width
            ));
        }
        if !self.padding_enabled && self.traversal_dims() != (self.height, self.width) {
            return corrupt("padding is disabled but padded size differs from image size".into());
        }
        if let Some((i, len)) = self
            .payload_bytes
            .iter()
            .enumerate()
            .find(|(_, len)| **len % RUN_RECORD_SIZE != 0)
        {
            return corrupt(format!(
                "channel {} payload of {} bytes is not a whole number of run records",
                i, len
            ));
        }
        let required = self
            .payload_bytes
            .iter()
            .try_fold(METADATA_SIZE, |acc, &len| acc.checked_add(len));
        match required {
            Some(required) if required <= capacity => Ok(()),
            Some(required) => Err(CurveRleError::CapacityExceeded { required, capacity }),
            None => corrupt("declared payload sizes overflow".into()),
        }
    }
}

//==================================================================================
// III. Reporting
//==================================================================================

/// The public-facing struct for compression analysis results, returned by `analyze`.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionStats {
    pub header_size: usize,
    /// Payload bytes per channel, in channel order.
    pub channel_bytes: Vec<usize>,
    pub total_size: usize,
    /// `height * width * channel_count`.
    pub original_samples: usize,
    /// `padded_height * padded_width * channel_count`.
    pub padded_samples: usize,
    /// `original_samples / total_size`.
    pub compression_ratio: f64,
}

impl CompressionStats {
    pub fn from_metadata(metadata: &FrameMetadata) -> Self {
        let original_samples = metadata.height * metadata.width * metadata.channel_count;
        let total_size = metadata.total_len();
        Self {
            header_size: METADATA_SIZE,
            channel_bytes: metadata.payload_bytes.clone(),
            total_size,
            original_samples,
            padded_samples: metadata.padded_height * metadata.padded_width * metadata.channel_count,
            compression_ratio: original_samples as f64 / total_size as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> FrameMetadata {
        FrameMetadata {
            channel_count: 3,
            height: 3,
            width: 5,
            padding_enabled: true,
            padded_height: 8,
            padded_width: 8,
            payload_bytes: vec![3, 30, 300],
        }
    }

    #[test]
    fn test_header_layout_is_little_endian_u64() {
        let block = sample_metadata().to_bytes();
        assert_eq!(&block[0..8], &3u64.to_le_bytes());
        assert_eq!(&block[8..16], &3u64.to_le_bytes());
        assert_eq!(&block[16..24], &5u64.to_le_bytes());
        assert_eq!(&block[24..32], &1u64.to_le_bytes());
        assert_eq!(&block[32..40], &8u64.to_le_bytes());
        assert_eq!(&block[40..48], &8u64.to_le_bytes());
        assert_eq!(&block[48..56], &3u64.to_le_bytes());
        assert_eq!(&block[56..64], &30u64.to_le_bytes());
        assert_eq!(&block[64..72], &300u64.to_le_bytes());
        assert!(block[72..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_header_roundtrip() {
        let metadata = sample_metadata();
        let block = metadata.to_bytes();
        assert_eq!(FrameMetadata::peek(&block).unwrap(), metadata);
    }

    #[test]
    fn test_payload_ranges_follow_channel_order() {
        let ranges = sample_metadata().payload_ranges();
        assert_eq!(ranges, vec![128..131, 131..161, 161..461]);
        assert_eq!(sample_metadata().total_len(), 461);
    }

    #[test]
    fn test_from_bytes_requires_payload() {
        let block = sample_metadata().to_bytes();
        let result = FrameMetadata::from_bytes(&block);
        assert!(matches!(
            result,
            Err(CurveRleError::TruncatedPayload { expected: 461, actual: 128 })
        ));
    }

    #[test]
    fn test_validate_capacity() {
        let metadata = sample_metadata();
        assert!(metadata.validate(461).is_ok());
        assert!(matches!(
            metadata.validate(460),
            Err(CurveRleError::CapacityExceeded { required: 461, capacity: 460 })
        ));
    }

    #[test]
    fn test_stats_ratio_counts_header() {
        let stats = CompressionStats::from_metadata(&sample_metadata());
        assert_eq!(stats.original_samples, 45);
        assert_eq!(stats.padded_samples, 192);
        assert_eq!(stats.total_size, 461);
        assert!((stats.compression_ratio - 45.0 / 461.0).abs() < 1e-12);
    }
}
