//! This module contains the kernels that serialize a channel's run sequence.
//!
//! Each run becomes one fixed-width 3-byte record: the run length as a
//! little-endian `u16`, followed by the run mean quantized to a `u8` by
//! truncation (`floor(value * 255)`). The format is panic-free to decode:
//! malformed input is reported as `RecordDecodeError`.

use crate::error::{CurveRleError, Result};
use crate::types::Run;

/// The size of one serialized run in bytes.
pub const RUN_RECORD_SIZE: usize = 3;

//==================================================================================
// 1. Quantization
//==================================================================================

/// Maps a `[0,1]` mean to a byte by truncation. Out-of-range values saturate.
#[inline]
pub fn quantize(value: f32) -> u8 {
    // `as` from float saturates and truncates toward zero.
    (f64::from(value) * 255.0) as u8
}

/// Maps a byte back to `[0,1]`.
#[inline]
pub fn dequantize(byte: u8) -> f32 {
    f32::from(byte) / 255.0
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Appends the records of `runs` to `output_buf`.
pub fn write_records(runs: &[Run], output_buf: &mut Vec<u8>) {
    output_buf.reserve(runs.len() * RUN_RECORD_SIZE);
    for run in runs {
        output_buf.extend_from_slice(&run.length.to_le_bytes());
        output_buf.push(quantize(run.value));
    }
}

/// Parses a channel payload back into runs with dequantized values.
pub fn read_records(input_bytes: &[u8]) -> Result<Vec<Run>> {
    if input_bytes.len() % RUN_RECORD_SIZE != 0 {
        return Err(CurveRleError::RecordDecodeError(format!(
            "payload of {} bytes is not a multiple of the {}-byte record size",
            input_bytes.len(),
            RUN_RECORD_SIZE
        )));
    }

    input_bytes
        .chunks_exact(RUN_RECORD_SIZE)
        .enumerate()
        .map(|(i, record)| {
            let length = u16::from_le_bytes([record[0], record[1]]);
            if length == 0 {
                return Err(CurveRleError::RecordDecodeError(format!(
                    "record {} has a zero run length",
                    i
                )));
            }
            Ok(Run {
                length,
                value: dequantize(record[2]),
            })
        })
        .collect()
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_truncates() {
        assert_eq!(quantize(0.5), 127);
        assert_eq!(quantize(0.0), 0);
        assert_eq!(quantize(1.0), 255);
        assert_eq!(quantize(0.999), 254);
        assert_eq!(quantize(-0.3), 0);
        assert_eq!(quantize(4.0), 255);
    }

    #[test]
    fn test_every_8bit_level_survives_quantization() {
        for k in 0..=255u8 {
            let normalized = f32::from(k) / 255.0;
            assert_eq!(quantize(normalized), k);
            assert_eq!(dequantize(quantize(normalized)), normalized);
        }
    }

    #[test]
    fn test_single_run_layout() {
        let mut buf = Vec::new();
        write_records(&[Run { length: 16, value: 0.5 }], &mut buf);
        assert_eq!(buf, vec![16, 0, 127]);
    }

    #[test]
    fn test_write_appends_and_length_is_little_endian() {
        let mut buf = vec![0xAA];
        write_records(&[Run { length: 0x0102, value: 1.0 }], &mut buf);
        assert_eq!(buf, vec![0xAA, 0x02, 0x01, 0xFF]);
    }

    #[test]
    fn test_records_roundtrip() {
        let runs = vec![
            Run { length: 1, value: 0.0 },
            Run { length: 65535, value: 1.0 },
            Run { length: 300, value: 40.0 / 255.0 },
        ];
        let mut buf = Vec::new();
        write_records(&runs, &mut buf);
        assert_eq!(buf.len(), runs.len() * RUN_RECORD_SIZE);
        assert_eq!(read_records(&buf).unwrap(), runs);
    }

    #[test]
    fn test_read_rejects_partial_record() {
        let result = read_records(&[1, 0, 5, 2]);
        assert!(matches!(result, Err(CurveRleError::RecordDecodeError(_))));
    }

    #[test]
    fn test_read_rejects_zero_length_run() {
        let result = read_records(&[1, 0, 5, 0, 0, 9]);
        match result {
            Err(CurveRleError::RecordDecodeError(msg)) => assert!(msg.contains("record 1")),
            other => panic!("expected RecordDecodeError, got {:?}", other),
        }
    }

    #[test]
    fn test_read_empty_payload() {
        assert!(read_records(&[]).unwrap().is_empty());
    }
}
