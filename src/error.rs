// In: src/error.rs

//! This module defines the single, unified error type for the entire curve-rle library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CurveRleError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    #[error("Invariant violated (this is a caller bug): {0}")]
    InvariantViolation(String),

    #[error("No image is loaded; call `load` or `read_bytes` first")]
    NotLoaded,

    #[error("Channel index {index} is out of range for {channel_count} channel(s)")]
    ChannelOutOfRange { index: usize, channel_count: usize },

    #[error("Container needs {required} bytes but capacity is {capacity} bytes")]
    CapacityExceeded { required: usize, capacity: usize },

    #[error("Corrupt or foreign container header: {0}")]
    CorruptHeader(String),

    #[error("Container payload truncated: expected {expected} bytes, got {actual}")]
    TruncatedPayload { expected: usize, actual: usize },

    #[error("Run sequence covers {actual} traversal slots, but the grid has {expected}")]
    RunSequenceMismatch { expected: usize, actual: usize },

    #[error("Run record decoding error: {0}")]
    RecordDecodeError(String),

    #[error("Unknown curve kind: '{0}' (expected 'hilbert' or 'morton')")]
    UnknownCurve(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g., file not found).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the `image` crate while decoding or encoding a picture file.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// An error from the Serde JSON library, typically while loading a config file.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, CurveRleError>;
