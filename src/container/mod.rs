// In: src/container/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Container Layer
// ====================================================================================
//
// The `container` is the public-facing API of the codec. It owns the on-disk format
// and drives the pure `kernels` (padding, run building, record serialization) over
// each channel of an image.
//
// Data Flow (Compression):
//
//   1. [Stateless API (encode)]            -> Receives `&[Plane]` + `CompressionConfig`
//         |
//         `-> builds a fresh `RleCompressor` ->
//
//   2. [Stateful Facade (RleCompressor::load)]
//         |
//         `-> a. Resolves the padded size from the `PaddingPolicy`
//         |
//         `-> b. Per channel: `kernels::pad_plane` -> `kernels::encode_channel`
//
//   3. [RleCompressor::to_bytes]          -> `FrameMetadata` block + 3-byte run records
//
//
// Data Flow (Decompression):
//
//   1. [RleCompressor::read_bytes]        -> Receives `&[u8]`
//         |
//         `-> a. `FrameMetadata::from_bytes` validates the header and payload length
//         |
//         `-> b. Per channel: `kernels::read_records`
//
//   2. [RleCompressor::write / visualize] -> Replays runs along the curve into planes
//
// The curve is not recorded in the container; the decoder must be told which one
// the encoder used.
//
// ====================================================================================
pub mod compressor;
pub mod format;
pub mod stateless_api;

pub use compressor::RleCompressor;
pub use format::{CompressionStats, FrameMetadata};
pub use stateless_api::{analyze, decode, encode, visualize, DecodedImage};
