// In: src/container/stateless_api.rs

use crate::config::{CompressionConfig, DecodeOptions};
use crate::container::compressor::RleCompressor;
use crate::container::format::{CompressionStats, FrameMetadata};
use crate::error::Result;
use crate::types::Plane;

/// The result of decoding a whole container.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub metadata: FrameMetadata,
    /// One plane per channel, cropped unless `show_padding` was requested.
    pub channels: Vec<Plane>,
}

/// Compresses a set of same-shaped channels into a container.
pub fn encode(channels: &[Plane], config: &CompressionConfig) -> Result<Vec<u8>> {
    let mut compressor = RleCompressor::new(config.clone())?;
    compressor.load(channels)?;
    compressor.to_bytes()
}

/// Decompresses a container. `options.curve` must be the curve it was
/// encoded with.
pub fn decode(bytes: &[u8], options: &DecodeOptions) -> Result<DecodedImage> {
    let mut compressor = RleCompressor::for_curve(options.curve)?;
    compressor.read_bytes(bytes)?;
    let channels = compressor.write(options.show_padding)?;
    Ok(DecodedImage {
        metadata: compressor.metadata()?.clone(),
        channels,
    })
}

/// Decodes a container with every run painted a random color.
pub fn visualize(bytes: &[u8], options: &DecodeOptions) -> Result<Vec<Plane>> {
    let mut compressor = RleCompressor::for_curve(options.curve)?;
    compressor.read_bytes(bytes)?;
    compressor.visualize(options.show_padding, options.visualize_seed)
}

/// Reports sizes from the header alone; the payloads are not read.
pub fn analyze(bytes: &[u8]) -> Result<CompressionStats> {
    let metadata = FrameMetadata::peek(bytes)?;
    Ok(CompressionStats::from_metadata(&metadata))
}
