// In: src/container/compressor.rs

//! The stateful facade over the codec.
//!
//! `RleCompressor` follows the life cycle of one image: either `load` planes
//! (pad + build runs) and then serialize them with `to_bytes`, or
//! `read_bytes` a container and then reconstruct planes with `write` or
//! `visualize`. Run sequences are rebuilt from scratch on every `load` and
//! `read_bytes`.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::CompressionConfig;
use crate::container::format::{
    CompressionStats, FrameMetadata, MAX_CHANNELS, MAX_DIMENSION, METADATA_SIZE,
};
use crate::curves::{Curve, CurveKind};
use crate::error::{CurveRleError, Result};
use crate::kernels::{self, RUN_RECORD_SIZE};
use crate::types::{ChannelRuns, Plane};

/// Everything known about the image currently held by a compressor.
#[derive(Debug, Clone)]
struct LoadedImage {
    metadata: FrameMetadata,
    channels: Vec<ChannelRuns>,
}

/// A run-length image compressor bound to one curve and one configuration.
#[derive(Debug, Clone)]
pub struct RleCompressor {
    config: CompressionConfig,
    curve: Curve,
    loaded: Option<LoadedImage>,
}

impl RleCompressor {
    /// Creates a compressor after validating `config`.
    pub fn new(config: CompressionConfig) -> Result<Self> {
        config.validate()?;
        let curve = config.curve.build();
        Ok(Self {
            config,
            curve,
            loaded: None,
        })
    }

    /// Creates a compressor for decoding containers written with `curve`.
    pub fn for_curve(curve: CurveKind) -> Result<Self> {
        Self::new(CompressionConfig {
            curve,
            ..CompressionConfig::default()
        })
    }

    pub fn config(&self) -> &CompressionConfig {
        &self.config
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.is_some()
    }

    fn loaded(&self) -> Result<&LoadedImage> {
        self.loaded.as_ref().ok_or(CurveRleError::NotLoaded)
    }

    //==============================================================================
    // 1. Encode Side
    //==============================================================================

    /// Pads every channel and builds its run sequence, replacing whatever was
    /// loaded before. Nothing is replaced if any channel fails.
    pub fn load(&mut self, channels: &[Plane]) -> Result<()> {
        let (height, width) = check_planes(channels)?;
        let start = Instant::now();

        let padded_dims = self.config.padding.padded_dims(height, width)?;
        let padding_enabled = padded_dims.is_some();
        let (padded_height, padded_width) = padded_dims.unwrap_or((height, width));
        if padded_height > MAX_DIMENSION || padded_width > MAX_DIMENSION {
            return Err(CurveRleError::InvalidConfig(format!(
                "padded size {}x{} exceeds the maximum dimension {}",
                padded_height, padded_width, MAX_DIMENSION
            )));
        }

        let mut channel_runs = Vec::with_capacity(channels.len());
        for (index, plane) in channels.iter().enumerate() {
            let channel_start = Instant::now();
            let runs = if padding_enabled {
                let padded = kernels::pad_plane(plane, padded_height, padded_width)?;
                kernels::encode_channel(&padded, &mut self.curve, self.config.threshold)?
            } else {
                kernels::encode_channel(plane, &mut self.curve, self.config.threshold)?
            };

            log::info!(
                "  - Channel {} | Runs: {} | Bytes: {} | Time: {:.2?}",
                index,
                runs.len(),
                runs.len() * RUN_RECORD_SIZE,
                channel_start.elapsed()
            );
            if runs.capped_runs > 0 {
                log::warn!(
                    "Channel {}: {} run(s) were split at the {}-sample length cap",
                    index,
                    runs.capped_runs,
                    crate::types::MAX_RUN_LENGTH
                );
            }
            log_metric!(
                "event" = "encode_channel",
                "channel" = index,
                "curve" = self.curve.kind(),
                "runs" = runs.len(),
                "capped_runs" = runs.capped_runs
            );
            channel_runs.push(runs);
        }

        let metadata = FrameMetadata {
            channel_count: channels.len(),
            height,
            width,
            padding_enabled,
            padded_height,
            padded_width,
            payload_bytes: channel_runs
                .iter()
                .map(|r| r.len() * RUN_RECORD_SIZE)
                .collect(),
        };

        log::info!(
            "Loaded {}x{}x{} image (traversal {}x{}, {}) in {:.2?}",
            height,
            width,
            channels.len(),
            padded_height,
            padded_width,
            self.curve.kind(),
            start.elapsed()
        );

        self.loaded = Some(LoadedImage {
            metadata,
            channels: channel_runs,
        });
        Ok(())
    }

    /// Serializes the loaded image into a container.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let loaded = self.loaded()?;
        loaded.metadata.validate(self.config.max_container_bytes)?;

        let mut buf = Vec::with_capacity(loaded.metadata.total_len());
        buf.extend_from_slice(&loaded.metadata.to_bytes());
        for runs in &loaded.channels {
            kernels::write_records(&runs.runs, &mut buf);
        }

        debug_assert_eq!(buf.len(), loaded.metadata.total_len());
        log::info!(
            "Encoded container: {} bytes ({} header + {} payload)",
            buf.len(),
            METADATA_SIZE,
            loaded.metadata.payload_len()
        );
        Ok(buf)
    }

    //==============================================================================
    // 2. Decode Side
    //==============================================================================

    /// Parses a container and loads its run sequences. On error the
    /// previously loaded image is kept.
    pub fn read_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let start = Instant::now();
        let metadata = FrameMetadata::from_bytes(bytes)?;
        let expected_slots = metadata.padded_height * metadata.padded_width;

        let mut channels = Vec::with_capacity(metadata.channel_count);
        for (index, range) in metadata.payload_ranges().into_iter().enumerate() {
            let runs = ChannelRuns::from_runs(kernels::read_records(&bytes[range])?);
            let covered = runs.covered_slots();
            if covered != expected_slots {
                return Err(CurveRleError::RunSequenceMismatch {
                    expected: expected_slots,
                    actual: covered,
                });
            }
            log::debug!("  - Channel {} | Runs: {}", index, runs.len());
            channels.push(runs);
        }

        log::info!(
            "Decoded container header: {}x{}x{} (traversal {}x{}) in {:.2?}",
            metadata.height,
            metadata.width,
            metadata.channel_count,
            metadata.padded_height,
            metadata.padded_width,
            start.elapsed()
        );
        self.loaded = Some(LoadedImage { metadata, channels });
        Ok(())
    }

    /// Reconstructs every channel. With `show_padding` the planes have the
    /// padded size; otherwise they are cropped to the original size.
    pub fn write(&mut self, show_padding: bool) -> Result<Vec<Plane>> {
        let loaded = self.loaded.as_ref().ok_or(CurveRleError::NotLoaded)?;
        let traversal = loaded.metadata.traversal_dims();
        let dims = output_dims(&loaded.metadata, show_padding);

        let mut planes = Vec::with_capacity(loaded.channels.len());
        for runs in &loaded.channels {
            let mut plane = Plane::zeros(dims);
            kernels::decode_channel(&runs.runs, traversal, &mut plane, &mut self.curve)?;
            planes.push(plane);
        }
        Ok(planes)
    }

    /// Like `write`, but paints each run with a random color. Every channel
    /// restarts the generator from `seed`.
    pub fn visualize(&mut self, show_padding: bool, seed: u64) -> Result<Vec<Plane>> {
        let loaded = self.loaded.as_ref().ok_or(CurveRleError::NotLoaded)?;
        let traversal = loaded.metadata.traversal_dims();
        let dims = output_dims(&loaded.metadata, show_padding);

        let mut planes = Vec::with_capacity(loaded.channels.len());
        for runs in &loaded.channels {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut plane = Plane::zeros(dims);
            kernels::visualize_channel(
                &runs.runs,
                traversal,
                &mut plane,
                &mut self.curve,
                &mut rng,
            )?;
            planes.push(plane);
        }
        Ok(planes)
    }

    //==============================================================================
    // 3. Inspection
    //==============================================================================

    pub fn metadata(&self) -> Result<&FrameMetadata> {
        Ok(&self.loaded()?.metadata)
    }

    /// The run sequence of channel `index`.
    pub fn channel_runs(&self, index: usize) -> Result<&ChannelRuns> {
        let loaded = self.loaded()?;
        loaded
            .channels
            .get(index)
            .ok_or(CurveRleError::ChannelOutOfRange {
                index,
                channel_count: loaded.channels.len(),
            })
    }

    /// Total runs closed by the length cap rather than the threshold, over
    /// all channels. Always zero after `read_bytes`, as the container does not
    /// record it.
    pub fn capped_runs(&self) -> Result<usize> {
        Ok(self.loaded()?.channels.iter().map(|r| r.capped_runs).sum())
    }

    pub fn stats(&self) -> Result<CompressionStats> {
        Ok(CompressionStats::from_metadata(&self.loaded()?.metadata))
    }
}

//==================================================================================
// 4. Helpers
//==================================================================================

/// Checks channel count and that every plane has the same non-empty shape.
fn check_planes(channels: &[Plane]) -> Result<(usize, usize)> {
    if channels.is_empty() || channels.len() > MAX_CHANNELS {
        return Err(CurveRleError::InvalidArgument(format!(
            "expected 1..={} channels, got {}",
            MAX_CHANNELS,
            channels.len()
        )));
    }
    let (height, width) = channels[0].dim();
    if height == 0 || width == 0 || height > MAX_DIMENSION || width > MAX_DIMENSION {
        return Err(CurveRleError::InvalidArgument(format!(
            "image size {}x{} is outside 1..={}",
            height, width, MAX_DIMENSION
        )));
    }
    if let Some((index, plane)) = channels
        .iter()
        .enumerate()
        .find(|(_, p)| p.dim() != (height, width))
    {
        return Err(CurveRleError::InvariantViolation(format!(
            "channel {} is {:?} but channel 0 is {}x{}",
            index,
            plane.dim(),
            height,
            width
        )));
    }
    Ok((height, width))
}

fn output_dims(metadata: &FrameMetadata, show_padding: bool) -> (usize, usize) {
    if show_padding {
        metadata.traversal_dims()
    } else {
        (metadata.height, metadata.width)
    }
}
