//! This module defines the core, strongly-typed data representations shared by
//! the codec kernels and the container layer.
//!
//! It currently includes the `Run` record, the per-channel `ChannelRuns`
//! sequence, and the scalar `Plane` a channel lives in.

pub mod run;

// Re-export the main type(s) for easier access.
pub use run::{ChannelRuns, Run, MAX_RUN_LENGTH};

/// One color channel as a `[row, col]` grid of normalized samples.
pub type Plane = ndarray::Array2<f32>;

/// The out-of-band marker for a padded cell. Any strictly negative sample is
/// treated as padding; this is the value the padder writes.
pub const PADDING_SENTINEL: f32 = -1.0;

/// True for samples that carry no information and must inherit the open run.
#[inline]
pub fn is_sentinel(sample: f32) -> bool {
    sample < 0.0
}
