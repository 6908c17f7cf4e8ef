//! The pure, stateless kernels of the codec.
//!
//! * `rle`: builds runs from a channel along a traversal, and replays them.
//! * `records`: the 3-byte on-disk record of a run.
//! * `padding`: grows a channel to its traversal size with sentinels.

pub mod padding;
pub mod records;
pub mod rle;

pub use padding::pad_plane;
pub use records::{dequantize, quantize, read_records, write_records, RUN_RECORD_SIZE};
pub use rle::{decode_channel, encode_channel, visualize_channel};
