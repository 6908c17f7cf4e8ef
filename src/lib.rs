//! This file is the root of the `curve_rle` Rust crate.
//!
//! `curve_rle` is a still-image codec: each channel is linearized along a
//! space-filling curve (Hilbert or Morton), compressed with threshold-based
//! adaptive run-length encoding, and stored in a container with a fixed
//! 128-byte header.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library.
//! 2.  Re-exporting the small public surface most callers need.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
#[macro_use]
mod observability; // Make macros available throughout the crate

pub mod config;
pub mod container;
pub mod curves;
pub mod error;
pub mod image_io;
pub mod kernels;
pub mod types;

//==================================================================================
// 2. Public Surface
//==================================================================================
pub use config::{CompressionConfig, DecodeOptions, PaddingPolicy};
pub use container::{
    analyze, decode, encode, visualize, CompressionStats, DecodedImage, RleCompressor,
};
pub use curves::{Curve, CurveKind, LinearMapping};
pub use error::{CurveRleError, Result};
pub use types::Plane;
