//! This module contains the adaptive, threshold-based run-length kernels.
//!
//! A channel is read in the order given by a `LinearMapping`. Consecutive
//! samples whose distance to the open run's mean stays below the threshold
//! are folded into that run; anything else opens a new one. Padding
//! sentinels never contribute information: they take the open run's value.
//!
//! Decoding replays the runs along the same traversal and paints each run's
//! value into the destination plane, skipping cells that fall outside it.

use rand::Rng;

use crate::curves::{Coord, LinearMapping};
use crate::error::{CurveRleError, Result};
use crate::types::{is_sentinel, ChannelRuns, Plane, Run};

//==================================================================================
// 1. Encoding
//==================================================================================

/// Builds the run sequence of one channel.
///
/// The whole plane is traversed, so `plane` should already be padded to the
/// traversal size. The first traversed sample must be a real sample.
pub fn encode_channel<M>(plane: &Plane, mapping: &mut M, threshold: f32) -> Result<ChannelRuns>
where
    M: LinearMapping + ?Sized,
{
    let (height, width) = plane.dim();
    mapping.reset(height, width);

    let mut result = ChannelRuns::default();
    let Some(first) = mapping.next_coord() else {
        return Ok(result);
    };

    let first_sample = plane[first.index()];
    if is_sentinel(first_sample) {
        return Err(CurveRleError::InvariantViolation(format!(
            "the first traversed sample at {:?} is a padding sentinel ({})",
            first, first_sample
        )));
    }

    let mut current = Run::new(first_sample);
    while let Some(coord) = mapping.next_coord() {
        let mut sample = plane[coord.index()];
        if is_sentinel(sample) {
            sample = current.value;
        }

        let crosses_threshold = (sample - current.value).abs() >= threshold;
        if crosses_threshold || current.is_full() {
            if !crosses_threshold {
                result.capped_runs += 1;
            }
            result.runs.push(current);
            current = Run::new(sample);
        } else {
            current.fold(sample);
        }
    }
    result.runs.push(current);

    Ok(result)
}

//==================================================================================
// 2. Decoding & Visualization
//==================================================================================

/// Walks the traversal of a `traversal_dims` grid, handing each run (with its
/// index) and each coordinate it owns to `paint`. Fails before painting
/// anything if the runs do not cover the traversal exactly.
fn replay<M, F>(
    runs: &[Run],
    traversal_dims: (usize, usize),
    mapping: &mut M,
    mut paint: F,
) -> Result<()>
where
    M: LinearMapping + ?Sized,
    F: FnMut(usize, &Run, Coord),
{
    let expected = traversal_dims.0 * traversal_dims.1;
    let actual: usize = runs.iter().map(|r| usize::from(r.length)).sum();
    if expected != actual {
        return Err(CurveRleError::RunSequenceMismatch { expected, actual });
    }

    mapping.reset(traversal_dims.0, traversal_dims.1);
    for (index, run) in runs.iter().enumerate() {
        for _ in 0..run.length {
            let coord = mapping.next_coord().ok_or(CurveRleError::RunSequenceMismatch {
                expected,
                actual,
            })?;
            paint(index, run, coord);
        }
    }
    Ok(())
}

/// Reconstructs a channel from its runs.
///
/// `dest` may be smaller than the traversal grid (cropped output); cells
/// outside it still consume their traversal slot.
pub fn decode_channel<M>(
    runs: &[Run],
    traversal_dims: (usize, usize),
    dest: &mut Plane,
    mapping: &mut M,
) -> Result<()>
where
    M: LinearMapping + ?Sized,
{
    replay(runs, traversal_dims, mapping, |_, run, coord| {
        if let Some(cell) = dest.get_mut(coord.index()) {
            *cell = run.value;
        }
    })
}

/// Like `decode_channel`, but paints every run with one uniform random value
/// in `[0, 1]` so run boundaries become visible.
pub fn visualize_channel<M, R>(
    runs: &[Run],
    traversal_dims: (usize, usize),
    dest: &mut Plane,
    mapping: &mut M,
    rng: &mut R,
) -> Result<()>
where
    M: LinearMapping + ?Sized,
    R: Rng + ?Sized,
{
    let colors: Vec<f32> = runs.iter().map(|_| rng.random_range(0.0..=1.0)).collect();
    replay(runs, traversal_dims, mapping, |index, _, coord| {
        if let Some(cell) = dest.get_mut(coord.index()) {
            *cell = colors[index];
        }
    })
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
