//! Grows a channel to its traversal size with padding sentinels.

use ndarray::s;

use crate::error::{CurveRleError, Result};
use crate::types::{Plane, PADDING_SENTINEL};

/// Returns a `padded_height x padded_width` copy of `plane` with the original
/// samples in the top-left corner and `PADDING_SENTINEL` everywhere else.
pub fn pad_plane(plane: &Plane, padded_height: usize, padded_width: usize) -> Result<Plane> {
    let (height, width) = plane.dim();
    if padded_height < height || padded_width < width {
        return Err(CurveRleError::InvariantViolation(format!(
            "cannot pad a {}x{} channel down to {}x{}",
            height, width, padded_height, padded_width
        )));
    }

    let mut padded = Plane::from_elem((padded_height, padded_width), PADDING_SENTINEL);
    padded.slice_mut(s![..height, ..width]).assign(plane);
    Ok(padded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_pad_3x3_to_4x4() {
        let plane = array![[0.1f32, 0.2, 0.3], [0.4, 0.5, 0.6], [0.7, 0.8, 0.9]];
        let padded = pad_plane(&plane, 4, 4).unwrap();
        assert_eq!(padded.dim(), (4, 4));
        assert_eq!(padded.slice(s![..3, ..3]), plane);
        assert!(padded.row(3).iter().all(|&v| v == PADDING_SENTINEL));
        assert!(padded.column(3).iter().all(|&v| v == PADDING_SENTINEL));
    }

    #[test]
    fn test_pad_to_same_size_is_a_copy() {
        let plane = array![[0.25f32, 0.75]];
        assert_eq!(pad_plane(&plane, 1, 2).unwrap(), plane);
    }

    #[test]
    fn test_pad_smaller_is_rejected() {
        let plane = Plane::zeros((4, 4));
        assert!(matches!(
            pad_plane(&plane, 2, 8),
            Err(CurveRleError::InvariantViolation(_))
        ));
    }
}
