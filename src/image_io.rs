// In: src/image_io.rs

//! Conversion between image files and normalized channel planes.
//!
//! Samples are normalized as `byte / 255` on load and mapped back with
//! `round(v * 255)` clamped to `[0, 255]` on save. Images with 16-bit or
//! float samples are reduced to 8 bits on load.

use std::path::Path;

use image::{DynamicImage, ExtendedColorType};

use crate::error::{CurveRleError, Result};
use crate::types::Plane;

/// An image split into one plane per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ImagePlanes {
    pub height: usize,
    pub width: usize,
    pub channels: Vec<Plane>,
}

/// Reads an image file and splits it into normalized planes. The channel
/// count follows the file: 1 (L), 2 (LA), 3 (RGB) or 4 (RGBA).
pub fn load_image(path: impl AsRef<Path>) -> Result<ImagePlanes> {
    let path = path.as_ref();
    let image = image::open(path)?;
    log::info!(
        "Loaded {} ({}x{}, {:?})",
        path.display(),
        image.width(),
        image.height(),
        image.color()
    );
    Ok(split_channels(image))
}

/// Splits a decoded image into normalized planes.
pub fn split_channels(image: DynamicImage) -> ImagePlanes {
    let channel_count = usize::from(image.color().channel_count());
    let (width, height) = (image.width() as usize, image.height() as usize);
    let (channel_count, raw) = match channel_count {
        1 => (1, image.into_luma8().into_raw()),
        2 => (2, image.into_luma_alpha8().into_raw()),
        3 => (3, image.into_rgb8().into_raw()),
        _ => (4, image.into_rgba8().into_raw()),
    };

    let channels = (0..channel_count)
        .map(|ch| {
            Plane::from_shape_fn((height, width), |(r, c)| {
                f32::from(raw[(r * width + c) * channel_count + ch]) / 255.0
            })
        })
        .collect();

    ImagePlanes {
        height,
        width,
        channels,
    }
}

/// Interleaves planes back into 8-bit samples.
pub fn interleave_channels(channels: &[Plane]) -> Result<(Vec<u8>, ExtendedColorType, u32, u32)> {
    let color = match channels.len() {
        1 => ExtendedColorType::L8,
        2 => ExtendedColorType::La8,
        3 => ExtendedColorType::Rgb8,
        4 => ExtendedColorType::Rgba8,
        n => {
            return Err(CurveRleError::InvalidArgument(format!(
                "cannot save an image with {} channels",
                n
            )))
        }
    };
    let (height, width) = channels[0].dim();
    if channels.iter().any(|p| p.dim() != (height, width)) {
        return Err(CurveRleError::InvariantViolation(
            "channels of one image must share a shape".into(),
        ));
    }
    let to_u32 = |v: usize| {
        u32::try_from(v).map_err(|_| {
            CurveRleError::InvalidArgument(format!("dimension {} does not fit an image", v))
        })
    };

    let mut raw = Vec::with_capacity(height * width * channels.len());
    for r in 0..height {
        for c in 0..width {
            raw.extend(channels.iter().map(|p| to_byte(p[[r, c]])));
        }
    }
    Ok((raw, color, to_u32(width)?, to_u32(height)?))
}

/// Writes planes to an image file; the format follows the path's extension.
pub fn save_image(path: impl AsRef<Path>, channels: &[Plane]) -> Result<()> {
    let path = path.as_ref();
    let (raw, color, width, height) = interleave_channels(channels)?;
    image::save_buffer(path, &raw, width, height, color)?;
    log::info!("Saved {} ({}x{}, {:?})", path.display(), width, height, color);
    Ok(())
}

#[inline]
fn to_byte(value: f32) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, RgbImage};

    #[test]
    fn test_split_rgb_normalizes_each_channel() {
        let image = RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8, y as u8 * 100, 255]));
        let planes = split_channels(DynamicImage::ImageRgb8(image));

        assert_eq!((planes.height, planes.width), (2, 3));
        assert_eq!(planes.channels.len(), 3);
        assert_eq!(planes.channels[0][[1, 2]], 2.0 / 255.0);
        assert_eq!(planes.channels[1][[1, 0]], 100.0 / 255.0);
        assert!(planes.channels[2].iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_interleave_restores_bytes() {
        let image = GrayImage::from_fn(4, 3, |x, y| image::Luma([(x * 60 + y) as u8]));
        let raw = image.clone().into_raw();
        let planes = split_channels(DynamicImage::ImageLuma8(image));

        let (bytes, color, width, height) = interleave_channels(&planes.channels).unwrap();
        assert_eq!(color, ExtendedColorType::L8);
        assert_eq!((width, height), (4, 3));
        assert_eq!(bytes, raw);
    }

    #[test]
    fn test_to_byte_rounds_and_clamps() {
        assert_eq!(to_byte(0.5), 128);
        assert_eq!(to_byte(-0.2), 0);
        assert_eq!(to_byte(1.7), 255);
        assert_eq!(to_byte(127.0 / 255.0), 127);
    }

    #[test]
    fn test_interleave_rejects_bad_channel_sets() {
        assert!(matches!(
            interleave_channels(&vec![Plane::zeros((2, 2)); 5]),
            Err(CurveRleError::InvalidArgument(_))
        ));
        assert!(matches!(
            interleave_channels(&[Plane::zeros((2, 2)), Plane::zeros((2, 3))]),
            Err(CurveRleError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_png_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("curve_rle_io_{}.png", std::process::id()));
        let channels = vec![
            Plane::from_shape_fn((5, 4), |(r, c)| (r * 4 + c) as f32 * 10.0 / 255.0),
            Plane::from_elem((5, 4), 1.0),
        ];

        save_image(&path, &channels).unwrap();
        let loaded = load_image(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!((loaded.height, loaded.width), (5, 4));
        assert_eq!(loaded.channels, channels);
    }
}
