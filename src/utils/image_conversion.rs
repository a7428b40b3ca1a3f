//! Conversion of visualization buffers into `image` crate types.

use crate::region::MouthRegion;
use crate::{Error, Result};
use image::{GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use std::path::Path;

/// Outline colour of the mouth region in annotated snapshots
const REGION_COLOR: Rgb<u8> = Rgb([0, 200, 0]);

/// Colour of the tongue tip in annotated snapshots
const TIP_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

/// Wrap a row-major greyscale buffer in a [`GrayImage`]
///
/// # Errors
///
/// Returns an error if the buffer length does not match the dimensions.
pub fn pixels_to_gray_image(pixels: &[u8], width: usize, height: usize) -> Result<GrayImage> {
    let expected = width * height;
    if pixels.len() != expected {
        return Err(Error::FrameSizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }
    let w = u32::try_from(width).map_err(|_| Error::InvalidInput(format!("Width {width} too large")))?;
    let h = u32::try_from(height).map_err(|_| Error::InvalidInput(format!("Height {height} too large")))?;

    ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(w, h, pixels.to_vec())
        .ok_or_else(|| Error::InvalidInput(format!("Buffer does not fit {width}x{height}")))
}

/// Colour copy of `gray` with the region outline and tongue tip drawn on it
///
/// `tip` is the flat buffer index of the tongue tip. Parts of the outline
/// outside the image are skipped.
#[must_use]
pub fn annotate(gray: &GrayImage, region: &MouthRegion, tip: Option<usize>) -> RgbImage {
    let mut rgb = RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
        let Luma([v]) = *gray.get_pixel(x, y);
        Rgb([v, v, v])
    });
    let width = i64::from(rgb.width());
    let height = i64::from(rgb.height());

    if !region.is_empty() {
        let left = i64::from(region.left);
        let top = i64::from(region.top);
        let right = left + i64::from(region.width);
        let bottom = top + i64::from(region.height);

        for x in left.max(0)..=right.min(width - 1) {
            put(&mut rgb, x, top, REGION_COLOR);
            put(&mut rgb, x, bottom, REGION_COLOR);
        }
        for y in top.max(0)..=bottom.min(height - 1) {
            put(&mut rgb, left, y, REGION_COLOR);
            put(&mut rgb, right, y, REGION_COLOR);
        }
    }

    if let Some(index) = tip.and_then(|i| i64::try_from(i).ok()).filter(|_| width > 0) {
        let (x, y) = (index % width, index / width);
        for (dx, dy) in [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)] {
            put(&mut rgb, x + dx, y + dy, TIP_COLOR);
        }
    }
    rgb
}

fn put(image: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
        return;
    };
    if x < image.width() && y < image.height() {
        image.put_pixel(x, y, color);
    }
}

/// Write a visualization buffer as PNG, optionally annotated
///
/// # Errors
///
/// Returns an error if the buffer is malformed or the file cannot be written.
pub fn save_visualization<P: AsRef<Path>>(
    path: P,
    pixels: &[u8],
    width: usize,
    height: usize,
    region: Option<(&MouthRegion, Option<usize>)>,
) -> Result<()> {
    let gray = pixels_to_gray_image(pixels, width, height)?;
    match region {
        Some((region, tip)) => annotate(&gray, region, tip).save(path)?,
        None => gray.save(path)?,
    }
    Ok(())
}
