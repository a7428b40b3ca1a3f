//! Fused visualization and tongue tip search.
//!
//! Every depth sample is visited exactly once. Pixels inside the mouth region
//! are painted white and compared against the running minimum depth; pixels
//! outside are rendered from their depth. The nearest in-region pixel is the
//! tongue tip candidate and is painted black after the pass.

use crate::constants::TONGUE_TIP_MARK;
use crate::depth::{DepthFrame, DepthMapping, PixelClass};
use crate::region::{pixel_of_index, MouthRegion};
use crate::utils::safe_cast::usize_to_i32;
use crate::{Error, Result};
use log::trace;

/// Nearest-to-camera pixel inside the mouth region for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TongueTipCandidate {
    /// Flat index into the depth buffer
    pub index: usize,
    /// Pixel column
    pub x: i32,
    /// Pixel row
    pub y: i32,
    /// Raw depth sample
    pub depth: u16,
    /// Position relative to the mouth region, `(nx, ny)`
    pub position: (f32, f32),
}

/// Scans depth frames and keeps the visualization buffer between frames
#[derive(Debug, Clone)]
pub struct TongueTipScanner {
    mapping: DepthMapping,
    clip_to_max_reliable: bool,
    pixels: Vec<u8>,
}

impl TongueTipScanner {
    /// Create a scanner for frames of `len` samples
    ///
    /// # Errors
    ///
    /// Returns an error if `depth_span` yields a zero divisor.
    pub fn new(depth_span: u16, clip_to_max_reliable: bool, len: usize) -> Result<Self> {
        Ok(Self {
            mapping: DepthMapping::new(depth_span, 0, u16::MAX)?,
            clip_to_max_reliable,
            pixels: vec![0; len],
        })
    }

    /// Run the fused pass over `frame`, returning the tongue tip candidate
    pub fn scan(&mut self, frame: &DepthFrame, region: &MouthRegion) -> Option<TongueTipCandidate> {
        let max_depth = if self.clip_to_max_reliable {
            frame.max_reliable_depth()
        } else {
            u16::MAX
        };
        let mapping = self.mapping.with_range(frame.min_reliable_depth(), max_depth);

        self.pixels.resize(frame.len(), 0);
        let candidate = scan_pixels(frame, region, &mapping, &mut self.pixels);
        trace!("Scan over {} samples, candidate {:?}", frame.len(), candidate);
        candidate
    }

    /// Visualization of the last scanned frame
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

}

/// Classify a flat index against the region
#[inline]
#[must_use]
pub fn classify_pixel(region: &MouthRegion, index: usize, frame_width: usize) -> PixelClass {
    if region.contains_index(index, frame_width) {
        PixelClass::Inside
    } else {
        PixelClass::Outside
    }
}

/// Fill `pixels` with the visualization of `frame` and locate the tongue tip.
///
/// # Errors
///
/// Returns an error unless `pixels` holds exactly one byte per sample.
pub fn scan_into(
    frame: &DepthFrame,
    region: &MouthRegion,
    mapping: &DepthMapping,
    pixels: &mut [u8],
) -> Result<Option<TongueTipCandidate>> {
    if pixels.len() != frame.len() {
        return Err(Error::FrameSizeMismatch {
            expected: frame.len(),
            actual: pixels.len(),
        });
    }
    Ok(scan_pixels(frame, region, mapping, pixels))
}

fn scan_pixels(
    frame: &DepthFrame,
    region: &MouthRegion,
    mapping: &DepthMapping,
    pixels: &mut [u8],
) -> Option<TongueTipCandidate> {
    let width = frame.width();
    let searchable = !region.is_empty();
    let mut closest: Option<(usize, u16)> = None;

    for (index, (&depth, pixel)) in frame.samples().iter().zip(pixels.iter_mut()).enumerate() {
        let class = if searchable {
            classify_pixel(region, index, width)
        } else {
            PixelClass::Outside
        };
        *pixel = mapping.byte_for(class, depth);

        // Strict comparison keeps the first minimum in scan order
        if class == PixelClass::Inside && closest.map_or(true, |(_, nearest)| depth < nearest) {
            closest = Some((index, depth));
        }
    }

    let (index, depth) = closest?;
    if let Some(pixel) = pixels.get_mut(index) {
        *pixel = TONGUE_TIP_MARK;
    }

    let (x, y) = pixel_of_index(index, width);
    let x = usize_to_i32(x).ok()?;
    let y = usize_to_i32(y).ok()?;
    let position = region.normalize(x, y)?;

    Some(TongueTipCandidate {
        index,
        x,
        y,
        depth,
        position,
    })
}
