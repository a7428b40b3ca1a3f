//! Mouth region-of-interest derived from face landmark corners.
//!
//! The region lives in depth-frame pixel space. Pixel coordinates of a flat
//! buffer index are derived from `index + 1`, so column 0 of row `r` is the
//! last sample of row `r - 1` in the buffer. Every consumer of the region
//! (membership tests, normalization, tongue tip coordinates) uses the same
//! convention, which keeps them consistent with each other.

use crate::utils::safe_cast::{f32_to_i32, i32_to_f32};
use crate::{Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};

/// A 2D point in depth-frame pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2 {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Point2 {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Rectangular search area around the mouth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MouthRegion {
    /// Left edge (exclusive)
    pub left: i32,
    /// Top edge (exclusive)
    pub top: i32,
    /// Horizontal extent
    pub width: i32,
    /// Vertical extent
    pub height: i32,
}

impl MouthRegion {
    /// Region that contains no pixels
    pub const EMPTY: Self = Self {
        left: 0,
        top: 0,
        width: 0,
        height: 0,
    };

    /// Create a region from explicit bounds
    #[must_use]
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Derive the region from the left and right mouth corners.
    ///
    /// The height is half the corner distance and the region is centred
    /// vertically on the corners' mean. Corners in the wrong order or with
    /// non-finite coordinates give an empty region.
    #[must_use]
    pub fn from_corners(left_corner: Point2, right_corner: Point2) -> Self {
        match Self::try_from_corners(left_corner, right_corner) {
            Ok(region) => region,
            Err(e) => {
                debug!("Discarding mouth corners {left_corner:?} / {right_corner:?}: {e}");
                Self::EMPTY
            }
        }
    }

    fn try_from_corners(left_corner: Point2, right_corner: Point2) -> Result<Self> {
        let left = f32_to_i32(left_corner.x)?;
        let width = f32_to_i32(right_corner.x - left_corner.x)?.max(0);
        let height = width / 2;
        let center_y = f32_to_i32((left_corner.y + right_corner.y) / 2.0)?;
        let top = center_y
            .checked_sub(height / 2)
            .ok_or_else(|| Error::InvalidInput(format!("Mouth top above {center_y} overflows")))?;

        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    /// True when the region cannot contain any pixel
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Strict-interior test on pixel coordinates
    #[must_use]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        let left = i64::from(self.left);
        let top = i64::from(self.top);
        y > top && y < top + i64::from(self.height) && x > left && x < left + i64::from(self.width)
    }

    /// Membership test for a flat buffer index
    #[must_use]
    pub fn contains_index(&self, index: usize, frame_width: usize) -> bool {
        let (x, y) = pixel_of_index(index, frame_width);
        self.contains(to_i64(x), to_i64(y))
    }

    /// Position of a pixel relative to the region, scaled to [0, 1] for
    /// interior pixels. Returns `None` for an empty region.
    #[must_use]
    pub fn normalize(&self, x: i32, y: i32) -> Option<(f32, f32)> {
        if self.is_empty() {
            return None;
        }
        let nx = i32_to_f32(x - self.left) / i32_to_f32(self.width);
        let ny = i32_to_f32(y - self.top) / i32_to_f32(self.height);
        Some((nx, ny))
    }
}

/// Pixel coordinates `(x, y)` of a flat buffer index
///
/// # Panics
///
/// Panics if `frame_width` is zero.
#[must_use]
pub const fn pixel_of_index(index: usize, frame_width: usize) -> (usize, usize) {
    let shifted = index + 1;
    (shifted % frame_width, shifted / frame_width)
}

/// Flat buffer index of pixel `(x, y)`; inverse of [`pixel_of_index`]
#[must_use]
pub fn index_of_pixel(x: usize, y: usize, frame_width: usize) -> Option<usize> {
    if x >= frame_width {
        return None;
    }
    (y * frame_width + x).checked_sub(1)
}

#[allow(clippy::cast_possible_wrap)] // Buffer coordinates are bounded by the frame size
const fn to_i64(value: usize) -> i64 {
    value as i64
}
