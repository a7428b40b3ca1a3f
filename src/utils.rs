//! Utility functions for numeric conversions, timing and image output.

pub mod safe_cast;
pub mod image_conversion;

use std::time::Duration;

/// Time between frames at `fps` frames per second
///
/// A rate of zero is treated as one frame per second.
#[must_use]
pub fn frame_interval(fps: u32) -> Duration {
    Duration::from_secs(1) / fps.max(1)
}
