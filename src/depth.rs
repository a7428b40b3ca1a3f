//! Depth frames and their conversion to 8-bit grayscale.

use crate::constants::{BYTE_LEVELS, NO_DATA, REGION_FILL};
use crate::{Error, Result};

/// One capture from the depth sensor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthFrame {
    width: usize,
    height: usize,
    samples: Vec<u16>,
    min_reliable_depth: u16,
    max_reliable_depth: u16,
}

impl DepthFrame {
    /// Create a frame from row-major samples
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or `samples` does not hold
    /// exactly `width * height` values.
    pub fn new(
        width: usize,
        height: usize,
        samples: Vec<u16>,
        min_reliable_depth: u16,
        max_reliable_depth: u16,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidInput(format!(
                "Depth frame dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let expected = width
            .checked_mul(height)
            .ok_or_else(|| Error::InvalidInput(format!("Depth frame {width}x{height} is too large")))?;
        if samples.len() != expected {
            return Err(Error::FrameSizeMismatch {
                expected,
                actual: samples.len(),
            });
        }

        Ok(Self {
            width,
            height,
            samples,
            min_reliable_depth,
            max_reliable_depth,
        })
    }

    /// Frame filled with a single depth value
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero.
    pub fn filled(
        width: usize,
        height: usize,
        depth: u16,
        min_reliable_depth: u16,
        max_reliable_depth: u16,
    ) -> Result<Self> {
        let len = width
            .checked_mul(height)
            .ok_or_else(|| Error::InvalidInput(format!("Depth frame {width}x{height} is too large")))?;
        Self::new(width, height, vec![depth; len], min_reliable_depth, max_reliable_depth)
    }

    /// Width in pixels
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Raw depth samples, row-major
    #[must_use]
    pub fn samples(&self) -> &[u16] {
        &self.samples
    }

    /// Mutable access to the samples, for producers building a frame in place
    pub fn samples_mut(&mut self) -> &mut [u16] {
        &mut self.samples
    }

    /// Closest depth the sensor considers reliable
    #[must_use]
    pub const fn min_reliable_depth(&self) -> u16 {
        self.min_reliable_depth
    }

    /// Farthest depth the sensor considers reliable
    #[must_use]
    pub const fn max_reliable_depth(&self) -> u16 {
        self.max_reliable_depth
    }

    /// Number of samples
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed frame
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Classification of a pixel during the visualization pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelClass {
    /// Inside the mouth region: highlighted and searched for the tongue tip
    Inside,
    /// Outside the mouth region: rendered from its depth
    Outside,
}

/// Maps raw depth samples onto display bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthMapping {
    divisor: u16,
    min_depth: u16,
    max_depth: u16,
}

impl DepthMapping {
    /// Build a mapping whose divisor spreads `depth_span` over the byte range
    ///
    /// # Errors
    ///
    /// Returns an error if `depth_span` is smaller than 256, which would give
    /// a zero divisor.
    pub fn new(depth_span: u16, min_depth: u16, max_depth: u16) -> Result<Self> {
        let divisor = depth_span / BYTE_LEVELS;
        if divisor == 0 {
            return Err(Error::InvalidInput(format!(
                "Depth span {depth_span} must be at least {BYTE_LEVELS}"
            )));
        }
        Ok(Self {
            divisor,
            min_depth,
            max_depth,
        })
    }

    /// Same divisor with a different reliable range
    #[must_use]
    pub const fn with_range(self, min_depth: u16, max_depth: u16) -> Self {
        Self {
            divisor: self.divisor,
            min_depth,
            max_depth,
        }
    }

    /// Depth units per grey level
    #[must_use]
    pub const fn divisor(&self) -> u16 {
        self.divisor
    }

    /// Display byte for a pixel outside the region
    ///
    /// Depth outside the reliable range renders as black. Depth beyond the
    /// span saturates at white.
    #[must_use]
    pub fn outside_byte(&self, depth: u16) -> u8 {
        if depth < self.min_depth || depth > self.max_depth {
            return NO_DATA;
        }
        u8::try_from(depth / self.divisor).unwrap_or(u8::MAX)
    }

    /// Display byte for a classified pixel
    #[must_use]
    pub fn byte_for(&self, class: PixelClass, depth: u16) -> u8 {
        match class {
            PixelClass::Inside => REGION_FILL,
            PixelClass::Outside => self.outside_byte(depth),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rejects_wrong_length() {
        let result = DepthFrame::new(4, 3, vec![0; 11], 500, 4500);
        assert!(matches!(
            result,
            Err(Error::FrameSizeMismatch {
                expected: 12,
                actual: 11
            })
        ));
    }

    #[test]
    fn test_frame_rejects_zero_dimensions() {
        assert!(DepthFrame::new(0, 3, vec![], 500, 4500).is_err());
        assert!(DepthFrame::filled(3, 0, 1000, 500, 4500).is_err());
    }

    #[test]
    fn test_filled_frame() {
        let frame = DepthFrame::filled(8, 2, 1234, 500, 4500).unwrap();
        assert_eq!(frame.len(), 16);
        assert!(frame.samples().iter().all(|&d| d == 1234));
        assert_eq!(frame.min_reliable_depth(), 500);
        assert_eq!(frame.max_reliable_depth(), 4500);
    }

    #[test]
    fn test_default_divisor() {
        let mapping = DepthMapping::new(8000, 500, 4500).unwrap();
        assert_eq!(mapping.divisor(), 31);
        assert!(DepthMapping::new(255, 0, 100).is_err());
    }

    #[test]
    fn test_outside_byte() {
        let mapping = DepthMapping::new(8000, 500, 4000).unwrap();
        assert_eq!(mapping.outside_byte(2000), 64);
        assert_eq!(mapping.outside_byte(500), 16);
        assert_eq!(mapping.outside_byte(4000), 129);
        assert_eq!(mapping.outside_byte(499), 0);
        assert_eq!(mapping.outside_byte(4001), 0);
        assert_eq!(mapping.outside_byte(0), 0);
    }

    #[test]
    fn test_outside_byte_saturates_past_span() {
        let mapping = DepthMapping::new(8000, 0, u16::MAX).unwrap();
        assert_eq!(mapping.outside_byte(7905), 255);
        assert_eq!(mapping.outside_byte(7936), 255);
        assert_eq!(mapping.outside_byte(u16::MAX), 255);
    }

    #[test]
    fn test_byte_for_inside_ignores_depth() {
        let mapping = DepthMapping::new(8000, 500, 4000).unwrap();
        assert_eq!(mapping.byte_for(PixelClass::Inside, 0), 255);
        assert_eq!(mapping.byte_for(PixelClass::Inside, 9000), 255);
        assert_eq!(mapping.byte_for(PixelClass::Outside, 3100), 100);
    }
}
