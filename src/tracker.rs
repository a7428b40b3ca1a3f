//! Per-frame tongue tracking pipeline.
//!
//! [`TongueTracker`] owns everything that survives between frames: the
//! active body id, the last mouth region, the last mouth-open flag and the
//! stabilizer counters. Face and body updates only replace that state;
//! depth frames always run against whatever was stored last.

use crate::config::{Config, DepthConfig, TrackingConfig};
use crate::depth::DepthFrame;
use crate::direction::{Direction, DirectionClassifier};
use crate::region::{MouthRegion, Point2};
use crate::scanner::{TongueTipCandidate, TongueTipScanner};
use crate::stabilizer::{TemporalStabilizer, TrackingPhase};
use crate::{Error, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Face property detection outcome reported by the face tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionResult {
    /// Not determined
    #[default]
    Unknown,
    /// Property absent
    No,
    /// Property possibly present
    Maybe,
    /// Property present
    Yes,
}

impl DetectionResult {
    /// Interpret the result as "mouth open"
    #[must_use]
    pub const fn is_open(self, treat_maybe_as_open: bool) -> bool {
        match self {
            Self::Yes => true,
            Self::Maybe => treat_maybe_as_open,
            Self::No | Self::Unknown => false,
        }
    }
}

/// Face landmarks for the tracked user
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceUpdate {
    /// Body the face belongs to
    pub tracking_id: u64,
    /// Left mouth corner in depth pixel space
    pub left_corner: Point2,
    /// Right mouth corner in depth pixel space
    pub right_corner: Point2,
    /// Mouth-open detection
    pub mouth_open: DetectionResult,
}

/// Bodies currently seen by the sensor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BodyUpdate {
    /// Ids of tracked bodies, in sensor slot order
    pub tracked_ids: Vec<u64>,
}

/// State carried from one frame to the next
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackingState {
    /// Body whose face is followed
    pub tracking_id: Option<u64>,
    /// Last mouth region derived from face data
    pub region: MouthRegion,
    /// Last mouth-open flag derived from face data
    pub mouth_open: bool,
}

/// Everything the display layer needs after one depth frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput<'a> {
    /// 8-bit visualization, same dimensions as the depth frame
    pub pixels: &'a [u8],
    /// Frame width in pixels
    pub width: usize,
    /// Frame height in pixels
    pub height: usize,
    /// Tongue tip found in this frame
    pub candidate: Option<TongueTipCandidate>,
    /// Symbol to display
    pub direction: Option<Direction>,
    /// True when `direction` changed on this frame
    pub changed: bool,
    /// Stabilizer state, `None` when the frame had no candidate
    pub phase: Option<TrackingPhase>,
    /// Last emitted normalized tongue position
    pub position: Option<(f32, f32)>,
}

/// Tongue tracking pipeline for one user
#[derive(Debug, Clone)]
pub struct TongueTracker {
    frame_width: usize,
    frame_height: usize,
    treat_maybe_as_open: bool,
    scanner: TongueTipScanner,
    stabilizer: TemporalStabilizer,
    state: TrackingState,
    frames_processed: u64,
}

impl TongueTracker {
    /// Create a tracker for frames of the given size
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are zero or the depth and tracking
    /// parameters are invalid.
    pub fn new(frame_width: usize, frame_height: usize, depth: &DepthConfig, tracking: &TrackingConfig) -> Result<Self> {
        if frame_width == 0 || frame_height == 0 {
            return Err(Error::InvalidInput(format!(
                "Frame dimensions must be non-zero, got {frame_width}x{frame_height}"
            )));
        }
        let len = frame_width
            .checked_mul(frame_height)
            .ok_or_else(|| Error::InvalidInput(format!("Frame {frame_width}x{frame_height} is too large")))?;

        let classifier = DirectionClassifier::new(tracking.lower_threshold, tracking.upper_threshold)?;
        let stabilizer = TemporalStabilizer::new(
            classifier,
            tracking.update_interval_frames,
            tracking.closed_threshold_frames,
        );
        let scanner = TongueTipScanner::new(depth.depth_span, depth.clip_to_max_reliable, len)?;

        Ok(Self {
            frame_width,
            frame_height,
            treat_maybe_as_open: tracking.treat_maybe_as_open,
            scanner,
            stabilizer,
            state: TrackingState::default(),
            frames_processed: 0,
        })
    }

    /// Create a tracker from the application configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.sensor.frame_width,
            config.sensor.frame_height,
            &config.depth,
            &config.tracking,
        )
    }

    /// Acquire or release the tracked body.
    ///
    /// The active id is released when it disappears from the update. With no
    /// active id, the last tracked body in the update is followed.
    pub fn update_body(&mut self, update: &BodyUpdate) {
        if let Some(id) = self.state.tracking_id {
            if update.tracked_ids.contains(&id) {
                return;
            }
            self.lose_tracking();
        }

        if let Some(&id) = update.tracked_ids.last() {
            info!("Tracking body {id}");
            self.state.tracking_id = Some(id);
        }
    }

    /// Stop following the current body. Region and mouth state are kept.
    pub fn lose_tracking(&mut self) {
        if let Some(id) = self.state.tracking_id.take() {
            info!("Lost body {id}");
        }
    }

    /// Store new face data for the tracked body.
    ///
    /// Returns false when the update belongs to another body and was ignored.
    pub fn update_face(&mut self, update: &FaceUpdate) -> bool {
        if self.state.tracking_id != Some(update.tracking_id) {
            debug!(
                "Ignoring face data for body {} (tracking {:?})",
                update.tracking_id, self.state.tracking_id
            );
            return false;
        }

        self.state.region = MouthRegion::from_corners(update.left_corner, update.right_corner);
        self.state.mouth_open = update.mouth_open.is_open(self.treat_maybe_as_open);
        true
    }

    /// Run one depth frame through the pipeline
    ///
    /// # Errors
    ///
    /// Returns an error if the frame dimensions differ from the tracker's.
    /// State is left untouched in that case.
    pub fn process_depth(&mut self, frame: &DepthFrame) -> Result<FrameOutput<'_>> {
        if frame.width() != self.frame_width || frame.height() != self.frame_height {
            return Err(Error::FrameDimensions {
                width: frame.width(),
                height: frame.height(),
                sensor_width: self.frame_width,
                sensor_height: self.frame_height,
            });
        }
        self.frames_processed += 1;

        let candidate = self.scanner.scan(frame, &self.state.region);
        let (changed, phase) = match candidate {
            Some(tip) => {
                let update = self.stabilizer.observe(self.state.mouth_open, tip.position);
                if update.changed {
                    if let Some(direction) = update.direction {
                        info!("Direction {} ({})", direction, direction.name());
                    }
                }
                (update.changed, Some(update.phase))
            }
            None => (false, None),
        };

        Ok(FrameOutput {
            pixels: self.scanner.pixels(),
            width: self.frame_width,
            height: self.frame_height,
            candidate,
            direction: self.stabilizer.direction(),
            changed,
            phase,
            position: self.stabilizer.position(),
        })
    }

    /// State carried between frames
    #[must_use]
    pub const fn state(&self) -> &TrackingState {
        &self.state
    }

    /// Currently displayed symbol
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        self.stabilizer.direction()
    }

    /// Last emitted normalized tongue position
    #[must_use]
    pub const fn position(&self) -> Option<(f32, f32)> {
        self.stabilizer.position()
    }

    /// Visualization of the last processed frame
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        self.scanner.pixels()
    }

    /// Frame dimensions `(width, height)`
    #[must_use]
    pub const fn frame_size(&self) -> (usize, usize) {
        (self.frame_width, self.frame_height)
    }

    /// Number of depth frames processed
    #[must_use]
    pub const fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    /// Forget the tracked body, region and stabilizer history
    pub fn reset(&mut self) {
        self.state = TrackingState::default();
        self.stabilizer.reset();
    }
}
