//! Debouncing of direction updates and of the mouth-closed state.
//!
//! Two counters run side by side. While the mouth is open, only every
//! `update_interval + 1`-th frame classifies the tongue tip; the frames in
//! between keep the previous symbol. While the mouth is closed, the closed
//! symbol appears only after `closed_threshold` consecutive closed frames.
//! A single open frame clears the closed streak.

use crate::constants::{REQUIRED_MOUTH_CLOSED_FRAME, REQUIRED_UPDATE_INFO_FRAME};
use crate::direction::{Direction, DirectionClassifier};
use log::debug;

/// What the stabilizer did with the latest observation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingPhase {
    /// Mouth open and a new direction was classified this frame
    Tracking,
    /// Previous symbol held: update interval not reached, or closed streak
    /// still below the threshold. Entered on the first open observation
    /// after [`TrackingPhase::Closed`].
    Waiting,
    /// Mouth closed for long enough; the closed symbol is shown
    Closed,
}

/// Result of one stabilizer step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilizerUpdate {
    /// Symbol to display after this step, `None` before the first emission
    pub direction: Option<Direction>,
    /// True when `direction` differs from the previous step
    pub changed: bool,
    /// State after this step
    pub phase: TrackingPhase,
    /// Last emitted tongue position
    pub position: Option<(f32, f32)>,
}

/// Rate limiter and mouth-closed hysteresis
#[derive(Debug, Clone)]
pub struct TemporalStabilizer {
    classifier: DirectionClassifier,
    update_interval: u32,
    closed_threshold: u32,
    update_count: u32,
    closed_count: u32,
    direction: Option<Direction>,
    position: Option<(f32, f32)>,
}

impl Default for TemporalStabilizer {
    fn default() -> Self {
        Self::new(
            DirectionClassifier::default(),
            REQUIRED_UPDATE_INFO_FRAME,
            REQUIRED_MOUTH_CLOSED_FRAME,
        )
    }
}

impl TemporalStabilizer {
    /// Create a stabilizer
    ///
    /// `update_interval` frames are held before each classification;
    /// `closed_threshold` consecutive closed frames produce the closed symbol.
    #[must_use]
    pub fn new(classifier: DirectionClassifier, update_interval: u32, closed_threshold: u32) -> Self {
        Self {
            classifier,
            update_interval,
            closed_threshold,
            update_count: 0,
            closed_count: 0,
            direction: None,
            position: None,
        }
    }

    /// Feed one frame that produced a tongue tip candidate
    pub fn observe(&mut self, mouth_open: bool, position: (f32, f32)) -> StabilizerUpdate {
        if mouth_open {
            self.observe_open(position)
        } else {
            self.observe_closed()
        }
    }

    /// Mouth open with the tongue tip at `position`
    pub fn observe_open(&mut self, position: (f32, f32)) -> StabilizerUpdate {
        self.closed_count = 0;

        self.update_count = self.update_count.saturating_add(1);
        if self.update_count <= self.update_interval {
            return self.hold();
        }
        self.update_count = 0;

        let (nx, ny) = position;
        let direction = self.classifier.classify(nx, ny);
        self.position = Some(position);
        debug!("Tongue at ({nx:.2}, {ny:.2}) -> {}", direction.name());
        self.emit(direction, TrackingPhase::Tracking)
    }

    /// Mouth reported closed
    pub fn observe_closed(&mut self) -> StabilizerUpdate {
        self.closed_count = self.closed_count.saturating_add(1);
        if self.closed_count < self.closed_threshold {
            return self.hold();
        }
        self.emit(Direction::Closed, TrackingPhase::Closed)
    }

    /// Currently displayed symbol
    #[must_use]
    pub const fn direction(&self) -> Option<Direction> {
        self.direction
    }

    /// Last emitted tongue position
    #[must_use]
    pub const fn position(&self) -> Option<(f32, f32)> {
        self.position
    }

    /// Consecutive closed observations so far
    #[must_use]
    pub const fn closed_count(&self) -> u32 {
        self.closed_count
    }

    /// Open observations since the last classification
    #[must_use]
    pub const fn update_count(&self) -> u32 {
        self.update_count
    }

    /// Forget all history
    pub fn reset(&mut self) {
        self.update_count = 0;
        self.closed_count = 0;
        self.direction = None;
        self.position = None;
    }

    fn hold(&self) -> StabilizerUpdate {
        StabilizerUpdate {
            direction: self.direction,
            changed: false,
            phase: TrackingPhase::Waiting,
            position: self.position,
        }
    }

    fn emit(&mut self, direction: Direction, phase: TrackingPhase) -> StabilizerUpdate {
        let changed = self.direction != Some(direction);
        self.direction = Some(direction);
        StabilizerUpdate {
            direction: self.direction,
            changed,
            phase,
            position: self.position,
        }
    }
}
