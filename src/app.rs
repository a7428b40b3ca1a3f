//! Event loop feeding sensor input into the tracker.
//!
//! Depth, face and body data are produced independently and arrive over one
//! channel. The loop blocks for the next event, then drains up to a fixed
//! number of pending events: every face and body update is applied in order,
//! but only the newest depth frame is processed. Older frames in the same
//! batch are dropped, so the display never lags behind the sensor.

use crate::constants::DEFAULT_DRAIN_LIMIT;
use crate::depth::DepthFrame;
use crate::direction::Direction;
use crate::tracker::{BodyUpdate, FaceUpdate, FrameOutput, TongueTracker};
use crate::Result;
use log::{debug, info, warn};
use std::sync::mpsc::Receiver;

/// Input delivered by the sensor runtime
#[derive(Debug, Clone)]
pub enum SensorEvent {
    /// New depth capture
    Depth(DepthFrame),
    /// New face landmarks
    Face(FaceUpdate),
    /// New set of tracked bodies
    Body(BodyUpdate),
    /// Sensor became available (true) or unavailable (false)
    Availability(bool),
}

/// Display layer receiving each processed frame
pub trait FrameSink {
    /// Show one frame's output
    ///
    /// # Errors
    ///
    /// Implementations may fail; the error stops the loop.
    fn present(&mut self, output: &FrameOutput<'_>) -> Result<()>;
}

impl<F> FrameSink for F
where
    F: FnMut(&FrameOutput<'_>) -> Result<()>,
{
    fn present(&mut self, output: &FrameOutput<'_>) -> Result<()> {
        self(output)
    }
}

/// Sink that logs and records direction changes
#[derive(Debug, Default, Clone)]
pub struct DirectionLog {
    changes: Vec<Direction>,
}

impl DirectionLog {
    /// Directions in the order they were shown
    #[must_use]
    pub fn changes(&self) -> &[Direction] {
        &self.changes
    }
}

impl FrameSink for DirectionLog {
    fn present(&mut self, output: &FrameOutput<'_>) -> Result<()> {
        if !output.changed {
            return Ok(());
        }
        if let Some(direction) = output.direction {
            match output.position {
                Some((nx, ny)) if direction.is_open() => info!("{direction}  {nx:.2}, {ny:.2}"),
                _ => info!("{direction}"),
            }
            self.changes.push(direction);
        }
        Ok(())
    }
}

/// Counters collected by [`TrackingApp::run`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// Depth frames received
    pub frames_received: u64,
    /// Depth frames run through the tracker
    pub frames_processed: u64,
    /// Depth frames superseded by a newer one before processing
    pub frames_dropped: u64,
    /// Depth frames the tracker refused
    pub frames_rejected: u64,
    /// Face updates received
    pub face_updates: u64,
    /// Body updates received
    pub body_updates: u64,
}

/// Single consumer of sensor events
pub struct TrackingApp {
    tracker: TongueTracker,
    receiver: Receiver<SensorEvent>,
    frame_limit: Option<u64>,
    drain_limit: usize,
    stats: RunStats,
}

impl TrackingApp {
    /// Create an app consuming `receiver`
    #[must_use]
    pub fn new(tracker: TongueTracker, receiver: Receiver<SensorEvent>) -> Self {
        Self {
            tracker,
            receiver,
            frame_limit: None,
            drain_limit: DEFAULT_DRAIN_LIMIT,
            stats: RunStats::default(),
        }
    }

    /// Stop after processing `limit` depth frames
    #[must_use]
    pub fn with_frame_limit(mut self, limit: u64) -> Self {
        self.frame_limit = Some(limit);
        self
    }

    /// Apply at most `limit` pending events after each blocking receive
    #[must_use]
    pub fn with_drain_limit(mut self, limit: usize) -> Self {
        self.drain_limit = limit;
        self
    }

    /// Run until every producer has disconnected or the frame limit is hit
    ///
    /// # Errors
    ///
    /// Returns the first error reported by `sink`.
    pub fn run<S: FrameSink>(&mut self, sink: &mut S) -> Result<RunStats> {
        info!("Starting tracking loop");

        while let Ok(first) = self.receiver.recv() {
            let mut latest_depth = None;
            self.apply(first, &mut latest_depth);
            for _ in 0..self.drain_limit {
                match self.receiver.try_recv() {
                    Ok(event) => self.apply(event, &mut latest_depth),
                    Err(_) => break,
                }
            }

            if let Some(frame) = latest_depth {
                self.process(&frame, sink)?;
                if self.frame_limit.is_some_and(|limit| self.stats.frames_processed >= limit) {
                    info!("Frame limit reached");
                    return Ok(self.stats);
                }
            }
        }

        info!("All sensor producers disconnected");
        Ok(self.stats)
    }

    fn apply(&mut self, event: SensorEvent, latest_depth: &mut Option<DepthFrame>) {
        match event {
            SensorEvent::Depth(frame) => {
                self.stats.frames_received += 1;
                if latest_depth.replace(frame).is_some() {
                    self.stats.frames_dropped += 1;
                    debug!("Dropping stale depth frame");
                }
            }
            SensorEvent::Face(update) => {
                self.stats.face_updates += 1;
                self.tracker.update_face(&update);
            }
            SensorEvent::Body(update) => {
                self.stats.body_updates += 1;
                self.tracker.update_body(&update);
            }
            SensorEvent::Availability(available) => {
                info!("Sensor {}", if available { "Running" } else { "Not Available" });
            }
        }
    }

    fn process<S: FrameSink>(&mut self, frame: &DepthFrame, sink: &mut S) -> Result<()> {
        match self.tracker.process_depth(frame) {
            Ok(output) => sink.present(&output)?,
            Err(e) => {
                warn!("Skipping depth frame: {e}");
                self.stats.frames_rejected += 1;
                return Ok(());
            }
        }
        self.stats.frames_processed += 1;
        Ok(())
    }

    /// Tracker driven by this app
    #[must_use]
    pub const fn tracker(&self) -> &TongueTracker {
        &self.tracker
    }

    /// Counters so far
    #[must_use]
    pub const fn stats(&self) -> RunStats {
        self.stats
    }
}
