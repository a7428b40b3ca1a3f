//! Tongue tip tracking from depth frames.
//!
//! The tracker combines three independent sensor streams:
//! - depth frames (one 16-bit sample per pixel)
//! - face landmarks carrying the mouth corners and a mouth-open detection
//! - tracked body ids selecting which user's face is followed
//!
//! For each depth frame a single pass renders an 8-bit visualization and
//! finds the pixel nearest to the camera inside the mouth region. Its
//! position relative to the mouth is mapped to one of nine directions, and a
//! temporal stabilizer rate-limits direction changes and debounces the
//! mouth-closed state.
//!
//! # Examples
//!
//! ## Single frame
//!
//! ```no_run
//! use tongue_tracking::config::{DepthConfig, TrackingConfig};
//! use tongue_tracking::depth::DepthFrame;
//! use tongue_tracking::region::Point2;
//! use tongue_tracking::tracker::{BodyUpdate, DetectionResult, FaceUpdate, TongueTracker};
//!
//! # fn main() -> tongue_tracking::Result<()> {
//! let mut tracker = TongueTracker::new(512, 424, &DepthConfig::default(), &TrackingConfig::default())?;
//!
//! tracker.update_body(&BodyUpdate { tracked_ids: vec![7] });
//! tracker.update_face(&FaceUpdate {
//!     tracking_id: 7,
//!     left_corner: Point2::new(200.0, 250.0),
//!     right_corner: Point2::new(300.0, 250.0),
//!     mouth_open: DetectionResult::Yes,
//! });
//!
//! let frame = DepthFrame::filled(512, 424, 2000, 500, 4500)?;
//! let output = tracker.process_depth(&frame)?;
//! if let Some(direction) = output.direction {
//!     println!("{direction}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Simulated sensor
//!
//! ```no_run
//! use std::sync::mpsc;
//! use tongue_tracking::app::{DirectionLog, TrackingApp};
//! use tongue_tracking::config::Config;
//! use tongue_tracking::simulation::SimulatedSensor;
//! use tongue_tracking::tracker::TongueTracker;
//!
//! # fn main() -> tongue_tracking::Result<()> {
//! let config = Config::default();
//! let tracker = TongueTracker::from_config(&config)?;
//! let sensor = SimulatedSensor::new(&config.sensor, config.simulation.clone())?;
//!
//! let (tx, rx) = mpsc::sync_channel(4);
//! let producers = sensor.spawn(tx);
//! let stats = TrackingApp::new(tracker, rx).run(&mut DirectionLog::default())?;
//! for producer in producers {
//!     let _ = producer.join();
//! }
//! println!("{} frames processed", stats.frames_processed);
//! # Ok(())
//! # }
//! ```

/// Constants used throughout the application
pub mod constants;

/// Error types and result handling
pub mod error;

/// Configuration management
pub mod config;

/// Depth frames and depth-to-grey mapping
pub mod depth;

/// Mouth region geometry and pixel indexing
pub mod region;

/// Fused visualization and tongue tip search
pub mod scanner;

/// Nine-way direction classification
pub mod direction;

/// Rate limiting and mouth-closed debouncing
pub mod stabilizer;

/// Per-frame tracking pipeline
pub mod tracker;

/// Event loop consuming sensor streams
pub mod app;

/// Synthetic depth sensor
pub mod simulation;

/// Utility functions for conversions, timing and image output
pub mod utils;

pub use error::{Error, Result};
