//! Configuration management for the tongue tracker

use crate::constants::{
    DEFAULT_DEPTH_SPAN, DEFAULT_FPS, DEFAULT_FRAME_HEIGHT, DEFAULT_FRAME_WIDTH, DEFAULT_LOWER_THRESHOLD,
    DEFAULT_MAX_RELIABLE_DEPTH, DEFAULT_MIN_RELIABLE_DEPTH, DEFAULT_UPPER_THRESHOLD, REQUIRED_MOUTH_CLOSED_FRAME,
    REQUIRED_UPDATE_INFO_FRAME,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Depth sensor geometry
    pub sensor: SensorConfig,

    /// Depth visualization
    pub depth: DepthConfig,

    /// Direction tracking and debouncing
    pub tracking: TrackingConfig,

    /// Synthetic sensor used by the demo binary
    pub simulation: SimulationConfig,
}

/// Depth sensor geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorConfig {
    /// Depth frame width in pixels
    pub frame_width: usize,

    /// Depth frame height in pixels
    pub frame_height: usize,

    /// Depth frames per second
    pub fps: u32,
}

/// Depth visualization parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Depth span spread over the 256 grey levels
    pub depth_span: u16,

    /// Render depth beyond the sensor's reliable maximum as black
    pub clip_to_max_reliable: bool,
}

/// Direction tracking parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Open-mouth frames held before each new direction
    pub update_interval_frames: u32,

    /// Consecutive closed-mouth frames before the closed symbol
    pub closed_threshold_frames: u32,

    /// Lower band edge of the 3x3 grid (0.0-1.0)
    pub lower_threshold: f32,

    /// Upper band edge of the 3x3 grid (0.0-1.0)
    pub upper_threshold: f32,

    /// Count a "maybe" mouth-open detection as open
    pub treat_maybe_as_open: bool,
}

/// Synthetic sensor parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of depth frames to produce (0 runs until interrupted)
    pub frames: u64,

    /// Depth frames between face updates
    pub face_update_every: u32,

    /// Length of one open/closed mouth cycle in frames
    pub mouth_cycle_frames: u32,

    /// Closed frames at the end of each mouth cycle
    pub mouth_closed_frames: u32,

    /// Frames for the tongue tip to orbit the mouth once
    pub orbit_frames: u32,

    /// Depth of the face plane
    pub face_depth: u16,

    /// Depth of the tongue tip
    pub tongue_depth: u16,

    /// Depth of the background
    pub background_depth: u16,

    /// Closest depth the simulated sensor reports as reliable
    pub min_reliable_depth: u16,

    /// Farthest depth the simulated sensor reports as reliable
    pub max_reliable_depth: u16,

    /// Pace producers at the sensor frame rate
    pub realtime: bool,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            frame_width: DEFAULT_FRAME_WIDTH,
            frame_height: DEFAULT_FRAME_HEIGHT,
            fps: DEFAULT_FPS,
        }
    }
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self {
            depth_span: DEFAULT_DEPTH_SPAN,
            clip_to_max_reliable: true,
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            update_interval_frames: REQUIRED_UPDATE_INFO_FRAME,
            closed_threshold_frames: REQUIRED_MOUTH_CLOSED_FRAME,
            lower_threshold: DEFAULT_LOWER_THRESHOLD,
            upper_threshold: DEFAULT_UPPER_THRESHOLD,
            treat_maybe_as_open: false,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            frames: 300,
            face_update_every: 2,
            mouth_cycle_frames: 120,
            mouth_closed_frames: 20,
            orbit_frames: 90,
            face_depth: 800,
            tongue_depth: 720,
            background_depth: 2500,
            min_reliable_depth: DEFAULT_MIN_RELIABLE_DEPTH,
            max_reliable_depth: DEFAULT_MAX_RELIABLE_DEPTH,
            realtime: false,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid configuration.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting found.
    pub fn validate(&self) -> Result<()> {
        if self.sensor.frame_width == 0 || self.sensor.frame_height == 0 {
            return Err(Error::ConfigError("Frame dimensions must be greater than 0".to_string()));
        }
        if self.sensor.fps == 0 {
            return Err(Error::ConfigError("Sensor FPS must be greater than 0".to_string()));
        }

        if self.depth.depth_span < 256 {
            return Err(Error::ConfigError("Depth span must be at least 256".to_string()));
        }

        let tracking = &self.tracking;
        if tracking.closed_threshold_frames == 0 {
            return Err(Error::ConfigError(
                "Closed threshold must be at least 1 frame".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&tracking.lower_threshold) || !(0.0..=1.0).contains(&tracking.upper_threshold) {
            return Err(Error::ConfigError(
                "Direction thresholds must be between 0.0 and 1.0".to_string(),
            ));
        }
        if tracking.lower_threshold >= tracking.upper_threshold {
            return Err(Error::ConfigError(
                "Lower threshold must be below upper threshold".to_string(),
            ));
        }

        let simulation = &self.simulation;
        if simulation.face_update_every == 0 || simulation.orbit_frames == 0 {
            return Err(Error::ConfigError(
                "Simulation cadences must be greater than 0".to_string(),
            ));
        }
        if simulation.mouth_closed_frames > simulation.mouth_cycle_frames {
            return Err(Error::ConfigError(
                "Closed frames cannot exceed the mouth cycle".to_string(),
            ));
        }
        if simulation.min_reliable_depth > simulation.max_reliable_depth {
            return Err(Error::ConfigError(
                "Reliable depth range is inverted".to_string(),
            ));
        }
        if simulation.tongue_depth >= simulation.face_depth {
            return Err(Error::ConfigError(
                "Tongue tip must be closer than the face plane".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Tongue Tracking Configuration

# Depth sensor geometry
sensor:
  frame_width: 512
  frame_height: 424
  fps: 30

# Depth visualization
depth:
  depth_span: 8000
  clip_to_max_reliable: true

# Direction tracking
tracking:
  update_interval_frames: 4
  closed_threshold_frames: 5
  lower_threshold: 0.3
  upper_threshold: 0.6
  treat_maybe_as_open: false

# Synthetic sensor
simulation:
  frames: 300
  face_update_every: 2
  mouth_cycle_frames: 120
  mouth_closed_frames: 20
  orbit_frames: 90
  face_depth: 800
  tongue_depth: 720
  background_depth: 2500
  min_reliable_depth: 500
  max_reliable_depth: 4500
  realtime: false
"#;
