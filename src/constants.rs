//! Constants used throughout the application

/// Depth sensor frame width in pixels
pub const DEFAULT_FRAME_WIDTH: usize = 512;

/// Depth sensor frame height in pixels
pub const DEFAULT_FRAME_HEIGHT: usize = 424;

/// Default frames per second of the depth stream
pub const DEFAULT_FPS: u32 = 30;

/// Depth span (millimetres) mapped onto the byte range for display
pub const DEFAULT_DEPTH_SPAN: u16 = 8000;

/// Number of grey levels in the visualization buffer
pub const BYTE_LEVELS: u16 = 256;

/// Default reliable depth bounds reported by the sensor
pub const DEFAULT_MIN_RELIABLE_DEPTH: u16 = 500;
pub const DEFAULT_MAX_RELIABLE_DEPTH: u16 = 4500;

/// Visualization value for pixels inside the mouth region
pub const REGION_FILL: u8 = 255;

/// Visualization value marking the tongue tip
pub const TONGUE_TIP_MARK: u8 = 0;

/// Visualization value for depth outside the reliable range
pub const NO_DATA: u8 = 0;

/// Qualifying frames held before a new direction is shown
pub const REQUIRED_UPDATE_INFO_FRAME: u32 = 4;

/// Consecutive closed-mouth frames before the closed glyph is shown
pub const REQUIRED_MOUTH_CLOSED_FRAME: u32 = 5;

/// Normalized thresholds splitting the mouth into three columns / rows
pub const DEFAULT_LOWER_THRESHOLD: f32 = 0.3;
pub const DEFAULT_UPPER_THRESHOLD: f32 = 0.6;

/// Pending events applied per batch before the newest depth frame is processed
pub const DEFAULT_DRAIN_LIMIT: usize = 32;
