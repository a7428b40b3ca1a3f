//! Direction symbols and the 3x3 classification of tongue tip positions.

use crate::constants::{DEFAULT_LOWER_THRESHOLD, DEFAULT_UPPER_THRESHOLD};
use crate::{Error, Result};
use std::fmt;

/// Where the tongue tip points, or that the mouth is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Up and to the left
    NorthWest,
    /// Left
    West,
    /// Down and to the left
    SouthWest,
    /// Up
    North,
    /// Centred in the mouth
    Center,
    /// Down
    South,
    /// Up and to the right
    NorthEast,
    /// Right
    East,
    /// Down and to the right
    SouthEast,
    /// Mouth closed
    Closed,
}

impl Direction {
    /// Glyph shown to the user
    #[must_use]
    pub const fn glyph(self) -> &'static str {
        match self {
            Self::NorthWest => "↖",
            Self::West => "←",
            Self::SouthWest => "↙",
            Self::North => "↑",
            Self::Center => "o",
            Self::South => "↓",
            Self::NorthEast => "↗",
            Self::East => "→",
            Self::SouthEast => "↘",
            Self::Closed => "X",
        }
    }

    /// Lowercase name, used in logs and configuration
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NorthWest => "north_west",
            Self::West => "west",
            Self::SouthWest => "south_west",
            Self::North => "north",
            Self::Center => "center",
            Self::South => "south",
            Self::NorthEast => "north_east",
            Self::East => "east",
            Self::SouthEast => "south_east",
            Self::Closed => "closed",
        }
    }

    /// True for every symbol except [`Direction::Closed`]
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Bucket along one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Band {
    Low,
    Middle,
    High,
}

/// Splits the normalized mouth area into a 3x3 grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionClassifier {
    lower: f32,
    upper: f32,
}

impl Default for DirectionClassifier {
    fn default() -> Self {
        Self {
            lower: DEFAULT_LOWER_THRESHOLD,
            upper: DEFAULT_UPPER_THRESHOLD,
        }
    }
}

impl DirectionClassifier {
    /// Create a classifier with custom band edges
    ///
    /// # Errors
    ///
    /// Returns an error unless `lower < upper` and both are finite.
    pub fn new(lower: f32, upper: f32) -> Result<Self> {
        if !lower.is_finite() || !upper.is_finite() || lower >= upper {
            return Err(Error::InvalidInput(format!(
                "Direction thresholds must satisfy lower < upper, got {lower} and {upper}"
            )));
        }
        Ok(Self { lower, upper })
    }

    fn band(&self, value: f32) -> Band {
        if value < self.lower {
            Band::Low
        } else if value < self.upper {
            Band::Middle
        } else {
            Band::High
        }
    }

    /// Classify a position relative to the mouth region.
    ///
    /// `nx` picks the column (west, centre, east) and `ny` the row (north,
    /// centre, south). Values on a band edge fall into the higher band;
    /// values outside [0, 1] land in the outer bands.
    #[must_use]
    pub fn classify(&self, nx: f32, ny: f32) -> Direction {
        match (self.band(nx), self.band(ny)) {
            (Band::Low, Band::Low) => Direction::NorthWest,
            (Band::Low, Band::Middle) => Direction::West,
            (Band::Low, Band::High) => Direction::SouthWest,
            (Band::Middle, Band::Low) => Direction::North,
            (Band::Middle, Band::Middle) => Direction::Center,
            (Band::Middle, Band::High) => Direction::South,
            (Band::High, Band::Low) => Direction::NorthEast,
            (Band::High, Band::Middle) => Direction::East,
            (Band::High, Band::High) => Direction::SouthEast,
        }
    }
}

/// Classify with the default 0.3 / 0.6 thresholds
#[must_use]
pub fn classify(nx: f32, ny: f32) -> Direction {
    DirectionClassifier::default().classify(nx, ny)
}
