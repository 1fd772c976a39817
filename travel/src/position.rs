//! Cover position and travel direction

use crate::{POSITION_CLOSED, POSITION_OPEN};
use serde::{Deserialize, Serialize};

/// Cover position in percent closed (0 = fully open, 100 = fully closed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Position(u8);

impl Position {
    pub const OPEN: Position = Position(POSITION_OPEN);
    pub const CLOSED: Position = Position(POSITION_CLOSED);

    /// Create a position, clamping anything above fully closed
    pub fn new(value: u8) -> Self {
        Position(value.min(POSITION_CLOSED))
    }

    /// Create a position from a computed value, truncating toward zero
    pub(crate) fn from_estimate(value: f64) -> Self {
        if !value.is_finite() {
            return Position::OPEN;
        }
        Position(value.trunc().clamp(POSITION_OPEN as f64, POSITION_CLOSED as f64) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_open(self) -> bool {
        self == Position::OPEN
    }

    pub fn is_closed(self) -> bool {
        self == Position::CLOSED
    }
}

impl From<u8> for Position {
    fn from(value: u8) -> Self {
        Position::new(value)
    }
}

impl From<Position> for u8 {
    fn from(position: Position) -> Self {
        position.0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Commanded travel direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TravelDirection {
    /// Moving toward fully open (decreasing position)
    Opening,
    /// Moving toward fully closed (increasing position)
    Closing,
    #[default]
    Stopped,
}

impl std::fmt::Display for TravelDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TravelDirection::Opening => write!(f, "Opening"),
            TravelDirection::Closing => write!(f, "Closing"),
            TravelDirection::Stopped => write!(f, "Stopped"),
        }
    }
}
