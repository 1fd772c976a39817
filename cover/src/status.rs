//! Cover status derived from the travel estimate

use serde::{Deserialize, Serialize};
use timecover_travel::{Clock, Position, TravelCalculator, TravelDirection};

/// Cover state as published to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoverStatus {
    Open,
    Closed,
    Opening,
    Closing,
    /// Resting somewhere between the end positions
    Stopped,
    /// No position known yet
    Unknown,
}

impl CoverStatus {
    /// Derive the status of one axis. Travel takes precedence over the end
    /// positions.
    pub fn from_calculator<C: Clock>(calculator: &TravelCalculator<C>) -> Self {
        if calculator.is_opening() {
            return CoverStatus::Opening;
        }
        if calculator.is_closing() {
            return CoverStatus::Closing;
        }
        match calculator.current_position() {
            None => CoverStatus::Unknown,
            Some(position) if position.is_open() => CoverStatus::Open,
            Some(position) if position.is_closed() => CoverStatus::Closed,
            Some(_) => CoverStatus::Stopped,
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self, CoverStatus::Opening | CoverStatus::Closing)
    }
}

impl std::fmt::Display for CoverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoverStatus::Open => write!(f, "Open"),
            CoverStatus::Closed => write!(f, "Closed"),
            CoverStatus::Opening => write!(f, "Opening"),
            CoverStatus::Closing => write!(f, "Closing"),
            CoverStatus::Stopped => write!(f, "Stopped"),
            CoverStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Point-in-time snapshot of a cover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverState {
    pub name: String,
    pub status: CoverStatus,
    pub position: Option<Position>,
    pub target_position: Option<Position>,
    pub direction: TravelDirection,
    pub position_confirmed: bool,
    pub tilt_position: Option<Position>,
}
