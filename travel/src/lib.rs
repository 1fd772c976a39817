//! Time-based Cover Travel Estimation
//!
//! Estimates the position of a motorized cover (shade, blind, shutter) that
//! reports no continuous position feedback. Position is extrapolated from the
//! last known position, the commanded target and the configured travel times,
//! including a slow slats phase next to the fully-open end.
//!
//! Positions run from 0 (fully open) to 100 (fully closed).

mod calculator;
mod clock;
mod config;
mod error;
mod position;

pub use calculator::*;
pub use clock::*;
pub use config::*;
pub use error::*;
pub use position::*;

/// Fully open position
pub const POSITION_OPEN: u8 = 0;

/// Fully closed position
pub const POSITION_CLOSED: u8 = 100;

/// Slats time used when none is configured (seconds)
pub const DEFAULT_SLATS_TIME: f64 = 0.0;

/// Share of the positional delta covered while the slats are adjusting
pub const SLATS_TRAVEL_SHARE: f64 = 0.1;
