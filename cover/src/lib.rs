//! Time-based Cover Device Model
//!
//! Pairs a main-travel estimator with an optional tilt estimator and derives
//! the cover status a host integration publishes. Commands to the motor relays
//! and state polling stay with the host; this crate only tracks where the cover
//! is expected to be.

mod config;
mod cover;
mod error;
mod shared;
mod status;

pub use config::*;
pub use cover::*;
pub use error::*;
pub use shared::*;
pub use status::*;

pub use timecover_travel::{
    Clock, ManualClock, Position, SystemClock, TravelCalculator, TravelDirection, TravelTimeConfig,
};
