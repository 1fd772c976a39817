//! Travel timing configuration

use crate::{ConfigError, ConfigResult, DEFAULT_SLATS_TIME};
use serde::{Deserialize, Serialize};

/// Timing parameters for one cover axis, all in seconds.
///
/// Unset fields default to zero, matching an integration that only knows
/// some of the durations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TravelTimeConfig {
    /// Full-range duration, picked when travel starts from the higher position
    #[serde(default, alias = "time_close")]
    pub travel_time_down: f64,

    /// Full-range duration, picked when travel starts from the lower position
    /// or stays put
    #[serde(default, alias = "time_open")]
    pub travel_time_up: f64,

    /// Slats phase while opening, and the travel-time offset when travel
    /// leaves fully open
    #[serde(default = "default_slats_time")]
    pub slats_opening_time: f64,

    /// Slats phase while closing, and the travel-time offset when travel
    /// reaches fully open
    #[serde(default = "default_slats_time")]
    pub slats_closing_time: f64,
}

impl Default for TravelTimeConfig {
    fn default() -> Self {
        Self {
            travel_time_down: 0.0,
            travel_time_up: 0.0,
            slats_opening_time: DEFAULT_SLATS_TIME,
            slats_closing_time: DEFAULT_SLATS_TIME,
        }
    }
}

fn default_slats_time() -> f64 {
    DEFAULT_SLATS_TIME
}

impl TravelTimeConfig {
    /// Symmetric travel without a slats phase
    pub fn symmetric(travel_time: f64) -> Self {
        Self {
            travel_time_down: travel_time,
            travel_time_up: travel_time,
            ..Self::default()
        }
    }

    pub fn with_slats(mut self, opening: f64, closing: f64) -> Self {
        self.slats_opening_time = opening;
        self.slats_closing_time = closing;
        self
    }

    /// Reject durations the estimator cannot work with
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in self.fields() {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteDuration { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::NegativeDuration { field, value });
            }
        }

        let shortest_travel = self.travel_time_down.min(self.travel_time_up);
        let longest_slats = self.slats_opening_time.max(self.slats_closing_time);
        if longest_slats > 0.0 && longest_slats >= shortest_travel {
            tracing::warn!(
                slats_time = longest_slats,
                travel_time = shortest_travel,
                "Slats time is not shorter than the full travel time, travel will complete as soon as the slats phase ends"
            );
        }

        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("travel_time_down", self.travel_time_down),
            ("travel_time_up", self.travel_time_up),
            ("slats_opening_time", self.slats_opening_time),
            ("slats_closing_time", self.slats_closing_time),
        ]
    }
}
