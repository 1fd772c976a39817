//! Cover configuration

use crate::CoverResult;
use serde::{Deserialize, Serialize};
use timecover_travel::TravelTimeConfig;

/// Configuration of one time-based cover.
///
/// Each axis has its own timing block, which accepts the host's option names
/// (`time_open`, `time_close`, `slats_opening_time`, ...). Tilt is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverConfig {
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub travel: TravelTimeConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tilt: Option<TravelTimeConfig>,
}

fn default_name() -> String {
    "cover".to_string()
}

impl Default for CoverConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            travel: TravelTimeConfig::default(),
            tilt: None,
        }
    }
}

impl CoverConfig {
    pub fn new(name: impl Into<String>, travel: TravelTimeConfig) -> Self {
        Self {
            name: name.into(),
            travel,
            tilt: None,
        }
    }

    pub fn with_tilt(mut self, tilt: TravelTimeConfig) -> Self {
        self.tilt = Some(tilt);
        self
    }

    /// Validate both axes
    pub fn validate(&self) -> CoverResult<()> {
        self.travel.validate()?;
        if let Some(tilt) = &self.tilt {
            tilt.validate()?;
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> CoverResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(timecover_travel::ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }
}
