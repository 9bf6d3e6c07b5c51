//! Dashboard configuration
//!
//! Read from the JSON file named by `CV_CONFIG` when set, otherwise built
//! from defaults. `COVID_ACT_NOW_API_KEY` always overrides the API key.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use cv_core::BarMetric;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::DataError;

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "CV_CONFIG";

/// Environment variable carrying the Covid Act Now API key
pub const API_KEY_ENV: &str = "COVID_ACT_NOW_API_KEY";

pub const DEFAULT_API_URL: &str = "https://api.covidactnow.org/v2/states.json";

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// States endpoint, without the API key
    pub api_url: String,

    pub api_key: Option<String>,

    /// `[{ "Code": .., "State": .. }]` lookup resource
    pub state_codes_path: PathBuf,

    /// GeoJSON region outlines
    pub boundaries_path: PathBuf,

    /// Read metrics from this saved payload instead of the network
    pub snapshot_path: Option<PathBuf>,

    pub request_timeout_secs: u64,

    /// Bar chart metric shown at startup
    pub bar_metric: BarMetric,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            state_codes_path: PathBuf::from("assets/state_code.json"),
            boundaries_path: PathBuf::from("assets/us-states.json"),
            snapshot_path: None,
            request_timeout_secs: 30,
            bar_metric: BarMetric::Cases,
        }
    }
}

// Keeps the API key out of logs
impl fmt::Debug for DashboardConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardConfig")
            .field("api_url", &self.api_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("state_codes_path", &self.state_codes_path)
            .field("boundaries_path", &self.boundaries_path)
            .field("snapshot_path", &self.snapshot_path)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("bar_metric", &self.bar_metric)
            .finish()
    }
}

impl DashboardConfig {
    /// Load a config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| DataError::json(path.display().to_string(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config from the environment
    pub fn from_env() -> Result<Self, DataError> {
        let config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let path = PathBuf::from(path);
                info!(path = %path.display(), "Loading dashboard config");
                Self::load(&path)?
            }
            None => Self::default(),
        };

        Ok(config.with_api_key_override(std::env::var(API_KEY_ENV).ok()))
    }

    /// Replace the API key when an override is present and non-empty
    pub fn with_api_key_override(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.snapshot_path.is_none() && self.api_url.trim().is_empty() {
            return Err(DataError::Config("api_url is empty and no snapshot_path is set".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(DataError::Config("request_timeout_secs must be positive".to_string()));
        }
        Ok(())
    }
}
