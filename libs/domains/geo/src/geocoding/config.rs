use core_config::{ConfigError, FromEnv, env_or_default, env_parse};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Geocoder client configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeocoderConfig {
    /// Base URL of a Nominatim-compatible service (no trailing slash)
    pub base_url: String,
    /// Sent on every request, as the Nominatim usage policy requires
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: default_user_agent(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_user_agent() -> String {
    format!("geofence-api/{}", env!("CARGO_PKG_VERSION"))
}

impl FromEnv for GeocoderConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = env_or_default("GEOCODER_BASE_URL", DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        let user_agent = env_or_default("GEOCODER_USER_AGENT", &default_user_agent());
        let timeout_secs = env_parse("GEOCODER_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;

        Ok(Self {
            base_url,
            user_agent,
            timeout_secs,
        })
    }
}
