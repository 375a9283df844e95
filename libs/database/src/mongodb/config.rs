#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_parse};
use std::time::Duration;

const DEFAULT_DATABASE: &str = "geofence";

/// MongoDB connection settings
///
/// ```ignore
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "geofence")
///     .with_app_name("geofence-api");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MongoConfig {
    /// Connection string, `mongodb://[user:pass@]host[:port][/db][?options]`
    pub url: String,
    pub database: String,
    /// Reported to the server in its connection logs
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_secs(self.server_selection_timeout_secs)
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: DEFAULT_DATABASE.to_string(),
            app_name: None,
            max_pool_size: 50,
            min_pool_size: 2,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 10,
        }
    }
}

/// First variable in `keys` that is set
#[cfg(feature = "config")]
fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| std::env::var(key).ok())
}

/// Environment variables:
/// - `MONGODB_URL` or `MONGO_URL` (required)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (optional, default: `geofence`)
/// - `MONGODB_APP_NAME` (optional)
/// - `MONGODB_MAX_POOL_SIZE` (optional, default: 50)
/// - `MONGODB_MIN_POOL_SIZE` (optional, default: 2)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (optional, default: 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (optional, default: 10)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let url = first_env(&["MONGODB_URL", "MONGO_URL"])
            .ok_or_else(|| ConfigError::MissingEnvVar("MONGODB_URL or MONGO_URL".to_string()))?;
        let database =
            first_env(&["MONGODB_DATABASE", "MONGO_DATABASE"]).unwrap_or(defaults.database);

        Ok(Self {
            url,
            database,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size: env_parse("MONGODB_MAX_POOL_SIZE", defaults.max_pool_size)?,
            min_pool_size: env_parse("MONGODB_MIN_POOL_SIZE", defaults.min_pool_size)?,
            connect_timeout_secs: env_parse(
                "MONGODB_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout_secs,
            )?,
            server_selection_timeout_secs: env_parse(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                defaults.server_selection_timeout_secs,
            )?,
        })
    }
}
