use axum_helpers::JwtConfig;
use core_config::{AppInfo, FromEnv, app_info, server::ServerConfig};
use database::{RetryConfig, mongodb::MongoConfig};
use domain_geo::GeocoderConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub mongodb_retry: RetryConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub geocoder: GeocoderConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?; // Required - MONGODB_URL or MONGO_URL
        let mongodb_retry = RetryConfig::from_env()?;
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let jwt = JwtConfig::from_env()?; // Required - JWT_SECRET
        let geocoder = GeocoderConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            mongodb_retry,
            server,
            jwt,
            geocoder,
            environment,
        })
    }
}
