//! Database connectivity for the geofence API.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client construction, retries and health probes
//! - `config` (default) - loading [`mongodb::MongoConfig`] via `core_config::FromEnv`
//!
//! # Example
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//! use core_config::FromEnv;
//!
//! let config = MongoConfig::from_env()?;
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(config.database());
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
