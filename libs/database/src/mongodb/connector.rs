use mongodb::{Client, bson::doc, options::ClientOptions};
use tracing::info;

use super::MongoConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryConfig, retry, retry_with_backoff};

/// Build a client from `config` and verify the deployment answers a ping.
pub async fn connect_from_config(config: &MongoConfig) -> DatabaseResult<Client> {
    info!(database = %config.database, "Connecting to MongoDB");

    let mut options = ClientOptions::parse(&config.url).await?;
    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(config.connect_timeout());
    options.server_selection_timeout = Some(config.server_selection_timeout());
    options.app_name = config.app_name.clone();

    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// [`connect_from_config`] retried with backoff; `None` uses the default policy.
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> DatabaseResult<Client> {
    match retry_config {
        Some(policy) => retry_with_backoff(|| connect_from_config(config), policy).await,
        None => retry(|| connect_from_config(config)).await,
    }
}
