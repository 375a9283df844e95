use mongodb::{Client, bson::doc};

/// `true` when the deployment answers a `ping` command
pub async fn check_health(client: &Client) -> bool {
    match client.database("admin").run_command(doc! { "ping": 1 }).await {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "MongoDB ping failed");
            false
        }
    }
}
