use mongodb::bson::doc;
use mongodb::Client;
use std::time::Instant;

/// Health check status for MongoDB
#[derive(Debug, Clone)]
pub struct HealthStatus {
    /// Whether the database is healthy
    pub healthy: bool,
    /// Optional message (e.g., error details)
    pub message: Option<String>,
    /// Response time in milliseconds
    pub response_time_ms: u64,
}

/// Check MongoDB health with a `ping` command against the admin database.
pub async fn check_health(client: &Client) -> bool {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .is_ok()
}

/// Check MongoDB health with detailed status
///
/// Returns timing information and any error messages.
///
/// # Example
/// ```ignore
/// use database::mongodb::{connect, check_health_detailed};
///
/// let client = connect("mongodb://localhost:27017").await?;
/// let status = check_health_detailed(&client).await;
/// if !status.healthy {
///     println!("MongoDB unhealthy: {:?}", status.message);
/// }
/// ```
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();

    match client.database("admin").run_command(doc! { "ping": 1 }).await {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms: start.elapsed().as_millis() as u64,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms: start.elapsed().as_millis() as u64,
        },
    }
}
