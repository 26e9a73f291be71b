use hivedash_core::AppError;
use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use std::time::Duration;

const APP_NAME: &str = "hivedash";

/// Open a client against `uri` and return a handle to `database`.
///
/// The driver connects lazily, so the handle is pinged once to surface bad
/// credentials or an unreachable cluster at startup.
pub async fn connect(uri: &str, database: &str, timeout_secs: u64) -> Result<Database, AppError> {
    let mut options = ClientOptions::parse(uri).await?;
    options.app_name = Some(APP_NAME.to_string());
    options.connect_timeout = Some(Duration::from_secs(timeout_secs));
    options.server_selection_timeout = Some(Duration::from_secs(timeout_secs));

    let client = Client::with_options(options)?;
    let db = client.database(database);

    db.run_command(doc! { "ping": 1 }).await.map_err(|e| {
        tracing::error!(error = %e, database = %database, "Document store ping failed");
        AppError::Database(format!("Failed to reach document store: {}", e))
    })?;

    tracing::info!(database = %database, "Document store connected");
    Ok(db)
}
