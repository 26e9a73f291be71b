//! Document store setup

use anyhow::{Context, Result};
use hivedash_core::Config;
use mongodb::Database;

/// Connect to the upload store and verify it answers a ping.
pub async fn setup_database(config: &Config) -> Result<Database> {
    tracing::info!(database = %config.mongodb_database(), "Connecting to document store...");

    let database = hivedash_db::connect(
        config.mongodb_uri(),
        config.mongodb_database(),
        config.db_timeout_seconds(),
    )
    .await
    .context("Failed to connect to the document store")?;

    tracing::info!(
        collection = %config.uploads_collection(),
        "Document store connected successfully"
    );

    Ok(database)
}
