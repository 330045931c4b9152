use sea_orm::DatabaseConnection;
use tracing::info;

use super::providers::default_registry;
use crate::config::DatabaseConfig;

/// Opens the pool for the configured backend and brings the schema up to
/// date with the entities, including the task to project cascade.
pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let providers = default_registry()?;
    let provider = providers.provider_for_url(&cfg.url)?;
    info!(backend = provider.id().as_str(), "connecting to database");

    let db = provider.connect(cfg).await?;

    info!("syncing database schema from entities");
    db.get_schema_registry("project_tracker::db::entities::*")
        .sync(&db)
        .await?;
    Ok(db)
}
