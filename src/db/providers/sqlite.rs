use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection};

use super::{
    pool_options,
    registry::{DbProvider, DbProviderId},
};
use crate::config::DatabaseConfig;

/// Local and test databases. sqlx opens every SQLite connection with
/// `foreign_keys` on and a five second busy timeout, which the task cascade
/// relies on, so there is nothing to run after connecting.
pub struct SqliteDbProvider;

#[async_trait]
impl DbProvider for SqliteDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::Sqlite
    }

    fn supports_url(&self, url: &str) -> bool {
        url.trim().to_ascii_lowercase().starts_with("sqlite:")
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut options = pool_options(cfg);
        if is_in_memory(&cfg.url) {
            // every in-memory connection is its own empty database
            options.max_connections(1).min_connections(1);
        }
        Ok(Database::connect(options).await?)
    }
}

fn is_in_memory(url: &str) -> bool {
    let url = url.to_ascii_lowercase();
    url.contains(":memory:") || url.contains("mode=memory")
}
