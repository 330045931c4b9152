use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection};

use super::{
    pool_options,
    registry::{DbProvider, DbProviderId},
};
use crate::config::DatabaseConfig;

/// MySQL and MariaDB servers.
pub struct MySqlDbProvider;

#[async_trait]
impl DbProvider for MySqlDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::MySql
    }

    fn supports_url(&self, url: &str) -> bool {
        let normalized = url.trim().to_ascii_lowercase();
        normalized.starts_with("mysql://") || normalized.starts_with("mariadb://")
    }

    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        Ok(Database::connect(pool_options(cfg)).await?)
    }
}
