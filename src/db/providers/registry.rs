use std::{collections::HashMap, sync::Arc};

use anyhow::{Result, bail};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use crate::config::DatabaseConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DbProviderId {
    MySql,
    Sqlite,
}

impl DbProviderId {
    pub fn as_str(self) -> &'static str {
        match self {
            DbProviderId::MySql => "mysql",
            DbProviderId::Sqlite => "sqlite",
        }
    }
}

#[async_trait]
pub trait DbProvider: Send + Sync {
    fn id(&self) -> DbProviderId;
    fn supports_url(&self, url: &str) -> bool;
    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection>;
}

pub struct DbProviders {
    providers: HashMap<DbProviderId, Arc<dyn DbProvider>>,
}

impl DbProviders {
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn DbProvider>) -> Result<Self> {
        self.add(provider)?;
        Ok(self)
    }

    pub fn add(&mut self, provider: Arc<dyn DbProvider>) -> Result<()> {
        let id = provider.id();
        if self.providers.contains_key(&id) {
            bail!("database provider already registered: {}", id.as_str());
        }
        self.providers.insert(id, provider);
        Ok(())
    }

    pub fn provider_for_url(&self, url: &str) -> Result<Arc<dyn DbProvider>> {
        self.providers
            .values()
            .find(|provider| provider.supports_url(url))
            .cloned()
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "unsupported database url '{}'; expected scheme mysql://, mariadb://, or sqlite:",
                    redact_url(url)
                )
            })
    }
}

impl Default for DbProviders {
    fn default() -> Self {
        Self::new()
    }
}

// Connection strings carry credentials; only the scheme is safe to log.
fn redact_url(url: &str) -> String {
    let trimmed = url.trim();
    if let Some((scheme, _)) = trimmed.split_once("://") {
        format!("{scheme}://<redacted>")
    } else if let Some((scheme, _)) = trimmed.split_once(':') {
        format!("{scheme}:<redacted>")
    } else {
        "<invalid-url>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use async_trait::async_trait;
    use sea_orm::{DatabaseConnection, MockDatabase};

    use super::{DbProvider, DbProviderId, DbProviders, redact_url};
    use crate::config::DatabaseConfig;

    struct TestProvider {
        id: DbProviderId,
        accepted_prefix: &'static str,
    }

    #[async_trait]
    impl DbProvider for TestProvider {
        fn id(&self) -> DbProviderId {
            self.id
        }

        fn supports_url(&self, url: &str) -> bool {
            url.starts_with(self.accepted_prefix)
        }

        async fn connect(&self, _cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
            Ok(MockDatabase::new(sea_orm::DatabaseBackend::MySql).into_connection())
        }
    }

    #[test]
    fn rejects_duplicate_provider_registration() {
        let provider = Arc::new(TestProvider {
            id: DbProviderId::MySql,
            accepted_prefix: "mysql://",
        });
        let mut providers = DbProviders::new();

        providers
            .add(provider.clone())
            .expect("first provider registration should succeed");
        let err = providers
            .add(provider)
            .expect_err("duplicate provider registration should fail");

        assert!(err.to_string().contains("already registered: mysql"));
    }

    #[test]
    fn unsupported_scheme_error_hides_credentials() {
        let providers = DbProviders::new();
        let err = match providers.provider_for_url("postgres://admin:hunter2@db/tracker") {
            Ok(_) => panic!("unsupported url should fail"),
            Err(err) => err,
        };

        let message = err.to_string();
        assert!(message.contains("unsupported database url 'postgres://<redacted>'"));
        assert!(!message.contains("hunter2"));
    }

    #[test]
    fn redacts_urls_without_authority() {
        assert_eq!(redact_url("sqlite:./tracker.db"), "sqlite:<redacted>");
        assert_eq!(redact_url("garbage"), "<invalid-url>");
    }
}
