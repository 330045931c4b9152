use axum::Router;
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use uuid::Uuid;

use crate::{
    config::{AppConfig, DatabaseConfig},
    db::connection,
    routes::app,
    state::AppState,
};

/// Full application stack over a mock MySQL connection. Keep a clone of
/// the connection to inspect the transaction log afterwards.
pub fn test_router(db: DatabaseConnection) -> Router {
    let state = AppState::new(AppConfig::default(), db);
    app(state).expect("default config should build the app")
}

pub fn mock_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::MySql)
}

/// A fresh SQLite file in the temp dir with the schema synced. Each call
/// gets its own database.
pub async fn sqlite_db() -> DatabaseConnection {
    let path = std::env::temp_dir().join(format!("project_tracker_{}.db", Uuid::new_v4()));
    let cfg = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        ..DatabaseConfig::default()
    };
    connection::connect(&cfg)
        .await
        .expect("sqlite test database should open")
}
