use sea_orm::DatabaseConnection;

use super::security_config::SecurityConfig;

/// Shared, read-only application state
#[derive(Debug, Clone)]
pub struct AppState {
    /// Optional so auth-only tests can run without a database
    db: Option<DatabaseConnection>,
    pub security: SecurityConfig,
}

impl AppState {
    pub fn new(db: DatabaseConnection, security: SecurityConfig) -> Self {
        Self {
            db: Some(db),
            security,
        }
    }

    pub fn without_db(security: SecurityConfig) -> Self {
        Self { db: None, security }
    }

    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
