use std::time::Duration;

use migration::{migrate, MigrationCommand};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::info;

use crate::config::db::{db_url, DbKind, DbOwner, DbProfile};
use crate::error::AppError;

/// Open a connection pool. Runs no migrations.
pub async fn connect_db(
    kind: DbKind,
    profile: DbProfile,
    owner: DbOwner,
) -> Result<DatabaseConnection, AppError> {
    let url = db_url(kind, profile, owner)?;

    let mut options = ConnectOptions::new(url);
    options
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    if kind == DbKind::SqliteMemory {
        // Every in-memory connection is its own database: pin the pool to one
        // connection that never idles out.
        options
            .min_connections(1)
            .max_connections(1)
            .idle_timeout(Duration::from_secs(u32::MAX as u64))
            .max_lifetime(Duration::from_secs(u32::MAX as u64));
    }

    Database::connect(options)
        .await
        .map_err(|e| AppError::db_unavailable(format!("failed to connect to {kind:?} database: {e}")))
}

/// Connect, bring the schema up to date, and return the application pool.
///
/// Postgres migrates through a separate owner connection; SQLite migrates on
/// the pool it returns (required for in-memory databases).
pub async fn bootstrap_db(kind: DbKind, profile: DbProfile) -> Result<DatabaseConnection, AppError> {
    match kind {
        DbKind::Postgres => {
            let owner = connect_db(kind, profile, DbOwner::Owner).await?;
            migrate(&owner, MigrationCommand::Up).await?;
            if let Err(e) = owner.close().await {
                tracing::warn!(error = %e, "failed to close owner connection");
            }
            let conn = connect_db(kind, profile, DbOwner::App).await?;
            info!(?kind, ?profile, "database ready");
            Ok(conn)
        }
        DbKind::SqliteFile | DbKind::SqliteMemory => {
            let conn = connect_db(kind, profile, DbOwner::App).await?;
            migrate(&conn, MigrationCommand::Up).await?;
            info!(?kind, ?profile, "database ready");
            Ok(conn)
        }
    }
}
