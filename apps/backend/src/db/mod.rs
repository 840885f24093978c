pub mod txn;

use sea_orm::DatabaseConnection;

use crate::error::AppError;
use crate::state::AppState;

/// The database connection, or 503 `DB_UNAVAILABLE` when none is configured.
pub fn require_db(state: &AppState) -> Result<&DatabaseConnection, AppError> {
    state
        .db()
        .ok_or_else(|| AppError::db_unavailable("Database is not configured"))
}
