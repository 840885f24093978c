use sea_orm::ConnectionTrait;
use tracing::info;

use super::users::{create_account, NewAccount};
use crate::auth::Role;
use crate::config::SeedTeacher;
use crate::error::AppError;
use crate::repos::users;

/// Create the bootstrap teacher unless the username already exists.
/// Returns `true` when an account was created.
pub async fn ensure_seed_teacher<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    seed: &SeedTeacher,
) -> Result<bool, AppError> {
    if users::find_user_by_username(conn, seed.username.trim())
        .await?
        .is_some()
    {
        return Ok(false);
    }

    let user = create_account(
        conn,
        NewAccount {
            username: seed.username.clone(),
            password: seed.password.clone(),
            first_name: "Seed".to_string(),
            last_name: "Teacher".to_string(),
            email: None,
        },
        Role::Teacher,
        None,
    )
    .await?;

    info!(user_id = user.id, "Seed teacher account created");
    Ok(true)
}
