use std::sync::LazyLock;

use regex::Regex;
use sea_orm::ConnectionTrait;
use tracing::info;

use super::{optional_text, require_text};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::auth::Role;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::logging::pii::Redacted;
use crate::logging::security;
use crate::repos::classes;
use crate::repos::users::{self, User, UserCreate};

static USERNAME: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]{3,32}$").ok());

/// Input for account creation, before validation.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

pub fn validate_username(username: &str) -> Result<(), AppError> {
    let valid = USERNAME
        .as_ref()
        .map(|re| re.is_match(username))
        .unwrap_or(false);
    if valid {
        Ok(())
    } else {
        Err(AppError::validation(
            "Username must be 3-32 characters of letters, digits, '.', '_' or '-'",
        ))
    }
}

fn validate_email(email: Option<String>) -> Result<Option<String>, AppError> {
    match optional_text(email) {
        Some(email) if !email.contains('@') || email.starts_with('@') || email.ends_with('@') => {
            Err(AppError::validation("Email address is not valid"))
        }
        other => Ok(other),
    }
}

/// Create an account with the given role. Students may be placed in a class.
pub async fn create_account<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    account: NewAccount,
    role: Role,
    class_id: Option<i64>,
) -> Result<User, AppError> {
    let username = account.username.trim().to_string();
    validate_username(&username)?;
    validate_password_strength(&account.password)?;
    let first_name = require_text("first_name", &account.first_name)?;
    let last_name = require_text("last_name", &account.last_name)?;
    let email = validate_email(account.email)?;

    if let Some(class_id) = class_id {
        if role != Role::Student {
            return Err(AppError::validation("Only students can belong to a class"));
        }
        classes::require_class(conn, class_id).await?;
    }

    let password_hash = hash_password(&account.password)?;
    let user = users::create_user(
        conn,
        UserCreate {
            username,
            email,
            password_hash,
            role: role.as_db().to_string(),
            first_name,
            last_name,
            class_id,
        },
    )
    .await?;

    info!(
        user_id = user.id,
        role = role.as_db(),
        email = %Redacted(user.email.as_deref().unwrap_or("")),
        "Account created"
    );
    Ok(user)
}

/// Self-service registration always yields a student without a class.
pub async fn register<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    account: NewAccount,
) -> Result<User, AppError> {
    create_account(conn, account, Role::Student, None).await
}

/// Username/password check. Unknown user and wrong password are
/// indistinguishable to the caller.
pub async fn login<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let Some((user, stored_hash)) = users::find_credentials(conn, username.trim()).await? else {
        security::login_failed("unknown_user", username);
        return Err(AppError::invalid_credentials());
    };

    if !verify_password(password, &stored_hash)? {
        security::login_failed("wrong_password", username);
        return Err(AppError::invalid_credentials());
    }

    Ok(user)
}

/// Teachers may read anyone; students only themselves.
pub async fn get_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    caller: &CurrentUser,
    id: i64,
) -> Result<User, AppError> {
    if !caller.is_teacher() && caller.id != id {
        security::access_denied(caller.id, "user");
        return Err(AppError::forbidden("Students may only view their own profile"));
    }
    Ok(users::require_user(conn, id).await?)
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    role: Option<Role>,
) -> Result<Vec<User>, AppError> {
    Ok(users::list_users(conn, role).await?)
}

pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
    id: i64,
) -> Result<(), AppError> {
    if teacher_id == id {
        return Err(AppError::validation("You cannot delete your own account"));
    }
    if !users::delete_user(conn, id).await? {
        return Err(AppError::not_found(
            crate::errors::ErrorCode::UserNotFound,
            format!("User {id} not found"),
        ));
    }
    info!(user_id = id, deleted_by = teacher_id, "User deleted");
    Ok(())
}
