//! User repository functions.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::users_sea as users_adapter;
use crate::auth::Role;
use crate::entities::users;
use crate::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};

pub use users_adapter::UserCreate;

/// User domain model. The password hash stays in the adapter layer except
/// for the credential lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub class_id: Option<i64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

pub fn role_from_db(value: &str) -> Result<Role, DomainError> {
    match value {
        "teacher" => Ok(Role::Teacher),
        "student" => Ok(Role::Student),
        other => Err(DomainError::infra(
            InfraErrorKind::DataCorruption,
            format!("unknown role '{other}' in users table"),
        )),
    }
}

impl TryFrom<users::Model> for User {
    type Error = DomainError;

    fn try_from(model: users::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            role: role_from_db(&model.role)?,
            id: model.id,
            username: model.username,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            class_id: model.class_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

fn convert_all(models: Vec<users::Model>) -> Result<Vec<User>, DomainError> {
    models.into_iter().map(User::try_from).collect()
}

pub async fn find_user_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<Option<User>, DomainError> {
    users_adapter::find_by_id(conn, id)
        .await?
        .map(User::try_from)
        .transpose()
}

pub async fn require_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<User, DomainError> {
    find_user_by_id(conn, id)
        .await?
        .ok_or_else(|| DomainError::not_found(NotFoundKind::User, format!("User {id} not found")))
}

pub async fn find_user_by_username<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<User>, DomainError> {
    users_adapter::find_by_username(conn, username)
        .await?
        .map(User::try_from)
        .transpose()
}

/// User plus stored password hash, for login.
pub async fn find_credentials<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    username: &str,
) -> Result<Option<(User, String)>, DomainError> {
    match users_adapter::find_by_username(conn, username).await? {
        Some(model) => {
            let hash = model.password_hash.clone();
            Ok(Some((User::try_from(model)?, hash)))
        }
        None => Ok(None),
    }
}

pub async fn list_users<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    role: Option<Role>,
) -> Result<Vec<User>, DomainError> {
    convert_all(users_adapter::list(conn, role.as_ref().map(Role::as_db)).await?)
}

pub async fn list_students_in_class<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    class_id: i64,
) -> Result<Vec<User>, DomainError> {
    convert_all(users_adapter::list_by_class(conn, class_id, Role::Student.as_db()).await?)
}

pub async fn create_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: UserCreate,
) -> Result<User, DomainError> {
    User::try_from(users_adapter::create(conn, dto).await?)
}

pub async fn assign_class<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    user_id: i64,
    class_id: Option<i64>,
) -> Result<User, DomainError> {
    let model = users_adapter::find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| {
            DomainError::not_found(NotFoundKind::User, format!("User {user_id} not found"))
        })?;
    User::try_from(users_adapter::set_class(conn, model, class_id).await?)
}

/// `true` when a row was removed.
pub async fn delete_user<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
) -> Result<bool, DomainError> {
    Ok(users_adapter::delete(conn, id).await? > 0)
}
