use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::auth::Role;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{CurrentUser, TeacherUser, ValidatedJson};
use crate::repos::users::User;
use crate::services::users::{self as user_service, NewAccount};
use crate::state::AppState;

/// Public view of a user. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: Option<String>,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub class_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
            class_id: user.class_id,
            created_at: user.created_at,
        }
    }
}

pub(crate) fn parse_role(value: &str) -> Result<Role, AppError> {
    Role::from_claim(value.trim())
        .ok_or_else(|| AppError::validation("role must be 'teacher' or 'student'"))
}

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: String,
    #[serde(default)]
    pub class_id: Option<i64>,
}

async fn list_users(
    _teacher: TeacherUser,
    query: web::Query<ListUsersQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let role = query.role.as_deref().map(parse_role).transpose()?;
    let users = user_service::list_users(require_db(&app_state)?, role).await?;
    let body: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn create_user(
    _teacher: TeacherUser,
    body: ValidatedJson<CreateUserRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let role = parse_role(&req.role)?;
    let account = NewAccount {
        username: req.username,
        password: req.password,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
    };
    let class_id = req.class_id;

    let user = with_txn(&app_state, move |txn| {
        Box::pin(async move { user_service::create_account(txn, account, role, class_id).await })
    })
    .await?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

async fn get_user(
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let user = user_service::get_user(require_db(&app_state)?, &current_user, path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

async fn delete_user(
    teacher: TeacherUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    user_service::delete_user(require_db(&app_state)?, teacher.id, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/users")
            .route(web::get().to(list_users))
            .route(web::post().to(create_user)),
    )
    .service(
        web::resource("/users/{id}")
            .route(web::get().to(get_user))
            .route(web::delete().to(delete_user)),
    );
}
