use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::users::UserResponse;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{CurrentUser, TeacherUser, ValidatedJson};
use crate::repos::classes::Class;
use crate::services::classes as class_service;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ClassResponse {
    pub id: i64,
    pub name: String,
    pub school_year: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Class> for ClassResponse {
    fn from(class: Class) -> Self {
        Self {
            id: class.id,
            name: class.name,
            school_year: class.school_year,
            created_at: class.created_at,
            updated_at: class.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
    pub school_year: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateClassRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub school_year: Option<String>,
}

async fn list_classes(
    _user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let classes = class_service::list(require_db(&app_state)?).await?;
    let body: Vec<ClassResponse> = classes.into_iter().map(ClassResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn create_class(
    _teacher: TeacherUser,
    body: ValidatedJson<CreateClassRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let class =
        class_service::create(require_db(&app_state)?, &body.name, &body.school_year).await?;
    Ok(HttpResponse::Created().json(ClassResponse::from(class)))
}

async fn get_class(
    _user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let class = class_service::get(require_db(&app_state)?, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ClassResponse::from(class)))
}

async fn update_class(
    _teacher: TeacherUser,
    path: web::Path<i64>,
    body: ValidatedJson<UpdateClassRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let class = class_service::update(
        require_db(&app_state)?,
        path.into_inner(),
        body.name.as_deref(),
        body.school_year.as_deref(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(ClassResponse::from(class)))
}

async fn delete_class(
    _teacher: TeacherUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    with_txn(&app_state, move |txn| {
        Box::pin(async move { class_service::delete(txn, id).await })
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn roster(
    _teacher: TeacherUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let students = class_service::roster(require_db(&app_state)?, path.into_inner()).await?;
    let body: Vec<UserResponse> = students.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn enrol(
    _teacher: TeacherUser,
    path: web::Path<(i64, i64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (class_id, student_id) = path.into_inner();
    let student = with_txn(&app_state, move |txn| {
        Box::pin(async move { class_service::enrol(txn, class_id, student_id).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(student)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/classes")
            .route(web::get().to(list_classes))
            .route(web::post().to(create_class)),
    )
    .service(
        web::resource("/classes/{id}")
            .route(web::get().to(get_class))
            .route(web::put().to(update_class))
            .route(web::delete().to(delete_class)),
    )
    .service(web::resource("/classes/{id}/students").route(web::get().to(roster)))
    .service(
        web::resource("/classes/{id}/students/{student_id}").route(web::put().to(enrol)),
    );
}
