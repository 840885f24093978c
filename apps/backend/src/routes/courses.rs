use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use time::OffsetDateTime;

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{CurrentUser, TeacherUser, ValidatedJson};
use crate::repos::courses::Course;
use crate::services::courses::{self as course_service, CourseChanges};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CourseResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: i64,
    pub class_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Course> for CourseResponse {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            description: course.description,
            teacher_id: course.teacher_id,
            class_id: course.class_id,
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateCourseRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub class_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCourseRequest {
    #[serde(default)]
    pub name: Option<String>,
    // None = untouched, Some(None) = cleared
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub class_id: Option<i64>,
}

async fn list_courses(
    current_user: CurrentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let courses = course_service::list_for(require_db(&app_state)?, &current_user).await?;
    let body: Vec<CourseResponse> = courses.into_iter().map(CourseResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn create_course(
    teacher: TeacherUser,
    body: ValidatedJson<CreateCourseRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let course = course_service::create(
        require_db(&app_state)?,
        teacher.id,
        &req.name,
        req.description,
        req.class_id,
    )
    .await?;
    Ok(HttpResponse::Created().json(CourseResponse::from(course)))
}

async fn get_course(
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let course =
        course_service::get(require_db(&app_state)?, &current_user, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(CourseResponse::from(course)))
}

async fn update_course(
    teacher: TeacherUser,
    path: web::Path<i64>,
    body: ValidatedJson<UpdateCourseRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let req = body.into_inner();
    let changes = CourseChanges {
        name: req.name,
        description: req.description,
        class_id: req.class_id,
    };
    let course = with_txn(&app_state, move |txn| {
        Box::pin(async move { course_service::update(txn, teacher.id, id, changes).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(CourseResponse::from(course)))
}

async fn delete_course(
    teacher: TeacherUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    with_txn(&app_state, move |txn| {
        Box::pin(async move { course_service::delete(txn, teacher.id, id).await })
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/courses")
            .route(web::get().to(list_courses))
            .route(web::post().to(create_course)),
    )
    .service(
        web::resource("/courses/{id}")
            .route(web::get().to(get_course))
            .route(web::put().to(update_course))
            .route(web::delete().to(delete_course)),
    );
}
