use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{CurrentUser, TeacherUser, ValidatedJson};
use crate::repos::assignments::Assignment;
use crate::services::assignments::{self as assignment_service, AssignmentChanges, NewAssignment};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AssignmentResponse {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub due_date: Option<OffsetDateTime>,
    pub max_points: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Assignment> for AssignmentResponse {
    fn from(a: Assignment) -> Self {
        Self {
            id: a.id,
            course_id: a.course_id,
            title: a.title,
            description: a.description,
            due_date: a.due_date,
            max_points: a.max_points,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// RFC 3339 timestamp
    #[serde(default)]
    pub due_date: Option<String>,
    pub max_points: f64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, with = "double_option")]
    pub due_date: Option<Option<String>>,
    #[serde(default)]
    pub max_points: Option<f64>,
}

fn parse_due_date(raw: &str) -> Result<OffsetDateTime, AppError> {
    OffsetDateTime::parse(raw.trim(), &Rfc3339)
        .map_err(|_| AppError::validation("due_date must be an RFC 3339 timestamp"))
}

async fn list_assignments(
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let list = assignment_service::list_for_course(
        require_db(&app_state)?,
        &current_user,
        path.into_inner(),
    )
    .await?;
    let body: Vec<AssignmentResponse> = list.into_iter().map(AssignmentResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn create_assignment(
    teacher: TeacherUser,
    path: web::Path<i64>,
    body: ValidatedJson<CreateAssignmentRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let req = body.into_inner();
    let input = NewAssignment {
        due_date: req.due_date.as_deref().map(parse_due_date).transpose()?,
        title: req.title,
        description: req.description,
        max_points: req.max_points,
    };
    let assignment = assignment_service::create(
        require_db(&app_state)?,
        teacher.id,
        path.into_inner(),
        input,
    )
    .await?;
    Ok(HttpResponse::Created().json(AssignmentResponse::from(assignment)))
}

async fn get_assignment(
    current_user: CurrentUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let assignment =
        assignment_service::get(require_db(&app_state)?, &current_user, path.into_inner())
            .await?;
    Ok(HttpResponse::Ok().json(AssignmentResponse::from(assignment)))
}

async fn update_assignment(
    teacher: TeacherUser,
    path: web::Path<i64>,
    body: ValidatedJson<UpdateAssignmentRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let req = body.into_inner();
    let due_date = match req.due_date {
        None => None,
        Some(None) => Some(None),
        Some(Some(raw)) => Some(Some(parse_due_date(&raw)?)),
    };
    let changes = AssignmentChanges {
        title: req.title,
        description: req.description,
        due_date,
        max_points: req.max_points,
    };

    // max_points check and write must see the same grades
    let assignment = with_txn(&app_state, move |txn| {
        Box::pin(async move { assignment_service::update(txn, teacher.id, id, changes).await })
    })
    .await?;
    Ok(HttpResponse::Ok().json(AssignmentResponse::from(assignment)))
}

async fn delete_assignment(
    teacher: TeacherUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    with_txn(&app_state, move |txn| {
        Box::pin(async move { assignment_service::delete(txn, teacher.id, id).await })
    })
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/courses/{id}/assignments")
            .route(web::get().to(list_assignments))
            .route(web::post().to(create_assignment)),
    )
    .service(
        web::resource("/assignments/{id}")
            .route(web::get().to(get_assignment))
            .route(web::put().to(update_assignment))
            .route(web::delete().to(delete_assignment)),
    );
}
