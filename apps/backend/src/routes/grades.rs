use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::assignments::AssignmentResponse;
use super::courses::CourseResponse;
use super::users::UserResponse;
use crate::db::require_db;
use crate::db::txn::with_txn;
use crate::error::AppError;
use crate::extractors::{StudentUser, TeacherUser, ValidatedJson};
use crate::repos::grades::Grade;
use crate::services::grades::{self as grade_service, CourseGrades, Gradebook, Totals};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct GradeResponse {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub points: f64,
    pub comment: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub graded_at: OffsetDateTime,
}

impl From<Grade> for GradeResponse {
    fn from(g: Grade) -> Self {
        Self {
            id: g.id,
            assignment_id: g.assignment_id,
            student_id: g.student_id,
            points: g.points,
            comment: g.comment,
            graded_at: g.graded_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TotalsResponse {
    pub points: f64,
    pub max_points: f64,
    pub graded: usize,
    pub percentage: Option<f64>,
}

impl From<Totals> for TotalsResponse {
    fn from(t: Totals) -> Self {
        Self {
            points: t.points,
            max_points: t.max_points,
            graded: t.graded,
            percentage: t.percentage(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GradeEntryResponse {
    pub assignment: AssignmentResponse,
    pub grade: Option<GradeResponse>,
}

#[derive(Debug, Serialize)]
pub struct CourseGradesResponse {
    pub course: CourseResponse,
    pub entries: Vec<GradeEntryResponse>,
    pub totals: TotalsResponse,
}

impl From<CourseGrades> for CourseGradesResponse {
    fn from(cg: CourseGrades) -> Self {
        Self {
            course: CourseResponse::from(cg.course),
            entries: cg
                .entries
                .into_iter()
                .map(|e| GradeEntryResponse {
                    assignment: AssignmentResponse::from(e.assignment),
                    grade: e.grade.map(GradeResponse::from),
                })
                .collect(),
            totals: TotalsResponse::from(cg.totals),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StudentRowResponse {
    pub student: UserResponse,
    pub grades: Vec<GradeResponse>,
    pub totals: TotalsResponse,
}

#[derive(Debug, Serialize)]
pub struct GradebookResponse {
    pub course: CourseResponse,
    pub assignments: Vec<AssignmentResponse>,
    pub students: Vec<StudentRowResponse>,
}

impl From<Gradebook> for GradebookResponse {
    fn from(gb: Gradebook) -> Self {
        Self {
            course: CourseResponse::from(gb.course),
            assignments: gb
                .assignments
                .into_iter()
                .map(AssignmentResponse::from)
                .collect(),
            students: gb
                .students
                .into_iter()
                .map(|row| StudentRowResponse {
                    student: UserResponse::from(row.student),
                    grades: row.grades.into_iter().map(GradeResponse::from).collect(),
                    totals: TotalsResponse::from(row.totals),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpsertGradeRequest {
    pub points: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

async fn list_grades(
    teacher: TeacherUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let grades =
        grade_service::list_for_assignment(require_db(&app_state)?, teacher.id, path.into_inner())
            .await?;
    let body: Vec<GradeResponse> = grades.into_iter().map(GradeResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn upsert_grade(
    teacher: TeacherUser,
    path: web::Path<(i64, i64)>,
    body: ValidatedJson<UpsertGradeRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (assignment_id, student_id) = path.into_inner();
    let UpsertGradeRequest { points, comment } = body.into_inner();

    let grade = with_txn(&app_state, move |txn| {
        Box::pin(async move {
            grade_service::upsert(txn, teacher.id, assignment_id, student_id, points, comment)
                .await
        })
    })
    .await?;
    Ok(HttpResponse::Ok().json(GradeResponse::from(grade)))
}

async fn delete_grade(
    teacher: TeacherUser,
    path: web::Path<(i64, i64)>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let (assignment_id, student_id) = path.into_inner();
    grade_service::delete(
        require_db(&app_state)?,
        teacher.id,
        assignment_id,
        student_id,
    )
    .await?;
    Ok(HttpResponse::NoContent().finish())
}

async fn my_grades(
    student: StudentUser,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let courses = grade_service::my_grades(require_db(&app_state)?, student.id).await?;
    let body: Vec<CourseGradesResponse> =
        courses.into_iter().map(CourseGradesResponse::from).collect();
    Ok(HttpResponse::Ok().json(body))
}

async fn gradebook(
    teacher: TeacherUser,
    path: web::Path<i64>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let book =
        grade_service::gradebook(require_db(&app_state)?, teacher.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(GradebookResponse::from(book)))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/assignments/{id}/grades").route(web::get().to(list_grades)))
        .service(
            web::resource("/assignments/{id}/grades/{student_id}")
                .route(web::put().to(upsert_grade))
                .route(web::delete().to(delete_grade)),
        )
        .service(web::resource("/grades/me").route(web::get().to(my_grades)))
        .service(web::resource("/courses/{id}/gradebook").route(web::get().to(gradebook)));
}
