//! Ownership and visibility checks shared by the course-scoped services.

use sea_orm::ConnectionTrait;

use crate::auth::Role;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::logging::security;
use crate::repos::courses::{self, Course};
use crate::repos::users;

/// The course, if `teacher_id` owns it; 403 otherwise.
pub async fn course_for_owner<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
    course_id: i64,
) -> Result<Course, AppError> {
    let course = courses::require_course(conn, course_id).await?;
    if course.teacher_id != teacher_id {
        security::access_denied(teacher_id, "course");
        return Err(AppError::forbidden("You do not own this course"));
    }
    Ok(course)
}

/// The course, if the caller owns it (teacher) or belongs to its class
/// (student).
pub async fn course_for_reader<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    caller: &CurrentUser,
    course_id: i64,
) -> Result<Course, AppError> {
    match caller.role {
        Some(Role::Teacher) => course_for_owner(conn, caller.id, course_id).await,
        Some(Role::Student) => {
            let course = courses::require_course(conn, course_id).await?;
            let student = users::require_user(conn, caller.id).await?;
            if student.class_id != Some(course.class_id) {
                security::access_denied(caller.id, "course");
                return Err(AppError::forbidden("This course is not part of your class"));
            }
            Ok(course)
        }
        None => Err(AppError::forbidden("A role is required to view courses")),
    }
}
