use sea_orm::ConnectionTrait;
use tracing::info;

use super::access::{course_for_owner, course_for_reader};
use super::{optional_text, require_text};
use crate::auth::Role;
use crate::error::AppError;
use crate::extractors::CurrentUser;
use crate::repos::classes;
use crate::repos::courses::{self, Course, CourseCreate, CourseUpdate};
use crate::repos::users;

#[derive(Debug, Clone, Default)]
pub struct CourseChanges {
    pub name: Option<String>,
    /// `Some(None)` clears the description
    pub description: Option<Option<String>>,
    pub class_id: Option<i64>,
}

/// Teachers see the courses they own, students the courses of their class.
pub async fn list_for<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    caller: &CurrentUser,
) -> Result<Vec<Course>, AppError> {
    match caller.role {
        Some(Role::Teacher) => Ok(courses::list_for_teacher(conn, caller.id).await?),
        Some(Role::Student) => {
            let student = users::require_user(conn, caller.id).await?;
            match student.class_id {
                Some(class_id) => Ok(courses::list_for_class(conn, class_id).await?),
                None => Ok(Vec::new()),
            }
        }
        None => Ok(Vec::new()),
    }
}

pub async fn get<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    caller: &CurrentUser,
    id: i64,
) -> Result<Course, AppError> {
    course_for_reader(conn, caller, id).await
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
    name: &str,
    description: Option<String>,
    class_id: i64,
) -> Result<Course, AppError> {
    let name = require_text("name", name)?;
    classes::require_class(conn, class_id).await?;

    let course = courses::create_course(
        conn,
        CourseCreate {
            name,
            description: optional_text(description),
            teacher_id,
            class_id,
        },
    )
    .await?;
    info!(course_id = course.id, teacher_id, "Course created");
    Ok(course)
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
    id: i64,
    changes: CourseChanges,
) -> Result<Course, AppError> {
    course_for_owner(conn, teacher_id, id).await?;

    if let Some(class_id) = changes.class_id {
        classes::require_class(conn, class_id).await?;
    }
    let dto = CourseUpdate {
        name: changes
            .name
            .as_deref()
            .map(|n| require_text("name", n))
            .transpose()?,
        description: changes.description.map(optional_text),
        class_id: changes.class_id,
    };
    Ok(courses::update_course(conn, id, dto).await?)
}

pub async fn delete<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    teacher_id: i64,
    id: i64,
) -> Result<(), AppError> {
    course_for_owner(conn, teacher_id, id).await?;
    courses::delete_course(conn, id).await?;
    info!(course_id = id, teacher_id, "Course deleted");
    Ok(())
}
