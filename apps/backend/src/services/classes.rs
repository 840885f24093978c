use sea_orm::ConnectionTrait;
use tracing::info;

use super::require_text;
use crate::auth::Role;
use crate::error::AppError;
use crate::repos::classes::{self, Class, ClassCreate, ClassUpdate};
use crate::repos::users::{self, User};

pub async fn list<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<Vec<Class>, AppError> {
    Ok(classes::list_classes(conn).await?)
}

pub async fn get<C: ConnectionTrait + Send + Sync>(conn: &C, id: i64) -> Result<Class, AppError> {
    Ok(classes::require_class(conn, id).await?)
}

pub async fn create<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    name: &str,
    school_year: &str,
) -> Result<Class, AppError> {
    let class = classes::create_class(
        conn,
        ClassCreate {
            name: require_text("name", name)?,
            school_year: require_text("school_year", school_year)?,
        },
    )
    .await?;
    info!(class_id = class.id, "Class created");
    Ok(class)
}

pub async fn update<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    id: i64,
    name: Option<&str>,
    school_year: Option<&str>,
) -> Result<Class, AppError> {
    let dto = ClassUpdate {
        name: name.map(|n| require_text("name", n)).transpose()?,
        school_year: school_year
            .map(|y| require_text("school_year", y))
            .transpose()?,
    };
    Ok(classes::update_class(conn, id, dto).await?)
}

/// Deleting a class removes its courses; enrolled students become unassigned.
pub async fn delete<C: ConnectionTrait + Send + Sync>(conn: &C, id: i64) -> Result<(), AppError> {
    classes::delete_class(conn, id).await?;
    info!(class_id = id, "Class deleted");
    Ok(())
}

pub async fn roster<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    class_id: i64,
) -> Result<Vec<User>, AppError> {
    classes::require_class(conn, class_id).await?;
    Ok(users::list_students_in_class(conn, class_id).await?)
}

/// Move a student into the class (replacing any previous class).
pub async fn enrol<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    class_id: i64,
    student_id: i64,
) -> Result<User, AppError> {
    classes::require_class(conn, class_id).await?;
    let student = users::require_user(conn, student_id).await?;
    if student.role != Role::Student {
        return Err(AppError::validation("Only students can be enrolled in a class"));
    }
    if student.class_id == Some(class_id) {
        return Ok(student);
    }
    let student = users::assign_class(conn, student_id, Some(class_id)).await?;
    info!(class_id, student_id, "Student enrolled");
    Ok(student)
}
