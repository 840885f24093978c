//! Seed data through the service layer, so fixtures obey the same rules
//! as real requests.

use gradebook::auth::Role;
use gradebook::config::db::{DbKind, DbProfile};
use gradebook::infra::state::build_state;
use gradebook::repos::assignments::Assignment;
use gradebook::repos::classes::Class;
use gradebook::repos::courses::Course;
use gradebook::repos::users::User;
use gradebook::services::users::{create_account, NewAccount};
use gradebook::services::{assignments, classes, courses};
use gradebook::state::{AppState, SecurityConfig};
use sea_orm::DatabaseConnection;

use super::auth::test_security;

pub const TEST_PASSWORD: &str = "correct-horse-1";

/// Fresh, migrated in-memory database per call
pub async fn test_state() -> AppState {
    test_state_with(test_security()).await
}

pub async fn test_state_with(security: SecurityConfig) -> AppState {
    build_state()
        .with_db(DbKind::SqliteMemory, DbProfile::Test)
        .with_security(security)
        .build()
        .await
        .expect("should build test state")
}

pub fn db(state: &AppState) -> &DatabaseConnection {
    state.db().expect("test state has a database")
}

fn account(username: &str) -> NewAccount {
    NewAccount {
        username: username.to_string(),
        password: TEST_PASSWORD.to_string(),
        first_name: "Test".to_string(),
        last_name: username.to_string(),
        email: Some(format!("{username}@school.test")),
    }
}

pub async fn create_teacher(db: &DatabaseConnection, username: &str) -> User {
    create_account(db, account(username), Role::Teacher, None)
        .await
        .expect("should create teacher")
}

pub async fn create_student(db: &DatabaseConnection, username: &str, class_id: Option<i64>) -> User {
    create_account(db, account(username), Role::Student, class_id)
        .await
        .expect("should create student")
}

pub async fn create_class(db: &DatabaseConnection, name: &str) -> Class {
    classes::create(db, name, "2025/26")
        .await
        .expect("should create class")
}

pub async fn create_course(db: &DatabaseConnection, teacher_id: i64, class_id: i64, name: &str) -> Course {
    courses::create(db, teacher_id, name, None, class_id)
        .await
        .expect("should create course")
}

pub async fn create_assignment(
    db: &DatabaseConnection,
    teacher_id: i64,
    course_id: i64,
    title: &str,
    max_points: f64,
) -> Assignment {
    assignments::create(
        db,
        teacher_id,
        course_id,
        assignments::NewAssignment {
            title: title.to_string(),
            description: None,
            due_date: None,
            max_points,
        },
    )
    .await
    .expect("should create assignment")
}

/// A teacher owning one course for a class with one enrolled student.
pub struct Classroom {
    pub teacher: User,
    pub student: User,
    pub class: Class,
    pub course: Course,
}

pub async fn classroom(db: &DatabaseConnection) -> Classroom {
    let teacher = create_teacher(db, "t.smith").await;
    let class = create_class(db, "7B").await;
    let student = create_student(db, "s.jones", Some(class.id)).await;
    let course = create_course(db, teacher.id, class.id, "Mathematics").await;
    Classroom {
        teacher,
        student,
        class,
        course,
    }
}
