//! DTOs for assignments_sea adapter.

use time::OffsetDateTime;

#[derive(Debug, Clone)]
pub struct AssignmentCreate {
    pub course_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<OffsetDateTime>,
    pub max_points: f64,
}

/// Partial update; nested `Option`s distinguish "clear" from "leave".
#[derive(Debug, Clone, Default)]
pub struct AssignmentUpdate {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub due_date: Option<Option<OffsetDateTime>>,
    pub max_points: Option<f64>,
}
