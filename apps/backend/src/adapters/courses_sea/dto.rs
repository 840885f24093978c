//! DTOs for courses_sea adapter.

#[derive(Debug, Clone)]
pub struct CourseCreate {
    pub name: String,
    pub description: Option<String>,
    pub teacher_id: i64,
    pub class_id: i64,
}

/// Partial update. `description: Some(None)` clears the column.
#[derive(Debug, Clone, Default)]
pub struct CourseUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub class_id: Option<i64>,
}
