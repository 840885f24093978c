//! DTOs for grades_sea adapter.

#[derive(Debug, Clone)]
pub struct GradeUpsert {
    pub assignment_id: i64,
    pub student_id: i64,
    pub points: f64,
    pub comment: Option<String>,
}
