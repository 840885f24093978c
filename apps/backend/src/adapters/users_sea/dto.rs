//! DTOs for users_sea adapter.

/// DTO for inserting a user.
#[derive(Debug, Clone)]
pub struct UserCreate {
    pub username: String,
    pub email: Option<String>,
    pub password_hash: String,
    /// Database form: "teacher" | "student"
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub class_id: Option<i64>,
}
