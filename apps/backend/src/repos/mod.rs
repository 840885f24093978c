//! Repository functions for the domain layer (generic over ConnectionTrait).

pub mod assignments;
pub mod classes;
pub mod courses;
pub mod grades;
pub mod users;
