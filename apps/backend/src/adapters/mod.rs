//! SeaORM adapters. Functions return `DbErr`; repos map to `DomainError`.

pub mod assignments_sea;
pub mod classes_sea;
pub mod courses_sea;
pub mod grades_sea;
pub mod users_sea;
