pub mod assignments;
pub mod grades;
pub mod healthcheck;
pub mod users;
