//! Infrastructure: database bootstrap, state construction, DbErr mapping.

pub mod db;
pub mod db_errors;
pub mod state;
