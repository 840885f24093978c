pub mod app;
pub mod db;

pub use app::{AppConfig, BackupConfig, LogConfig, SeedTeacher, ServerConfig};
