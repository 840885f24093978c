//! Shared helpers for gradebook backend tests.
//!
//! Keeps test logging setup and Problem Details assertions out of the
//! backend crate so both unit and integration tests can use them.

pub mod logging;
pub mod problem_details;
