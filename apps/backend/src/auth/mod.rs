//! Bearer-token authentication and role-based access control.

pub mod claims;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod validator;

pub use claims::{ClaimSet, Role};
pub use gate::{AccessGate, GateRejection, Principal};
pub use validator::{MissingExpiry, TokenValidator};
