pub mod gate_http;
pub mod login;
