//! Shared utilities.

pub mod client_ip;
pub mod url_validator;
