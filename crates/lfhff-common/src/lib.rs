//! Input validation shared by the lfhff library and CLI.

pub mod validation;

pub use validation::{validate_hostname, validate_ip_address, ValidationError, ValidationResult};
