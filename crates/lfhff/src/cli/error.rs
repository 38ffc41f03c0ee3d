use crate::config::ConfigError;
use crate::error::LookupError;

/// Exit codes following Unix conventions
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_NOT_FOUND: i32 = 3;

/// Convert a lookup error to a user-friendly message
pub fn format_lookup_error(err: &LookupError) -> String {
    match err {
        LookupError::Stream {
            offset,
            message,
            source,
        } => format!("Cannot read hosts file ({} at offset {}): {}", message, offset, source),
        LookupError::UnterminatedDescent { pivot, limit } => format!(
            "Not found: no record boundary within {} bytes of offset {}; \
             a record may exceed --max-record-len or the file is corrupt",
            limit, pivot
        ),
    }
}

/// Get exit code for a lookup error
pub fn exit_code_for_lookup_error(err: &LookupError) -> i32 {
    match err {
        LookupError::Stream { .. } => EXIT_ERROR,
        LookupError::UnterminatedDescent { .. } => EXIT_NOT_FOUND,
    }
}

/// Convert a configuration error to a user-friendly message
pub fn format_config_error(err: &ConfigError) -> String {
    format!("Configuration error: {}", err)
}
