use regex::Regex;
use std::net::IpAddr;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid host name: {0}")]
    InvalidHostName(String),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

// Hosts-file label: alphanumerics, hyphens and underscores, 1-63 chars,
// no leading/trailing hyphen. Underscores show up in real block lists.
static LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_]([a-zA-Z0-9_-]{0,61}[a-zA-Z0-9_])?$")
        .expect("label regex is valid")
});

/// Validates an IP address token (IPv4 or IPv6)
pub fn validate_ip_address(ip: &str) -> ValidationResult<IpAddr> {
    ip.parse::<IpAddr>()
        .map_err(|_| ValidationError::InvalidIpAddress(ip.to_string()))
}

/// Validates a host name used as a lookup query and returns it normalized.
///
/// A single trailing dot (fully-qualified form) is dropped, since hosts
/// files never carry it. Case is preserved; lookups compare
/// case-insensitively anyway.
///
/// Rules:
/// - Total length: 1-253 characters (RFC 1035)
/// - Labels separated by dots, each 1-63 chars
/// - Labels use alphanumerics, hyphens and underscores
/// - Labels cannot start or end with a hyphen
pub fn validate_hostname(name: &str) -> ValidationResult<String> {
    let name = name.strip_suffix('.').unwrap_or(name);

    if name.is_empty() {
        return Err(ValidationError::InvalidHostName(
            "host name cannot be empty".to_string(),
        ));
    }

    if name.len() > 253 {
        return Err(ValidationError::InvalidHostName(
            "host name exceeds maximum length of 253 characters".to_string(),
        ));
    }

    if name.starts_with('.') || name.ends_with('.') {
        return Err(ValidationError::InvalidHostName(format!(
            "'{}' cannot start or end with a dot",
            name
        )));
    }

    for label in name.split('.') {
        if !LABEL_REGEX.is_match(label) {
            return Err(ValidationError::InvalidHostName(format!(
                "invalid label '{}' in '{}'",
                label, name
            )));
        }
    }

    Ok(name.to_string())
}
