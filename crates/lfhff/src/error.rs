//! Lookup error types

use std::io;
use thiserror::Error;

/// Errors that abort a lookup.
///
/// A name that is simply absent is not an error; see
/// [`LookupResult::NotFound`](crate::LookupResult::NotFound).
#[derive(Debug, Error)]
pub enum LookupError {
    /// Seek or read on the underlying source failed
    #[error("hosts source I/O failed at offset {offset}: {message}")]
    Stream {
        offset: u64,
        message: &'static str,
        #[source]
        source: io::Error,
    },

    /// No record boundary within `limit` bytes before `pivot` in sorted mode.
    ///
    /// Either a record is longer than the backscan limit or the file is
    /// corrupt. The name may or may not be present.
    #[error("no record boundary within {limit} bytes before offset {pivot} (record too long or file corrupt)")]
    UnterminatedDescent { pivot: u64, limit: usize },
}

impl LookupError {
    /// Create a stream error for a failed operation at `offset`
    pub fn stream(offset: u64, message: &'static str, source: io::Error) -> Self {
        Self::Stream {
            offset,
            message,
            source,
        }
    }

    /// True when the error says something about the data rather than the I/O
    pub fn is_data_error(&self) -> bool {
        matches!(self, Self::UnterminatedDescent { .. })
    }
}
