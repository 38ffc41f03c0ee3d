//! Test utilities for lfhff unit tests.

use std::io::Cursor;

use crate::lookup::SENTINEL;

/// In-memory source holding `data` as-is.
pub fn source_from(data: &str) -> Cursor<Vec<u8>> {
    Cursor::new(data.as_bytes().to_vec())
}

/// In-memory source holding `data` behind the sorted-file sentinel.
pub fn sorted_source(data: &str) -> Cursor<Vec<u8>> {
    let mut bytes = SENTINEL.to_vec();
    bytes.extend_from_slice(data.as_bytes());
    Cursor::new(bytes)
}
