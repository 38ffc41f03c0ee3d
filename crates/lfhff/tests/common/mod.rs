//! Shared helpers for lfhff integration tests

#![allow(dead_code)]

use std::fs::File;
use std::io::{BufReader, Write};
use tempfile::NamedTempFile;

pub const SAMPLE_RECORDS: &str = "10.0.0.1 alpha.example\n\
                                  10.0.0.2 beta.example gamma.example\n\
                                  10.0.0.9 zeta.example\n";

/// Prefix `records` with the sorted-file marker line
pub fn with_sentinel(records: &str) -> String {
    format!("#LFHFFv1\n{}", records)
}

/// Write `contents` to a fresh temp file
pub fn hosts_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp hosts file");
    file.write_all(contents.as_bytes())
        .expect("write temp hosts file");
    file.flush().expect("flush temp hosts file");
    file
}

/// Open a temp hosts file the way the CLI does
pub fn open(file: &NamedTempFile) -> BufReader<File> {
    BufReader::new(File::open(file.path()).expect("open temp hosts file"))
}
