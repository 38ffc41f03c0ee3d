//! Host-name lookup over LFHFF hosts files
//!
//! A hosts file whose first line is exactly `#LFHFFv1` declares every
//! following record sorted by its first name, case-insensitively. Such
//! files are binary searched over byte offsets; anything else is scanned
//! line by line.
//!
//! Nothing is cached: each call reads the source from the start and keeps
//! its buffers to itself.

mod record;
mod source;
mod window;

pub use record::{cmp_ignore_ascii_case, HostMatch, Record};
pub use source::HostsSource;
pub use window::SearchWindow;

use crate::error::LookupError;
use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

/// First line of a file declared sorted
pub const SENTINEL: &[u8] = b"#LFHFFv1\n";

/// Longest record the sorted search can step back over
pub const DEFAULT_MAX_RECORD_LEN: usize = 255;

/// How a source is searched, decided once from its first line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Linear,
    Sorted,
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::Linear => write!(f, "linear"),
            SearchMode::Sorted => write!(f, "sorted (LFHFF v1)"),
        }
    }
}

/// Outcome of a lookup that ran to completion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LookupResult {
    Found(HostMatch),
    NotFound,
}

impl LookupResult {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupResult::Found(_))
    }

    pub fn found(self) -> Option<HostMatch> {
        match self {
            LookupResult::Found(m) => Some(m),
            LookupResult::NotFound => None,
        }
    }
}

/// Tuning for a [`SortedHostsLookup`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupOptions {
    /// How far back from a pivot to look for the start of its record.
    /// Records longer than this cannot be located in sorted mode.
    pub max_record_len: usize,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            max_record_len: DEFAULT_MAX_RECORD_LEN,
        }
    }
}

/// Resolves names against a hosts source, binary searching sorted files.
#[derive(Debug, Clone, Default)]
pub struct SortedHostsLookup {
    options: LookupOptions,
}

impl SortedHostsLookup {
    pub fn new(options: LookupOptions) -> Self {
        Self { options }
    }

    /// Backscan limit in bytes, at least 1
    fn limit(&self) -> usize {
        self.options.max_record_len.max(1)
    }

    /// Look up `name` in `source`.
    ///
    /// The source is read from offset 0 regardless of its current
    /// position, and left wherever the search stopped. Any name on a
    /// record, alias or not, matches; the first match wins.
    #[instrument(level = "debug", skip(self, source))]
    pub fn lookup<S>(&self, source: &mut S, name: &str) -> Result<LookupResult, LookupError>
    where
        S: HostsSource + ?Sized,
    {
        let (mode, first_line) = read_first_line(source)?;
        debug!(%mode, "search mode selected");

        match mode {
            SearchMode::Sorted => self.binary_search(source, name.as_bytes()),
            SearchMode::Linear => linear_scan(source, name.as_bytes(), first_line),
        }
    }

    fn binary_search<S>(&self, source: &mut S, query: &[u8]) -> Result<LookupResult, LookupError>
    where
        S: HostsSource + ?Sized,
    {
        let data_start = SENTINEL.len() as u64;
        let total = source
            .total_len()
            .map_err(|e| LookupError::stream(data_start, "determine length", e))?;

        let mut window = SearchWindow::new(data_start, total.max(data_start));
        // The backscan never reaches below offset 0, so no chunk needs to
        // outgrow the file
        let chunk_len = usize::try_from(total)
            .map_or(self.limit(), |total| self.limit().min(total))
            .max(1);
        let mut chunk = vec![0u8; chunk_len];
        let mut line = Vec::with_capacity(chunk_len + 1);
        let mut descents = 0u32;

        while !window.is_empty() {
            descents += 1;
            let pivot = window.pivot();
            let pivot_down = self.read_record_at(source, pivot, &mut chunk, &mut line)?;
            let mut record_end = pivot_down + line.len() as u64;

            trace!(
                low = window.low(),
                high = window.high(),
                pivot,
                pivot_down,
                "descending"
            );

            loop {
                if line.is_empty() {
                    // Ran off the end of the data
                    window.truncate(pivot_down);
                    break;
                }

                let ordering = match Record::parse(&line) {
                    Some(record) => match record.find(query) {
                        Some(found) => {
                            debug!(descents, offset = record_end - line.len() as u64, "found");
                            return Ok(LookupResult::Found(found));
                        }
                        None => Some(cmp_ignore_ascii_case(query, record.sort_key())),
                    },
                    None => None,
                };

                if let Some(ordering) = ordering {
                    window.narrow(ordering, pivot_down, record_end);
                    break;
                }

                trace!(offset = record_end - line.len() as u64, "skipping line without a record");
                if record_end >= window.high() {
                    // Nothing but skipped lines between pivot_down and high
                    window.truncate(pivot_down);
                    break;
                }

                line.clear();
                let read = source
                    .read_line_into(&mut line)
                    .map_err(|e| LookupError::stream(record_end, "read line", e))?;
                record_end += read as u64;
            }
        }

        debug!(descents, "not found");
        Ok(LookupResult::NotFound)
    }

    /// Find the record containing byte `pivot` and read it into `line`.
    ///
    /// Returns the offset the record starts at. The source is left just
    /// past the record.
    fn read_record_at<S>(
        &self,
        source: &mut S,
        pivot: u64,
        chunk: &mut [u8],
        line: &mut Vec<u8>,
    ) -> Result<u64, LookupError>
    where
        S: HostsSource + ?Sized,
    {
        let back = pivot.min(chunk.len() as u64) as usize;
        let chunk_start = pivot - back as u64;

        source
            .seek_to(chunk_start)
            .map_err(|e| LookupError::stream(chunk_start, "seek", e))?;
        source
            .read_chunk(&mut chunk[..back])
            .map_err(|e| LookupError::stream(chunk_start, "read chunk", e))?;

        let Some(newline) = chunk[..back].iter().rposition(|&b| b == b'\n') else {
            warn!(
                pivot,
                limit = self.limit(),
                "no record boundary before pivot"
            );
            return Err(LookupError::UnterminatedDescent {
                pivot,
                limit: self.limit(),
            });
        };

        // The head of the record is already in the chunk; the source sits
        // at `pivot`, so reading on completes the line.
        line.clear();
        line.extend_from_slice(&chunk[newline + 1..back]);
        source
            .read_line_into(line)
            .map_err(|e| LookupError::stream(pivot, "read line", e))?;

        Ok(chunk_start + newline as u64 + 1)
    }
}

/// Look up `name` with default options.
pub fn lookup<S>(source: &mut S, name: &str) -> Result<LookupResult, LookupError>
where
    S: HostsSource + ?Sized,
{
    SortedHostsLookup::default().lookup(source, name)
}

/// Report whether `source` is declared sorted, without searching it.
pub fn detect_mode<S>(source: &mut S) -> Result<SearchMode, LookupError>
where
    S: HostsSource + ?Sized,
{
    read_first_line(source).map(|(mode, _)| mode)
}

fn read_first_line<S>(source: &mut S) -> Result<(SearchMode, Vec<u8>), LookupError>
where
    S: HostsSource + ?Sized,
{
    source
        .seek_to(0)
        .map_err(|e| LookupError::stream(0, "seek", e))?;

    let mut line = Vec::new();
    source
        .read_line_into(&mut line)
        .map_err(|e| LookupError::stream(0, "read first line", e))?;

    let mode = if line == SENTINEL {
        SearchMode::Sorted
    } else {
        SearchMode::Linear
    };
    Ok((mode, line))
}

fn linear_scan<S>(
    source: &mut S,
    query: &[u8],
    mut line: Vec<u8>,
) -> Result<LookupResult, LookupError>
where
    S: HostsSource + ?Sized,
{
    let mut offset = 0u64;

    while !line.is_empty() {
        if let Some(found) = Record::parse(&line).and_then(|record| record.find(query)) {
            debug!(offset, "found");
            return Ok(LookupResult::Found(found));
        }

        offset += line.len() as u64;
        line.clear();
        source
            .read_line_into(&mut line)
            .map_err(|e| LookupError::stream(offset, "read line", e))?;
    }

    debug!("not found");
    Ok(LookupResult::NotFound)
}
