//! Hosts-file record parsing

use std::cmp::Ordering;

/// One parsed hosts-file line, borrowing from the line buffer.
///
/// Always carries an address and at least one name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    address: &'a [u8],
    names: Vec<&'a [u8]>,
}

impl<'a> Record<'a> {
    /// Parse a raw line as read from the file, terminator included.
    ///
    /// Everything from the first `#` or `\n` onward is dropped. Returns
    /// `None` for comment lines, blank lines and lines with an address but
    /// no name.
    pub fn parse(line: &'a [u8]) -> Option<Self> {
        let end = line
            .iter()
            .position(|&b| b == b'#' || b == b'\n')
            .unwrap_or(line.len());

        let mut tokens = line[..end]
            .split(u8::is_ascii_whitespace)
            .filter(|t| !t.is_empty());

        let address = tokens.next()?;
        let names: Vec<&[u8]> = tokens.collect();
        if names.is_empty() {
            return None;
        }

        Some(Self { address, names })
    }

    pub fn address(&self) -> &'a [u8] {
        self.address
    }

    /// First name on the line
    pub fn canonical_name(&self) -> &'a [u8] {
        self.names[0]
    }

    pub fn names(&self) -> &[&'a [u8]] {
        &self.names
    }

    /// Key the sorted file format orders records by
    pub fn sort_key(&self) -> &'a [u8] {
        self.canonical_name()
    }

    /// First name equal to `query`, as an owned match
    pub fn find(&self, query: &[u8]) -> Option<HostMatch> {
        let matched = self
            .names
            .iter()
            .find(|name| name.eq_ignore_ascii_case(query))?;

        Some(HostMatch {
            address: String::from_utf8_lossy(self.address).into_owned(),
            matched_name: String::from_utf8_lossy(matched).into_owned(),
            canonical_name: String::from_utf8_lossy(self.canonical_name()).into_owned(),
        })
    }
}

/// A record that matched a query.
///
/// `matched_name` is the name as written in the file, which may be an
/// alias; `canonical_name` is always the first name on the line.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct HostMatch {
    pub address: String,
    pub matched_name: String,
    pub canonical_name: String,
}

/// Byte-wise comparison after ASCII lowercasing, like `strcasecmp`
pub fn cmp_ignore_ascii_case(a: &[u8], b: &[u8]) -> Ordering {
    a.iter()
        .map(u8::to_ascii_lowercase)
        .cmp(b.iter().map(u8::to_ascii_lowercase))
}
