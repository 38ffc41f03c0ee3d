//! Self-check of a hosts file against the lookup.
//!
//! Every record is resolved through [`SortedHostsLookup`] and compared with
//! what a plain read of the file says it should return. Sorted files also
//! get their declared order checked, and optionally near-miss names between
//! neighbouring records are probed to make sure they do not resolve.

use lfhff_common::validate_ip_address;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::LookupError;
use crate::lookup::{
    cmp_ignore_ascii_case, detect_mode, HostsSource, LookupResult, Record, SearchMode,
    SortedHostsLookup,
};

const PROBE_SUFFIX: &str = "-lfhff-probe";

#[derive(Debug, Clone, Copy, Default)]
pub struct VerifyOptions {
    /// Also look up near-miss names that must not resolve
    pub probes: bool,
}

/// A record as read straight from the file
#[derive(Debug, Clone, PartialEq, Eq)]
struct OwnedRecord {
    line: usize,
    address: String,
    names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub name: String,
    pub expected: Vec<String>,
    pub resolved: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderViolation {
    pub line: usize,
    pub previous: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedLookup {
    pub name: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TimingSummary {
    pub lookups: usize,
    pub total_micros: u64,
    pub max_micros: u64,
}

impl TimingSummary {
    fn record(&mut self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.lookups += 1;
        self.total_micros = self.total_micros.saturating_add(micros);
        self.max_micros = self.max_micros.max(micros);
    }

    pub fn mean_micros(&self) -> u64 {
        if self.lookups == 0 {
            0
        } else {
            self.total_micros / self.lookups as u64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub mode: SearchMode,
    pub records: usize,
    pub names_checked: usize,
    pub probes_checked: usize,
    pub missing: Vec<String>,
    pub mismatched: Vec<Mismatch>,
    pub false_positives: Vec<String>,
    pub order_violations: Vec<OrderViolation>,
    pub failed: Vec<FailedLookup>,
    /// Addresses that are not IP literals; reported, not failures
    pub non_ip_addresses: Vec<String>,
    pub timing: TimingSummary,
}

impl VerifyReport {
    pub fn is_ok(&self) -> bool {
        self.missing.is_empty()
            && self.mismatched.is_empty()
            && self.false_positives.is_empty()
            && self.order_violations.is_empty()
            && self.failed.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.missing.len()
            + self.mismatched.len()
            + self.false_positives.len()
            + self.order_violations.len()
            + self.failed.len()
    }
}

/// Check every record of `source` against `lookup`.
///
/// In sorted mode only canonical names are resolved, since aliases are not
/// part of the sort order. Stream errors abort; per-name data errors are
/// collected in [`VerifyReport::failed`].
pub fn verify<S>(
    lookup: &SortedHostsLookup,
    source: &mut S,
    options: VerifyOptions,
) -> Result<VerifyReport, LookupError>
where
    S: HostsSource + ?Sized,
{
    let mode = detect_mode(source)?;
    let records = read_records(source)?;
    info!(%mode, records = records.len(), "verifying hosts file");

    let mut expected: HashMap<String, Vec<String>> = HashMap::new();
    for record in &records {
        for name in &record.names {
            expected
                .entry(name.to_ascii_lowercase())
                .or_default()
                .push(record.address.clone());
        }
    }

    let mut report = VerifyReport {
        mode,
        records: records.len(),
        names_checked: 0,
        probes_checked: 0,
        missing: Vec::new(),
        mismatched: Vec::new(),
        false_positives: Vec::new(),
        order_violations: Vec::new(),
        failed: Vec::new(),
        non_ip_addresses: Vec::new(),
        timing: TimingSummary::default(),
    };

    let mut seen_addresses = HashSet::new();
    for record in &records {
        if validate_ip_address(&record.address).is_err()
            && seen_addresses.insert(record.address.clone())
        {
            warn!(line = record.line, address = %record.address, "address is not an IP literal");
            report.non_ip_addresses.push(record.address.clone());
        }
    }

    if mode == SearchMode::Sorted {
        for pair in records.windows(2) {
            let (previous, current) = (&pair[0].names[0], &pair[1].names[0]);
            if cmp_ignore_ascii_case(previous.as_bytes(), current.as_bytes()) == Ordering::Greater {
                report.order_violations.push(OrderViolation {
                    line: pair[1].line,
                    previous: previous.clone(),
                    name: current.clone(),
                });
            }
        }
    }

    let mut checked = HashSet::new();
    for record in &records {
        let names = match mode {
            SearchMode::Sorted => &record.names[..1],
            SearchMode::Linear => &record.names[..],
        };

        for name in names {
            let key = name.to_ascii_lowercase();
            if !checked.insert(key.clone()) {
                continue;
            }
            report.names_checked += 1;

            match timed_lookup(lookup, source, name, &mut report)? {
                Some(LookupResult::Found(found)) => {
                    let addresses = expected.get(&key).cloned().unwrap_or_default();
                    if !addresses.contains(&found.address) {
                        report.mismatched.push(Mismatch {
                            name: name.clone(),
                            expected: addresses,
                            resolved: found.address,
                        });
                    }
                }
                Some(LookupResult::NotFound) => {
                    debug!(line = record.line, name = %name, "record not resolved");
                    report.missing.push(name.clone());
                }
                None => {}
            }
        }
    }

    if options.probes {
        for probe in near_miss_probes(&records) {
            if expected.contains_key(&probe.to_ascii_lowercase()) {
                continue;
            }
            report.probes_checked += 1;

            if let Some(LookupResult::Found(_)) = timed_lookup(lookup, source, &probe, &mut report)? {
                report.false_positives.push(probe);
            }
        }
    }

    info!(
        checked = report.names_checked,
        probes = report.probes_checked,
        failures = report.failure_count(),
        "verification finished"
    );
    Ok(report)
}

/// Run one lookup, recording its time. Data errors land in the report and
/// yield `None`; stream errors propagate.
fn timed_lookup<S>(
    lookup: &SortedHostsLookup,
    source: &mut S,
    name: &str,
    report: &mut VerifyReport,
) -> Result<Option<LookupResult>, LookupError>
where
    S: HostsSource + ?Sized,
{
    let started = Instant::now();
    let result = lookup.lookup(source, name);
    report.timing.record(started.elapsed());

    match result {
        Ok(result) => Ok(Some(result)),
        Err(e) if e.is_data_error() => {
            report.failed.push(FailedLookup {
                name: name.to_string(),
                error: e.to_string(),
            });
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn read_records<S>(source: &mut S) -> Result<Vec<OwnedRecord>, LookupError>
where
    S: HostsSource + ?Sized,
{
    source
        .seek_to(0)
        .map_err(|e| LookupError::stream(0, "seek", e))?;

    let mut records = Vec::new();
    let mut line = Vec::new();
    let mut offset = 0u64;
    let mut line_number = 0;

    loop {
        line.clear();
        let read = source
            .read_line_into(&mut line)
            .map_err(|e| LookupError::stream(offset, "read line", e))?;
        if read == 0 {
            break;
        }
        offset += read as u64;
        line_number += 1;

        if let Some(record) = Record::parse(&line) {
            records.push(OwnedRecord {
                line: line_number,
                address: String::from_utf8_lossy(record.address()).into_owned(),
                names: record
                    .names()
                    .iter()
                    .map(|n| String::from_utf8_lossy(n).into_owned())
                    .collect(),
            });
        }
    }

    Ok(records)
}

/// Near-miss names for neighbouring canonical names: the shared prefix up
/// to the first difference, plus a suffix no real host carries. Names that
/// differ in their first character share an empty prefix.
fn near_miss_probes(records: &[OwnedRecord]) -> Vec<String> {
    let mut probes = Vec::new();
    let mut seen = HashSet::new();

    for pair in records.windows(2) {
        let previous = pair[0].names[0].to_ascii_lowercase();
        let current = pair[1].names[0].to_ascii_lowercase();

        let Some(split) = previous
            .bytes()
            .zip(current.bytes())
            .position(|(a, b)| a != b)
        else {
            continue;
        };
        // Stay on a char boundary for non-ASCII names
        let prefix = match previous.get(..split) {
            Some(prefix) => prefix,
            None => continue,
        };
        let probe = format!("{}{}", prefix, PROBE_SUFFIX);
        if seen.insert(probe.clone()) {
            probes.push(probe);
        }
    }

    probes
}
