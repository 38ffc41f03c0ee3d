use serde::Serialize;
use std::path::PathBuf;

use super::OutputFormat;
use crate::lookup::{HostMatch, SearchMode};
use crate::verify::VerifyReport;

/// Trait for types that can be displayed in table format
pub trait TableDisplay {
    fn headers() -> Vec<&'static str>;
    fn row(&self) -> Vec<String>;
}

impl TableDisplay for HostMatch {
    fn headers() -> Vec<&'static str> {
        vec!["ADDRESS", "NAME", "CANONICAL"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.address.clone(),
            self.matched_name.clone(),
            self.canonical_name.clone(),
        ]
    }
}

/// Search mode of one hosts file
#[derive(Debug, Clone, Serialize)]
pub struct ModeInfo {
    pub hosts_file: PathBuf,
    pub mode: SearchMode,
}

impl TableDisplay for ModeInfo {
    fn headers() -> Vec<&'static str> {
        vec!["FILE", "MODE"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.hosts_file.display().to_string(), self.mode.to_string()]
    }
}

/// Print one result as a single-row table, a one-element JSON array, or a
/// CSV header plus row
pub fn print_item<T>(item: &T, format: OutputFormat)
where
    T: TableDisplay + Serialize,
{
    let items = std::slice::from_ref(item);
    match format {
        OutputFormat::Table => print_table(items),
        OutputFormat::Json => print_json(items),
        OutputFormat::Csv => print_csv(items),
    }
}

/// Print a verification report: prose for tables, the full report for
/// JSON, and one row per failure for CSV.
pub fn print_report(report: &VerifyReport, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            for line in report_lines(report) {
                println!("{}", line);
            }
        }
        OutputFormat::Json => match serde_json::to_string_pretty(report) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Error serializing to JSON: {}", e),
        },
        OutputFormat::Csv => {
            if let Err(e) = write_csv(["KIND", "NAME", "DETAIL"], failure_rows(report)) {
                eprintln!("Error writing CSV: {}", e);
            }
        }
    }
}

fn report_lines(report: &VerifyReport) -> Vec<String> {
    let mut lines = vec![
        format!("Mode:            {}", report.mode),
        format!("Records:         {}", report.records),
        format!("Names checked:   {}", report.names_checked),
        format!("Probes checked:  {}", report.probes_checked),
        format!(
            "Lookup time:     mean {}us, max {}us over {} lookups",
            report.timing.mean_micros(),
            report.timing.max_micros,
            report.timing.lookups
        ),
    ];

    if !report.non_ip_addresses.is_empty() {
        lines.push(format!(
            "Non-IP addresses: {}",
            report.non_ip_addresses.join(", ")
        ));
    }

    for row in failure_rows(report) {
        lines.push(format!("{:<16} {}  {}", row[0], row[1], row[2]));
    }

    if report.is_ok() {
        lines.push("OK".to_string());
    } else {
        lines.push(format!("FAILED: {} problem(s)", report.failure_count()));
    }
    lines
}

fn failure_rows(report: &VerifyReport) -> Vec<[String; 3]> {
    let mut rows = Vec::new();

    for v in &report.order_violations {
        rows.push([
            "out-of-order".to_string(),
            v.name.clone(),
            format!("line {} sorts before {}", v.line, v.previous),
        ]);
    }
    for name in &report.missing {
        rows.push(["missing".to_string(), name.clone(), String::new()]);
    }
    for m in &report.mismatched {
        rows.push([
            "wrong-address".to_string(),
            m.name.clone(),
            format!("resolved {}, expected {}", m.resolved, m.expected.join("|")),
        ]);
    }
    for name in &report.false_positives {
        rows.push(["false-positive".to_string(), name.clone(), String::new()]);
    }
    for f in &report.failed {
        rows.push(["error".to_string(), f.name.clone(), f.error.clone()]);
    }
    rows
}

fn print_table<T: TableDisplay>(items: &[T]) {
    if items.is_empty() {
        return;
    }

    let header: Vec<String> = T::headers().into_iter().map(str::to_string).collect();
    let rows: Vec<Vec<String>> = items.iter().map(TableDisplay::row).collect();
    for line in table_lines(&header, &rows) {
        println!("{}", line);
    }
}

/// Left-aligned columns, two spaces apart, as wide as their widest cell
fn table_lines(header: &[String], rows: &[Vec<String>]) -> Vec<String> {
    let mut widths = vec![0; header.len()];
    for row in std::iter::once(header).chain(rows.iter().map(Vec::as_slice)) {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    std::iter::once(header)
        .chain(rows.iter().map(Vec::as_slice))
        .map(|row| {
            let cells: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:width$}", cell, width = *width))
                .collect();
            cells.join("  ").trim_end().to_string()
        })
        .collect()
}

fn print_json<T: Serialize>(items: &[T]) {
    if let Err(e) = serde_json::to_string_pretty(items).map(|json| println!("{}", json)) {
        eprintln!("Error serializing to JSON: {}", e);
    }
}

fn print_csv<T: TableDisplay>(items: &[T]) {
    let rows = items.iter().map(|item| item.row());
    if let Err(e) = write_csv(T::headers(), rows) {
        eprintln!("Error writing CSV: {}", e);
    }
}

/// Header then rows to stdout
fn write_csv<H, R>(header: H, rows: impl IntoIterator<Item = R>) -> csv::Result<()>
where
    H: IntoIterator,
    H::Item: AsRef<[u8]>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    writer.write_record(header)?;
    for row in rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}
