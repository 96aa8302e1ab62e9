//! JSON output formatting and report files.

use crate::scanner::ScanReport;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Print results in JSON format.
pub fn print_json(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json(&mut out, report)?;
    writeln!(out)
}

/// Write the pretty-printed report into any writer.
pub fn write_json<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    serde_json::to_writer_pretty(out, report).map_err(io::Error::other)
}

/// Write the report to `path`, replacing any existing file.
pub fn save_report(report: &ScanReport, path: &Path) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_json(&mut out, report)?;
    writeln!(out)?;
    out.flush()
}
