//! Plain text output formatting.
//!
//! Produces human-readable output with colors and formatting.

use crate::scanner::ScanReport;
use console::style;
use std::io::{self, Write};

const HEAVY_RULE: &str = "═══════════════════════════════════════════════════════════════";
const LIGHT_RULE: &str = "───────────────────────────────────────────────────────────────";

/// Banner characters shown in the table; the full banner is in JSON/CSV.
const BANNER_COLUMN: usize = 40;

/// Print results in human-readable plain text format to stdout.
pub fn print_plain(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_plain(&mut stdout.lock(), report)
}

/// Render the plain text report into any writer.
pub fn write_plain<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", style(HEAVY_RULE).cyan())?;
    writeln!(out, "                    {} Scan Results", style("Skiff").cyan().bold())?;
    writeln!(out, "{}", style(HEAVY_RULE).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Target:").bold(), report.target())?;
    writeln!(out, "  {} {}", style("IP Address:").bold(), report.ip_address())?;
    writeln!(
        out,
        "  {} {}",
        style("Started:").bold(),
        report.start_time().to_rfc3339()
    )?;
    writeln!(out)?;

    writeln!(
        out,
        "  {} {} ports scanned in {:.2}s, {} open",
        style("Statistics:").bold(),
        report.ports_scanned(),
        report.elapsed_seconds(),
        style(report.open_ports()).green().bold()
    )?;
    writeln!(out)?;

    if report.results().is_empty() {
        writeln!(out, "  {}", style("No open ports found.").dim())?;
    } else {
        writeln!(out, "  {}", style(LIGHT_RULE).dim())?;
        writeln!(
            out,
            "  {:>6}  {:<5}  {:<6}  {:<12}  {:>9}  {}",
            style("PORT").bold(),
            style("PROTO").bold(),
            style("STATE").bold(),
            style("SERVICE").bold(),
            style("LATENCY").bold(),
            style("BANNER").bold()
        )?;
        writeln!(out, "  {}", style(LIGHT_RULE).dim())?;

        for result in report.results() {
            writeln!(
                out,
                "  {:>6}  {:<5}  {:<6}  {:<12}  {:>7.2}ms  {}",
                result.port(),
                result.protocol(),
                style(result.state()).green().bold(),
                result.service(),
                result.latency_ms(),
                style(truncate_string(result.banner(), BANNER_COLUMN)).dim()
            )?;
        }

        writeln!(out, "  {}", style(LIGHT_RULE).dim())?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(HEAVY_RULE).cyan())?;
    writeln!(out)?;

    Ok(())
}

/// Print a scan header before scanning begins.
pub fn print_scan_header(target: &str, ip: &str, ports: &str, count: usize) {
    eprintln!();
    eprintln!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("Skiff").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    eprintln!(
        "{} Target: {} ({})",
        style("•").dim(),
        style(target).white().bold(),
        ip
    );
    eprintln!(
        "{} Scanning {} ports ({})...",
        style("•").dim(),
        style(count).white().bold(),
        ports
    );
    eprintln!();
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    eprintln!("{} {}", style("✓").green().bold(), msg);
}

/// Truncate to `max_len` characters, adding an ellipsis if truncated.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
