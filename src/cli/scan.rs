//! Scan subcommand implementation.
//!
//! Handles the `skiff scan <target>` command: validates and resolves the
//! inputs, runs the engine, and renders or saves the report.

use crate::cli::OutputFormat;
use crate::config::AppSettings;
use crate::error::CliResult;
use crate::output;
use crate::scanner::{ScanConfig, ScanEngine};
use crate::services::ServiceTable;
use crate::types::{PortRange, TargetSpec};
use clap::builder::RangedU64ValueParser;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;

/// Scan a target for open ports.
#[derive(Parser, Debug)]
pub struct ScanCommand {
    /// Target to scan (IP address or hostname)
    ///
    /// Examples:
    ///   192.168.1.1        Single IPv4 address
    ///   ::1                IPv6 address
    ///   example.com        Hostname
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Inclusive port range to scan (e.g. "22", "1-1024", "-" for all ports)
    #[arg(short, long, default_value = "1-1024")]
    pub ports: PortRange,

    /// Maximum number of probes in flight
    #[arg(short = 'c', long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub concurrency: Option<usize>,

    /// Connect timeout in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub connect_timeout: Option<u64>,

    /// Timeout for each banner read or write, in milliseconds
    #[arg(long, value_name = "MS", value_parser = clap::value_parser!(u64).range(1..))]
    pub banner_timeout: Option<u64>,

    /// Output format for results
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Also write the JSON report to this file
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Service table (JSON) to use instead of the configured one
    #[arg(long, value_name = "PATH")]
    pub services: Option<PathBuf>,
}

impl ScanCommand {
    /// Execute the scan command.
    pub async fn execute(&self, settings: &AppSettings, quiet: bool) -> CliResult<()> {
        if self.output.is_none()
            && OutputFormat::from_str(&settings.default_output_format, true).is_err()
        {
            output::print_warning(&format!(
                "unknown output format '{}' in settings, using plain",
                settings.default_output_format
            ));
        }
        let format = self.output_format(settings);

        let target = TargetSpec::parse(&self.target)?.resolve().await?;
        debug!(%target, "target resolved");

        let mut settings = settings.clone();
        if let Some(path) = &self.services {
            settings.services_file = Some(path.clone());
        }
        let services = ServiceTable::load(&settings)?;

        let config = ScanConfig::new(target)
            .with_ports(self.ports)
            .with_concurrency(self.concurrency.unwrap_or(settings.default_concurrency))
            .with_connect_timeout(Duration::from_millis(
                self.connect_timeout
                    .unwrap_or(settings.default_connect_timeout_ms),
            ))
            .with_banner_timeout(Duration::from_millis(
                self.banner_timeout
                    .unwrap_or(settings.default_banner_timeout_ms),
            ));

        if !quiet {
            output::print_scan_header(
                &config.target.original,
                &config.target.ip.to_string(),
                &config.ports.to_string(),
                config.ports.len(),
            );
        }

        let progress = progress_bar(config.ports.len(), quiet);
        let ticker = progress.clone();
        let engine = ScanEngine::new(config, services);
        let report = engine
            .run(move |done, _total| ticker.set_position(done as u64))
            .await;
        progress.finish_and_clear();

        output::print_results(&report, format)?;

        if let Some(path) = &self.output_file {
            output::save_report(&report, path)?;
            if !quiet {
                output::print_success(&format!("Report written to {}", path.display()));
            }
        }

        Ok(())
    }

    /// Flag, then settings file, then plain.
    fn output_format(&self, settings: &AppSettings) -> OutputFormat {
        self.output
            .or_else(|| OutputFormat::from_str(&settings.default_output_format, true).ok())
            .unwrap_or_default()
    }
}

/// A progress bar on stderr, hidden when quiet.
fn progress_bar(total: usize, quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(total as u64);
    if let Ok(style) = ProgressStyle::default_bar().template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)",
    ) {
        pb.set_style(style.progress_chars("=>-"));
    }
    pb
}
