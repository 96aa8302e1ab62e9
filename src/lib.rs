//! # Skiff - A Concurrent TCP Connect Scanner
//!
//! Skiff connects to every port in a range on one host, grabs whatever
//! banner each open port offers, and labels the service behind it.
//!
//! ## Features
//!
//! - **Bounded concurrency**: at most `concurrency` probes in flight, ever
//! - **Two-phase banner grabbing**: passive read first, HTTP `HEAD` on web ports
//! - **Service identification**: ordered banner rules with a port-table fallback
//! - **Editable service table**: JSON file in the XDG config directory
//! - **Multiple Output Formats**: Plain text, JSON, and CSV
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use skiff::scanner::{ScanConfig, ScanEngine};
//! use skiff::services::ServiceTable;
//! use skiff::types::{PortRange, ScanTarget};
//! use std::net::IpAddr;
//!
//! #[tokio::main]
//! async fn main() {
//!     let ip: IpAddr = "192.168.1.1".parse().unwrap();
//!     let config = ScanConfig::new(ScanTarget::from(ip))
//!         .with_ports(PortRange::from_bounds(1, 1024).unwrap())
//!         .with_concurrency(200);
//!
//!     let engine = ScanEngine::new(config, ServiceTable::builtin());
//!     let report = engine.run(|done, total| eprintln!("{done}/{total}")).await;
//!
//!     for result in report.results() {
//!         println!("{} {} {}", result.port(), result.service(), result.banner());
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`types`] - Validated ports, port ranges, and targets
//! - [`scanner`] - The orchestrator, single-port prober, and report
//! - [`banner`] - Banner acquisition and sanitizing
//! - [`identify`] - Service identification rules
//! - [`services`] - Port-to-service table
//! - [`config`] - Settings and XDG paths
//! - [`output`] - Output formatting
//! - [`error`] - Error types

pub mod banner;
pub mod cli;
pub mod config;
pub mod error;
pub mod identify;
pub mod output;
pub mod scanner;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{CliError, ConfigError, ScanError};
pub use scanner::{ScanConfig, ScanEngine, ScanReport, ScanResult};
pub use services::ServiceTable;
pub use types::{Port, PortRange, ScanTarget, TargetSpec};
