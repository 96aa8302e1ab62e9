//! Frozen summary of a finished scan.

use crate::scanner::traits::ScanResult;
use crate::types::{PortRange, ScanTarget};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// Aggregate over one scan run. Built once, after every probe finished.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    target: String,
    ip_address: String,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    elapsed_seconds: f64,
    ports_scanned: usize,
    open_ports: usize,
    results: Vec<ScanResult>,
}

impl ScanReport {
    /// Freeze `results`, which must already be sorted by port.
    pub fn new(
        target: &ScanTarget,
        ports: PortRange,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        elapsed: Duration,
        results: Vec<ScanResult>,
    ) -> Self {
        Self {
            target: target.original.clone(),
            ip_address: target.ip.to_string(),
            start_time,
            end_time,
            elapsed_seconds: (elapsed.as_secs_f64() * 1000.0).round() / 1000.0,
            ports_scanned: ports.len(),
            open_ports: results.len(),
            results,
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> DateTime<Utc> {
        self.end_time
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Size of the scanned range, independent of how many ports answered.
    pub fn ports_scanned(&self) -> usize {
        self.ports_scanned
    }

    pub fn open_ports(&self) -> usize {
        self.open_ports
    }

    /// Open ports in ascending order.
    pub fn results(&self) -> &[ScanResult] {
        &self.results
    }

    /// One-line summary for logs and history output.
    pub fn summary(&self) -> String {
        format!(
            "{} ({}) - {} open of {} scanned [{:.2}s]",
            self.target, self.ip_address, self.open_ports, self.ports_scanned, self.elapsed_seconds
        )
    }
}
