//! Scanner module - fans probes out across a port range.
//!
//! Every port in the range is probed exactly once, with at most
//! `concurrency` probes in flight. A semaphore permit is taken *before* a
//! probe task is spawned and released when the probe is done, so connection
//! setup counts against the limit too. Results come back through the task
//! handles and are sorted by port once everything has finished.
//!
//! The completion counter and the progress callback share one lock, so
//! reports arrive in increasing order and the `(total, total)` report is
//! always the last.

mod probe;
mod report;
mod tcp;
pub mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use probe::PortProber;
pub use report::ScanReport;
pub use tcp::TcpConnector;
pub use traits::{Connector, PortState, Protocol, ScanConfig, ScanResult};

use crate::services::ServiceTable;
use chrono::Utc;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Progress is reported every this many completed probes, and on the last one.
pub const PROGRESS_BATCH: usize = 200;

/// Runs scans for one configuration.
pub struct ScanEngine<C: Connector = TcpConnector> {
    config: ScanConfig,
    prober: Arc<PortProber<C>>,
}

impl ScanEngine<TcpConnector> {
    /// Create an engine that connects over real TCP sockets.
    pub fn new(config: ScanConfig, services: ServiceTable) -> Self {
        Self::with_connector(config, services, TcpConnector)
    }
}

impl<C: Connector> ScanEngine<C> {
    /// Create an engine with a custom transport.
    pub fn with_connector(config: ScanConfig, services: ServiceTable, connector: C) -> Self {
        let prober = PortProber::new(&config, Arc::new(services), connector);
        Self {
            config,
            prober: Arc::new(prober),
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan the configured range and freeze the outcome into a report.
    pub async fn run<F>(&self, progress: F) -> ScanReport
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        let started_at = Utc::now();
        let clock = Instant::now();

        info!(
            target = %self.config.target,
            ports = %self.config.ports,
            concurrency = self.config.concurrency,
            "scan started"
        );

        let results = self.scan_ports(progress).await;
        let report = ScanReport::new(
            &self.config.target,
            self.config.ports,
            started_at,
            Utc::now(),
            clock.elapsed(),
            results,
        );

        info!("scan finished: {}", report.summary());
        report
    }

    /// Probe every port in range and return the open ones sorted by port.
    ///
    /// `progress(completed, total)` is called from whichever probe task
    /// completes a multiple of [`PROGRESS_BATCH`] or the final probe, so it
    /// may run on several threads.
    pub async fn scan_ports<F>(&self, progress: F) -> Vec<ScanResult>
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        let total = self.config.ports.len();
        let progress = Arc::new(progress);
        let completed = Arc::new(Mutex::new(0usize));
        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let mut tasks = JoinSet::new();

        for port in self.config.ports.iter() {
            let Ok(permit) = Arc::clone(&semaphore).acquire_owned().await else {
                break;
            };
            let prober = Arc::clone(&self.prober);
            let progress = Arc::clone(&progress);
            let completed = Arc::clone(&completed);

            tasks.spawn(async move {
                let outcome = AssertUnwindSafe(prober.probe(port)).catch_unwind().await;

                {
                    let mut done = completed.lock().unwrap_or_else(PoisonError::into_inner);
                    *done += 1;
                    if *done % PROGRESS_BATCH == 0 || *done == total {
                        progress(*done, total);
                    }
                }
                drop(permit);

                outcome.unwrap_or_else(|_| {
                    warn!(%port, "probe panicked, treating port as closed");
                    None
                })
            });
        }

        let mut results = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(result)) => results.push(result),
                Ok(None) => {}
                Err(e) => warn!(error = %e, "probe task failed"),
            }
        }

        results.sort_by_key(ScanResult::port);
        results
    }
}
