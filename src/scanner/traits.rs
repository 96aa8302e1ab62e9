//! Scanner data model and the connection seam.
//!
//! The engine never touches sockets directly: it connects through a
//! [`Connector`], so the whole probe pipeline can run against in-memory
//! streams in tests.

use crate::types::{Port, PortRange, ScanTarget};
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::Semaphore;

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(1000);
/// Default timeout for each banner read or write.
pub const DEFAULT_BANNER_TIMEOUT: Duration = Duration::from_millis(1500);
/// Default number of probes in flight.
pub const DEFAULT_CONCURRENCY: usize = 500;

/// Transport protocol of a result. Only TCP is probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Protocol {
    #[serde(rename = "TCP")]
    Tcp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => f.pad("TCP"),
        }
    }
}

/// State of a reported port.
///
/// Closed and filtered ports never produce a result, so `Open` is the only
/// state a [`ScanResult`] can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PortState {
    Open,
}

impl fmt::Display for PortState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => f.pad("Open"),
        }
    }
}

/// One open port found by a scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    port: Port,
    protocol: Protocol,
    state: PortState,
    service: String,
    banner: String,
    latency_ms: f64,
}

impl ScanResult {
    /// Create a result for an open TCP port. Latency is rounded to 2 decimals.
    pub fn open(
        port: Port,
        service: impl Into<String>,
        banner: impl Into<String>,
        latency: Duration,
    ) -> Self {
        Self {
            port,
            protocol: Protocol::Tcp,
            state: PortState::Open,
            service: service.into(),
            banner: banner.into(),
            latency_ms: round_ms(latency),
        }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn protocol(&self) -> Protocol {
        self.protocol
    }

    pub fn state(&self) -> PortState {
        self.state
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Sanitized banner, empty when the service said nothing.
    pub fn banner(&self) -> &str {
        &self.banner
    }

    pub fn latency_ms(&self) -> f64 {
        self.latency_ms
    }
}

fn round_ms(latency: Duration) -> f64 {
    let ms = latency.as_nanos() as f64 / 1_000_000.0;
    (ms * 100.0).round() / 100.0
}

/// Opens connections for the prober.
///
/// Implementations only establish the connection; timeouts are applied by
/// the caller.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// The connected byte stream.
    type Stream: AsyncRead + AsyncWrite + Unpin + Send + 'static;

    /// Connect to `addr`.
    async fn connect(&self, addr: SocketAddr) -> io::Result<Self::Stream>;
}

/// Validated parameters for one scan run.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Resolved target. The original name is sent as the HTTP `Host`.
    pub target: ScanTarget,
    /// Inclusive port range.
    pub ports: PortRange,
    /// Bound on each connect attempt.
    pub connect_timeout: Duration,
    /// Bound on each banner read and on the probe write.
    pub banner_timeout: Duration,
    /// Maximum probes in flight, at least 1.
    pub concurrency: usize,
}

impl ScanConfig {
    /// Create a new scan configuration with default timings.
    pub fn new(target: ScanTarget) -> Self {
        Self {
            target,
            ports: PortRange::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            banner_timeout: DEFAULT_BANNER_TIMEOUT,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Set the port range.
    pub fn with_ports(mut self, ports: PortRange) -> Self {
        self.ports = ports;
        self
    }

    /// Set the connect timeout. Zero is raised to 1ms.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout.max(Duration::from_millis(1));
        self
    }

    /// Set the banner timeout. Zero is raised to 1ms.
    pub fn with_banner_timeout(mut self, timeout: Duration) -> Self {
        self.banner_timeout = timeout.max(Duration::from_millis(1));
        self
    }

    /// Set the concurrency limit, clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, Semaphore::MAX_PERMITS);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn test_result_latency_rounding() {
        let port = Port::new(22).unwrap();
        let result = ScanResult::open(port, "SSH", "SSH-2.0", Duration::from_micros(12_346));
        assert_eq!(result.latency_ms(), 12.35);
        assert_eq!(result.protocol(), Protocol::Tcp);
        assert_eq!(result.state(), PortState::Open);
    }

    #[test]
    fn test_result_serialization() {
        let port = Port::new(80).unwrap();
        let result = ScanResult::open(port, "HTTP", "", Duration::from_millis(3));
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["port"], 80);
        assert_eq!(json["protocol"], "TCP");
        assert_eq!(json["state"], "Open");
        assert_eq!(json["service"], "HTTP");
        assert_eq!(json["banner"], "");
        assert_eq!(json["latencyMs"], 3.0);
    }

    #[test]
    fn test_config_clamps() {
        let target = ScanTarget::from(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let config = ScanConfig::new(target)
            .with_concurrency(0)
            .with_connect_timeout(Duration::ZERO)
            .with_banner_timeout(Duration::ZERO);

        assert_eq!(config.concurrency, 1);
        assert!(!config.connect_timeout.is_zero());
        assert!(!config.banner_timeout.is_zero());
    }

    #[test]
    fn test_concurrency_capped_at_semaphore_limit() {
        let target = ScanTarget::from(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let config = ScanConfig::new(target).with_concurrency(usize::MAX);
        assert_eq!(config.concurrency, Semaphore::MAX_PERMITS);
    }
}
