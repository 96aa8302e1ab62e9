//! Single-port probe: connect, grab a banner, identify the service.

use crate::banner::{grab_banner, sanitize_banner};
use crate::error::ScanError;
use crate::identify::identify_service;
use crate::scanner::traits::{Connector, ScanConfig, ScanResult};
use crate::services::ServiceTable;
use crate::types::{Port, ScanTarget};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{debug, trace};

/// Probes individual ports of one target.
pub struct PortProber<C: Connector> {
    connector: C,
    target: ScanTarget,
    services: Arc<ServiceTable>,
    connect_timeout: Duration,
    banner_timeout: Duration,
}

impl<C: Connector> PortProber<C> {
    pub fn new(config: &ScanConfig, services: Arc<ServiceTable>, connector: C) -> Self {
        Self {
            connector,
            target: config.target.clone(),
            services,
            connect_timeout: config.connect_timeout,
            banner_timeout: config.banner_timeout,
        }
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Probe one port. `None` means the connect failed for any reason.
    pub async fn probe(&self, port: Port) -> Option<ScanResult> {
        let addr = SocketAddr::new(self.target.ip, port.as_u16());
        let start = Instant::now();

        let mut stream = match self.attempt_connect(addr).await {
            Ok(stream) => stream,
            Err(e) => {
                trace!(%port, error = %e, "no connection");
                return None;
            }
        };
        let latency = start.elapsed();

        let raw = grab_banner(
            &mut stream,
            port.as_u16(),
            &self.target.original,
            self.banner_timeout,
        )
        .await;
        drop(stream);

        let service = identify_service(port.as_u16(), &raw, &self.services);
        let banner = sanitize_banner(&raw);
        debug!(%port, %service, latency_ms = latency.as_millis() as u64, "port open");

        Some(ScanResult::open(port, service, banner, latency))
    }

    async fn attempt_connect(&self, addr: SocketAddr) -> Result<C::Stream, ScanError> {
        match timeout(self.connect_timeout, self.connector.connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(ScanError::Io(e)),
            Err(_) => Err(ScanError::Timeout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::mock::{Behavior, MockConnector};
    use crate::scanner::TcpConnector;
    use crate::types::PortRange;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    fn config() -> ScanConfig {
        ScanConfig::new(ScanTarget::from(IpAddr::V4(Ipv4Addr::LOCALHOST)))
            .with_connect_timeout(Duration::from_millis(50))
            .with_banner_timeout(Duration::from_millis(50))
    }

    fn prober(connector: MockConnector) -> PortProber<MockConnector> {
        PortProber::new(&config(), Arc::new(ServiceTable::builtin()), connector)
    }

    fn port(n: u16) -> Port {
        Port::new(n).unwrap()
    }

    #[tokio::test]
    async fn test_refused_connect_yields_nothing() {
        let prober = prober(MockConnector::new());
        assert!(prober.probe(port(22)).await.is_none());
    }

    #[tokio::test]
    async fn test_hanging_connect_times_out() {
        let prober = prober(MockConnector::new().with_port(22, Behavior::Hang));
        let started = Instant::now();
        assert!(prober.probe(port(22)).await.is_none());
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_banner_is_sanitized_and_identified() {
        let prober = prober(
            MockConnector::new().with_port(2222, Behavior::Banner("SSH-2.0-OpenSSH_8.9p1\r\n")),
        );
        let result = prober.probe(port(2222)).await.unwrap();

        assert_eq!(result.port(), port(2222));
        assert_eq!(result.service(), "SSH");
        assert_eq!(result.banner(), "SSH-2.0-OpenSSH_8.9p1");
        assert!(result.latency_ms() >= 0.0);
    }

    #[tokio::test]
    async fn test_silent_service_falls_back_to_table() {
        let prober = prober(MockConnector::new().with_port(3306, Behavior::Banner("")));
        let result = prober.probe(port(3306)).await.unwrap();
        assert_eq!(result.service(), "MySQL");
        assert_eq!(result.banner(), "");
    }

    #[tokio::test]
    async fn test_silent_unlisted_port_is_unknown() {
        let prober = prober(MockConnector::new().with_port(31337, Behavior::Banner("")));
        let result = prober.probe(port(31337)).await.unwrap();
        assert_eq!(result.service(), "Unknown");
    }

    #[tokio::test]
    async fn test_probe_real_listener() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            socket.write_all(b"220 mail.local ESMTP Postfix\r\n").await.unwrap();
        });

        let config = config()
            .with_ports(PortRange::single(port(addr.port())))
            .with_connect_timeout(Duration::from_secs(1))
            .with_banner_timeout(Duration::from_secs(1));
        let prober = PortProber::new(&config, Arc::new(ServiceTable::empty()), TcpConnector);
        let result = prober.probe(port(addr.port())).await.unwrap();

        assert_eq!(result.service(), "SMTP");
        assert_eq!(result.banner(), "220 mail.local ESMTP Postfix");
    }
}
