//! TCP connect transport.
//!
//! Performs standard TCP connects using the operating system's socket API.
//! It completes the full handshake, needs no privileges, and is easily
//! logged by the target.

use crate::scanner::traits::Connector;
use async_trait::async_trait;
use std::io;
use std::net::SocketAddr;
use tokio::net::TcpStream;

/// Connector backed by `tokio::net::TcpStream`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TcpConnector;

#[async_trait]
impl Connector for TcpConnector {
    type Stream = TcpStream;

    async fn connect(&self, addr: SocketAddr) -> io::Result<TcpStream> {
        let stream = TcpStream::connect(addr).await?;
        // Banner probes are tiny; don't let Nagle hold them back
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}
