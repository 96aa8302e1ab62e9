//! In-memory connector for exercising the engine without sockets.

use crate::scanner::traits::Connector;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::io::{duplex, AsyncRead, AsyncWrite, AsyncWriteExt, DuplexStream, ReadBuf};

/// How a mocked port answers a connect.
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    /// Accept, send these bytes, then close.
    Banner(&'static str),
    /// Accept and keep the connection open without ever sending.
    Silent,
    /// Reject with `ConnectionRefused`.
    Refuse,
    /// Never complete the handshake.
    Hang,
    /// Panic inside the connect call.
    Panic,
}

/// Counts one connection from the start of `connect` until its stream drops.
struct InFlight(Arc<AtomicUsize>);

impl InFlight {
    fn enter(count: &Arc<AtomicUsize>, peak: &AtomicUsize) -> Self {
        let now = count.fetch_add(1, Ordering::SeqCst) + 1;
        peak.fetch_max(now, Ordering::SeqCst);
        Self(Arc::clone(count))
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Client half handed to the prober. Stays counted as in flight until dropped.
pub struct MockStream {
    inner: DuplexStream,
    _peer: Option<DuplexStream>,
    _in_flight: InFlight,
}

impl AsyncRead for MockStream {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_read(cx, buf)
    }
}

impl AsyncWrite for MockStream {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.get_mut().inner).poll_write(cx, buf)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_flush(cx)
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.get_mut().inner).poll_shutdown(cx)
    }
}

/// Records every connect and tracks how many connections are alive at once.
#[derive(Default)]
pub struct MockConnector {
    ports: HashMap<u16, Behavior>,
    delay: Duration,
    attempts: Mutex<Vec<u16>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: AtomicUsize,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unlisted ports refuse.
    pub fn with_port(mut self, port: u16, behavior: Behavior) -> Self {
        self.ports.insert(port, behavior);
        self
    }

    /// Hold each connect open for `delay` to make overlap observable.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn attempts(&self) -> Vec<u16> {
        self.attempts.lock().unwrap().clone()
    }

    /// Peak number of connections alive at once, banner phase included.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Stream = MockStream;

    async fn connect(&self, addr: SocketAddr) -> io::Result<MockStream> {
        let port = addr.port();
        self.attempts.lock().unwrap().push(port);

        let guard = InFlight::enter(&self.in_flight, &self.max_in_flight);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match self.ports.get(&port).copied().unwrap_or(Behavior::Refuse) {
            Behavior::Banner(text) => {
                let (client, mut server) = duplex(8192);
                server.write_all(text.as_bytes()).await?;
                Ok(MockStream {
                    inner: client,
                    _peer: None,
                    _in_flight: guard,
                })
            }
            Behavior::Silent => {
                let (client, server) = duplex(8192);
                Ok(MockStream {
                    inner: client,
                    _peer: Some(server),
                    _in_flight: guard,
                })
            }
            Behavior::Refuse => Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused")),
            Behavior::Hang => std::future::pending().await,
            Behavior::Panic => panic!("connector blew up on port {port}"),
        }
    }
}
