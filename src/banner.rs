//! Banner grabbing for open TCP ports.
//!
//! Acquisition runs in two phases over an already connected stream:
//!
//! 1. **Passive**: wait once for the service to speak first (SSH, FTP, SMTP,
//!    most databases do).
//! 2. **Active**: on web ports only, send a minimal `HEAD` request and wait
//!    once for the reply.
//!
//! Each phase performs a single bounded read. Errors and timeouts inside a
//! phase only mean "no data"; the probe itself has already succeeded.

use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::timeout;
use tracing::trace;

/// Maximum bytes read per phase. Longer banners are cut at this boundary.
pub const READ_BUFFER_SIZE: usize = 4096;

/// Maximum characters kept after sanitizing.
pub const MAX_BANNER_CHARS: usize = 256;

/// Appended to banners cut at [`MAX_BANNER_CHARS`].
pub const ELLIPSIS: &str = "...";

/// Ports that get an HTTP `HEAD` probe when the service stays silent.
pub const HTTP_PROBE_PORTS: [u16; 5] = [80, 443, 8080, 8443, 8888];

/// Check if a port receives the active HTTP probe.
pub fn is_http_probe_port(port: u16) -> bool {
    HTTP_PROBE_PORTS.contains(&port)
}

/// Build the active-phase request for `host`.
fn http_probe(host: &str) -> String {
    format!("HEAD / HTTP/1.0\r\nHost: {host}\r\nConnection: close\r\n\r\n")
}

/// Grab a raw (unsanitized) banner from a connected stream.
///
/// Returns an empty string when neither phase produced data.
pub async fn grab_banner<S>(stream: &mut S, port: u16, host: &str, wait: Duration) -> String
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    if let Some(n) = read_once(stream, &mut buffer, wait).await {
        trace!(port, bytes = n, "passive banner");
        return String::from_utf8_lossy(&buffer[..n]).into_owned();
    }

    if !is_http_probe_port(port) {
        return String::new();
    }

    let request = http_probe(host);
    let sent = timeout(wait, async {
        stream.write_all(request.as_bytes()).await?;
        stream.flush().await
    })
    .await;
    if !matches!(sent, Ok(Ok(()))) {
        trace!(port, "http probe could not be sent");
        return String::new();
    }

    match read_once(stream, &mut buffer, wait).await {
        Some(n) => {
            trace!(port, bytes = n, "active banner");
            String::from_utf8_lossy(&buffer[..n]).into_owned()
        }
        None => String::new(),
    }
}

/// A single read bounded by `wait`. `None` covers EOF, errors, and timeout.
async fn read_once<S>(stream: &mut S, buffer: &mut [u8], wait: Duration) -> Option<usize>
where
    S: AsyncRead + Unpin,
{
    match timeout(wait, stream.read(buffer)).await {
        Ok(Ok(n)) if n > 0 => Some(n),
        _ => None,
    }
}

/// Turn a raw banner into a printable single line.
///
/// CR and LF each become a space, other control characters are dropped,
/// surrounding whitespace is trimmed, and the result is capped at
/// [`MAX_BANNER_CHARS`] characters plus [`ELLIPSIS`].
pub fn sanitize_banner(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter_map(|c| match c {
            '\r' | '\n' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect();

    let trimmed = cleaned.trim();
    match trimmed.char_indices().nth(MAX_BANNER_CHARS) {
        Some((cut, _)) => format!("{}{}", &trimmed[..cut], ELLIPSIS),
        None => trimmed.to_string(),
    }
}
