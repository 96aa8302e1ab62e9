//! Service identification from banner content.
//!
//! Rules are tried in a fixed order and the first match wins. Order, not
//! specificity, decides: a banner that mentions both `mysql` and `server:`
//! is reported as HTTP. Only when no banner rule matches does the port's
//! entry in the [`ServiceTable`] apply.

use crate::services::ServiceTable;

/// Label used when nothing identifies the service.
pub const UNKNOWN_SERVICE: &str = "Unknown";

const FTP_MARKERS: [&str; 4] = ["ftp", "filezilla", "vsftpd", "proftpd"];
const SMTP_MARKERS: [&str; 4] = ["smtp", "esmtp", "postfix", "sendmail"];

/// Product keywords checked after the protocol rules, in order.
const PRODUCT_MARKERS: [(&str, &str); 6] = [
    ("mysql", "MySQL"),
    ("postgresql", "PostgreSQL"),
    ("redis", "Redis"),
    ("mongo", "MongoDB"),
    ("microsoft sql", "MSSQL"),
    ("vnc", "VNC"),
];

/// Label a service from its banner, falling back to the port table.
pub fn identify_service(port: u16, banner: &str, services: &ServiceTable) -> String {
    match identify_banner(banner) {
        Some(label) => label.to_string(),
        None => services
            .get(port)
            .unwrap_or(UNKNOWN_SERVICE)
            .to_string(),
    }
}

/// Apply the banner rules only. Matching is case-insensitive.
pub fn identify_banner(banner: &str) -> Option<&'static str> {
    if banner.is_empty() {
        return None;
    }

    let b = banner.to_lowercase();
    let any = |markers: &[&str]| markers.iter().any(|m| b.contains(m));

    if b.contains("ssh-") {
        return Some("SSH");
    }
    if b.contains("220") && any(&FTP_MARKERS[..]) {
        return Some("FTP");
    }
    if b.contains("220") && any(&SMTP_MARKERS[..]) {
        return Some("SMTP");
    }
    if b.contains("+ok") && b.contains("pop") {
        return Some("POP3");
    }
    if b.contains("* ok") && b.contains("imap") {
        return Some("IMAP");
    }
    if b.starts_with("http/") || b.contains("server:") || b.contains("<html") {
        return Some("HTTP");
    }
    if let Some((_, label)) = PRODUCT_MARKERS.iter().find(|(m, _)| b.contains(m)) {
        return Some(*label);
    }
    if b.contains("openssl") || b.contains("tls") {
        return Some("TLS/SSL");
    }

    None
}
