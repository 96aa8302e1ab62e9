//! CSV output formatting.

use crate::scanner::ScanReport;
use std::io::{self, Write};

/// Print results in CSV format.
pub fn print_csv(report: &ScanReport) -> io::Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), report)
}

/// Write one row per open port.
pub fn write_csv<W: Write>(out: W, report: &ScanReport) -> io::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    wtr.write_record(["port", "protocol", "state", "service", "banner", "latency_ms"])?;

    for result in report.results() {
        let port = result.port().to_string();
        let protocol = result.protocol().to_string();
        let state = result.state().to_string();
        let latency = format!("{:.2}", result.latency_ms());
        wtr.write_record([
            port.as_str(),
            protocol.as_str(),
            state.as_str(),
            result.service(),
            result.banner(),
            latency.as_str(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ScanResult;
    use crate::types::{Port, PortRange, ScanTarget};
    use chrono::Utc;
    use std::net::{IpAddr, Ipv4Addr};
    use std::time::Duration;

    #[test]
    fn test_csv_quotes_banners() {
        let target = ScanTarget::from(IpAddr::V4(Ipv4Addr::LOCALHOST));
        let result = ScanResult::open(
            Port::new(25).unwrap(),
            "SMTP",
            "220 mx, ESMTP",
            Duration::from_micros(1500),
        );
        let report = ScanReport::new(
            &target,
            PortRange::single(Port::new(25).unwrap()),
            Utc::now(),
            Utc::now(),
            Duration::ZERO,
            vec![result],
        );

        let mut buf = Vec::new();
        write_csv(&mut buf, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("port,protocol,state,service,banner,latency_ms")
        );
        assert_eq!(lines.next(), Some("25,TCP,Open,SMTP,\"220 mx, ESMTP\",1.50"));
    }
}
