//! Port-to-service lookup table.
//!
//! The table is built once before a scan begins and only read afterwards.
//! Users can replace it with a JSON file of the form `{"22": "SSH", ...}`.

use crate::config::{AppSettings, Paths};
use crate::error::{ConfigError, ConfigResult};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Well-known TCP ports and the label reported for them.
const BUILTIN_SERVICES: &[(u16, &str)] = &[
    (20, "FTP-Data"),
    (21, "FTP"),
    (22, "SSH"),
    (23, "Telnet"),
    (25, "SMTP"),
    (53, "DNS"),
    (80, "HTTP"),
    (88, "Kerberos"),
    (110, "POP3"),
    (111, "RPCBind"),
    (119, "NNTP"),
    (135, "MSRPC"),
    (139, "NetBIOS-SSN"),
    (143, "IMAP"),
    (179, "BGP"),
    (389, "LDAP"),
    (443, "HTTPS"),
    (445, "SMB"),
    (465, "SMTPS"),
    (514, "Syslog"),
    (515, "Printer"),
    (548, "AFP"),
    (554, "RTSP"),
    (587, "Submission"),
    (631, "IPP"),
    (636, "LDAPS"),
    (873, "Rsync"),
    (993, "IMAPS"),
    (995, "POP3S"),
    (1080, "SOCKS"),
    (1194, "OpenVPN"),
    (1433, "MSSQL"),
    (1521, "Oracle"),
    (1723, "PPTP"),
    (1883, "MQTT"),
    (2049, "NFS"),
    (2181, "ZooKeeper"),
    (2375, "Docker"),
    (2376, "Docker-TLS"),
    (3000, "Grafana"),
    (3128, "Squid"),
    (3306, "MySQL"),
    (3389, "RDP"),
    (3690, "SVN"),
    (4369, "EPMD"),
    (5000, "UPnP"),
    (5060, "SIP"),
    (5222, "XMPP"),
    (5432, "PostgreSQL"),
    (5672, "AMQP"),
    (5900, "VNC"),
    (5984, "CouchDB"),
    (6379, "Redis"),
    (6443, "Kubernetes-API"),
    (6667, "IRC"),
    (8000, "HTTP-Alt"),
    (8080, "HTTP-Proxy"),
    (8443, "HTTPS-Alt"),
    (8888, "HTTP-Alt"),
    (9000, "CSListener"),
    (9042, "Cassandra"),
    (9090, "Prometheus"),
    (9092, "Kafka"),
    (9200, "Elasticsearch"),
    (9418, "Git"),
    (10000, "Webmin"),
    (11211, "Memcached"),
    (15672, "RabbitMQ-Mgmt"),
    (27017, "MongoDB"),
];

/// Read-only mapping from port number to service name.
#[derive(Debug, Clone, Default)]
pub struct ServiceTable {
    entries: HashMap<u16, String>,
}

impl ServiceTable {
    /// An empty table; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The table compiled into the binary.
    pub fn builtin() -> Self {
        BUILTIN_SERVICES
            .iter()
            .map(|&(port, name)| (port, name.to_string()))
            .collect()
    }

    /// Load a table from a JSON object keyed by port number.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let entries: HashMap<u16, String> = serde_json::from_str(&content)
            .map_err(|e| ConfigError::InvalidFormat(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), entries = entries.len(), "loaded service table");
        Ok(Self { entries })
    }

    /// Resolve the table a scan should use.
    ///
    /// An explicitly configured file must load. Otherwise the default file in
    /// the config directory is used if it exists, falling back to the
    /// built-in table.
    pub fn load(settings: &AppSettings) -> ConfigResult<Self> {
        if let Some(path) = &settings.services_file {
            return Self::load_from(path);
        }

        if let Ok(paths) = Paths::get() {
            let default_file = paths.services_file();
            if default_file.exists() {
                return Self::load_from(&default_file);
            }
        }

        Ok(Self::builtin())
    }

    /// Write the table as JSON so it can be edited by hand.
    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.sorted())?;
        fs::write(path, content).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Look up the service name for a port.
    pub fn get(&self, port: u16) -> Option<&str> {
        self.entries.get(&port).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries ordered by port, for listing.
    pub fn sorted(&self) -> BTreeMap<u16, &str> {
        self.entries
            .iter()
            .map(|(port, name)| (*port, name.as_str()))
            .collect()
    }
}

impl FromIterator<(u16, String)> for ServiceTable {
    fn from_iter<I: IntoIterator<Item = (u16, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_builtin_common_ports() {
        let table = ServiceTable::builtin();
        assert_eq!(table.get(22), Some("SSH"));
        assert_eq!(table.get(80), Some("HTTP"));
        assert_eq!(table.get(3306), Some("MySQL"));
        assert_eq!(table.get(12345), None);
    }

    #[test]
    fn test_load_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"3306": "MySQL", "31337": "Elite"}}"#).unwrap();

        let table = ServiceTable::load_from(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(31337), Some("Elite"));
        assert_eq!(table.get(22), None);
    }

    #[test]
    fn test_load_from_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = ServiceTable::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidFormat(_)));
    }

    #[test]
    fn test_configured_file_must_exist() {
        let settings = AppSettings {
            services_file: Some(PathBuf::from("/nonexistent/skiff/services.json")),
            ..AppSettings::default()
        };
        assert!(matches!(
            ServiceTable::load(&settings),
            Err(ConfigError::ReadFailed { .. })
        ));
    }

    #[test]
    fn test_saved_table_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("services.json");

        ServiceTable::builtin().save_to(&path).unwrap();
        let reloaded = ServiceTable::load_from(&path).unwrap();
        assert_eq!(reloaded.len(), ServiceTable::builtin().len());
        assert_eq!(reloaded.get(5432), Some("PostgreSQL"));
    }

    #[test]
    fn test_sorted_listing() {
        let table: ServiceTable = [(443, "HTTPS".to_string()), (22, "SSH".to_string())]
            .into_iter()
            .collect();
        let ports: Vec<u16> = table.sorted().keys().copied().collect();
        assert_eq!(ports, vec![22, 443]);
    }
}
