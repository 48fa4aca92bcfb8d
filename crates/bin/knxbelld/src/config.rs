//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `knxbell.toml` in the working directory (or the path in
//! `KNXBELL_CONFIG`). Every field has a sensible default so the file is
//! optional. Environment variables take precedence over file values.

use serde::Deserialize;

use knxbell_domain::accessory::Doorbell;
use knxbell_domain::error::BridgeError;
use knxbell_domain::group_address::GroupAddress;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// History log settings.
    pub history: HistoryConfig,
    /// Doorbell device entries.
    pub devices: Vec<DeviceConfig>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// `SQLite` database configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// `SQLite` connection URL or file path.
    pub url: String,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// History log configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// `sqlite` or `memory`.
    pub backend: String,
    /// Samples older than this are purged at startup.
    pub retention_days: Option<u32>,
}

/// Where the history log lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryBackend {
    Sqlite,
    Memory,
}

/// One doorbell entry.
///
/// Entries lacking a name or a single-press address are skipped.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub name: Option<String>,
    pub listen_single_press: Option<String>,
    pub listen_double_press: Option<String>,
    pub listen_long_press: Option<String>,
    pub manufacturer: Option<String>,
}

impl Config {
    /// Load configuration from `knxbell.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("KNXBELL_CONFIG").unwrap_or_else(|_| "knxbell.toml".to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("KNXBELL_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("KNXBELL_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("KNXBELL_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("KNXBELL_DATABASE_URL") {
            self.database.url = val;
        }
        if let Ok(val) = std::env::var("KNXBELL_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        self.history_backend()?;
        for device in &self.devices {
            device.addresses()?;
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Return the database URL in `sqlx`-compatible format.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    /// The configured history backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for an unknown backend name.
    pub fn history_backend(&self) -> Result<HistoryBackend, ConfigError> {
        match self.history.backend.as_str() {
            "sqlite" => Ok(HistoryBackend::Sqlite),
            "memory" => Ok(HistoryBackend::Memory),
            other => Err(ConfigError::Validation(format!(
                "unknown history backend: {other}"
            ))),
        }
    }

    /// Build a doorbell for every complete device entry.
    ///
    /// Entries without a name or without a single-press address are logged
    /// and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if an entry carries a malformed
    /// group address or fails doorbell validation.
    pub fn doorbells(&self) -> Result<Vec<Doorbell>, ConfigError> {
        let mut doorbells = Vec::with_capacity(self.devices.len());
        for (index, device) in self.devices.iter().enumerate() {
            let Some(name) = device.name.as_deref().filter(|n| !n.trim().is_empty()) else {
                tracing::warn!(index, "skipping device without a name");
                continue;
            };
            let addresses = device.addresses()?;
            let Some(single) = addresses.single else {
                tracing::warn!(name, "skipping device without a single-press address");
                continue;
            };

            let mut builder = Doorbell::builder().name(name).single_press(single);
            if let Some(address) = addresses.double {
                builder = builder.double_press(address);
            }
            if let Some(address) = addresses.long {
                builder = builder.long_press(address);
            }
            if let Some(manufacturer) = &device.manufacturer {
                builder = builder.manufacturer(manufacturer);
            }
            let doorbell = builder
                .build()
                .map_err(|err| ConfigError::device(name, &err))?;
            doorbells.push(doorbell);
        }
        Ok(doorbells)
    }
}

struct DeviceAddresses {
    single: Option<GroupAddress>,
    double: Option<GroupAddress>,
    long: Option<GroupAddress>,
}

impl DeviceConfig {
    fn addresses(&self) -> Result<DeviceAddresses, ConfigError> {
        let label = self.name.as_deref().unwrap_or("<unnamed>");
        let parse = |raw: &Option<String>| -> Result<Option<GroupAddress>, ConfigError> {
            raw.as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::parse::<GroupAddress>)
                .transpose()
                .map_err(|err| ConfigError::device(label, &BridgeError::Validation(err)))
        };
        Ok(DeviceAddresses {
            single: parse(&self.listen_single_press)?,
            double: parse(&self.listen_double_press)?,
            long: parse(&self.listen_long_press)?,
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite:knxbell.db?mode=rwc".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "knxbelld=info,knxbell=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            backend: "sqlite".to_string(),
            retention_days: None,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl ConfigError {
    fn device(name: &str, err: &BridgeError) -> Self {
        let detail = match err {
            BridgeError::Validation(inner) => inner.to_string(),
            other => other.to_string(),
        };
        Self::Validation(format!("device {name}: {detail}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knxbell_domain::press::PressKind;

    fn device(name: Option<&str>, single: Option<&str>) -> DeviceConfig {
        DeviceConfig {
            name: name.map(str::to_string),
            listen_single_press: single.map(str::to_string),
            ..DeviceConfig::default()
        }
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.url, "sqlite:knxbell.db?mode=rwc");
        assert_eq!(config.history_backend().unwrap(), HistoryBackend::Sqlite);
        assert!(config.devices.is_empty());
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090

            [database]
            url = 'sqlite:test.db'

            [logging]
            filter = 'debug'

            [history]
            backend = 'memory'
            retention_days = 30

            [[devices]]
            name = 'Front Door'
            listen_single_press = '1/0/1'
            listen_double_press = '1/0/2'
            listen_long_press = '1/0/3'
            manufacturer = 'ACME'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.url, "sqlite:test.db");
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.history_backend().unwrap(), HistoryBackend::Memory);
        assert_eq!(config.history.retention_days, Some(30));
        assert_eq!(config.devices.len(), 1);
        assert!(config.validate().is_ok());

        let doorbells = config.doorbells().unwrap();
        assert_eq!(doorbells.len(), 1);
        assert_eq!(doorbells[0].name(), "Front Door");
        assert_eq!(doorbells[0].information.manufacturer, "ACME");
        assert!(doorbells[0].signal(PressKind::Long).is_some());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_unknown_history_backend() {
        let mut config = Config::default();
        config.history.backend = "redis".to_string();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("redis")
        ));
    }

    #[test]
    fn should_reject_malformed_group_address() {
        let mut config = Config::default();
        config
            .devices
            .push(device(Some("Front Door"), Some("32/0/0")));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(msg)) if msg.contains("Front Door")
        ));
    }

    #[test]
    fn should_skip_devices_without_name_or_single_press() {
        let mut config = Config::default();
        config.devices.push(device(None, Some("1/0/1")));
        config.devices.push(device(Some("  "), Some("1/0/2")));
        config.devices.push(device(Some("Back Door"), None));
        config.devices.push(device(Some("Front Door"), Some("1/0/4")));

        let doorbells = config.doorbells().unwrap();

        assert_eq!(doorbells.len(), 1);
        assert_eq!(doorbells[0].name(), "Front Door");
    }

    #[test]
    fn should_skip_device_with_empty_single_press() {
        let toml = "
            [[devices]]
            name = 'Side Door'
            listen_single_press = ''

            [[devices]]
            name = 'Front Door'
            listen_single_press = '1/0/1'
            listen_double_press = '  '
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_ok());

        let doorbells = config.doorbells().unwrap();

        assert_eq!(doorbells.len(), 1);
        assert_eq!(doorbells[0].name(), "Front Door");
        assert!(doorbells[0].signal(PressKind::Double).is_none());
    }

    #[test]
    fn should_derive_stable_ids_from_config() {
        let mut config = Config::default();
        config
            .devices
            .push(device(Some("Front Door"), Some("1/0/1")));

        let first = config.doorbells().unwrap();
        let second = config.doorbells().unwrap();

        assert_eq!(first[0].id, second[0].id);
    }

    #[test]
    fn should_format_bind_addr() {
        let config = Config::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn should_format_custom_bind_addr() {
        let mut config = Config::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 9090;
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }
}
