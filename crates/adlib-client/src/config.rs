//! Client configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/adlib/config.toml` by default. Every field is optional;
//! command-line flags take precedence.
//!
//! ```toml
//! debug = false
//!
//! [serial]
//! path = "/dev/ttyACM0"
//! settle_delay_ms = 2000
//!
//! [network]
//! port = 2000
//! timeout = 5
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transport::{DEFAULT_SETTLE_DELAY, DEFAULT_TCP_PORT};

/// Configuration for the adlib client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Debug mode.
    pub debug: bool,

    /// Serial link settings.
    pub serial: SerialSettings,

    /// TCP link settings.
    pub network: NetworkSettings,
}

/// Serial link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialSettings {
    /// Device used when `--serial` is not given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Pause after opening the port while the board resets, in milliseconds.
    pub settle_delay_ms: u64,
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            path: None,
            settle_delay_ms: DEFAULT_SETTLE_DELAY.as_millis() as u64,
        }
    }
}

/// TCP link settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Port used when `--address` is given without `--port`.
    pub port: u16,

    /// Connect and write timeout in seconds.
    pub timeout: u64,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            port: DEFAULT_TCP_PORT,
            timeout: 5,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("adlib")
    }

    /// Checks values that parse but cannot work.
    pub fn validate(&self) -> Result<(), String> {
        if self.network.port == 0 {
            return Err("network.port must not be 0".to_string());
        }
        if self.network.timeout == 0 {
            return Err("network.timeout must be at least 1 second".to_string());
        }
        if self
            .serial
            .path
            .as_ref()
            .is_some_and(|path| path.as_os_str().is_empty())
        {
            return Err("serial.path must not be empty".to_string());
        }
        Ok(())
    }

    /// Settle delay after opening the serial port.
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.serial.settle_delay_ms)
    }

    /// Timeout for connecting and writing.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.network.timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert!(!config.debug);
        assert!(config.serial.path.is_none());
        assert_eq!(config.settle_delay(), Duration::from_secs(2));
        assert_eq!(config.network.port, 2000);
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
[serial]
path = "/dev/ttyUSB0"
"#,
        )
        .unwrap();
        assert_eq!(config.serial.path, Some(PathBuf::from("/dev/ttyUSB0")));
        assert_eq!(config.serial.settle_delay_ms, 2000);
        assert_eq!(config.network.port, 2000);
    }

    #[test]
    fn full_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
debug = true

[serial]
path = "/dev/cu.usbmodem411"
settle_delay_ms = 0

[network]
port = 2001
timeout = 10
"#,
        )
        .unwrap();
        assert!(config.debug);
        assert_eq!(config.settle_delay(), Duration::ZERO);
        assert_eq!(config.network.port, 2001);
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn validate_rejects_zero_port() {
        let mut config = ClientConfig::default();
        config.network.port = 0;
        assert!(config.validate().unwrap_err().contains("port"));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let mut config = ClientConfig::default();
        config.network.timeout = 0;
        assert!(config.validate().unwrap_err().contains("timeout"));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[network]\nport = 3000").unwrap();

        let config = ClientConfig::load_from(file.path()).unwrap();
        assert_eq!(config.network.port, 3000);
    }

    #[test]
    fn load_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[network]\nport = \"not a number\"").unwrap();

        let err = ClientConfig::load_from(file.path()).unwrap_err();
        assert!(err.contains("failed to parse config"));
    }

    #[test]
    fn dump_roundtrips() {
        let config = ClientConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: ClientConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed.network.port, config.network.port);
        assert_eq!(parsed.serial.settle_delay_ms, config.serial.settle_delay_ms);
    }
}
