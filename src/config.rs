//! Configuration loading using Figment
//!
//! Configuration is merged from, in increasing priority:
//! 1. built-in defaults (`AwgConfig::default()`)
//! 2. `config/awg.toml` (or a path given to [`AwgConfig::load_from`])
//! 3. environment variables prefixed with `AWG_`, using `__` between
//!    section and key (e.g. `AWG_CONNECTION__ADDRESS=10.0.0.7`)
//!
//! # Example
//! ```no_run
//! use awg_scpi::config::AwgConfig;
//!
//! let config = AwgConfig::load()?;
//! config.validate()?;
//! println!("instrument at {}", config.connection.address);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::level_filters::LevelFilter;

use crate::error::{AwgError, AwgResult};
use crate::logging::OutputFormat;
use crate::validation;

/// Default configuration file location, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/awg.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "AWG_";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AwgConfig {
    /// How to reach the instrument
    pub connection: ConnectionConfig,
    /// Per-session SCPI command log
    pub command_log: CommandLogConfig,
    /// Command dispatch behaviour
    pub dispatch: DispatchConfig,
    /// Diagnostic logging
    pub logging: LoggingSection,
}

/// Transport used to reach the instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    /// Raw SCPI over TCP (port 5025 by default)
    #[default]
    Socket,
    /// VISA resource `TCPIP0::<address>::inst0::INSTR` (feature `instrument_visa`)
    Visa,
}

/// Connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Instrument IP address
    pub address: String,
    /// Transport
    pub protocol: Protocol,
    /// TCP port for `Protocol::Socket`
    pub port: u16,
    /// I/O timeout in milliseconds
    pub timeout_ms: u64,
    /// Line terminator appended to commands and expected after replies
    pub terminator: String,
}

/// Command log settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandLogConfig {
    /// Write a log file; when false lines are still formatted but not persisted
    pub enabled: bool,
    /// Directory the log file is created in
    pub directory: PathBuf,
    /// Device identifier used in the file name; empty means `awg_<address>`
    pub device_name: String,
}

/// Dispatcher settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Issue the paired query after each set and report the confirmed value
    pub confirm_sets: bool,
}

/// Diagnostic logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Logging level (off, error, warn, info, debug, trace)
    pub level: String,
    /// Output format
    pub format: OutputFormat,
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5025
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_terminator() -> String {
    "\n".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            protocol: Protocol::default(),
            port: default_port(),
            timeout_ms: default_timeout_ms(),
            terminator: default_terminator(),
        }
    }
}

impl Default for CommandLogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            directory: PathBuf::from("."),
            device_name: String::new(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self { confirm_sets: true }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: OutputFormat::default(),
        }
    }
}

impl LoggingSection {
    /// The configured level as a filter.
    pub fn level_filter(&self) -> Result<LevelFilter, String> {
        self.level.parse().map_err(|_| {
            format!(
                "Invalid log level '{}'. Must be one of: off, error, warn, info, debug, trace",
                self.level
            )
        })
    }
}

impl ConnectionConfig {
    /// I/O timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl AwgConfig {
    /// Load configuration from `config/awg.toml` and environment variables.
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load() -> AwgResult<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific file path
    pub fn load_from<P: AsRef<Path>>(path: P) -> AwgResult<Self> {
        Self::figment(path).extract().map_err(AwgError::from)
    }

    /// The provider stack, exposed so callers can merge extra sources.
    pub fn figment<P: AsRef<Path>>(path: P) -> Figment {
        Figment::from(Serialized::defaults(AwgConfig::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), String> {
        validation::is_valid_ip(&self.connection.address).map_err(|e| e.to_string())?;
        validation::is_valid_port(self.connection.port).map_err(|e| e.to_string())?;

        if self.connection.timeout_ms == 0 {
            return Err("Invalid timeout_ms 0. Must be greater than 0".to_string());
        }

        if self.connection.terminator.is_empty() {
            return Err("Line terminator cannot be empty".to_string());
        }

        self.logging.level_filter()?;

        Ok(())
    }

    /// Device identifier for the command log file name. IPv6 separators
    /// become `-` so the name is a valid file name everywhere.
    pub fn device_name(&self) -> String {
        if self.command_log.device_name.is_empty() {
            format!("awg_{}", self.connection.address.replace(':', "-"))
        } else {
            self.command_log.device_name.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AwgConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.connection.port, 5025);
        assert_eq!(config.connection.timeout(), Duration::from_millis(5000));
        assert!(config.dispatch.confirm_sets);
    }

    #[test]
    fn test_device_name_is_file_safe() {
        let mut config = AwgConfig::default();
        config.connection.address = "fe80::1".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.device_name(), "awg_fe80--1");
    }

    #[test]
    fn test_config_validation() {
        let mut config = AwgConfig::default();
        config.connection.address = "not-an-ip".to_string();
        assert!(config.validate().is_err());

        let mut config = AwgConfig::default();
        config.connection.port = 0;
        assert!(config.validate().is_err());

        let mut config = AwgConfig::default();
        config.connection.timeout_ms = 0;
        assert!(config.validate().is_err());

        let mut config = AwgConfig::default();
        config.connection.terminator.clear();
        assert!(config.validate().is_err());

        let mut config = AwgConfig::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_device_name_falls_back_to_address() {
        let mut config = AwgConfig::default();
        config.connection.address = "10.0.0.7".to_string();
        assert_eq!(config.device_name(), "awg_10.0.0.7");

        config.command_log.device_name = "M8195A".to_string();
        assert_eq!(config.device_name(), "M8195A");
    }

    #[test]
    fn test_load_from_toml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "awg.toml",
                r#"
                [connection]
                address = "192.168.1.50"
                protocol = "visa"
                timeout_ms = 10000

                [dispatch]
                confirm_sets = false

                [logging]
                format = "json"
                "#,
            )?;

            let config = AwgConfig::load_from("awg.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.connection.address, "192.168.1.50");
            assert_eq!(config.connection.protocol, Protocol::Visa);
            assert_eq!(config.connection.timeout_ms, 10000);
            assert_eq!(config.connection.port, 5025);
            assert!(!config.dispatch.confirm_sets);
            assert_eq!(config.logging.format, OutputFormat::Json);
            assert_eq!(config.logging.level, "info");
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("awg.toml", "[connection]\naddress = \"192.168.1.50\"\n")?;
            jail.set_env("AWG_CONNECTION__ADDRESS", "10.1.2.3");
            jail.set_env("AWG_CONNECTION__PORT", "5026");

            let config = AwgConfig::load_from("awg.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.connection.address, "10.1.2.3");
            assert_eq!(config.connection.port, 5026);
            Ok(())
        });
    }
}
