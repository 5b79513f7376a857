//! Diagnostic logging setup.
//!
//! The library itself only emits `tracing` events (`debug!` per transmitted
//! command, `warn!` for rejected parameters and transport failures, `info!` on
//! connect/disconnect). Applications that want to see them call [`init`] or
//! [`init_from_config`] once at start-up.
//!
//! This is independent from the per-session SCPI command log in
//! [`crate::command_log`].
//!
//! # Example
//! ```no_run
//! use awg_scpi::{config::AwgConfig, logging};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AwgConfig::load()?;
//! logging::init_from_config(&config)?;
//! tracing::info!(address = %config.connection.address, "starting");
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry};

use crate::config::{AwgConfig, LoggingSection};
use crate::error::{AwgError, AwgResult};

/// Output format for diagnostic logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Multi-line, colored
    #[default]
    Pretty,
    /// Single line, no colors
    Compact,
    /// One JSON object per event
    Json,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

impl OutputFormat {
    fn layer(self) -> BoxedLayer {
        let base = fmt::layer().with_file(true).with_line_number(true);
        match self {
            OutputFormat::Pretty => base.pretty().boxed(),
            OutputFormat::Compact => base.compact().with_ansi(false).boxed(),
            OutputFormat::Json => base.json().boxed(),
        }
    }
}

/// Install the global subscriber described by the `[logging]` section of
/// `config`.
pub fn init_from_config(config: &AwgConfig) -> AwgResult<()> {
    init(&config.logging)
}

/// Install the global subscriber for `section`.
///
/// `RUST_LOG` takes precedence over the configured level when set. If a
/// subscriber is already installed (by the host application or an earlier
/// call) this does nothing.
pub fn init(section: &LoggingSection) -> AwgResult<()> {
    let level = section.level_filter().map_err(AwgError::Config)?;
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));

    tracing_subscriber::registry()
        .with(section.format.layer().with_filter(filter))
        .try_init()
        .map_err(|e| AwgError::Config(format!("failed to initialize logging: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn section_level_is_case_insensitive() {
        let mut section = LoggingSection::default();
        assert_eq!(section.level_filter(), Ok(LevelFilter::INFO));

        section.level = "DEBUG".to_string();
        assert_eq!(section.level_filter(), Ok(LevelFilter::DEBUG));

        section.level = "verbose".to_string();
        let err = section.level_filter().unwrap_err();
        assert!(err.contains("verbose"));
    }

    #[test]
    fn bad_level_fails_before_installing() {
        let mut config = AwgConfig::default();
        config.logging.level = "loud".to_string();
        config.logging.format = OutputFormat::Json;
        assert!(matches!(init_from_config(&config), Err(AwgError::Config(_))));
    }
}
