//! Logging initialisation. Lives in its own test binary because it installs
//! the process-wide subscriber.

use awg_scpi::config::{AwgConfig, LoggingSection};
use awg_scpi::logging::{self, OutputFormat};
use awg_scpi::AwgError;

#[test]
fn test_init_is_idempotent() {
    let section = LoggingSection {
        level: "debug".to_string(),
        format: OutputFormat::Compact,
    };
    assert!(logging::init(&section).is_ok());
    assert!(logging::init(&section).is_ok());
    assert!(tracing::dispatcher::has_been_set());

    // a different format after the subscriber is installed is still not an error
    assert!(logging::init_from_config(&AwgConfig::default()).is_ok());
    tracing::info!("logging initialised");
}

#[test]
fn test_invalid_level_is_reported() {
    let mut config = AwgConfig::default();
    config.logging.level = "chatty".to_string();
    match logging::init_from_config(&config) {
        Err(AwgError::Config(message)) => assert!(message.contains("chatty")),
        other => panic!("expected config error, got {other:?}"),
    }
}
