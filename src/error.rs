//! Error types for the AWG command library.
//!
//! Two error enums are defined with `thiserror`:
//!
//! - **`BlockError`**: failures of the IEEE-488.2 block codec. Encoding fails only when a
//!   payload is too large for a one-digit length-width field; decoding distinguishes a
//!   malformed header from a block whose payload is shorter than declared.
//! - **`AwgError`**: everything a command method can return. Parameter validation happens
//!   before anything is sent, so `InvalidParameter` and `NotConnected` guarantee that the
//!   instrument saw no traffic. `Transport` carries the command that was in flight.
//!
//! `BlockError` and `std::io::Error` convert into `AwgError` via `#[from]`, so `?` works
//! across the codec, the session layer and the subsystems.

use thiserror::Error;

/// Convenience alias for results using the library error type.
pub type AwgResult<T> = std::result::Result<T, AwgError>;

/// IEEE-488.2 definite-length block codec errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// Payload does not fit a `#<ndigits><length>` header with `ndigits` <= 9.
    #[error("payload of {length} bytes is too large for a definite-length block")]
    Encoding {
        /// Offending payload length.
        length: usize,
    },

    /// Header is missing, or its digit fields are not ASCII digits.
    #[error("malformed block: {0}")]
    Malformed(String),

    /// Fewer bytes are available than the header requires.
    #[error("truncated block: expected {expected} bytes, got {available}")]
    Truncated {
        /// Total bytes the header asks for (header included).
        expected: usize,
        /// Bytes actually present.
        available: usize,
    },
}

/// Errors returned by sessions, the dispatcher and the subsystem commands.
#[derive(Error, Debug)]
pub enum AwgError {
    /// A command was issued before `connect` or after `disconnect`.
    #[error("not connected to an instrument")]
    NotConnected,

    /// A parameter failed validation; nothing was transmitted.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Block codec failure.
    #[error(transparent)]
    Block(#[from] BlockError),

    /// The session failed while sending `command` or reading its reply.
    #[error("transport error on '{command}': {message}")]
    Transport {
        /// Command that was in flight.
        command: String,
        /// Underlying failure description.
        message: String,
    },

    /// The instrument answered with text that could not be parsed.
    #[error("unexpected response to '{command}': {response:?}")]
    UnexpectedResponse {
        /// Query that produced the reply.
        command: String,
        /// Raw reply text.
        response: String,
    },

    /// Local I/O failure (command log file, socket setup).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// Functionality compiled out via Cargo features.
    #[error("Feature '{0}' is not enabled. Please build with --features {0}")]
    FeatureNotEnabled(String),
}

impl AwgError {
    /// Shorthand for `InvalidParameter`.
    pub fn invalid(msg: impl Into<String>) -> Self {
        AwgError::InvalidParameter(msg.into())
    }

    /// Shorthand for `UnexpectedResponse`.
    pub fn unexpected(command: impl Into<String>, response: impl Into<String>) -> Self {
        AwgError::UnexpectedResponse {
            command: command.into(),
            response: response.into(),
        }
    }

    /// True for errors raised before anything reached the instrument.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AwgError::NotConnected | AwgError::InvalidParameter(_) | AwgError::Block(BlockError::Encoding { .. })
        )
    }
}

impl From<figment::Error> for AwgError {
    fn from(err: figment::Error) -> Self {
        AwgError::Config(err.to_string())
    }
}
