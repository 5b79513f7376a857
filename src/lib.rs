//! # AWG SCPI Library
//!
//! Typed SCPI control of Keysight M8190/M8195-class arbitrary waveform
//! generators over a raw socket or VISA session. Every instrument command is
//! a method on a subsystem handle; arguments are validated before anything
//! is sent, every exchange is timed and written to a per-session command log,
//! and bulk data travels as IEEE-488.2 definite-length blocks.
//!
//! ## Crate Structure
//!
//! - **`block`**: IEEE-488.2 `#<n><len><payload>` block codec and sample helpers.
//! - **`command_log`**: The per-session SCPI text log file.
//! - **`config`**: `AwgConfig`, loaded with figment from `config/awg.toml` and
//!   `AWG_*` environment variables.
//! - **`controller`**: The `Awg` facade: connect, disconnect and subsystem access.
//! - **`dispatcher`**: Connection check, timing, logging and error tagging
//!   shared by every command.
//! - **`error`**: `AwgError` / `AwgResult` and the codec's `BlockError`.
//! - **`logging`**: `tracing-subscriber` initialisation.
//! - **`session`**: The `Session` transport trait with TCP, VISA and mock
//!   implementations.
//! - **`subsystems`**: One handle per SCPI subsystem (`:OUTP`, `:TRAC`, `:STAB`, ...).
//! - **`types`**: Keyword enums, `Channel` and `Setting<T>`.
//! - **`validation`**: Parameter checks used before transmission.

pub mod block;
pub mod command_log;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod session;
pub mod subsystems;
pub mod types;
pub mod validation;

pub use command_log::CommandLog;
pub use config::AwgConfig;
pub use controller::{Awg, DeviceLimits};
pub use dispatcher::{Dispatcher, SetOutcome, Timed};
pub use error::{AwgError, AwgResult, BlockError};
pub use session::{MockSession, Session, TcpSession};
pub use subsystems::Identity;
pub use types::{Channel, IntoChannel, Limit, Setting};
