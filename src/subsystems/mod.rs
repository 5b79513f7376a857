//! Instrument subsystems.
//!
//! Each subsystem is a short-lived handle borrowing the [`Dispatcher`] of an
//! [`crate::Awg`], obtained through the matching accessor
//! (`awg.output()`, `awg.trace()`, ...). Methods validate their arguments,
//! build the SCPI command and hand it to the dispatcher; they never hold
//! state of their own.

use std::fmt::Display;
use std::str::FromStr;

use crate::dispatcher::parse_reply;
use crate::error::{AwgError, AwgResult};
use crate::types::Setting;
use crate::validation;

macro_rules! subsystem {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name<'a, S> {
            pub(crate) d: &'a mut $crate::dispatcher::Dispatcher<S>,
        }

        impl<'a, S> $name<'a, S> {
            pub(crate) fn new(d: &'a mut $crate::dispatcher::Dispatcher<S>) -> Self {
                Self { d }
            }
        }
    };
}

pub(crate) use subsystem;

pub mod arm;
pub mod carrier;
pub mod characteristics;
pub mod common;
pub mod format;
pub mod function_mode;
pub mod instrument;
pub mod memory;
pub mod output;
pub mod reference_oscillator;
pub mod sampling;
pub mod sequence;
pub mod status;
pub mod trace;
pub mod trigger;
pub mod voltage;

pub use arm::Arm;
pub use carrier::Carrier;
pub use characteristics::{Characteristics, FrequencyResponse, ResponsePoint};
pub use common::{Common, Identity};
pub use format::Format;
pub use function_mode::Function;
pub use instrument::Instrument;
pub use memory::{Catalog, CatalogEntry, EntryKind, MassMemory};
pub use output::{FirFilter, Output, ReferenceDivider};
pub use reference_oscillator::ReferenceOscillator;
pub use sampling::Sampling;
pub use sequence::SequenceTable;
pub use status::{Status, StatusRegister};
pub use test::SelfTest;
pub use trace::{MemoryInfo, SegmentInfo, Trace, WaveformImport};
pub use trigger::Trigger;
pub use voltage::Voltage;

/// Split a comma separated reply into trimmed, unquoted fields.
pub(crate) fn fields(reply: &str) -> impl Iterator<Item = &str> {
    reply
        .split(',')
        .map(|f| f.trim().trim_matches('"').trim())
        .filter(|f| !f.is_empty())
}

/// Parse every field of a comma separated reply.
pub(crate) fn parse_list<T>(command: &str, reply: &str) -> AwgResult<Vec<T>>
where
    T: FromStr,
    T::Err: Display,
{
    fields(reply)
        .map(|f| parse_reply(command, f).map_err(|_| AwgError::unexpected(command, reply)))
        .collect()
}

/// Reject a slice that must not be empty.
pub(crate) fn non_empty<T>(name: &str, values: &[T]) -> AwgResult<()> {
    if values.is_empty() {
        Err(AwgError::invalid(format!("{name} cannot be empty")))
    } else {
        Ok(())
    }
}

/// Validate a real-valued setting that accepts `MIN`/`MAX` but not `DEF`.
pub(crate) fn min_max(header: &str, setting: &Setting<f64>) -> AwgResult<()> {
    setting.reject_default(header)?;
    setting.check(|v| validation::is_finite(header, *v))
}

/// Validate a real-valued setting that also accepts `DEF`.
pub(crate) fn finite(header: &str, setting: &Setting<f64>) -> AwgResult<()> {
    setting.check(|v| validation::is_finite(header, *v))
}

/// Join values with commas.
pub(crate) fn join<T: Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
pub(crate) fn mock_dispatcher(
    mock: &crate::session::MockSession,
) -> crate::dispatcher::Dispatcher<crate::session::MockSession> {
    let mut d = crate::dispatcher::Dispatcher::new(crate::command_log::CommandLog::disabled());
    d.attach(mock.clone());
    d
}
