//! Reference clock input (`:ROSCillator`).

use super::{min_max, subsystem};
use crate::dispatcher::{Rejected, SetOutcome, Timed};
use crate::error::AwgResult;
use crate::session::Session;
use crate::types::{RefClockRange, RefClockSource, Setting};

subsystem! {
    /// `:ROSC` subsystem.
    ReferenceOscillator
}

impl<S: Session> ReferenceOscillator<'_, S> {
    /// `:ROSC:SOUR`
    pub fn set_source(&mut self, source: RefClockSource) -> AwgResult<SetOutcome> {
        self.d.set_value(":ROSC:SOUR", source)
    }

    /// `:ROSC:SOUR?`
    pub fn source(&mut self) -> AwgResult<Timed<RefClockSource>> {
        self.d.query_as(":ROSC:SOUR?")
    }

    /// `:ROSC:SOUR:CHEC? <source>`: whether a valid signal is present at `source`.
    pub fn source_available(&mut self, source: RefClockSource) -> AwgResult<Timed<bool>> {
        self.d.query_bool(&format!(":ROSC:SOUR:CHEC? {source}"))
    }

    /// `:ROSC:FREQ`: expected external reference frequency in Hz.
    pub fn set_frequency(&mut self, frequency: impl Into<Setting<f64>>) -> AwgResult<SetOutcome> {
        let frequency = frequency.into();
        min_max(":ROSC:FREQ", &frequency).rejected()?;
        self.d.set_value(":ROSC:FREQ", frequency)
    }

    /// `:ROSC:FREQ?`
    pub fn frequency(&mut self) -> AwgResult<Timed<f64>> {
        self.d.query_as(":ROSC:FREQ?")
    }

    /// `:ROSC:RANG`
    pub fn set_range(&mut self, range: RefClockRange) -> AwgResult<SetOutcome> {
        self.d.set_value(":ROSC:RANG", range)
    }

    /// Select the range that covers `frequency_hz` (see
    /// [`RefClockRange::for_frequency`]) and send `:ROSC:RANG`.
    pub fn set_range_for_frequency(&mut self, frequency_hz: f64) -> AwgResult<SetOutcome> {
        let range = RefClockRange::for_frequency(frequency_hz).rejected()?;
        self.set_range(range)
    }

    /// `:ROSC:RANG?`
    pub fn range(&mut self) -> AwgResult<Timed<RefClockRange>> {
        self.d.query_as(":ROSC:RANG?")
    }

    /// `:ROSC:RNG1|RNG2:FREQ`: reference frequency used while `range` is selected.
    pub fn set_range_frequency(
        &mut self,
        range: RefClockRange,
        frequency: impl Into<Setting<f64>>,
    ) -> AwgResult<SetOutcome> {
        let header = format!(":ROSC:{}:FREQ", range.node());
        let frequency = frequency.into();
        min_max(&header, &frequency).rejected()?;
        self.d.set_value(&header, frequency)
    }

    /// `:ROSC:RNG1|RNG2:FREQ?`
    pub fn range_frequency(&mut self, range: RefClockRange) -> AwgResult<Timed<f64>> {
        self.d
            .query_as(&format!(":ROSC:{}:FREQ?", range.node()))
    }
}
