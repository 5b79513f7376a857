//! Trigger input: advancement source and software events.

use std::time::Duration;

use super::subsystem;
use crate::dispatcher::{SetOutcome, Timed};
use crate::error::AwgResult;
use crate::session::Session;
use crate::types::{on_off, TriggerSource};

subsystem! {
    /// `:TRIG` subsystem.
    Trigger
}

impl<S: Session> Trigger<'_, S> {
    /// `:TRIG:SOUR:ADV`: source of advancement events.
    pub fn set_advance_source(&mut self, source: TriggerSource) -> AwgResult<SetOutcome> {
        self.d.set_value(":TRIG:SOUR:ADV", source)
    }

    /// `:TRIG:SOUR:ADV?`
    pub fn advance_source(&mut self) -> AwgResult<Timed<TriggerSource>> {
        self.d.query_as(":TRIG:SOUR:ADV?")
    }

    /// `:TRIG:ENAB`: send a software enable event.
    pub fn send_enable(&mut self) -> AwgResult<Duration> {
        self.d.write(":TRIG:ENAB", "Enable event sent")
    }

    /// `:TRIG:BEG`: send a software trigger.
    pub fn send_begin(&mut self) -> AwgResult<Duration> {
        self.d.write(":TRIG:BEG", "Begin event sent")
    }

    /// `:TRIG:BEG:GATE`: software gate in gated mode.
    pub fn set_begin_gate(&mut self, open: bool) -> AwgResult<SetOutcome> {
        self.d.set_value(":TRIG:BEG:GATE", on_off(open))
    }

    /// `:TRIG:BEG:GATE?`
    pub fn begin_gate(&mut self) -> AwgResult<Timed<bool>> {
        self.d.query_bool(":TRIG:BEG:GATE?")
    }

    /// `:TRIG:ADV`: send a software advancement event.
    pub fn send_advance(&mut self) -> AwgResult<Duration> {
        self.d.write(":TRIG:ADV", "Advance event sent")
    }
}
