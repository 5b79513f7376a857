//! Arming: `:ABOR`, `:ARM`, `:INIT` and the hardware-disable switches of `:TRIG`.

use std::time::Duration;

use super::{min_max, subsystem};
use crate::dispatcher::{Rejected, SetOutcome, Timed};
use crate::error::AwgResult;
use crate::session::Session;
use crate::types::{
    on_off, ArmingMode, EnableSource, IntoChannel, Setting, TriggerOperationMode, TriggerSlope,
    TriggerSource,
};
use crate::validation;

subsystem! {
    /// `:ARM` / `:INIT` subsystem.
    Arm
}

impl<S: Session> Arm<'_, S> {
    /// `:ABOR`: stop signal generation on all channels.
    pub fn abort(&mut self) -> AwgResult<Duration> {
        self.d.write(":ABOR", "Signal generation stopped")
    }

    /// `:ARM:MDEL`: module delay in seconds.
    pub fn set_module_delay(&mut self, delay: impl Into<Setting<f64>>) -> AwgResult<SetOutcome> {
        let delay = delay.into();
        min_max(":ARM:MDEL", &delay).rejected()?;
        self.d.set_value(":ARM:MDEL", delay)
    }

    /// `:ARM:MDEL?`
    pub fn module_delay(&mut self) -> AwgResult<Timed<f64>> {
        self.d.query_as(":ARM:MDEL?")
    }

    /// `:ARM:SDEL<ch>`: sample delay in sample clocks.
    pub fn set_sample_delay(
        &mut self,
        channel: impl IntoChannel,
        delay: impl Into<Setting<f64>>,
    ) -> AwgResult<SetOutcome> {
        let channel = channel.into_channel().rejected()?;
        let header = format!(":ARM:SDEL{channel}");
        let delay = delay.into();
        min_max(&header, &delay).rejected()?;
        self.d.set_value(&header, delay)
    }

    /// `:ARM:SDEL<ch>?`
    pub fn sample_delay(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<f64>> {
        let channel = channel.into_channel().rejected()?;
        self.d.query_as(&format!(":ARM:SDEL{channel}?"))
    }

    /// `:INIT:CONT:ENAB`: self-armed or armed.
    pub fn set_arming_mode(&mut self, mode: ArmingMode) -> AwgResult<SetOutcome> {
        self.d.set_value(":INIT:CONT:ENAB", mode)
    }

    /// `:INIT:CONT:ENAB?`
    pub fn arming_mode(&mut self) -> AwgResult<Timed<ArmingMode>> {
        self.d.query_as(":INIT:CONT:ENAB?")
    }

    /// `:INIT:CONT:STAT`: continuous mode.
    pub fn set_continuous(&mut self, state: bool) -> AwgResult<SetOutcome> {
        self.d.set_value(":INIT:CONT:STAT", on_off(state))
    }

    /// `:INIT:CONT:STAT?`
    pub fn continuous(&mut self) -> AwgResult<Timed<bool>> {
        self.d.query_bool(":INIT:CONT:STAT?")
    }

    /// `:INIT:GATE:STAT`: gated mode.
    pub fn set_gated(&mut self, state: bool) -> AwgResult<SetOutcome> {
        self.d.set_value(":INIT:GATE:STAT", on_off(state))
    }

    /// `:INIT:GATE:STAT?`
    pub fn gated(&mut self) -> AwgResult<Timed<bool>> {
        self.d.query_bool(":INIT:GATE:STAT?")
    }

    /// `:INIT:IMM`: start signal generation.
    pub fn initiate(&mut self) -> AwgResult<Duration> {
        self.d.write(":INIT:IMM", "Signal generation started")
    }

    /// `:ARM:TRIG:LEV`: trigger input threshold in volts.
    pub fn set_trigger_level(&mut self, level: impl Into<Setting<f64>>) -> AwgResult<SetOutcome> {
        let level = level.into();
        min_max(":ARM:TRIG:LEV", &level).rejected()?;
        self.d.set_value(":ARM:TRIG:LEV", level)
    }

    /// `:ARM:TRIG:LEV?`
    pub fn trigger_level(&mut self) -> AwgResult<Timed<f64>> {
        self.d.query_as(":ARM:TRIG:LEV?")
    }

    /// `:ARM:TRIG:SLOP`
    pub fn set_trigger_slope(&mut self, slope: TriggerSlope) -> AwgResult<SetOutcome> {
        self.d.set_value(":ARM:TRIG:SLOP", slope)
    }

    /// `:ARM:TRIG:SLOP?`
    pub fn trigger_slope(&mut self) -> AwgResult<Timed<TriggerSlope>> {
        self.d.query_as(":ARM:TRIG:SLOP?")
    }

    /// `:ARM:TRIG:SOUR`: trigger input or internal generator.
    pub fn set_trigger_source(&mut self, source: TriggerSource) -> AwgResult<SetOutcome> {
        self.d.set_value(":ARM:TRIG:SOUR", source)
    }

    /// `:ARM:TRIG:SOUR?`
    pub fn trigger_source(&mut self) -> AwgResult<Timed<TriggerSource>> {
        self.d.query_as(":ARM:TRIG:SOUR?")
    }

    /// `:ARM:TRIG:FREQ`: internal trigger frequency in Hz.
    pub fn set_trigger_frequency(
        &mut self,
        frequency: impl Into<Setting<f64>>,
    ) -> AwgResult<SetOutcome> {
        let frequency = frequency.into();
        min_max(":ARM:TRIG:FREQ", &frequency).rejected()?;
        frequency
            .check(|f| validation::is_finite_in_range(":ARM:TRIG:FREQ", *f, 0.0..=f64::MAX))
            .rejected()?;
        self.d.set_value(":ARM:TRIG:FREQ", frequency)
    }

    /// `:ARM:TRIG:FREQ?`
    pub fn trigger_frequency(&mut self) -> AwgResult<Timed<f64>> {
        self.d.query_as(":ARM:TRIG:FREQ?")
    }

    /// `:ARM:TRIG:OPER`: synchronous or asynchronous trigger handling.
    pub fn set_trigger_operation(&mut self, mode: TriggerOperationMode) -> AwgResult<SetOutcome> {
        self.d.set_value(":ARM:TRIG:OPER", mode)
    }

    /// `:ARM:TRIG:OPER?`
    pub fn trigger_operation(&mut self) -> AwgResult<Timed<TriggerOperationMode>> {
        self.d.query_as(":ARM:TRIG:OPER?")
    }

    /// `:ARM:EVEN:LEV`: event input threshold in volts.
    pub fn set_event_level(&mut self, level: impl Into<Setting<f64>>) -> AwgResult<SetOutcome> {
        let level = level.into();
        min_max(":ARM:EVEN:LEV", &level).rejected()?;
        self.d.set_value(":ARM:EVEN:LEV", level)
    }

    /// `:ARM:EVEN:LEV?`
    pub fn event_level(&mut self) -> AwgResult<Timed<f64>> {
        self.d.query_as(":ARM:EVEN:LEV?")
    }

    /// `:ARM:EVEN:SLOP`
    pub fn set_event_slope(&mut self, slope: TriggerSlope) -> AwgResult<SetOutcome> {
        self.d.set_value(":ARM:EVEN:SLOP", slope)
    }

    /// `:ARM:EVEN:SLOP?`
    pub fn event_slope(&mut self) -> AwgResult<Timed<TriggerSlope>> {
        self.d.query_as(":ARM:EVEN:SLOP?")
    }

    /// `:TRIG:SOUR:ENAB`: input used as enable signal.
    pub fn set_enable_source(&mut self, source: EnableSource) -> AwgResult<SetOutcome> {
        self.d.set_value(":TRIG:SOUR:ENAB", source)
    }

    /// `:TRIG:SOUR:ENAB?`
    pub fn enable_source(&mut self) -> AwgResult<Timed<EnableSource>> {
        self.d.query_as(":TRIG:SOUR:ENAB?")
    }

    /// `:TRIG:ENAB:HWD`: ignore the hardware enable input.
    pub fn set_enable_hardware_disabled(&mut self, disabled: bool) -> AwgResult<SetOutcome> {
        self.d.set_value(":TRIG:ENAB:HWD", on_off(disabled))
    }

    /// `:TRIG:ENAB:HWD?`
    pub fn enable_hardware_disabled(&mut self) -> AwgResult<Timed<bool>> {
        self.d.query_bool(":TRIG:ENAB:HWD?")
    }

    /// `:TRIG:BEG:HWD`: ignore the hardware trigger input.
    pub fn set_trigger_hardware_disabled(&mut self, disabled: bool) -> AwgResult<SetOutcome> {
        self.d.set_value(":TRIG:BEG:HWD", on_off(disabled))
    }

    /// `:TRIG:BEG:HWD?`
    pub fn trigger_hardware_disabled(&mut self) -> AwgResult<Timed<bool>> {
        self.d.query_bool(":TRIG:BEG:HWD?")
    }

    /// `:TRIG:ADV:HWD`: ignore the hardware advance input.
    pub fn set_advance_hardware_disabled(&mut self, disabled: bool) -> AwgResult<SetOutcome> {
        self.d.set_value(":TRIG:ADV:HWD", on_off(disabled))
    }

    /// `:TRIG:ADV:HWD?`
    pub fn advance_hardware_disabled(&mut self) -> AwgResult<Timed<bool>> {
        self.d.query_bool(":TRIG:ADV:HWD?")
    }
}
