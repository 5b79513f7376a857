//! `:INSTrument`: module identification, DAC mode and multi-module state.

use std::time::Duration;

use super::subsystem;
use crate::dispatcher::{Rejected, SetOutcome, Timed};
use crate::error::AwgResult;
use crate::session::Session;
use crate::types::{DacMode, MemoryDivider};
use crate::validation;

subsystem! {
    /// `:INST` subsystem.
    Instrument
}

impl<S: Session> Instrument<'_, S> {
    /// `:INST:SLOT?`: chassis slot of the module.
    pub fn slot(&mut self) -> AwgResult<Timed<u32>> {
        self.d.query_as(":INST:SLOT?")
    }

    /// `:INST:IDEN`: flash the front panel LEDs for `seconds`.
    pub fn identify(&mut self, seconds: u32) -> AwgResult<Duration> {
        validation::is_in_range("identification time", seconds, 1..=u32::MAX).rejected()?;
        self.d.write(&format!(":INST:IDEN {seconds}"), "Identifying")
    }

    /// `:INST:IDEN:STOP`
    pub fn stop_identify(&mut self) -> AwgResult<Duration> {
        self.d.write(":INST:IDEN:STOP", "Identification stopped")
    }

    /// `:INST:HWR?`: hardware revision string.
    pub fn hardware_revision(&mut self) -> AwgResult<Timed<String>> {
        self.d.query(":INST:HWR?")
    }

    /// `:INST:DACM`
    pub fn set_dac_mode(&mut self, mode: DacMode) -> AwgResult<SetOutcome> {
        self.d.set_value(":INST:DACM", mode)
    }

    /// `:INST:DACM?`
    pub fn dac_mode(&mut self) -> AwgResult<Timed<DacMode>> {
        self.d.query_as(":INST:DACM?")
    }

    /// `:INST:MEM:EXT:RDIV`: sample rate divider of the extended memory.
    pub fn set_memory_divider(&mut self, divider: MemoryDivider) -> AwgResult<SetOutcome> {
        self.d.set_value(":INST:MEM:EXT:RDIV", divider)
    }

    /// `:INST:MEM:EXT:RDIV?`
    pub fn memory_divider(&mut self) -> AwgResult<Timed<MemoryDivider>> {
        self.d.query_as(":INST:MEM:EXT:RDIV?")
    }

    /// `:INST:MMOD:CONF?`: whether the module is part of a multi-module group.
    pub fn multi_module_configured(&mut self) -> AwgResult<Timed<bool>> {
        self.d.query_bool(":INST:MMOD:CONF?")
    }

    /// `:INST:MMOD:MODE?`: role in the multi-module group (`NORM`, `MAST`, `SLAV`).
    pub fn multi_module_mode(&mut self) -> AwgResult<Timed<String>> {
        self.d.query(":INST:MMOD:MODE?")
    }
}
