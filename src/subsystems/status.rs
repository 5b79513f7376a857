//! `:STATus` register groups.

use std::time::Duration;

use super::subsystem;
use crate::dispatcher::{SetOutcome, Timed};
use crate::error::AwgResult;
use crate::session::Session;

/// Status register group addressed by a `:STAT:...` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusRegister {
    /// `:STAT:QUES`
    Questionable,
    /// `:STAT:OPER`
    Operation,
    /// `:STAT:QUES:VOLT`
    QuestionableVoltage,
    /// `:STAT:QUES:FREQ`
    QuestionableFrequency,
    /// `:STAT:QUES:SEQ`
    QuestionableSequence,
    /// `:STAT:QUES:DUC`
    QuestionableDuc,
    /// `:STAT:QUES:CONN`
    QuestionableConnection,
    /// `:STAT:OPER:RUN`
    OperationRun,
}

impl StatusRegister {
    /// Every register group.
    pub const ALL: [StatusRegister; 8] = [
        StatusRegister::Questionable,
        StatusRegister::Operation,
        StatusRegister::QuestionableVoltage,
        StatusRegister::QuestionableFrequency,
        StatusRegister::QuestionableSequence,
        StatusRegister::QuestionableDuc,
        StatusRegister::QuestionableConnection,
        StatusRegister::OperationRun,
    ];

    /// Command header of the group.
    pub fn path(self) -> &'static str {
        match self {
            StatusRegister::Questionable => ":STAT:QUES",
            StatusRegister::Operation => ":STAT:OPER",
            StatusRegister::QuestionableVoltage => ":STAT:QUES:VOLT",
            StatusRegister::QuestionableFrequency => ":STAT:QUES:FREQ",
            StatusRegister::QuestionableSequence => ":STAT:QUES:SEQ",
            StatusRegister::QuestionableDuc => ":STAT:QUES:DUC",
            StatusRegister::QuestionableConnection => ":STAT:QUES:CONN",
            StatusRegister::OperationRun => ":STAT:OPER:RUN",
        }
    }
}

subsystem! {
    /// `:STATus` subsystem.
    Status
}

impl<S: Session> Status<'_, S> {
    /// `:STAT:PRES`: reset every enable and transition filter to its default.
    pub fn preset(&mut self) -> AwgResult<Duration> {
        self.d.write(":STAT:PRES", "Status preset")
    }

    /// `<group>:EVEN?`: read and clear the event register.
    pub fn event(&mut self, register: StatusRegister) -> AwgResult<Timed<u16>> {
        self.d.query_as(&format!("{}:EVEN?", register.path()))
    }

    /// `<group>:COND?`
    pub fn condition(&mut self, register: StatusRegister) -> AwgResult<Timed<u16>> {
        self.d.query_as(&format!("{}:COND?", register.path()))
    }

    /// `<group>:ENAB`
    pub fn set_enable(&mut self, register: StatusRegister, mask: u16) -> AwgResult<SetOutcome> {
        self.d.set_value(&format!("{}:ENAB", register.path()), mask)
    }

    /// `<group>:ENAB?`
    pub fn enable(&mut self, register: StatusRegister) -> AwgResult<Timed<u16>> {
        self.d.query_as(&format!("{}:ENAB?", register.path()))
    }

    /// `<group>:NTR`: negative transition filter.
    pub fn set_negative_transition(
        &mut self,
        register: StatusRegister,
        mask: u16,
    ) -> AwgResult<SetOutcome> {
        self.d.set_value(&format!("{}:NTR", register.path()), mask)
    }

    /// `<group>:NTR?`
    pub fn negative_transition(&mut self, register: StatusRegister) -> AwgResult<Timed<u16>> {
        self.d.query_as(&format!("{}:NTR?", register.path()))
    }

    /// `<group>:PTR`: positive transition filter.
    pub fn set_positive_transition(
        &mut self,
        register: StatusRegister,
        mask: u16,
    ) -> AwgResult<SetOutcome> {
        self.d.set_value(&format!("{}:PTR", register.path()), mask)
    }

    /// `<group>:PTR?`
    pub fn positive_transition(&mut self, register: StatusRegister) -> AwgResult<Timed<u16>> {
        self.d.query_as(&format!("{}:PTR?", register.path()))
    }
}
