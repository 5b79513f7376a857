//! `:FUNCtion:MODE`

use super::subsystem;
use crate::dispatcher::{SetOutcome, Timed};
use crate::error::AwgResult;
use crate::session::Session;
use crate::types::FunctionMode;

subsystem! {
    /// `:FUNC` subsystem.
    Function
}

impl<S: Session> Function<'_, S> {
    /// `:FUNC:MODE`: arbitrary waveform, sequence or scenario playback.
    pub fn set_mode(&mut self, mode: FunctionMode) -> AwgResult<SetOutcome> {
        self.d.set_value(":FUNC:MODE", mode)
    }

    /// `:FUNC:MODE?`
    pub fn mode(&mut self) -> AwgResult<Timed<FunctionMode>> {
        self.d.query_as(":FUNC:MODE?")
    }
}
