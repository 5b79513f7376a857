//! DAC sample frequency (`:FREQuency:RASTer`).

use super::{min_max, subsystem};
use crate::dispatcher::{Rejected, SetOutcome, Timed};
use crate::error::AwgResult;
use crate::session::Session;
use crate::types::Setting;
use crate::validation;

subsystem! {
    /// `:FREQ:RAST` subsystem.
    Sampling
}

impl<S: Session> Sampling<'_, S> {
    /// `:FREQ:RAST`: DAC sample frequency in Hz.
    pub fn set_frequency(&mut self, frequency: impl Into<Setting<f64>>) -> AwgResult<SetOutcome> {
        let frequency = frequency.into();
        min_max(":FREQ:RAST", &frequency).rejected()?;
        frequency
            .check(|f| validation::is_finite_in_range("sample frequency", *f, 0.0..=f64::MAX))
            .rejected()?;
        self.d.set_value(":FREQ:RAST", frequency)
    }

    /// `:FREQ:RAST?`
    pub fn frequency(&mut self) -> AwgResult<Timed<f64>> {
        self.d.query_as(":FREQ:RAST?")
    }
}
