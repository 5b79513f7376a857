//! Digital up-conversion carrier (`:CARRier<ch>`).

use super::{finite, subsystem};
use crate::controller::DeviceLimits;
use crate::dispatcher::{Rejected, SetOutcome, Timed};
use crate::error::AwgResult;
use crate::session::Session;
use crate::types::{IntoChannel, Setting};
use crate::validation;

subsystem! {
    /// `:CARR` subsystem.
    Carrier
}

impl<S: Session> Carrier<'_, S> {
    /// `:CARR<ch>:FREQ`: carrier frequency in Hz, up to
    /// [`DeviceLimits::MAX_FREQUENCY_HZ`]. `DEF` is accepted.
    pub fn set_frequency(
        &mut self,
        channel: impl IntoChannel,
        frequency: impl Into<Setting<f64>>,
    ) -> AwgResult<SetOutcome> {
        let channel = channel.into_channel().rejected()?;
        let frequency = frequency.into();
        frequency
            .check(|f| {
                validation::is_finite_in_range(
                    "carrier frequency",
                    *f,
                    0.0..=DeviceLimits::MAX_FREQUENCY_HZ,
                )
            })
            .rejected()?;
        self.d
            .set_value(&format!(":CARR{channel}:FREQ"), frequency)
    }

    /// `:CARR<ch>:FREQ?`
    pub fn frequency(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<f64>> {
        let channel = channel.into_channel().rejected()?;
        self.d.query_as(&format!(":CARR{channel}:FREQ?"))
    }

    /// `:CARR<ch>:SCAL`: carrier amplitude scale. `DEF` is accepted.
    pub fn set_scale(
        &mut self,
        channel: impl IntoChannel,
        scale: impl Into<Setting<f64>>,
    ) -> AwgResult<SetOutcome> {
        let channel = channel.into_channel().rejected()?;
        let header = format!(":CARR{channel}:SCAL");
        let scale = scale.into();
        finite(&header, &scale).rejected()?;
        self.d.set_value(&header, scale)
    }

    /// `:CARR<ch>:SCAL?`
    pub fn scale(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<f64>> {
        let channel = channel.into_channel().rejected()?;
        self.d.query_as(&format!(":CARR{channel}:SCAL?"))
    }
}
