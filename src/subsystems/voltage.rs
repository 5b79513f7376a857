//! Output voltage (`:VOLTage<ch>`).

use super::{min_max, subsystem};
use crate::controller::DeviceLimits;
use crate::dispatcher::{Rejected, SetOutcome, Timed};
use crate::error::AwgResult;
use crate::session::Session;
use crate::types::{IntoChannel, Setting};
use crate::validation;

subsystem! {
    /// `:VOLT` subsystem.
    Voltage
}

impl<S: Session> Voltage<'_, S> {
    fn set_level(
        &mut self,
        channel: impl IntoChannel,
        node: &str,
        level: Setting<f64>,
    ) -> AwgResult<SetOutcome> {
        let channel = channel.into_channel().rejected()?;
        let header = format!(":VOLT{channel}{node}");
        min_max(&header, &level).rejected()?;
        self.d.set_value(&header, level)
    }

    fn level(&mut self, channel: impl IntoChannel, node: &str) -> AwgResult<Timed<f64>> {
        let channel = channel.into_channel().rejected()?;
        self.d.query_as(&format!(":VOLT{channel}{node}?"))
    }

    /// `:VOLT<ch>`: amplitude in volts, at most [`DeviceLimits::MAX_VOLTAGE`].
    pub fn set_amplitude(
        &mut self,
        channel: impl IntoChannel,
        amplitude: impl Into<Setting<f64>>,
    ) -> AwgResult<SetOutcome> {
        let amplitude = amplitude.into();
        amplitude
            .check(|a| {
                validation::is_finite_in_range("amplitude", *a, 0.0..=DeviceLimits::MAX_VOLTAGE)
            })
            .rejected()?;
        self.set_level(channel, "", amplitude)
    }

    /// `:VOLT<ch>?`
    pub fn amplitude(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<f64>> {
        self.level(channel, "")
    }

    /// `:VOLT<ch>:OFFS`
    pub fn set_offset(
        &mut self,
        channel: impl IntoChannel,
        offset: impl Into<Setting<f64>>,
    ) -> AwgResult<SetOutcome> {
        self.set_level(channel, ":OFFS", offset.into())
    }

    /// `:VOLT<ch>:OFFS?`
    pub fn offset(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<f64>> {
        self.level(channel, ":OFFS")
    }

    /// `:VOLT<ch>:HIGH`
    pub fn set_high(
        &mut self,
        channel: impl IntoChannel,
        level: impl Into<Setting<f64>>,
    ) -> AwgResult<SetOutcome> {
        self.set_level(channel, ":HIGH", level.into())
    }

    /// `:VOLT<ch>:HIGH?`
    pub fn high(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<f64>> {
        self.level(channel, ":HIGH")
    }

    /// `:VOLT<ch>:LOW`
    pub fn set_low(
        &mut self,
        channel: impl IntoChannel,
        level: impl Into<Setting<f64>>,
    ) -> AwgResult<SetOutcome> {
        self.set_level(channel, ":LOW", level.into())
    }

    /// `:VOLT<ch>:LOW?`
    pub fn low(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<f64>> {
        self.level(channel, ":LOW")
    }

    /// `:VOLT<ch>:TERM`: termination voltage.
    pub fn set_termination(
        &mut self,
        channel: impl IntoChannel,
        level: impl Into<Setting<f64>>,
    ) -> AwgResult<SetOutcome> {
        self.set_level(channel, ":TERM", level.into())
    }

    /// `:VOLT<ch>:TERM?`
    pub fn termination(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<f64>> {
        self.level(channel, ":TERM")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AwgError;
    use crate::session::MockSession;
    use crate::subsystems::mock_dispatcher;
    use crate::types::Limit;

    #[test]
    fn amplitude_above_device_limit_is_rejected() {
        let mock = MockSession::new();
        let mut d = mock_dispatcher(&mock);
        let mut volt = Voltage::new(&mut d);
        assert!(matches!(
            volt.set_amplitude(1, 3.5),
            Err(AwgError::InvalidParameter(_))
        ));
        assert!(volt.set_amplitude(1, Setting::Default).is_err());
        assert_eq!(mock.transmissions(), 0);
    }

    #[test]
    fn levels_address_channel_nodes() {
        let mock = MockSession::new()
            .with_reply(":VOLT4:OFFS?", "-0.1")
            .with_reply(":VOLT2?", "0.5")
            .with_reply(":VOLT3:TERM?", "-1.0");
        let mut d = mock_dispatcher(&mock);
        let mut volt = Voltage::new(&mut d);

        volt.set_amplitude(2, 0.5).unwrap();
        volt.set_offset(4, -0.1).unwrap();
        let term = volt.set_termination(3, Setting::limit(Limit::Min)).unwrap();
        assert_eq!(term.confirmed_as::<f64>(), Some(-1.0));
        assert_eq!(volt.offset(4).unwrap().value, -0.1);
        assert_eq!(
            mock.writes(),
            vec![":VOLT2 0.5", ":VOLT4:OFFS -0.1", ":VOLT3:TERM MIN"]
        );
    }
}
