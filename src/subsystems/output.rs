//! Output stage: channel enable, reference clock output and FIR filters.

use super::{join, min_max, parse_list, subsystem};
use crate::dispatcher::{Rejected, SetOutcome, Timed};
use crate::error::{AwgError, AwgResult};
use crate::session::Session;
use crate::types::{
    on_off, FilterType, HighRateFilterType, IntoChannel, OutputClockSource, Setting,
};
use crate::validation;

/// Divider applied to the reference clock output (`:OUTP:ROSC:<node>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceDivider {
    /// `SCD`: divides the sample clock (source `SCLK1`).
    SampleClock,
    /// `RCD1`: divides the reference clock (source `EXT`).
    Reference1,
    /// `RCD2`: divides the reference clock (source `SCLK2`).
    Reference2,
}

impl ReferenceDivider {
    /// Command node.
    pub fn node(self) -> &'static str {
        match self {
            ReferenceDivider::SampleClock => "SCD",
            ReferenceDivider::Reference1 => "RCD1",
            ReferenceDivider::Reference2 => "RCD2",
        }
    }
}

/// Output FIR filter bank, selected by the sample rate divider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirFilter {
    /// `FRAT`: full rate, 16 taps.
    FullRate,
    /// `HRAT`: half rate, 32 taps.
    HalfRate,
    /// `QRAT`: quarter rate, 64 taps.
    QuarterRate,
}

impl FirFilter {
    /// Command node.
    pub fn node(self) -> &'static str {
        match self {
            FirFilter::FullRate => "FRAT",
            FirFilter::HalfRate => "HRAT",
            FirFilter::QuarterRate => "QRAT",
        }
    }

    /// Number of coefficients the filter takes.
    pub fn taps(self) -> usize {
        match self {
            FirFilter::FullRate => 16,
            FirFilter::HalfRate => 32,
            FirFilter::QuarterRate => 64,
        }
    }

    fn header(self, channel: impl std::fmt::Display) -> String {
        format!(":OUTP{channel}:FILT:{}", self.node())
    }
}

/// Accepted coefficient range.
pub const COEFFICIENT_RANGE: std::ops::RangeInclusive<f64> = -2.0..=2.0;

subsystem! {
    /// `:OUTP` subsystem.
    Output
}

impl<S: Session> Output<'_, S> {
    /// `:OUTP<ch> ON|OFF`
    pub fn set_state(&mut self, channel: impl IntoChannel, on: bool) -> AwgResult<SetOutcome> {
        let channel = channel.into_channel().rejected()?;
        self.d.set_value(&format!(":OUTP{channel}"), on_off(on))
    }

    /// `:OUTP<ch>?`
    pub fn state(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<bool>> {
        let channel = channel.into_channel().rejected()?;
        self.d.query_bool(&format!(":OUTP{channel}?"))
    }

    /// `:OUTP:ROSC:SOUR`: source of the reference clock output.
    pub fn set_reference_clock_source(
        &mut self,
        source: OutputClockSource,
    ) -> AwgResult<SetOutcome> {
        self.d.set_value(":OUTP:ROSC:SOUR", source)
    }

    /// `:OUTP:ROSC:SOUR?`
    pub fn reference_clock_source(&mut self) -> AwgResult<Timed<OutputClockSource>> {
        self.d.query_as(":OUTP:ROSC:SOUR?")
    }

    /// `:OUTP:ROSC:SCD|RCD1|RCD2`: integer divider (at least 1), or MIN/MAX.
    pub fn set_clock_divider(
        &mut self,
        divider: ReferenceDivider,
        value: impl Into<Setting<u32>>,
    ) -> AwgResult<SetOutcome> {
        let header = format!(":OUTP:ROSC:{}", divider.node());
        let value = value.into();
        value.reject_default(&header).rejected()?;
        value
            .check(|v| validation::is_in_range("clock divider", *v, 1..=u32::MAX))
            .rejected()?;
        self.d.set_value(&header, value)
    }

    /// `:OUTP:ROSC:SCD?|RCD1?|RCD2?`
    pub fn clock_divider(&mut self, divider: ReferenceDivider) -> AwgResult<Timed<u32>> {
        self.d
            .query_as(&format!(":OUTP:ROSC:{}?", divider.node()))
    }

    /// `:OUTP<ch>:DIOF`: differential offset in volts.
    pub fn set_differential_offset(
        &mut self,
        channel: impl IntoChannel,
        offset: impl Into<Setting<f64>>,
    ) -> AwgResult<SetOutcome> {
        let channel = channel.into_channel().rejected()?;
        let header = format!(":OUTP{channel}:DIOF");
        let offset = offset.into();
        min_max(&header, &offset).rejected()?;
        self.d.set_value(&header, offset)
    }

    /// `:OUTP<ch>:DIOF?`
    pub fn differential_offset(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<f64>> {
        let channel = channel.into_channel().rejected()?;
        self.d.query_as(&format!(":OUTP{channel}:DIOF?"))
    }

    /// `:OUTP<ch>:FILT:<filter> c1,...,cN`: load user coefficients. Exactly
    /// [`FirFilter::taps`] values in [`COEFFICIENT_RANGE`] are required.
    pub fn set_filter_coefficients(
        &mut self,
        channel: impl IntoChannel,
        filter: FirFilter,
        coefficients: &[f64],
    ) -> AwgResult<SetOutcome> {
        let channel = channel.into_channel().rejected()?;
        check_coefficients(filter, coefficients).rejected()?;
        self.d
            .set_value(&filter.header(channel), join(coefficients))
    }

    /// `:OUTP<ch>:FILT:<filter>?`
    pub fn filter_coefficients(
        &mut self,
        channel: impl IntoChannel,
        filter: FirFilter,
    ) -> AwgResult<Timed<Vec<f64>>> {
        let channel = channel.into_channel().rejected()?;
        let command = format!("{}?", filter.header(channel));
        self.d.query(&command)?.try_map(|reply| {
            let values: Vec<f64> = parse_list(&command, &reply)?;
            if values.len() == filter.taps() {
                Ok(values)
            } else {
                Err(AwgError::unexpected(&command, reply))
            }
        })
    }

    /// `:OUTP<ch>:FILT:FRAT:TYPE`
    pub fn set_full_rate_filter_type(
        &mut self,
        channel: impl IntoChannel,
        kind: FilterType,
    ) -> AwgResult<SetOutcome> {
        let channel = channel.into_channel().rejected()?;
        self.d
            .set_value(&format!("{}:TYPE", FirFilter::FullRate.header(channel)), kind)
    }

    /// `:OUTP<ch>:FILT:FRAT:TYPE?`
    pub fn full_rate_filter_type(&mut self, channel: impl IntoChannel) -> AwgResult<Timed<FilterType>> {
        let channel = channel.into_channel().rejected()?;
        self.d
            .query_as(&format!("{}:TYPE?", FirFilter::FullRate.header(channel)))
    }

    /// `:OUTP<ch>:FILT:HRAT:TYPE`
    pub fn set_half_rate_filter_type(
        &mut self,
        channel: impl IntoChannel,
        kind: HighRateFilterType,
    ) -> AwgResult<SetOutcome> {
        let channel = channel.into_channel().rejected()?;
        self.d
            .set_value(&format!("{}:TYPE", FirFilter::HalfRate.header(channel)), kind)
    }

    /// `:OUTP<ch>:FILT:HRAT:TYPE?`
    pub fn half_rate_filter_type(
        &mut self,
        channel: impl IntoChannel,
    ) -> AwgResult<Timed<HighRateFilterType>> {
        let channel = channel.into_channel().rejected()?;
        self.d
            .query_as(&format!("{}:TYPE?", FirFilter::HalfRate.header(channel)))
    }

    /// `:OUTP<ch>:FILT:<filter>:SCAL`: coefficient scale in [0, 1].
    pub fn set_filter_scale(
        &mut self,
        channel: impl IntoChannel,
        filter: FirFilter,
        scale: impl Into<Setting<f64>>,
    ) -> AwgResult<SetOutcome> {
        let channel = channel.into_channel().rejected()?;
        let header = format!("{}:SCAL", filter.header(channel));
        let scale = scale.into();
        min_max(&header, &scale).rejected()?;
        scale
            .check(|s| validation::is_finite_in_range("filter scale", *s, 0.0..=1.0))
            .rejected()?;
        self.d.set_value(&header, scale)
    }

    /// `:OUTP<ch>:FILT:<filter>:SCAL?`
    pub fn filter_scale(
        &mut self,
        channel: impl IntoChannel,
        filter: FirFilter,
    ) -> AwgResult<Timed<f64>> {
        let channel = channel.into_channel().rejected()?;
        self.d
            .query_as(&format!("{}:SCAL?", filter.header(channel)))
    }

    /// `:OUTP<ch>:FILT:<filter>:DEL`: filter delay in seconds. Only applies to
    /// the predefined low-pass / Nyquist filters.
    pub fn set_filter_delay(
        &mut self,
        channel: impl IntoChannel,
        filter: FirFilter,
        delay: impl Into<Setting<f64>>,
    ) -> AwgResult<SetOutcome> {
        let channel = channel.into_channel().rejected()?;
        let header = format!("{}:DEL", filter.header(channel));
        let delay = delay.into();
        min_max(&header, &delay).rejected()?;
        self.d.set_value(&header, delay)
    }

    /// `:OUTP<ch>:FILT:<filter>:DEL?`
    pub fn filter_delay(
        &mut self,
        channel: impl IntoChannel,
        filter: FirFilter,
    ) -> AwgResult<Timed<f64>> {
        let channel = channel.into_channel().rejected()?;
        self.d
            .query_as(&format!("{}:DEL?", filter.header(channel)))
    }
}

fn check_coefficients(filter: FirFilter, coefficients: &[f64]) -> AwgResult<()> {
    if coefficients.len() != filter.taps() {
        return Err(AwgError::invalid(format!(
            "{} filter takes {} coefficients, got {}",
            filter.node(),
            filter.taps(),
            coefficients.len()
        )));
    }
    coefficients
        .iter()
        .try_for_each(|c| validation::is_finite_in_range("filter coefficient", *c, COEFFICIENT_RANGE))
}
