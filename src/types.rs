//! Typed SCPI parameters.
//!
//! Every enumerated SCPI keyword the instrument accepts is a closed enum with an
//! `as_scpi()` mnemonic and a case-insensitive `FromStr` that accepts both the
//! short and long SCPI forms (instrument replies use the short form). Numeric
//! parameters that also accept `MIN`/`MAX`/`DEF` go through [`Setting`], and
//! channel indices through [`Channel`] / [`IntoChannel`], so invalid values are
//! rejected before a command string is ever built.

use std::fmt;
use std::str::FromStr;

use crate::error::{AwgError, AwgResult};

macro_rules! scpi_keyword {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $short:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every keyword of this parameter domain.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Mnemonic transmitted to the instrument.
            pub fn as_scpi(self) -> &'static str {
                match self {
                    $($name::$variant => $short),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_scpi())
            }
        }

        impl FromStr for $name {
            type Err = AwgError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let token = s.trim().trim_matches('"').to_ascii_uppercase();
                $(
                    if token == $short $(|| token == $alias)* {
                        return Ok($name::$variant);
                    }
                )+
                Err(AwgError::invalid(format!(
                    "'{}' is not a valid {} keyword",
                    s.trim(),
                    stringify!($name)
                )))
            }
        }
    };
}

scpi_keyword! {
    /// `MIN` / `MAX` argument of limit queries such as `:TRAC1:COUN? MIN`.
    pub enum Limit {
        /// Lowest accepted value.
        Min => "MIN" | "MINIMUM",
        /// Highest accepted value.
        Max => "MAX" | "MAXIMUM",
    }
}

scpi_keyword! {
    /// Edge selection for trigger and event inputs.
    pub enum TriggerSlope {
        /// Rising edge.
        Positive => "POS" | "POSITIVE",
        /// Falling edge.
        Negative => "NEG" | "NEGATIVE",
        /// Both edges.
        Either => "EITH" | "EITHER",
    }
}

scpi_keyword! {
    /// Trigger source used by `:ARM:TRIG:SOUR` and `:TRIG:SOUR:ADV`.
    pub enum TriggerSource {
        /// Trigger input connector.
        Trigger => "TRIG" | "TRIGGER",
        /// Event input connector.
        Event => "EVEN" | "EVENT",
        /// Internal trigger generator.
        Internal => "INT" | "INTERNAL",
    }
}

scpi_keyword! {
    /// Synchronisation of the internal trigger generator.
    pub enum TriggerOperationMode {
        /// Free running.
        Asynchronous => "ASYN" | "ASYNCHRONOUS",
        /// Synchronous to the sample clock.
        Synchronous => "SYN" | "SYNCHRONOUS",
    }
}

scpi_keyword! {
    /// Source of the enable event (`:TRIG:SOUR:ENAB`).
    pub enum EnableSource {
        /// Trigger input connector.
        Trigger => "TRIG" | "TRIGGER",
        /// Event input connector.
        Event => "EVEN" | "EVENT",
    }
}

scpi_keyword! {
    /// Arming mode (`:INIT:CONT:ENAB`).
    pub enum ArmingMode {
        /// Signal generation starts immediately.
        SelfArmed => "SELF",
        /// Signal generation waits for an enable event.
        Armed => "ARM" | "ARMED",
    }
}

scpi_keyword! {
    /// Binary sample byte order (`:FORM:BORD`).
    pub enum ByteOrder {
        /// Big-endian (most significant byte first).
        Normal => "NORM" | "NORMAL",
        /// Little-endian.
        Swapped => "SWAP" | "SWAPPED",
    }
}

scpi_keyword! {
    /// DAC channel combination mode (`:INST:DACM`).
    pub enum DacMode {
        /// Channel 1 only.
        Single => "SING" | "SINGLE",
        /// Channels 1 and 4.
        Dual => "DUAL",
        /// All four channels.
        Four => "FOUR",
        /// Channel 1 with markers on channels 3 and 4.
        Marker => "MARK" | "MARKER",
        /// Dual channel, duplicated.
        DualDuplicate => "DCD" | "DCDUPLICATE",
        /// Dual channel with markers.
        DualMarker => "DCM" | "DCMARKER",
    }
}

scpi_keyword! {
    /// Extended-memory sample rate divider (`:INST:MEM:EXT:RDIV`).
    pub enum MemoryDivider {
        /// Full rate.
        Div1 => "DIV1",
        /// Half rate.
        Div2 => "DIV2",
        /// Quarter rate.
        Div4 => "DIV4",
    }
}

scpi_keyword! {
    /// Waveform generation mode (`:FUNC:MODE`).
    pub enum FunctionMode {
        /// Arbitrary waveform playback.
        Arbitrary => "ARB" | "ARBITRARY",
        /// Sequence playback.
        Sequence => "STS" | "STSEQUENCE",
        /// Scenario playback.
        Scenario => "STSC" | "STSCENARIO",
    }
}

scpi_keyword! {
    /// Reference clock output source (`:OUTP:ROSC:SOUR`).
    pub enum OutputClockSource {
        /// Internal reference.
        Internal => "INT" | "INTERNAL",
        /// External reference input.
        External => "EXT" | "EXTERNAL",
        /// Sample clock of module 1.
        SampleClock1 => "SCLK1",
        /// Sample clock of module 2.
        SampleClock2 => "SCLK2",
    }
}

scpi_keyword! {
    /// Full-rate FIR filter type (`:OUTP<n>:FILT:FRAT:TYPE`).
    pub enum FilterType {
        /// Low-pass.
        LowPass => "LOWP" | "LOWPASS",
        /// Zero-order hold.
        ZeroOrderHold => "ZOH",
        /// User-defined coefficients.
        User => "USER",
    }
}

scpi_keyword! {
    /// Half-rate FIR filter type (`:OUTP<n>:FILT:HRAT:TYPE`).
    pub enum HighRateFilterType {
        /// Nyquist filter.
        Nyquist => "NYQ" | "NYQUIST",
        /// Linear interpolation.
        Linear => "LIN" | "LINEAR",
        /// Zero-order hold.
        ZeroOrderHold => "ZOH",
        /// User-defined coefficients.
        User => "USER",
    }
}

scpi_keyword! {
    /// Reference oscillator input (`:ROSC:SOUR`).
    pub enum RefClockSource {
        /// External reference input.
        External => "EXT" | "EXTERNAL",
        /// AXIe backplane clock.
        Axi => "AXI",
        /// Internal oscillator.
        Internal => "INT" | "INTERNAL",
    }
}

scpi_keyword! {
    /// External reference frequency range (`:ROSC:RANG`).
    pub enum RefClockRange {
        /// 10 MHz to 300 MHz.
        Range1 => "RANG1" | "RANGE1",
        /// 210 MHz to 17 GHz.
        Range2 => "RANG2" | "RANGE2",
    }
}

impl RefClockRange {
    /// Node used by the per-range frequency commands (`:ROSC:RNG1:FREQ`).
    pub fn node(self) -> &'static str {
        match self {
            RefClockRange::Range1 => "RNG1",
            RefClockRange::Range2 => "RNG2",
        }
    }

    /// Pick the range that covers `frequency_hz`. The ranges overlap between
    /// 210 MHz and 300 MHz; the lower range wins there.
    pub fn for_frequency(frequency_hz: f64) -> AwgResult<Self> {
        if (10e6..=300e6).contains(&frequency_hz) {
            Ok(RefClockRange::Range1)
        } else if (210e6..=17e9).contains(&frequency_hz) {
            Ok(RefClockRange::Range2)
        } else {
            Err(AwgError::invalid(format!(
                "reference frequency {frequency_hz} Hz is outside 10 MHz..17 GHz"
            )))
        }
    }
}

scpi_keyword! {
    /// Segment or scenario advancement mode.
    pub enum AdvancementMode {
        /// Advance automatically.
        Auto => "AUTO",
        /// Advance on event, repeat current segment until then.
        Conditional => "COND" | "CONDITIONAL",
        /// Play repeatedly, advance on event.
        Repeat => "REP" | "REPEAT",
        /// Play once per trigger.
        Single => "SING" | "SINGLE",
    }
}

scpi_keyword! {
    /// Waveform memory assignment (`:TRAC<n>:MMOD`).
    pub enum MemoryMode {
        /// Internal memory.
        Internal => "INT" | "INTERNAL",
        /// Extended memory.
        Extended => "EXT" | "EXTENDED",
        /// No memory assigned.
        Unassigned => "NONE",
    }
}

scpi_keyword! {
    /// Resampling applied on waveform import (`:TRAC<n>:IMP:RES`).
    pub enum ResampleMode {
        /// Use the timing stored in the file.
        Timing => "TIM" | "TIMING",
        /// Keep sample rate.
        KeepSampleRate => "KSR",
        /// Keep waveform length.
        KeepWaveformLength => "KWL",
        /// Pad to granularity.
        Padding => "PADD" | "PADDING",
        /// Truncate to granularity.
        Truncate => "TRUN" | "TRUNCATE",
        /// Repeat until granularity is met.
        Repeat => "REP" | "REPEAT",
    }
}

scpi_keyword! {
    /// File format of an imported waveform.
    pub enum ImportFileType {
        /// Text, one sample per line.
        Txt => "TXT",
        /// 16-bit binary.
        Bin => "BIN",
        /// 8-bit binary.
        Bin8 => "BIN8",
        /// Interleaved I/Q binary.
        IqBin => "IQBIN",
        /// M8190-compatible binary.
        Bin6030 => "BIN6030",
        /// 81150-compatible binary.
        Bin5110 => "BIN5110",
        /// Licensed (encrypted) waveform.
        Licensed => "LIC" | "LICENSED",
        /// 89600 VSA recording.
        Mat89600 => "MAT89600",
        /// DSA90000 oscilloscope export.
        Dsa90000 => "DSA90000",
        /// Comma separated values.
        Csv => "CSV",
    }
}

scpi_keyword! {
    /// Which I/Q components to import.
    pub enum ImportDataType {
        /// In-phase only.
        IOnly => "IONL" | "IONLY",
        /// Quadrature only.
        QOnly => "QONL" | "QONLY",
        /// Both components.
        Both => "BOTH",
    }
}

scpi_keyword! {
    /// Import padding policy.
    pub enum Padding {
        /// Adjust segment length automatically.
        AutoLength => "ALEN" | "ALENGTH",
        /// Fill with a constant initialisation value.
        Fill => "FILL",
    }
}

/// One of the four AWG output channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Channel 1.
    Ch1,
    /// Channel 2.
    Ch2,
    /// Channel 3.
    Ch3,
    /// Channel 4.
    Ch4,
}

impl Channel {
    /// All channels in order.
    pub const ALL: [Channel; 4] = [Channel::Ch1, Channel::Ch2, Channel::Ch3, Channel::Ch4];

    /// Validate a raw channel index.
    pub fn new(index: i64) -> AwgResult<Self> {
        match index {
            1 => Ok(Channel::Ch1),
            2 => Ok(Channel::Ch2),
            3 => Ok(Channel::Ch3),
            4 => Ok(Channel::Ch4),
            other => Err(AwgError::invalid(format!(
                "invalid channel {other}; must be 1, 2, 3 or 4"
            ))),
        }
    }

    /// Channel number as used in command headers (`:OUTP<n>`).
    pub fn number(self) -> u8 {
        match self {
            Channel::Ch1 => 1,
            Channel::Ch2 => 2,
            Channel::Ch3 => 3,
            Channel::Ch4 => 4,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Conversion into a validated [`Channel`].
///
/// Implemented for `Channel` itself and for the integer types callers usually
/// carry channel numbers in, so `awg.output().set_state(5, true)` fails with
/// `InvalidParameter` instead of reaching the instrument.
pub trait IntoChannel {
    /// Validate and convert.
    fn into_channel(self) -> AwgResult<Channel>;
}

impl IntoChannel for Channel {
    fn into_channel(self) -> AwgResult<Channel> {
        Ok(self)
    }
}

macro_rules! into_channel_int {
    ($($t:ty),+) => {
        $(
            impl IntoChannel for $t {
                fn into_channel(self) -> AwgResult<Channel> {
                    i64::try_from(self)
                        .map_err(|_| AwgError::invalid(format!("invalid channel {self}; must be 1, 2, 3 or 4")))
                        .and_then(Channel::new)
                }
            }
        )+
    };
}

into_channel_int!(u8, u16, u32, u64, usize, i8, i16, i32, i64);

/// Numeric parameter that also accepts the SCPI `MIN`, `MAX` and `DEF` keywords.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Setting<T> {
    /// Explicit value.
    Value(T),
    /// `MIN`
    Min,
    /// `MAX`
    Max,
    /// `DEF`
    Default,
}

impl<T: fmt::Display> Setting<T> {
    /// Argument text as sent to the instrument.
    pub fn to_scpi(&self) -> String {
        match self {
            Setting::Value(v) => v.to_string(),
            Setting::Min => "MIN".to_string(),
            Setting::Max => "MAX".to_string(),
            Setting::Default => "DEF".to_string(),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Setting<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_scpi())
    }
}

impl<T> Setting<T> {
    /// Run `check` on an explicit value; keywords always pass.
    pub fn check(&self, check: impl FnOnce(&T) -> AwgResult<()>) -> AwgResult<()> {
        match self {
            Setting::Value(v) => check(v),
            _ => Ok(()),
        }
    }

    /// `MIN` or `MAX` keyword.
    pub fn limit(limit: Limit) -> Self {
        match limit {
            Limit::Min => Setting::Min,
            Limit::Max => Setting::Max,
        }
    }

    /// Reject `DEF` for commands that only accept `MIN`/`MAX`.
    pub fn reject_default(&self, command: &str) -> AwgResult<()> {
        match self {
            Setting::Default => Err(AwgError::invalid(format!(
                "{command} does not accept DEF"
            ))),
            _ => Ok(()),
        }
    }
}

impl<T> From<T> for Setting<T> {
    fn from(value: T) -> Self {
        Setting::Value(value)
    }
}

/// SCPI boolean argument.
pub fn on_off(state: bool) -> &'static str {
    if state {
        "ON"
    } else {
        "OFF"
    }
}

/// Parse a SCPI boolean reply (`1`/`0`, `ON`/`OFF`).
pub fn parse_bool(reply: &str) -> Option<bool> {
    match reply.trim().to_ascii_uppercase().as_str() {
        "1" | "ON" | "TRUE" => Some(true),
        "0" | "OFF" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Quote a string argument, doubling embedded quotes.
pub fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_parse_short_and_long_forms() {
        assert_eq!("NORM".parse::<ByteOrder>().unwrap(), ByteOrder::Normal);
        assert_eq!("swapped".parse::<ByteOrder>().unwrap(), ByteOrder::Swapped);
        assert_eq!(" EITH\n".parse::<TriggerSlope>().unwrap(), TriggerSlope::Either);
        assert_eq!("\"INT\"".parse::<MemoryMode>().unwrap(), MemoryMode::Internal);
        assert!("SIDEWAYS".parse::<TriggerSlope>().is_err());
    }

    #[test]
    fn keywords_round_trip_through_mnemonic() {
        for mode in DacMode::ALL {
            assert_eq!(mode.as_scpi().parse::<DacMode>().unwrap(), *mode);
        }
        for ft in ImportFileType::ALL {
            assert_eq!(ft.to_string().parse::<ImportFileType>().unwrap(), *ft);
        }
    }

    #[test]
    fn channel_rejects_out_of_range() {
        assert_eq!(3u8.into_channel().unwrap(), Channel::Ch3);
        assert!(0u8.into_channel().is_err());
        assert!(5i32.into_channel().is_err());
        assert!((-1i32).into_channel().is_err());
        assert!(u64::MAX.into_channel().is_err());
        assert_eq!(Channel::Ch4.to_string(), "4");
    }

    #[test]
    fn setting_formats_keywords() {
        assert_eq!(Setting::Value(0.5).to_scpi(), "0.5");
        assert_eq!(Setting::<f64>::Min.to_scpi(), "MIN");
        assert_eq!(Setting::<f64>::Max.to_scpi(), "MAX");
        assert_eq!(Setting::<f64>::Default.to_scpi(), "DEF");
        assert_eq!(Setting::<u32>::limit(Limit::Max), Setting::Max);
        assert_eq!(Setting::from(7u32), Setting::Value(7));
    }

    #[test]
    fn setting_check_skips_keywords() {
        let too_big = |v: &f64| {
            if *v > 1.0 {
                Err(AwgError::invalid("too big"))
            } else {
                Ok(())
            }
        };
        assert!(Setting::Value(2.0).check(too_big).is_err());
        assert!(Setting::<f64>::Max.check(too_big).is_ok());
    }

    #[test]
    fn reference_range_selection() {
        assert_eq!(
            RefClockRange::for_frequency(100e6).unwrap(),
            RefClockRange::Range1
        );
        assert_eq!(
            RefClockRange::for_frequency(250e6).unwrap(),
            RefClockRange::Range1
        );
        assert_eq!(
            RefClockRange::for_frequency(1e9).unwrap(),
            RefClockRange::Range2
        );
        assert!(RefClockRange::for_frequency(1e6).is_err());
        assert!(RefClockRange::for_frequency(20e9).is_err());
        assert_eq!(RefClockRange::Range2.node(), "RNG2");
    }

    #[test]
    fn bool_replies() {
        assert_eq!(parse_bool("1\n"), Some(true));
        assert_eq!(parse_bool("OFF"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
        assert_eq!(on_off(true), "ON");
    }

    #[test]
    fn quoting_doubles_embedded_quotes() {
        assert_eq!(quoted(r"C:\a.bin"), r#""C:\a.bin""#);
        assert_eq!(quoted("say \"hi\""), "\"say \"\"hi\"\"\"");
    }
}
