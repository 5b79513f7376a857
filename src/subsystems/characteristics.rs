//! Channel frequency and phase response (`:CHARacteristics<ch>?`).

use std::str::FromStr;

use super::subsystem;
use crate::dispatcher::{Rejected, Timed};
use crate::error::{AwgError, AwgResult};
use crate::session::Session;
use crate::types::IntoChannel;
use crate::validation;

/// One point of a frequency response.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResponsePoint {
    /// Frequency in Hz
    pub frequency: f64,
    /// Linear magnitude
    pub magnitude: f64,
    /// Phase in radians
    pub phase: f64,
}

/// Parsed `:CHAR?` reply.
#[derive(Debug, Clone, PartialEq)]
pub enum FrequencyResponse {
    /// Frequency / magnitude / phase triplets.
    Points(Vec<ResponsePoint>),
    /// Reply that was not a whole number of numeric triplets, kept verbatim.
    Raw(String),
}

impl FrequencyResponse {
    /// Parse a comma separated triplet list, falling back to [`FrequencyResponse::Raw`].
    pub fn parse(reply: &str) -> Self {
        let reply = reply.trim();
        let values: Result<Vec<f64>, _> = reply.split(',').map(|v| v.trim().parse::<f64>()).collect();
        match values {
            Ok(values) if !values.is_empty() && values.len() % 3 == 0 => FrequencyResponse::Points(
                values
                    .chunks_exact(3)
                    .map(|p| ResponsePoint {
                        frequency: p[0],
                        magnitude: p[1],
                        phase: p[2],
                    })
                    .collect(),
            ),
            _ => FrequencyResponse::Raw(reply.to_string()),
        }
    }

    /// Points, if the reply parsed.
    pub fn points(&self) -> Option<&[ResponsePoint]> {
        match self {
            FrequencyResponse::Points(p) => Some(p),
            FrequencyResponse::Raw(_) => None,
        }
    }
}

impl FromStr for FrequencyResponse {
    type Err = AwgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FrequencyResponse::parse(s))
    }
}

subsystem! {
    /// `:CHAR` subsystem.
    Characteristics
}

impl<S: Session> Characteristics<'_, S> {
    /// `:CHAR<ch>? [amplitude[,sample_frequency]]`.
    ///
    /// A sample frequency is only meaningful together with an amplitude;
    /// passing one without the other is rejected.
    pub fn response(
        &mut self,
        channel: impl IntoChannel,
        amplitude: Option<f64>,
        sample_frequency: Option<f64>,
    ) -> AwgResult<Timed<FrequencyResponse>> {
        let channel = channel.into_channel().rejected()?;
        let command = match (amplitude, sample_frequency) {
            (None, None) => format!(":CHAR{channel}?"),
            (Some(a), None) => {
                validation::is_finite("amplitude", a).rejected()?;
                format!(":CHAR{channel}? {a}")
            }
            (Some(a), Some(f)) => {
                validation::is_finite("amplitude", a).rejected()?;
                validation::is_finite("sample frequency", f).rejected()?;
                format!(":CHAR{channel}? {a},{f}")
            }
            (None, Some(_)) => {
                return Err(AwgError::invalid(
                    "sample frequency requires an amplitude",
                ))
                .rejected()
            }
        };
        Ok(self.d.query(&command)?.map(|reply| FrequencyResponse::parse(&reply)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MockSession;
    use crate::subsystems::mock_dispatcher;

    #[test]
    fn triplets_parse_into_points() {
        let resp = FrequencyResponse::parse("1e6,0.99,-0.01,2e6,0.98,-0.02\n");
        let points = resp.points().unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].frequency, 2e6);
        assert_eq!(points[1].phase, -0.02);
    }

    #[test]
    fn malformed_reply_is_kept_raw() {
        assert_eq!(
            FrequencyResponse::parse("1e6,0.99"),
            FrequencyResponse::Raw("1e6,0.99".into())
        );
        assert!(matches!(
            FrequencyResponse::parse("a,b,c"),
            FrequencyResponse::Raw(_)
        ));
    }

    #[test]
    fn optional_arguments_build_command() {
        let mock = MockSession::new()
            .with_reply(":CHAR1?", "1,1,0")
            .with_reply(":CHAR2? 0.5", "1,1,0")
            .with_reply(":CHAR3? 0.5,12000000000", "1,1,0");
        let mut d = mock_dispatcher(&mock);
        let mut chr = Characteristics::new(&mut d);
        chr.response(1, None, None).unwrap();
        chr.response(2, Some(0.5), None).unwrap();
        chr.response(3, Some(0.5), Some(12e9)).unwrap();
        assert!(chr.response(4, None, Some(12e9)).is_err());
        assert_eq!(mock.queries().len(), 3);
    }
}
