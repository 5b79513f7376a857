//! IEEE-488.2 common commands (`*IDN?`, `*RST`, status bytes, ...).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;

use super::{fields, subsystem};
use crate::dispatcher::{SetOutcome, Timed};
use crate::error::{AwgError, AwgResult};
use crate::session::Session;

/// Parsed `*IDN?` reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Manufacturer, e.g. `Keysight Technologies`
    pub manufacturer: String,
    /// Model number, e.g. `M8190A`
    pub model: String,
    /// Serial number
    pub serial: String,
    /// Firmware revision
    pub firmware: String,
}

impl FromStr for Identity {
    type Err = AwgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().splitn(4, ',').map(str::trim).collect();
        match parts.as_slice() {
            [manufacturer, model, serial, firmware] => Ok(Identity {
                manufacturer: manufacturer.to_string(),
                model: model.to_string(),
                serial: serial.to_string(),
                firmware: firmware.to_string(),
            }),
            _ => Err(AwgError::unexpected("*IDN?", s)),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.manufacturer, self.model, self.serial, self.firmware
        )
    }
}

subsystem! {
    /// IEEE-488.2 common commands.
    Common
}

impl<S: Session> Common<'_, S> {
    /// `*IDN?`
    pub fn identify(&mut self) -> AwgResult<Timed<Identity>> {
        self.d.query("*IDN?")?.try_map(|reply| reply.parse())
    }

    /// `*CLS`: clear the event registers and the error queue.
    pub fn clear_status(&mut self) -> AwgResult<Duration> {
        self.d.write("*CLS", "Status cleared")
    }

    /// `*ESE`: set the standard event status enable mask.
    pub fn set_event_status_enable(&mut self, mask: u8) -> AwgResult<SetOutcome> {
        self.d.set_value("*ESE", mask)
    }

    /// `*ESE?`
    pub fn event_status_enable(&mut self) -> AwgResult<Timed<u8>> {
        self.d.query_as("*ESE?")
    }

    /// `*ESR?`: read and clear the standard event status register.
    pub fn event_status_register(&mut self) -> AwgResult<Timed<u8>> {
        self.d.query_as("*ESR?")
    }

    /// `*OPC`: set the OPC bit once pending operations finish.
    pub fn operation_complete(&mut self) -> AwgResult<Duration> {
        self.d.write("*OPC", "OK")
    }

    /// `*OPC?`: blocks until pending operations finish.
    pub fn query_operation_complete(&mut self) -> AwgResult<Timed<bool>> {
        self.d.query_bool("*OPC?")
    }

    /// `*OPT?`: installed option codes.
    pub fn options(&mut self) -> AwgResult<Timed<Vec<String>>> {
        Ok(self
            .d
            .query("*OPT?")?
            .map(|reply| fields(&reply).map(str::to_string).collect()))
    }

    /// `*RST`
    pub fn reset(&mut self) -> AwgResult<Duration> {
        self.d.write("*RST", "Instrument reset")
    }

    /// `*SRE`: set the service request enable mask. Bit 6 is ignored by the
    /// instrument.
    pub fn set_service_request_enable(&mut self, mask: u8) -> AwgResult<SetOutcome> {
        self.d.set_value("*SRE", mask)
    }

    /// `*SRE?`
    pub fn service_request_enable(&mut self) -> AwgResult<Timed<u8>> {
        self.d.query_as("*SRE?")
    }

    /// `*STB?`
    pub fn status_byte(&mut self) -> AwgResult<Timed<u8>> {
        self.d.query_as("*STB?")
    }

    /// `*TST?`: run the self test. Zero means passed.
    pub fn self_test(&mut self) -> AwgResult<Timed<i32>> {
        self.d.query_as("*TST?")
    }

    /// `*LRN?`: complete instrument setup as a binary block.
    pub fn learn(&mut self) -> AwgResult<Timed<Bytes>> {
        self.d.query_block("*LRN?")
    }

    /// `*WAI`
    pub fn wait(&mut self) -> AwgResult<Duration> {
        self.d.write("*WAI", "OK")
    }
}
