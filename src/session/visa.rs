//! VISA session for LAN/USB/GPIB instruments.
//!
//! Wraps `visa-rs` when the `instrument_visa` feature is enabled. Without the
//! feature, [`VisaSession::open`] returns `AwgError::FeatureNotEnabled` so
//! callers can fall back to a [`super::TcpSession`].
//!
//! Supports resource strings like:
//! - "TCPIP0::192.168.1.50::inst0::INSTR" (VXI-11)
//! - "TCPIP0::192.168.1.50::hislip0::INSTR" (HiSLIP)
//! - "TCPIP0::192.168.1.50::5025::SOCKET" (raw socket through VISA)

#[cfg(feature = "instrument_visa")]
mod imp {
    use std::ffi::CString;
    use std::io::{self, Write};
    use std::time::Duration;

    use visa_rs::prelude::*;

    use crate::error::{AwgError, AwgResult};
    use crate::session::{delimiter_of, read_message, strip_terminator, Session};

    /// VISA-backed session
    pub struct VisaSession {
        // Declared before the resource manager so it is dropped first
        instr: Option<Instrument>,
        _rm: DefaultRM,
        resource: String,
        terminator: String,
        timeout: Duration,
    }

    fn visa_err(e: visa_rs::Error) -> io::Error {
        io::Error::other(e.to_string())
    }

    impl VisaSession {
        /// Open `resource` with the default resource manager.
        ///
        /// # Arguments
        /// * `resource` - VISA resource identifier (e.g., "TCPIP0::10.0.0.7::inst0::INSTR")
        /// * `timeout` - I/O timeout applied to the opened session
        pub fn open(resource: &str, timeout: Duration) -> AwgResult<Self> {
            let rm = DefaultRM::new().map_err(|e| AwgError::Io(visa_err(e)))?;
            let c_string = CString::new(resource)
                .map_err(|e| AwgError::invalid(format!("resource string: {e}")))?;
            let visa_string = visa_rs::VisaString::from(c_string);
            let instr = rm
                .open(&visa_string, AccessMode::NO_LOCK, TIMEOUT_IMMEDIATE)
                .map_err(|e| AwgError::Io(visa_err(e)))?;

            let mut session = Self {
                instr: Some(instr),
                _rm: rm,
                resource: resource.to_string(),
                terminator: "\n".to_string(),
                timeout,
            };
            session.set_timeout(timeout)?;
            tracing::info!("Opened VISA resource {}", resource);
            Ok(session)
        }

        /// Set the line terminator appended to commands.
        pub fn with_terminator(mut self, terminator: impl Into<String>) -> Self {
            self.terminator = terminator.into();
            self
        }

        /// Short description for diagnostics.
        pub fn info(&self) -> String {
            format!(
                "VisaSession({} @ {}ms timeout)",
                self.resource,
                self.timeout.as_millis()
            )
        }

        fn instr(&mut self) -> io::Result<&mut Instrument> {
            self.instr
                .as_mut()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "session closed"))
        }
    }

    impl Session for VisaSession {
        fn write(&mut self, command: &str) -> io::Result<()> {
            tracing::debug!("SCPI write: {:?}", command);
            let line = format!("{}{}", command, self.terminator);
            self.instr()?.write_all(line.as_bytes())
        }

        fn query(&mut self, command: &str) -> io::Result<String> {
            self.write(command)?;
            let delimiter = delimiter_of(&self.terminator);
            let reply = strip_terminator(read_message(self.instr()?, delimiter)?);
            tracing::debug!("SCPI response: {:?}", reply);
            Ok(reply)
        }

        fn write_raw(&mut self, data: &[u8]) -> io::Result<()> {
            tracing::debug!("SCPI raw write: {} bytes", data.len());
            self.instr()?.write_all(data)
        }

        fn read_raw(&mut self) -> io::Result<Vec<u8>> {
            let delimiter = delimiter_of(&self.terminator);
            read_message(self.instr()?, delimiter)
        }

        fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
            let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
            let attr = attribute::AttrTmoValue::new_checked(millis).ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("timeout {millis} ms rejected by VISA"),
                )
            })?;
            self.instr()?.set_attr(attr).map_err(visa_err)?;
            self.timeout = timeout;
            Ok(())
        }

        fn close(&mut self) -> io::Result<()> {
            // Dropping the instrument closes the VISA session
            self.instr.take();
            Ok(())
        }

        fn resource_name(&self) -> &str {
            &self.resource
        }
    }
}

#[cfg(feature = "instrument_visa")]
pub use imp::VisaSession;

#[cfg(not(feature = "instrument_visa"))]
mod imp {
    use std::io;
    use std::time::Duration;

    use crate::error::{AwgError, AwgResult};
    use crate::session::Session;

    /// Placeholder that cannot be opened without the `instrument_visa` feature.
    #[derive(Debug)]
    pub struct VisaSession {
        resource: String,
    }

    fn disabled() -> io::Error {
        io::Error::new(
            io::ErrorKind::Unsupported,
            "VISA support not enabled. Rebuild with --features instrument_visa",
        )
    }

    impl VisaSession {
        /// Always fails with `FeatureNotEnabled`.
        pub fn open(resource: &str, _timeout: Duration) -> AwgResult<Self> {
            tracing::warn!(resource, "VISA requested but instrument_visa is not enabled");
            Err(AwgError::FeatureNotEnabled("instrument_visa".to_string()))
        }

        /// Set the line terminator appended to commands.
        pub fn with_terminator(self, _terminator: impl Into<String>) -> Self {
            self
        }
    }

    impl Session for VisaSession {
        fn write(&mut self, _command: &str) -> io::Result<()> {
            Err(disabled())
        }

        fn query(&mut self, _command: &str) -> io::Result<String> {
            Err(disabled())
        }

        fn write_raw(&mut self, _data: &[u8]) -> io::Result<()> {
            Err(disabled())
        }

        fn read_raw(&mut self) -> io::Result<Vec<u8>> {
            Err(disabled())
        }

        fn set_timeout(&mut self, _timeout: Duration) -> io::Result<()> {
            Err(disabled())
        }

        fn close(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn resource_name(&self) -> &str {
            &self.resource
        }
    }
}

#[cfg(not(feature = "instrument_visa"))]
pub use imp::VisaSession;
