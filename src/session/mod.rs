//! Instrument sessions.
//!
//! A [`Session`] is the transport the command layer talks through: ASCII
//! commands and replies with a line terminator, raw byte transfer for
//! definite-length blocks, and a configurable timeout. Everything is
//! synchronous and blocking; one request is in flight at a time.
//!
//! Implementations:
//! - [`TcpSession`]: raw SCPI socket (TCP port 5025)
//! - [`VisaSession`]: VISA resource via `visa-rs` (feature `instrument_visa`)
//! - [`MockSession`]: scripted replies for tests

use std::io::{self, Read};
use std::time::Duration;

use crate::block;
use crate::config::{ConnectionConfig, Protocol};
use crate::error::{AwgResult, BlockError};

pub mod mock;
pub mod resource;
pub mod tcp;
pub mod visa;

pub use mock::{MockCall, MockSession};
pub use tcp::TcpSession;
pub use visa::VisaSession;

/// Transport contract required by the dispatcher.
pub trait Session: Send {
    /// Send one command; the session appends its line terminator.
    fn write(&mut self, command: &str) -> io::Result<()>;

    /// Send one command and read a single reply line (terminator removed).
    fn query(&mut self, command: &str) -> io::Result<String>;

    /// Send bytes verbatim.
    fn write_raw(&mut self, data: &[u8]) -> io::Result<()>;

    /// Read one complete response message as raw bytes.
    ///
    /// Block responses are returned from the `#` through the payload end,
    /// plus whatever terminator followed.
    fn read_raw(&mut self) -> io::Result<Vec<u8>>;

    /// Change the I/O timeout.
    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()>;

    /// Release the connection. Further I/O fails.
    fn close(&mut self) -> io::Result<()>;

    /// Resource string identifying the instrument.
    fn resource_name(&self) -> &str;
}

impl<S: Session + ?Sized> Session for Box<S> {
    fn write(&mut self, command: &str) -> io::Result<()> {
        (**self).write(command)
    }

    fn query(&mut self, command: &str) -> io::Result<String> {
        (**self).query(command)
    }

    fn write_raw(&mut self, data: &[u8]) -> io::Result<()> {
        (**self).write_raw(data)
    }

    fn read_raw(&mut self) -> io::Result<Vec<u8>> {
        (**self).read_raw()
    }

    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        (**self).set_timeout(timeout)
    }

    fn close(&mut self) -> io::Result<()> {
        (**self).close()
    }

    fn resource_name(&self) -> &str {
        (**self).resource_name()
    }
}

/// Open the session described by `config`.
pub fn open(config: &ConnectionConfig) -> AwgResult<Box<dyn Session>> {
    match config.protocol {
        Protocol::Socket => {
            let session = TcpSession::connect(&config.address, config.port, config.timeout())?
                .with_terminator(config.terminator.clone());
            Ok(Box::new(session))
        }
        Protocol::Visa => {
            let session = VisaSession::open(&resource_string(config), config.timeout())?
                .with_terminator(config.terminator.clone());
            Ok(Box::new(session))
        }
    }
}

/// VISA-style resource string for the configured protocol.
pub fn resource_string(config: &ConnectionConfig) -> String {
    match config.protocol {
        Protocol::Socket => resource::visa_socket(&config.address, config.port),
        Protocol::Visa => resource::visa_instr(&config.address),
    }
}

/// Read one response message from `reader`.
///
/// A reply starting with `#` is read until the declared payload and a
/// following `delimiter` byte have arrived, so a payload containing the
/// delimiter does not end the read early. Any other reply ends at the first
/// `delimiter`.
pub(crate) fn read_message<R: Read + ?Sized>(reader: &mut R, delimiter: u8) -> io::Result<Vec<u8>> {
    let mut message = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed before end of response",
            ));
        }
        message.extend_from_slice(&chunk[..n]);
        if is_complete(&message, delimiter)? {
            return Ok(message);
        }
    }
}

fn is_complete(message: &[u8], delimiter: u8) -> io::Result<bool> {
    if message.first() != Some(&b'#') {
        return Ok(message.last() == Some(&delimiter));
    }
    if message.len() < 2 {
        return Ok(false);
    }
    match block::parse_header(message) {
        Ok(header) => Ok(message.len() > header.data_end() && message.last() == Some(&delimiter)),
        Err(BlockError::Truncated { .. }) => Ok(false),
        Err(e) => Err(io::Error::new(io::ErrorKind::InvalidData, e)),
    }
}

/// Remove one trailing terminator (and any stray CR/LF) from a reply.
pub(crate) fn strip_terminator(mut reply: Vec<u8>) -> String {
    while matches!(reply.last(), Some(b'\n') | Some(b'\r')) {
        reply.pop();
    }
    String::from_utf8_lossy(&reply).into_owned()
}

/// Last byte of a terminator string; replies are split on it.
pub(crate) fn delimiter_of(terminator: &str) -> u8 {
    terminator.as_bytes().last().copied().unwrap_or(b'\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn resource_string_follows_protocol() {
        let mut config = ConnectionConfig::default();
        config.address = "10.0.0.7".to_string();
        assert_eq!(resource_string(&config), "TCPIP0::10.0.0.7::5025::SOCKET");
        config.protocol = Protocol::Visa;
        assert_eq!(resource_string(&config), "TCPIP0::10.0.0.7::inst0::INSTR");
    }

    /// Reader that hands out at most `step` bytes per call.
    struct Trickle {
        data: Cursor<Vec<u8>>,
        step: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let len = buf.len().min(self.step);
            self.data.read(&mut buf[..len])
        }
    }

    fn trickle(data: &[u8], step: usize) -> Trickle {
        Trickle {
            data: Cursor::new(data.to_vec()),
            step,
        }
    }

    #[test]
    fn line_reply_ends_at_delimiter() {
        let mut r = trickle(b"1\n", 1);
        assert_eq!(read_message(&mut r, b'\n').unwrap(), b"1\n");
    }

    #[test]
    fn block_with_embedded_newlines_is_read_whole() {
        let mut r = trickle(b"#16a\nb\nc\n\n", 3);
        let raw = read_message(&mut r, b'\n').unwrap();
        assert_eq!(raw, b"#16a\nb\nc\n\n");
        assert_eq!(block::decode(&raw).unwrap(), b"a\nb\nc\n");
    }

    #[test]
    fn malformed_block_header_is_invalid_data() {
        let mut r = trickle(b"#x12\n", 8);
        let err = read_message(&mut r, b'\n').unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn eof_mid_reply_is_an_error() {
        let mut r = trickle(b"#15ab", 8);
        let err = read_message(&mut r, b'\n').unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn terminator_stripping() {
        assert_eq!(strip_terminator(b"ARB\r\n".to_vec()), "ARB");
        assert_eq!(delimiter_of("\r\n"), b'\n');
        assert_eq!(delimiter_of(""), b'\n');
    }
}
