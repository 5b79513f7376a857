//! Raw SCPI socket session.
//!
//! Keysight AWGs accept SCPI on TCP port 5025 without any VISA layer. Commands
//! are written with the configured terminator; replies are read until the
//! terminator, or until a full definite-length block and its terminator have
//! arrived.

use std::io::{self, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::time::Duration;

use super::{delimiter_of, read_message, resource, strip_terminator, Session};

/// Default SCPI socket port
pub const DEFAULT_PORT: u16 = 5025;

/// Blocking SCPI client over a TCP socket
#[derive(Debug)]
pub struct TcpSession {
    stream: TcpStream,
    resource: String,
    terminator: String,
    closed: bool,
}

impl TcpSession {
    /// Connect to `host:port`.
    ///
    /// # Arguments
    /// * `host` - Hostname or IP address
    /// * `port` - TCP port (typically 5025)
    /// * `timeout` - Used for the connect attempt and for every read and write
    ///
    /// # Returns
    /// * `Ok(TcpSession)` on successful connection
    /// * `Err` if the address does not resolve or the connection fails
    pub fn connect(host: &str, port: u16, timeout: Duration) -> io::Result<Self> {
        let addr = (host, port).to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("address {host}:{port} did not resolve"),
            )
        })?;

        let stream = TcpStream::connect_timeout(&addr, timeout)?;
        stream.set_read_timeout(Some(timeout))?;
        stream.set_write_timeout(Some(timeout))?;
        // Disable Nagle's algorithm; commands are small and latency-bound
        stream.set_nodelay(true)?;

        tracing::info!("Connected to SCPI socket at {}", addr);

        Ok(Self {
            stream,
            resource: resource::visa_socket(host, port),
            terminator: "\n".to_string(),
            closed: false,
        })
    }

    /// Set the line terminator appended to commands.
    pub fn with_terminator(mut self, terminator: impl Into<String>) -> Self {
        self.terminator = terminator.into();
        self
    }

    fn ensure_open(&self) -> io::Result<()> {
        if self.closed {
            Err(io::Error::new(io::ErrorKind::NotConnected, "session closed"))
        } else {
            Ok(())
        }
    }
}

impl Session for TcpSession {
    fn write(&mut self, command: &str) -> io::Result<()> {
        self.ensure_open()?;
        tracing::debug!("SCPI write: {:?}", command);
        let line = format!("{}{}", command, self.terminator);
        self.stream.write_all(line.as_bytes())?;
        self.stream.flush()
    }

    fn query(&mut self, command: &str) -> io::Result<String> {
        self.write(command)?;
        let reply = strip_terminator(read_message(
            &mut self.stream,
            delimiter_of(&self.terminator),
        )?);
        tracing::debug!("SCPI response: {:?}", reply);
        Ok(reply)
    }

    fn write_raw(&mut self, data: &[u8]) -> io::Result<()> {
        self.ensure_open()?;
        tracing::debug!("SCPI raw write: {} bytes", data.len());
        self.stream.write_all(data)?;
        self.stream.flush()
    }

    fn read_raw(&mut self) -> io::Result<Vec<u8>> {
        self.ensure_open()?;
        let raw = read_message(&mut self.stream, delimiter_of(&self.terminator))?;
        tracing::debug!("SCPI raw read: {} bytes", raw.len());
        Ok(raw)
    }

    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.stream.set_read_timeout(Some(timeout))?;
        self.stream.set_write_timeout(Some(timeout))
    }

    fn close(&mut self) -> io::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        match self.stream.shutdown(Shutdown::Both) {
            // Peer already gone
            Err(e) if e.kind() == io::ErrorKind::NotConnected => Ok(()),
            other => other,
        }
    }

    fn resource_name(&self) -> &str {
        &self.resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block;
    use std::io::{BufRead, BufReader, Read};
    use std::net::TcpListener;
    use std::thread;

    /// Spawn a one-connection fake instrument. `handler` gets the accepted
    /// stream and returns the lines it received.
    fn fake_instrument<F>(handler: F) -> (u16, thread::JoinHandle<Vec<String>>)
    where
        F: FnOnce(TcpStream) -> Vec<String> + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            handler(stream)
        });
        (port, handle)
    }

    #[test]
    fn test_write_and_query() {
        let (port, handle) = fake_instrument(|stream| {
            let mut writer = stream.try_clone().unwrap();
            let mut reader = BufReader::new(stream);
            let mut seen = Vec::new();
            for _ in 0..2 {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line.trim_end() == "*IDN?" {
                    writer
                        .write_all(b"Keysight Technologies,M8195A,MY1234,4.0\n")
                        .unwrap();
                }
                seen.push(line);
            }
            seen
        });

        let mut session =
            TcpSession::connect("127.0.0.1", port, Duration::from_secs(2)).unwrap();
        session.write(":OUTP1 ON").unwrap();
        let idn = session.query("*IDN?").unwrap();
        assert_eq!(idn, "Keysight Technologies,M8195A,MY1234,4.0");
        session.close().unwrap();

        let seen = handle.join().unwrap();
        assert_eq!(seen, vec![":OUTP1 ON\n".to_string(), "*IDN?\n".to_string()]);
    }

    #[test]
    fn test_read_raw_block_split_across_segments() {
        let payload: Vec<u8> = (0u8..=255).cycle().take(5000).collect();
        let encoded = block::encode(&payload).unwrap();
        let (port, handle) = fake_instrument(move |mut stream| {
            let mut buf = [0u8; 64];
            let n = stream.read(&mut buf).unwrap();
            for piece in encoded.chunks(700) {
                stream.write_all(piece).unwrap();
                stream.flush().unwrap();
            }
            stream.write_all(b"\n").unwrap();
            vec![String::from_utf8_lossy(&buf[..n]).into_owned()]
        });

        let mut session =
            TcpSession::connect("127.0.0.1", port, Duration::from_secs(2)).unwrap();
        session.write(":MMEM:DATA? \"a.bin\"").unwrap();
        let raw = session.read_raw().unwrap();
        assert_eq!(block::decode(&raw).unwrap(), payload.as_slice());

        let seen = handle.join().unwrap();
        assert_eq!(seen[0], ":MMEM:DATA? \"a.bin\"\n");
    }

    #[test]
    fn test_closed_session_rejects_io() {
        let (port, handle) = fake_instrument(|_stream| Vec::new());
        let mut session =
            TcpSession::connect("127.0.0.1", port, Duration::from_secs(2)).unwrap();
        assert_eq!(session.resource_name(), format!("TCPIP0::127.0.0.1::{port}::SOCKET"));
        session.close().unwrap();
        let err = session.write("*RST").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);
        handle.join().unwrap();
    }

    #[test]
    fn test_connect_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        assert!(TcpSession::connect("127.0.0.1", port, Duration::from_millis(500)).is_err());
    }
}
