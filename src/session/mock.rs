//! Mock session for testing
//!
//! Lets the command layer run without hardware. It provides:
//! - Scripted replies per query string, plus a FIFO of raw replies
//! - A call log of everything sent
//! - One-shot failure injection
//!
//! Clones share state, so a test can keep a handle after moving the session
//! into an [`crate::Awg`].

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::Session;

/// One interaction recorded by [`MockSession`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// `write`
    Write(String),
    /// `query`
    Query(String),
    /// `write_raw`
    WriteRaw(Vec<u8>),
    /// `read_raw`
    ReadRaw,
    /// `set_timeout`
    SetTimeout(Duration),
    /// `close`
    Close,
}

#[derive(Debug, Default)]
struct MockState {
    replies: HashMap<String, VecDeque<String>>,
    raw_replies: VecDeque<Vec<u8>>,
    calls: Vec<MockCall>,
    fail_next: Option<String>,
    closed: bool,
}

/// Scripted in-memory session
///
/// # Example
///
/// ```
/// use awg_scpi::session::{MockSession, Session};
///
/// let mut session = MockSession::new().with_reply("*IDN?", "Keysight,M8195A,0,1");
/// assert_eq!(session.query("*IDN?").unwrap(), "Keysight,M8195A,0,1");
/// assert_eq!(session.queries(), vec!["*IDN?".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct MockSession {
    resource: String,
    state: Arc<Mutex<MockState>>,
}

impl MockSession {
    /// Create a mock with no scripted replies
    pub fn new() -> Self {
        Self {
            resource: "MOCK::AWG::INSTR".to_string(),
            state: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Builder form of [`MockSession::push_reply`]
    pub fn with_reply(self, query: &str, reply: &str) -> Self {
        self.push_reply(query, reply);
        self
    }

    /// Queue `reply` for `query`. Replies for the same query are returned in
    /// order; the last one keeps being returned once the queue is drained.
    pub fn push_reply(&self, query: &str, reply: &str) {
        self.lock()
            .replies
            .entry(query.to_string())
            .or_default()
            .push_back(reply.to_string());
    }

    /// Queue a raw reply for the next `read_raw`
    pub fn push_raw_reply(&self, raw: impl Into<Vec<u8>>) {
        self.lock().raw_replies.push_back(raw.into());
    }

    /// Fail the next operation with `message`
    pub fn trigger_failure(&self, message: &str) {
        self.lock().fail_next = Some(message.to_string());
    }

    /// Every call so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    /// Commands passed to `write`
    pub fn writes(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                MockCall::Write(cmd) => Some(cmd.clone()),
                _ => None,
            })
            .collect()
    }

    /// Commands passed to `query`
    pub fn queries(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                MockCall::Query(cmd) => Some(cmd.clone()),
                _ => None,
            })
            .collect()
    }

    /// Payloads passed to `write_raw`
    pub fn raw_writes(&self) -> Vec<Vec<u8>> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                MockCall::WriteRaw(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of transmissions (writes, queries and raw writes)
    pub fn transmissions(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| {
                matches!(
                    c,
                    MockCall::Write(_) | MockCall::Query(_) | MockCall::WriteRaw(_)
                )
            })
            .count()
    }

    /// Clear the call log
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Whether `close` was called
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the log from other assertions
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, call: MockCall) -> io::Result<MutexGuard<'_, MockState>> {
        let mut state = self.lock();
        state.calls.push(call);
        if state.closed {
            return Err(io::Error::new(io::ErrorKind::NotConnected, "session closed"));
        }
        if let Some(message) = state.fail_next.take() {
            return Err(io::Error::other(message));
        }
        Ok(state)
    }
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

impl Session for MockSession {
    fn write(&mut self, command: &str) -> io::Result<()> {
        self.begin(MockCall::Write(command.to_string()))?;
        Ok(())
    }

    fn query(&mut self, command: &str) -> io::Result<String> {
        let mut state = self.begin(MockCall::Query(command.to_string()))?;
        let queue = state.replies.get_mut(command).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::TimedOut,
                format!("no scripted reply for {command:?}"),
            )
        })?;
        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        reply.ok_or_else(|| io::Error::new(io::ErrorKind::TimedOut, "empty reply queue"))
    }

    fn write_raw(&mut self, data: &[u8]) -> io::Result<()> {
        self.begin(MockCall::WriteRaw(data.to_vec()))?;
        Ok(())
    }

    fn read_raw(&mut self) -> io::Result<Vec<u8>> {
        let mut state = self.begin(MockCall::ReadRaw)?;
        state
            .raw_replies
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::TimedOut, "no scripted raw reply"))
    }

    fn set_timeout(&mut self, timeout: Duration) -> io::Result<()> {
        self.begin(MockCall::SetTimeout(timeout))?;
        Ok(())
    }

    fn close(&mut self) -> io::Result<()> {
        let mut state = self.lock();
        state.calls.push(MockCall::Close);
        state.closed = true;
        Ok(())
    }

    fn resource_name(&self) -> &str {
        &self.resource
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_queue_keeps_last() {
        let mut session = MockSession::new();
        session.push_reply(":OUTP1?", "0");
        session.push_reply(":OUTP1?", "1");

        assert_eq!(session.query(":OUTP1?").unwrap(), "0");
        assert_eq!(session.query(":OUTP1?").unwrap(), "1");
        assert_eq!(session.query(":OUTP1?").unwrap(), "1");
    }

    #[test]
    fn test_unscripted_query_fails() {
        let mut session = MockSession::new();
        let err = session.query(":FUNC:MODE?").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }

    #[test]
    fn test_failure_is_one_shot() {
        let mut session = MockSession::new();
        session.trigger_failure("link down");
        assert_eq!(session.write("*CLS").unwrap_err().to_string(), "link down");
        assert!(session.write("*CLS").is_ok());
        assert_eq!(session.writes(), vec!["*CLS", "*CLS"]);
    }

    #[test]
    fn test_clones_share_call_log() {
        let handle = MockSession::new();
        let mut session = handle.clone();
        session.write_raw(b"#12ab").unwrap();
        session.close().unwrap();

        assert_eq!(handle.raw_writes(), vec![b"#12ab".to_vec()]);
        assert!(handle.is_closed());
        assert_eq!(handle.transmissions(), 1);
        assert!(session.write("*RST").is_err());
    }

    #[test]
    fn test_raw_replies_are_fifo() {
        let mut session = MockSession::new();
        session.push_raw_reply(b"#11a\n".to_vec());
        session.push_raw_reply(b"#11b\n".to_vec());
        assert_eq!(session.read_raw().unwrap(), b"#11a\n");
        assert_eq!(session.read_raw().unwrap(), b"#11b\n");
        assert!(session.read_raw().is_err());
        session.clear_calls();
        assert!(session.calls().is_empty());
    }
}
