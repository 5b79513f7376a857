//! Command dispatcher.
//!
//! Sits between the subsystem methods and the [`Session`]. For every command
//! it checks that a session is attached, times the exchange, writes exactly one
//! line to the [`CommandLog`] and turns transport failures into
//! `AwgError::Transport`. Nothing here panics or retries; a failed command
//! leaves the dispatcher ready for the next one.
//!
//! Logging policy:
//! - a set with confirmation logs one line carrying the confirmed value, timed
//!   over write and confirmation query
//! - block transfers log a byte count instead of the payload
//! - transport failures log a zero duration and the error text
//! - rejected parameters and missing sessions log nothing (nothing was sent);
//!   they only emit a `tracing` warning

use std::fmt::Display;
use std::io;
use std::panic::Location;
use std::str::FromStr;
use std::time::{Duration, Instant};

use bytes::Bytes;

use crate::block;
use crate::command_log::CommandLog;
use crate::error::{AwgError, AwgResult};
use crate::session::Session;
use crate::types::parse_bool;

/// Value returned by a query together with the round-trip time.
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    /// Parsed reply
    pub value: T,
    /// Time from transmission to reply
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    /// Transform the value, keeping the timing.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Timed<U> {
        Timed {
            value: f(self.value),
            elapsed: self.elapsed,
        }
    }

    /// Fallible [`Timed::map`].
    pub fn try_map<U>(self, f: impl FnOnce(T) -> AwgResult<U>) -> AwgResult<Timed<U>> {
        Ok(Timed {
            value: f(self.value)?,
            elapsed: self.elapsed,
        })
    }

    /// Elapsed time in milliseconds.
    pub fn millis(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Result of a set operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOutcome {
    /// Time spent on the write (and the confirmation query, if any)
    pub elapsed: Duration,
    /// Reply to the paired query, when confirmation is enabled
    pub confirmed: Option<String>,
}

impl SetOutcome {
    /// Parse the confirmed value, if present.
    pub fn confirmed_as<T>(&self) -> Option<T>
    where
        T: FromStr,
    {
        self.confirmed.as_deref().and_then(|c| c.parse().ok())
    }
}

/// Report a locally rejected call and pass the error on.
pub(crate) trait Rejected<T> {
    /// Emit a warning for an `Err` before returning it unchanged.
    fn rejected(self) -> AwgResult<T>;
}

impl<T, E: Into<AwgError>> Rejected<T> for Result<T, E> {
    #[track_caller]
    fn rejected(self) -> AwgResult<T> {
        let caller = Location::caller();
        self.map_err(|e| {
            let err = e.into();
            tracing::warn!(error = %err, at = %caller, "parameter rejected");
            err
        })
    }
}

/// Command dispatcher over an optional session.
#[derive(Debug)]
pub struct Dispatcher<S> {
    session: Option<S>,
    log: CommandLog,
    confirm_sets: bool,
}

impl<S: Session> Dispatcher<S> {
    /// Create a dispatcher with no session attached.
    pub fn new(log: CommandLog) -> Self {
        Self {
            session: None,
            log,
            confirm_sets: true,
        }
    }

    /// Enable or disable the confirmation query after sets.
    pub fn with_confirm_sets(mut self, enabled: bool) -> Self {
        self.confirm_sets = enabled;
        self
    }

    /// Whether sets are confirmed.
    pub fn confirm_sets(&self) -> bool {
        self.confirm_sets
    }

    /// Change the confirmation policy.
    pub fn set_confirm_sets(&mut self, enabled: bool) {
        self.confirm_sets = enabled;
    }

    /// Attach a session, replacing any previous one.
    pub fn attach(&mut self, session: S) -> Option<S> {
        self.session.replace(session)
    }

    /// Detach and return the session.
    pub fn detach(&mut self) -> Option<S> {
        self.session.take()
    }

    /// Whether a session is attached.
    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// The attached session.
    pub fn session(&self) -> Option<&S> {
        self.session.as_ref()
    }

    /// The attached session, mutably.
    pub fn session_mut(&mut self) -> Option<&mut S> {
        self.session.as_mut()
    }

    /// The command log.
    pub fn log(&self) -> &CommandLog {
        &self.log
    }

    /// Append an entry that does not correspond to a SCPI exchange
    /// (connect and disconnect bookkeeping).
    pub fn record(&mut self, command: &str, elapsed: Duration, response: &str) -> String {
        self.log.record(command, elapsed, response)
    }

    /// Send a command that has no reply. `note` becomes the log response text.
    pub fn write(&mut self, command: &str, note: &str) -> AwgResult<Duration> {
        let session = attached(&mut self.session, command)?;
        let start = Instant::now();
        if let Err(e) = session.write(command) {
            return Err(transport_failure(&mut self.log, command, e));
        }
        let elapsed = start.elapsed();
        tracing::debug!(command, elapsed_ms = millis(elapsed), "SCPI write");
        self.log.record(command, elapsed, note);
        Ok(elapsed)
    }

    /// Send a set command, then `confirm` when confirmation is enabled.
    pub fn set(&mut self, command: &str, confirm: &str) -> AwgResult<SetOutcome> {
        let session = attached(&mut self.session, command)?;
        let start = Instant::now();
        if let Err(e) = session.write(command) {
            return Err(transport_failure(&mut self.log, command, e));
        }

        if !self.confirm_sets {
            let elapsed = start.elapsed();
            tracing::debug!(command, elapsed_ms = millis(elapsed), "SCPI set");
            self.log.record(command, elapsed, "OK");
            return Ok(SetOutcome {
                elapsed,
                confirmed: None,
            });
        }

        match session.query(confirm) {
            Ok(reply) => {
                let elapsed = start.elapsed();
                let reply = reply.trim().to_string();
                tracing::debug!(command, confirmed = %reply, elapsed_ms = millis(elapsed), "SCPI set");
                self.log.record(command, elapsed, &reply);
                Ok(SetOutcome {
                    elapsed,
                    confirmed: Some(reply),
                })
            }
            Err(e) => {
                tracing::warn!(command, confirm, error = %e, "set confirmation failed");
                let message = format!("confirmation '{confirm}' failed: {e}");
                self.log.record(command, Duration::ZERO, &message);
                Err(AwgError::Transport {
                    command: command.to_string(),
                    message,
                })
            }
        }
    }

    /// Set `header` to `value` and confirm with `header?`.
    pub fn set_value(&mut self, header: &str, value: impl Display) -> AwgResult<SetOutcome> {
        self.set(&format!("{header} {value}"), &format!("{header}?"))
    }

    /// Send a query and return the trimmed reply.
    pub fn query(&mut self, command: &str) -> AwgResult<Timed<String>> {
        let session = attached(&mut self.session, command)?;
        let start = Instant::now();
        match session.query(command) {
            Ok(reply) => {
                let elapsed = start.elapsed();
                let reply = reply.trim().to_string();
                tracing::debug!(command, reply = %reply, elapsed_ms = millis(elapsed), "SCPI query");
                self.log.record(command, elapsed, &reply);
                Ok(Timed {
                    value: reply,
                    elapsed,
                })
            }
            Err(e) => Err(transport_failure(&mut self.log, command, e)),
        }
    }

    /// Send a query and parse the reply with `FromStr`.
    pub fn query_as<T>(&mut self, command: &str) -> AwgResult<Timed<T>>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.query(command)?
            .try_map(|reply| parse_reply(command, &reply))
    }

    /// Send a query whose reply is `0`/`1` or `OFF`/`ON`.
    pub fn query_bool(&mut self, command: &str) -> AwgResult<Timed<bool>> {
        self.query(command)?.try_map(|reply| {
            parse_bool(&reply).ok_or_else(|| AwgError::unexpected(command, reply))
        })
    }

    /// Send `prefix` followed by `payload` as a definite-length block.
    ///
    /// `prefix` is the command header and any leading arguments including
    /// the final comma, e.g. `:MMEM:DATA "C:\a.bin",`.
    pub fn write_block(&mut self, prefix: &str, payload: &[u8]) -> AwgResult<Duration> {
        let label = format!("{prefix}#<{} bytes>", payload.len());
        let mut message = block::encode_with_prefix(prefix.as_bytes(), payload).rejected()?;
        message.push(b'\n');

        let session = attached(&mut self.session, &label)?;
        let start = Instant::now();
        if let Err(e) = session.write_raw(&message) {
            return Err(transport_failure(&mut self.log, &label, e));
        }
        let elapsed = start.elapsed();
        tracing::debug!(command = %label, elapsed_ms = millis(elapsed), "SCPI block write");
        self.log
            .record(&label, elapsed, &format!("{} bytes written", payload.len()));
        Ok(elapsed)
    }

    /// Send a query whose reply is a definite-length block and return the payload.
    pub fn query_block(&mut self, command: &str) -> AwgResult<Timed<Bytes>> {
        let session = attached(&mut self.session, command)?;
        let start = Instant::now();
        let raw = match session.write(command).and_then(|()| session.read_raw()) {
            Ok(raw) => raw,
            Err(e) => return Err(transport_failure(&mut self.log, command, e)),
        };
        let elapsed = start.elapsed();

        match block::decode(&raw) {
            Ok(payload) => {
                let payload = Bytes::copy_from_slice(payload);
                tracing::debug!(command, bytes = payload.len(), elapsed_ms = millis(elapsed), "SCPI block read");
                self.log
                    .record(command, elapsed, &format!("{} bytes read", payload.len()));
                Ok(Timed {
                    value: payload,
                    elapsed,
                })
            }
            Err(e) => {
                tracing::warn!(command, error = %e, "malformed block reply");
                self.log.record(command, elapsed, &e.to_string());
                Err(e.into())
            }
        }
    }

    /// Close and detach the session, returning the time the close took.
    pub fn close(&mut self) -> AwgResult<Duration> {
        let Some(mut session) = self.session.take() else {
            return Err(AwgError::NotConnected);
        };
        let start = Instant::now();
        session.close()?;
        Ok(start.elapsed())
    }
}

fn attached<'a, S>(session: &'a mut Option<S>, command: &str) -> AwgResult<&'a mut S> {
    session.as_mut().ok_or_else(|| {
        tracing::warn!(command, "not connected; command not sent");
        AwgError::NotConnected
    })
}

fn transport_failure(log: &mut CommandLog, command: &str, e: io::Error) -> AwgError {
    tracing::warn!(command, error = %e, "SCPI transport failure");
    let message = e.to_string();
    log.record(command, Duration::ZERO, &message);
    AwgError::Transport {
        command: command.to_string(),
        message,
    }
}

/// Parse a reply, mapping failures to `UnexpectedResponse`.
pub(crate) fn parse_reply<T>(command: &str, reply: &str) -> AwgResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    reply
        .trim()
        .trim_matches('"')
        .parse()
        .map_err(|_| AwgError::unexpected(command, reply))
}

fn millis(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}
