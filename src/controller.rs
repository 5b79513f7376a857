//! AWG controller facade.
//!
//! [`Awg`] owns the [`Dispatcher`] (and through it the one session and the
//! command log) and hands out short-lived subsystem handles:
//!
//! ```no_run
//! use awg_scpi::{Awg, AwgConfig};
//!
//! # fn main() -> awg_scpi::AwgResult<()> {
//! let mut awg = Awg::open(&AwgConfig::load()?)?;
//! awg.output().set_state(1, true)?;
//! awg.voltage().set_amplitude(1, 0.5)?;
//! awg.disconnect()?;
//! # Ok(())
//! # }
//! ```

use std::time::{Duration, Instant};

use crate::command_log::CommandLog;
use crate::config::AwgConfig;
use crate::dispatcher::{Dispatcher, Timed};
use crate::error::{AwgError, AwgResult};
use crate::session::{self, Session};
use crate::subsystems::{
    Arm, Carrier, Characteristics, Common, Format, Function, Identity, Instrument, MassMemory,
    Output, ReferenceOscillator, Sampling, SelfTest, SequenceTable, Status, Trace, Trigger,
    Voltage,
};

/// Hardware limits enforced before commands are sent.
#[derive(Debug, Clone, Copy)]
pub struct DeviceLimits;

impl DeviceLimits {
    /// Largest output amplitude in volts.
    pub const MAX_VOLTAGE: f64 = 3.0;
    /// Largest carrier frequency in Hz.
    pub const MAX_FREQUENCY_HZ: f64 = 6.0e9;
    /// Nominal load impedance in ohms.
    pub const LOAD_OHMS: f64 = 50.0;
    /// Output power at full amplitude into the nominal load, in watts.
    pub const MAX_POWER_W: f64 = Self::MAX_VOLTAGE * Self::MAX_VOLTAGE / Self::LOAD_OHMS;
}

/// Command-log entry written on disconnect.
const CLOSE_ENTRY: &str = "resource.close()";

/// Arbitrary waveform generator.
#[derive(Debug)]
pub struct Awg<S> {
    dispatcher: Dispatcher<S>,
    identity: Option<Identity>,
}

impl Awg<Box<dyn Session>> {
    /// Validate `config`, create the command log, open the configured
    /// session and identify the instrument.
    pub fn open(config: &AwgConfig) -> AwgResult<Self> {
        config.validate().map_err(AwgError::Config)?;

        let log = if config.command_log.enabled {
            CommandLog::create(&config.command_log.directory, &config.device_name())?
        } else {
            CommandLog::disabled()
        };
        let mut awg = Awg::new(log);
        awg.dispatcher
            .set_confirm_sets(config.dispatch.confirm_sets);

        let resource = session::resource_string(&config.connection);
        let start = Instant::now();
        match session::open(&config.connection) {
            Ok(session) => {
                awg.identify_session(session, start.elapsed())?;
                Ok(awg)
            }
            Err(e) => {
                tracing::warn!(%resource, error = %e, "failed to open session");
                awg.dispatcher.record(&resource, Duration::ZERO, &e.to_string());
                Err(e)
            }
        }
    }
}

impl<S: Session> Awg<S> {
    /// Create a disconnected controller.
    pub fn new(log: CommandLog) -> Self {
        Self {
            dispatcher: Dispatcher::new(log),
            identity: None,
        }
    }

    /// Create a controller around an already open session without
    /// identifying the instrument.
    pub fn with_session(session: S, log: CommandLog) -> Self {
        let mut awg = Self::new(log);
        awg.dispatcher.attach(session);
        awg
    }

    /// Attach `session` and query `*IDN?`. An existing session is
    /// disconnected first.
    pub fn connect(&mut self, session: S) -> AwgResult<Timed<Identity>> {
        if self.is_connected() {
            self.disconnect()?;
        }
        let start = Instant::now();
        self.identify_session(session, start.elapsed())
    }

    fn identify_session(&mut self, session: S, opened_in: Duration) -> AwgResult<Timed<Identity>> {
        let resource = session.resource_name().to_string();
        self.dispatcher.attach(session);
        self.dispatcher.record(&resource, opened_in, "Connected");

        match self.common().identify() {
            Ok(identity) => {
                tracing::info!(%resource, identity = %identity.value, "AWG connected");
                self.identity = Some(identity.value.clone());
                Ok(identity)
            }
            Err(e) => {
                tracing::warn!(%resource, error = %e, "identification failed; closing session");
                if let Some(mut session) = self.dispatcher.detach() {
                    if let Err(close_err) = session.close() {
                        tracing::debug!(error = %close_err, "close after failed identification");
                    }
                }
                Err(e)
            }
        }
    }

    /// Close the session. Fails with `NotConnected` when none is attached.
    pub fn disconnect(&mut self) -> AwgResult<Duration> {
        self.identity = None;
        match self.dispatcher.close() {
            Ok(elapsed) => {
                self.dispatcher
                    .record(CLOSE_ENTRY, elapsed, "Device disconnected");
                tracing::info!("AWG disconnected");
                Ok(elapsed)
            }
            Err(AwgError::NotConnected) => {
                tracing::warn!("disconnect requested but no session is attached");
                Err(AwgError::NotConnected)
            }
            Err(e) => {
                tracing::warn!(error = %e, "error while closing session");
                self.dispatcher
                    .record(CLOSE_ENTRY, Duration::ZERO, &e.to_string());
                Err(e)
            }
        }
    }

    /// Whether a session is attached.
    pub fn is_connected(&self) -> bool {
        self.dispatcher.is_connected()
    }

    /// Identity read at connect time.
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The command dispatcher, for raw SCPI access.
    pub fn dispatcher(&mut self) -> &mut Dispatcher<S> {
        &mut self.dispatcher
    }

    /// The command log.
    pub fn log(&self) -> &CommandLog {
        self.dispatcher.log()
    }

    /// IEEE-488.2 common commands.
    pub fn common(&mut self) -> Common<'_, S> {
        Common::new(&mut self.dispatcher)
    }

    /// Status registers.
    pub fn status(&mut self) -> Status<'_, S> {
        Status::new(&mut self.dispatcher)
    }

    /// Arming and initiation.
    pub fn arm(&mut self) -> Arm<'_, S> {
        Arm::new(&mut self.dispatcher)
    }

    /// Trigger input.
    pub fn trigger(&mut self) -> Trigger<'_, S> {
        Trigger::new(&mut self.dispatcher)
    }

    /// Module identification and DAC mode.
    pub fn instrument(&mut self) -> Instrument<'_, S> {
        Instrument::new(&mut self.dispatcher)
    }

    /// Binary byte order.
    pub fn format(&mut self) -> Format<'_, S> {
        Format::new(&mut self.dispatcher)
    }

    /// Mass memory.
    pub fn memory(&mut self) -> MassMemory<'_, S> {
        MassMemory::new(&mut self.dispatcher)
    }

    /// Output stage.
    pub fn output(&mut self) -> Output<'_, S> {
        Output::new(&mut self.dispatcher)
    }

    /// DAC sample frequency.
    pub fn sampling(&mut self) -> Sampling<'_, S> {
        Sampling::new(&mut self.dispatcher)
    }

    /// Reference clock input.
    pub fn reference_oscillator(&mut self) -> ReferenceOscillator<'_, S> {
        ReferenceOscillator::new(&mut self.dispatcher)
    }

    /// Output voltage.
    pub fn voltage(&mut self) -> Voltage<'_, S> {
        Voltage::new(&mut self.dispatcher)
    }

    /// Function mode.
    pub fn function(&mut self) -> Function<'_, S> {
        Function::new(&mut self.dispatcher)
    }

    /// Frequency and phase response.
    pub fn characteristics(&mut self) -> Characteristics<'_, S> {
        Characteristics::new(&mut self.dispatcher)
    }

    /// Up-conversion carrier.
    pub fn carrier(&mut self) -> Carrier<'_, S> {
        Carrier::new(&mut self.dispatcher)
    }

    /// Sequencer table.
    pub fn sequence(&mut self) -> SequenceTable<'_, S> {
        SequenceTable::new(&mut self.dispatcher)
    }

    /// `:TEST` subsystem.
    pub fn test(&mut self) -> SelfTest<'_, S> {
        SelfTest::new(&mut self.dispatcher)
    }

    /// Waveform memory.
    pub fn trace(&mut self) -> Trace<'_, S> {
        Trace::new(&mut self.dispatcher)
    }
}
