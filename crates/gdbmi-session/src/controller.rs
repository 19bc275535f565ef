use std::time::Duration;

use gdbmi_parse::Record;
use gdbmi_process::{GdbProcess, SpawnConfig};
use tracing::warn;

use crate::error::Result;
use crate::session::{IoSession, SessionConfig};

/// Runs the debugger as a subprocess and talks MI to it.
///
/// Thin composition of [`GdbProcess`] and [`IoSession`]: spawn, write
/// commands, read structured records, deliver signals, terminate.
pub struct GdbController {
    process: GdbProcess,
    session: IoSession,
}

impl GdbController {
    /// Spawn with the default gdb command and timeout policy.
    pub fn new() -> Result<Self> {
        Self::with_config(SpawnConfig::default(), SessionConfig::default())
    }

    pub fn with_config(spawn: SpawnConfig, session: SessionConfig) -> Result<Self> {
        if !spawn.has_mi_interpreter() {
            warn!(
                command = ?spawn.command,
                "launch command selects no MI interpreter; pass --interpreter=mi3 \
                 (or similar) to get structured output"
            );
        }
        let (process, pipes) = GdbProcess::spawn(&spawn)?;
        Ok(Self {
            process,
            session: IoSession::new(pipes, session),
        })
    }

    pub fn pid(&self) -> u32 {
        self.process.pid()
    }

    /// Write one MI command and collect the response within the default
    /// timeout.
    pub fn write(&mut self, command: &str) -> Result<Vec<Record>> {
        self.session.write(command)
    }

    /// Write one MI command with an explicit response timeout.
    pub fn write_with_timeout(
        &mut self,
        command: &str,
        timeout: Duration,
        raise_on_timeout: bool,
    ) -> Result<Vec<Record>> {
        self.session
            .write_with_timeout(command, timeout, raise_on_timeout)
    }

    /// Write without reading; pair with [`get_response`].
    ///
    /// [`get_response`]: GdbController::get_response
    pub fn write_no_read(&mut self, command: &str) -> Result<()> {
        self.session.write_no_read(command)
    }

    /// Collect whatever the debugger has produced within `timeout`.
    pub fn get_response(
        &mut self,
        timeout: Duration,
        raise_on_timeout: bool,
    ) -> Result<Vec<Record>> {
        self.session.read_responses(timeout, raise_on_timeout)
    }

    /// Deliver a signal named by number or case-insensitive name
    /// (`"2"`, `"sigint"`, `"SIGINT"`).
    pub fn send_signal(&self, spec: &str) -> Result<()> {
        Ok(self.process.send_signal(spec)?)
    }

    /// SIGINT — interrupt a running target.
    pub fn interrupt(&self) -> Result<()> {
        Ok(self.process.interrupt()?)
    }

    /// True while the debugger has not exited.
    pub fn is_running(&mut self) -> Result<bool> {
        Ok(self.process.is_running()?)
    }

    /// Terminate the debugger. Idempotent.
    pub fn exit(&mut self) -> Result<()> {
        Ok(self.process.exit()?)
    }
}
