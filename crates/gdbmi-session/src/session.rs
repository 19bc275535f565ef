use std::io::Write;
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

use gdbmi_frame::StreamSource;
use gdbmi_parse::Record;
use gdbmi_process::{read_available, wait_writable, PollSet, StdioPipes};
use tracing::debug;

use crate::error::{Result, SessionError};
use crate::reader::StreamParser;

/// Default bound on one response-collection call.
pub const DEFAULT_RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Once output starts flowing, keep reading only this much longer after
/// each sweep, so calls return shortly after the debugger goes quiet
/// instead of sitting out the full timeout.
pub const DEFAULT_ADDITIONAL_OUTPUT_WINDOW: Duration = Duration::from_millis(200);

/// Timeout policy for response collection.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum time to wait for any response.
    pub response_timeout: Duration,
    /// Deadline pull-in once records have arrived. `None` keeps the full
    /// timeout even after output begins.
    pub additional_output_window: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            response_timeout: DEFAULT_RESPONSE_TIMEOUT,
            additional_output_window: Some(DEFAULT_ADDITIONAL_OUTPUT_WINDOW),
        }
    }
}

/// Owns the pipes of one debugger process and turns its output into records.
///
/// One [`StreamParser`] per stream; stdout and stderr may carry output
/// concurrently and each keeps its own partial-line buffer. The session is
/// single-threaded: all blocking happens in bounded poll calls here, never
/// in the parser or framer underneath.
pub struct IoSession {
    pipes: StdioPipes,
    poll: PollSet<StreamSource>,
    stdout_parser: StreamParser,
    stderr_parser: StreamParser,
    config: SessionConfig,
}

impl IoSession {
    pub fn new(pipes: StdioPipes, config: SessionConfig) -> Self {
        let mut poll = PollSet::new();
        poll.register(pipes.stdout.as_raw_fd(), StreamSource::Stdout);
        poll.register(pipes.stderr.as_raw_fd(), StreamSource::Stderr);
        Self {
            pipes,
            poll,
            stdout_parser: StreamParser::new(StreamSource::Stdout),
            stderr_parser: StreamParser::new(StreamSource::Stderr),
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Write one MI command and collect the response within the default
    /// timeout.
    pub fn write(&mut self, command: &str) -> Result<Vec<Record>> {
        self.write_with_timeout(command, self.config.response_timeout, true)
    }

    /// Write one MI command, then collect records until `timeout`.
    pub fn write_with_timeout(
        &mut self,
        command: &str,
        timeout: Duration,
        raise_on_timeout: bool,
    ) -> Result<Vec<Record>> {
        self.send(command)?;
        self.read_responses(timeout, raise_on_timeout)
    }

    /// Write without reading — useful when another call site drains the
    /// output.
    pub fn write_no_read(&mut self, command: &str) -> Result<()> {
        self.send(command)
    }

    fn send(&mut self, command: &str) -> Result<()> {
        let mut data = String::with_capacity(command.len() + 1);
        data.push_str(command);
        if !data.ends_with('\n') {
            data.push('\n');
        }

        if !wait_writable(self.pipes.stdin.as_raw_fd(), self.config.response_timeout)? {
            return Err(SessionError::Timeout {
                timeout: self.config.response_timeout,
            });
        }

        debug!(command, "writing MI command");
        self.pipes.stdin.write_all(data.as_bytes())?;
        // The debugger will not evaluate the command until the pipe is
        // flushed.
        self.pipes.stdin.flush()?;
        Ok(())
    }

    /// Collect records from both streams until the deadline policy says
    /// stop.
    ///
    /// A zero `timeout` is a single non-blocking sweep. With records already
    /// collected, the deadline is pulled in by the additional-output window
    /// after every productive sweep. When nothing at all arrived,
    /// `raise_on_timeout` decides between a [`SessionError::Timeout`] and an
    /// empty vec.
    pub fn read_responses(
        &mut self,
        timeout: Duration,
        raise_on_timeout: bool,
    ) -> Result<Vec<Record>> {
        let mut deadline = Instant::now() + timeout;
        let mut records = Vec::new();

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let ready = self.poll.wait(remaining)?;

            let mut productive = false;
            for source in ready {
                let chunk = match source {
                    StreamSource::Stdout => read_available(&mut self.pipes.stdout)?,
                    StreamSource::Stderr => read_available(&mut self.pipes.stderr)?,
                };
                let parser = match source {
                    StreamSource::Stdout => &mut self.stdout_parser,
                    StreamSource::Stderr => &mut self.stderr_parser,
                };
                let parsed = parser.feed(&chunk);
                if !parsed.is_empty() {
                    productive = true;
                    records.extend(parsed);
                }
            }

            if timeout.is_zero() {
                break;
            }
            let now = Instant::now();
            if productive {
                if let Some(window) = self.config.additional_output_window {
                    deadline = deadline.min(now + window);
                }
            } else if now >= deadline {
                break;
            }
        }

        if records.is_empty() && raise_on_timeout {
            return Err(SessionError::Timeout { timeout });
        }
        Ok(records)
    }
}
