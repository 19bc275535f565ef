//! Spawning and terminating the debugger subprocess.

use std::os::fd::{AsRawFd, RawFd};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, Stdio};

use tracing::debug;

use crate::error::{ProcessError, Result};
use crate::signal;

/// Default launch command: quiet gdb with the MI interpreter and no init
/// files.
pub const DEFAULT_GDB_COMMAND: &[&str] = &["gdb", "--nx", "--quiet", "--interpreter=mi3"];

/// How to launch the debugger.
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    /// Full argv, program first.
    pub command: Vec<String>,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_GDB_COMMAND.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SpawnConfig {
    /// Launch with an explicit argv.
    pub fn new<I, S>(command: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            command: command.into_iter().map(Into::into).collect(),
        }
    }

    /// True when any argument selects an MI interpreter.
    pub fn has_mi_interpreter(&self) -> bool {
        self.command.iter().any(|arg| arg.contains("--interpreter=mi"))
    }
}

/// Pipes connected to a spawned debugger's standard streams.
///
/// stdout and stderr are already in non-blocking mode; stdin stays blocking.
#[derive(Debug)]
pub struct StdioPipes {
    pub stdin: ChildStdin,
    pub stdout: ChildStdout,
    pub stderr: ChildStderr,
}

/// A running debugger subprocess.
///
/// Dropping the handle kills and reaps the child if [`exit`] was never
/// called.
///
/// [`exit`]: GdbProcess::exit
#[derive(Debug)]
pub struct GdbProcess {
    child: Child,
    command: Vec<String>,
    exited: bool,
}

impl GdbProcess {
    /// Spawn the debugger and hand back its standard-stream pipes.
    pub fn spawn(config: &SpawnConfig) -> Result<(Self, StdioPipes)> {
        let program = config.command.first().ok_or(ProcessError::EmptyCommand)?;

        debug!(command = ?config.command, "launching debugger");
        let mut child = Command::new(program)
            .args(&config.command[1..])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ProcessError::Spawn {
                command: program.clone(),
                source,
            })?;

        let stdin = take_pipe(child.stdin.take(), "stdin")?;
        let stdout = take_pipe(child.stdout.take(), "stdout")?;
        let stderr = take_pipe(child.stderr.take(), "stderr")?;

        set_nonblocking(stdout.as_raw_fd())?;
        set_nonblocking(stderr.as_raw_fd())?;

        debug!(pid = child.id(), "debugger running");
        Ok((
            Self {
                child,
                command: config.command.clone(),
                exited: false,
            },
            StdioPipes {
                stdin,
                stdout,
                stderr,
            },
        ))
    }

    pub fn pid(&self) -> u32 {
        self.child.id()
    }

    /// The argv this process was launched with.
    pub fn command(&self) -> &[String] {
        &self.command
    }

    /// Deliver a signal named by number or case-insensitive name.
    pub fn send_signal(&self, spec: &str) -> Result<()> {
        let signum =
            signal::lookup(spec).ok_or_else(|| ProcessError::UnknownSignal(spec.to_string()))?;
        signal::send(self.pid(), signum)
    }

    /// SIGINT, the way a user's Ctrl-C reaches the debugger.
    pub fn interrupt(&self) -> Result<()> {
        signal::send(self.pid(), libc::SIGINT)
    }

    /// True while the child has not exited.
    pub fn is_running(&mut self) -> Result<bool> {
        if self.exited {
            return Ok(false);
        }
        Ok(self.child.try_wait()?.is_none())
    }

    /// Terminate the debugger: SIGTERM, then reap. Idempotent.
    pub fn exit(&mut self) -> Result<()> {
        if self.exited {
            return Ok(());
        }
        debug!(pid = self.pid(), "terminating debugger");
        // The child may already be gone; reaping below is what matters.
        let _ = signal::send(self.pid(), libc::SIGTERM);
        self.child.wait()?;
        self.exited = true;
        Ok(())
    }
}

impl Drop for GdbProcess {
    fn drop(&mut self) {
        if !self.exited {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

fn take_pipe<T>(pipe: Option<T>, name: &str) -> Result<T> {
    pipe.ok_or_else(|| {
        ProcessError::Io(std::io::Error::other(format!("child {name} pipe missing")))
    })
}

fn set_nonblocking(fd: RawFd) -> Result<()> {
    // SAFETY: `fd` is an open descriptor owned by the just-created pipe
    // handle; fcntl only manipulates its status flags.
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(ProcessError::Io(std::io::Error::last_os_error()));
    }
    // SAFETY: as above.
    let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if rc < 0 {
        return Err(ProcessError::Io(std::io::Error::last_os_error()));
    }
    Ok(())
}
