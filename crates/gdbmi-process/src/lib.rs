//! Debugger subprocess management.
//!
//! The thin platform layer under gdbmi: spawning the debugger with piped
//! standard streams, switching those pipes to non-blocking mode, waiting for
//! readable data with a bounded timeout, and delivering OS signals. Nothing
//! here understands MI — this crate only moves bytes and processes around.
//!
//! Unix-only for now; a Windows overlapped-pipe backend can be added behind
//! the same surface later.

pub mod error;

#[cfg(unix)]
pub mod poll;
#[cfg(unix)]
pub mod signal;
#[cfg(unix)]
pub mod spawn;

pub use error::{ProcessError, Result};

#[cfg(unix)]
pub use poll::{read_available, wait_writable, PollSet};
#[cfg(unix)]
pub use spawn::{GdbProcess, SpawnConfig, StdioPipes, DEFAULT_GDB_COMMAND};
