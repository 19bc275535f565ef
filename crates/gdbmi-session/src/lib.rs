//! Response collection and command I/O for a live debugger subprocess.
//!
//! Sits on top of the framer, parser and process crates: feeds raw chunks
//! from the subprocess pipes through a per-stream [`StreamParser`], applies
//! the response timeout policy, and exposes the whole stack as a
//! [`GdbController`] — spawn gdb, write MI commands, get records back.

pub mod error;
pub mod reader;

#[cfg(unix)]
pub mod controller;
#[cfg(unix)]
pub mod session;

pub use error::{Result, SessionError};
pub use reader::StreamParser;

#[cfg(unix)]
pub use controller::GdbController;
#[cfg(unix)]
pub use session::{
    IoSession, SessionConfig, DEFAULT_ADDITIONAL_OUTPUT_WINDOW, DEFAULT_RESPONSE_TIMEOUT,
};
