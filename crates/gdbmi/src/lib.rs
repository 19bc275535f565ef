//! Structured GDB/MI for Rust.
//!
//! gdbmi turns the line-oriented text of GDB's machine-interface interpreter
//! into typed records, and manages the live subprocess that produces it.
//!
//! # Crate Structure
//!
//! - [`parse`] — the MI record parser (escapes, value grammar, classifier)
//! - [`frame`] — incremental newline framing for subprocess output
//! - [`process`] — subprocess spawn, signals and non-blocking reads
//!   (behind `session`, Unix-only)
//! - [`session`] — response collection and the `GdbController`
//!   (behind `session`)

/// Re-export frame types.
pub mod frame {
    pub use gdbmi_frame::*;
}

/// Re-export parse types.
pub mod parse {
    pub use gdbmi_parse::*;
}

/// Re-export process types (requires `session` feature).
#[cfg(feature = "session")]
pub mod process {
    pub use gdbmi_process::*;
}

/// Re-export session types (requires `session` feature).
#[cfg(feature = "session")]
pub mod session {
    pub use gdbmi_session::*;
}
