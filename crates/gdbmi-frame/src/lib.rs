//! Incremental newline framing for debugger output streams.
//!
//! A debugger subprocess writes machine-interface records one per line, but
//! the bytes arrive at whatever boundaries the pipe hands us — partial lines,
//! many lines per read, or nothing at all within a timeout. [`LineFramer`]
//! reassembles those chunks into complete lines and keeps any trailing
//! partial line buffered until the rest of it arrives.
//!
//! No grammar lives here: the framer is a pure byte-to-lines layer, and any
//! byte sequence is valid input.

pub mod framer;
pub mod source;

pub use framer::LineFramer;
pub use source::StreamSource;
