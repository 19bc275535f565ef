//! Output stream identity tags.
//!
//! A monitored debugger process exposes two output channels. Records carry
//! the tag of the channel they arrived on so consumers can tell primary
//! machine-interface output apart from auxiliary diagnostics.

use serde::Serialize;

/// Which subprocess output channel a chunk (and the records framed from it)
/// came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamSource {
    /// The debugger's standard output — the primary MI channel.
    Stdout,
    /// The debugger's standard error — auxiliary diagnostics.
    Stderr,
}

impl StreamSource {
    /// Returns a human-readable name for the stream.
    pub fn name(self) -> &'static str {
        match self {
            StreamSource::Stdout => "stdout",
            StreamSource::Stderr => "stderr",
        }
    }
}

impl std::fmt::Display for StreamSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
