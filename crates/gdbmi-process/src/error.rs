/// Errors from debugger subprocess management.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The debugger executable could not be started.
    #[error("failed to spawn debugger {command:?}: {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    /// The configured launch command has no program.
    #[error("debugger launch command is empty")]
    EmptyCommand,

    /// A signal was named that does not resolve to a signal number.
    #[error("unknown signal {0:?}")]
    UnknownSignal(String),

    /// An I/O error on the subprocess pipes or in a platform call.
    #[error("process I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ProcessError>;
