use std::time::Duration;

/// Errors from the response-collection session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The debugger produced no records within the allowed time.
    #[error("no response from debugger after {timeout:?}")]
    Timeout { timeout: Duration },

    /// Subprocess management failed underneath the session.
    #[error(transparent)]
    Process(#[from] gdbmi_process::ProcessError),

    /// An I/O error on the command pipe.
    #[error("session I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
