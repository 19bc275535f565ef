//! Signal delivery to the debugger subprocess.

use crate::error::{ProcessError, Result};

/// Resolve a signal given as a number (`"2"`) or a case-insensitive name
/// (`"SIGINT"`, `"sigint"`, `"int"`).
pub fn lookup(spec: &str) -> Option<i32> {
    if let Ok(n) = spec.parse::<i32>() {
        return (n > 0).then_some(n);
    }

    let upper = spec.to_ascii_uppercase();
    let name = upper.strip_prefix("SIG").unwrap_or(&upper);
    Some(match name {
        "HUP" => libc::SIGHUP,
        "INT" => libc::SIGINT,
        "QUIT" => libc::SIGQUIT,
        "ILL" => libc::SIGILL,
        "TRAP" => libc::SIGTRAP,
        "ABRT" => libc::SIGABRT,
        "FPE" => libc::SIGFPE,
        "KILL" => libc::SIGKILL,
        "USR1" => libc::SIGUSR1,
        "SEGV" => libc::SIGSEGV,
        "USR2" => libc::SIGUSR2,
        "PIPE" => libc::SIGPIPE,
        "ALRM" => libc::SIGALRM,
        "TERM" => libc::SIGTERM,
        "CHLD" => libc::SIGCHLD,
        "CONT" => libc::SIGCONT,
        "STOP" => libc::SIGSTOP,
        "TSTP" => libc::SIGTSTP,
        "WINCH" => libc::SIGWINCH,
        _ => return None,
    })
}

/// SIGINT by pid, for callers that only hold the pid (Ctrl-C handlers).
pub fn interrupt(pid: u32) -> Result<()> {
    send(pid, libc::SIGINT)
}

/// Deliver `signum` to `pid`.
pub fn send(pid: u32, signum: i32) -> Result<()> {
    // SAFETY: kill has no memory effects; an invalid pid/signal pair is
    // reported through errno.
    let rc = unsafe { libc::kill(pid as libc::pid_t, signum) };
    if rc != 0 {
        return Err(ProcessError::Io(std::io::Error::last_os_error()));
    }
    Ok(())
}
