//! Bounded-timeout readiness selection over pipe descriptors.

use std::io::{ErrorKind, Read};
use std::os::fd::RawFd;
use std::time::Duration;

use crate::error::Result;

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Watches a fixed set of descriptors for readability.
///
/// Tags are whatever the caller uses to tell descriptors apart; they come
/// back from [`wait`] for each readable descriptor.
///
/// [`wait`]: PollSet::wait
#[derive(Debug, Default)]
pub struct PollSet<T> {
    entries: Vec<(RawFd, T)>,
}

impl<T: Copy> PollSet<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn register(&mut self, fd: RawFd, tag: T) {
        self.entries.push((fd, tag));
    }

    /// Wait up to `timeout` and return the tags of readable descriptors.
    ///
    /// A zero timeout is a single non-blocking sweep. An interrupted wait
    /// reports no readiness; callers run inside a deadline loop and simply
    /// poll again.
    pub fn wait(&self, timeout: Duration) -> Result<Vec<T>> {
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut fds: Vec<libc::pollfd> = self
            .entries
            .iter()
            .map(|&(fd, _)| libc::pollfd {
                fd,
                events: libc::POLLIN,
                revents: 0,
            })
            .collect();

        // SAFETY: `fds` is a valid, initialized pollfd array for the whole
        // call and its length matches the nfds argument.
        let rc = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, millis(timeout)) };
        if rc < 0 {
            let err = std::io::Error::last_os_error();
            if err.kind() == ErrorKind::Interrupted {
                return Ok(Vec::new());
            }
            return Err(err.into());
        }

        Ok(fds
            .iter()
            .zip(&self.entries)
            .filter(|(pfd, _)| pfd.revents & (libc::POLLIN | libc::POLLHUP) != 0)
            .map(|(_, &(_, tag))| tag)
            .collect())
    }
}

/// Wait up to `timeout` for `fd` to accept writes.
pub fn wait_writable(fd: RawFd, timeout: Duration) -> Result<bool> {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLOUT,
        revents: 0,
    };
    // SAFETY: single initialized pollfd, valid for the duration of the call.
    let rc = unsafe { libc::poll(&mut pfd, 1, millis(timeout)) };
    if rc < 0 {
        let err = std::io::Error::last_os_error();
        if err.kind() == ErrorKind::Interrupted {
            return Ok(false);
        }
        return Err(err.into());
    }
    Ok(rc > 0 && pfd.revents & libc::POLLOUT != 0)
}

/// Drain whatever `reader` has ready right now without blocking.
///
/// The descriptor must be in non-blocking mode. Returns the bytes read —
/// empty when nothing was available (or the writer has closed). An empty
/// chunk is not end-of-stream; liveness is tracked by the process handle,
/// not the pipe.
pub fn read_available<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => out.extend_from_slice(&chunk[..n]),
            Err(err) if err.kind() == ErrorKind::WouldBlock => break,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        }
    }
    Ok(out)
}

fn millis(timeout: Duration) -> libc::c_int {
    timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int
}
