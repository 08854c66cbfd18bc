//! Standard input as a readiness check plus line source, for pipes and
//! redirected files. Interactive terminals use
//! [`TerminalLineInput`](super::TerminalLineInput) instead.
//!
//! On Unix the reader owns a duplicate of fd 0 so it can see its own
//! buffer: input is pending when that buffer still holds bytes or when
//! `poll(2)` reports the descriptor readable. Probing never reads.
//! On a canonical-mode terminal the kernel only reports readiness once a
//! full line has been entered, which is why terminals take the raw-mode
//! path.

use super::{InputReadiness, LineSource, strip_line_ending};
use crate::error::AppError;
use std::io::BufRead;
use std::time::Duration;

#[cfg(unix)]
mod platform {
    use crate::error::AppError;
    use std::fs::File;
    use std::io::{self, BufReader};
    use std::os::fd::{AsFd, AsRawFd};
    use std::time::Duration;

    pub type Reader = BufReader<File>;

    pub fn open() -> Result<Reader, AppError> {
        let fd = io::stdin().as_fd().try_clone_to_owned()?;
        Ok(BufReader::new(File::from(fd)))
    }

    pub fn pending(reader: &Reader, timeout: Duration) -> Result<bool, AppError> {
        if !reader.buffer().is_empty() {
            return Ok(true);
        }

        let mut pollfd = libc::pollfd {
            fd: reader.get_ref().as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        let timeout_ms = timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;

        // SAFETY: `pollfd` is a single initialized struct that outlives the call.
        let rc = unsafe { libc::poll(&mut pollfd, 1, timeout_ms) };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(err.into());
        }

        // Hang-up and errors count as ready so the read can report them
        let ready = libc::POLLIN | libc::POLLHUP | libc::POLLERR;
        Ok(rc > 0 && pollfd.revents & ready != 0)
    }
}

#[cfg(not(unix))]
mod platform {
    use crate::error::AppError;
    use std::io::{self, BufReader, Stdin};
    use std::time::Duration;

    pub type Reader = BufReader<Stdin>;

    pub fn open() -> Result<Reader, AppError> {
        Ok(BufReader::new(io::stdin()))
    }

    // No portable non-consuming check here; report ready so the indicator
    // steps aside instead of racing the console.
    pub fn pending(_reader: &Reader, _timeout: Duration) -> Result<bool, AppError> {
        Ok(true)
    }
}

/// Standard input wrapped for the prompt
pub struct StdinInput {
    reader: platform::Reader,
}

impl StdinInput {
    pub fn new() -> Result<Self, AppError> {
        Ok(Self {
            reader: platform::open()?,
        })
    }
}

impl InputReadiness for StdinInput {
    fn input_pending(&mut self, timeout: Duration) -> Result<bool, AppError> {
        platform::pending(&self.reader, timeout)
    }
}

impl LineSource for StdinInput {
    fn read_line(&mut self) -> Result<String, AppError> {
        let mut line = String::new();
        let read = self.reader.read_line(&mut line)?;
        if read == 0 {
            tracing::info!("Standard input closed");
            return Err(AppError::EndOfInput);
        }
        strip_line_ending(&mut line);
        Ok(line)
    }
}
