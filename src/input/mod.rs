//! Input side of the prompt.
//!
//! The prompt depends on three capabilities, each behind a trait so tests
//! can script them:
//! - [`InputReadiness`]: non-consuming check for unread input
//! - [`LineSource`]: blocking line read
//! - [`KeySource`]: single-keypress read for timed challenges
//!
//! On an interactive terminal [`StandardInput`] edits the line itself in
//! raw mode, so the first keypress is visible before Enter. Pipes and files
//! go through [`StdinInput`].

pub mod events;
pub mod interrupt;
pub mod keys;
pub mod raw_mode;
pub mod stdin;
pub mod terminal;

use crate::error::AppError;
use std::time::Duration;

pub use events::{CrosstermEvents, TerminalEvents};
pub use interrupt::{InterruptFlag, spawn_ctrl_c_listener};
pub use keys::{TerminalKeys, keys_match};
pub use raw_mode::RawModeGuard;
pub use stdin::StdinInput;
pub use terminal::{StandardInput, TerminalLineInput};

/// Reports whether the user has produced input that no read has consumed yet.
///
/// Implementations must never consume the bytes they detect.
pub trait InputReadiness: Send {
    /// Waits at most `timeout` for input to become available
    fn input_pending(&mut self, timeout: Duration) -> Result<bool, AppError>;
}

/// Blocking, line-oriented reader
pub trait LineSource: Send {
    /// Reads one line without its terminator.
    ///
    /// Returns [`AppError::EndOfInput`] once the stream is exhausted.
    fn read_line(&mut self) -> Result<String, AppError>;
}

/// Single-keypress reader used by timed challenges
pub trait KeySource {
    /// Waits at most `wait` for a key; `Ok(None)` if none arrived
    fn next_key(&mut self, wait: Duration) -> Result<Option<char>, AppError>;

    /// Drops keys typed before now so they cannot count for a new window
    fn discard_pending(&mut self) -> Result<(), AppError> {
        Ok(())
    }
}

/// Removes one trailing `\n` or `\r\n`, leaving the rest of the line as typed
pub fn strip_line_ending(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}
