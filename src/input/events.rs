//! Raw-mode terminal events shared by line editing and challenge keys

use super::raw_mode::RawModeGuard;
use crate::error::AppError;
use crossterm::event::{self, Event};
use std::time::Duration;

/// Source of terminal events read in raw mode.
///
/// Raw mode is entered on demand by the first read and kept until
/// [`release`](TerminalEvents::release) or drop.
pub trait TerminalEvents: Send {
    /// Waits at most `wait` for the next event
    fn next_event(&mut self, wait: Duration) -> Result<Option<Event>, AppError>;

    /// Drops every event already queued and returns how many were dropped
    fn discard_pending(&mut self) -> Result<usize, AppError>;

    /// Leaves raw mode until the next read
    fn release(&mut self);
}

/// Events from the process terminal through crossterm's event queue
#[derive(Default)]
pub struct CrosstermEvents {
    raw: Option<RawModeGuard>,
}

impl CrosstermEvents {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_raw(&mut self) -> Result<(), AppError> {
        if self.raw.is_none() {
            self.raw = Some(RawModeGuard::acquire()?);
        }
        Ok(())
    }
}

impl TerminalEvents for CrosstermEvents {
    fn next_event(&mut self, wait: Duration) -> Result<Option<Event>, AppError> {
        self.ensure_raw()?;
        if !event::poll(wait)? {
            return Ok(None);
        }
        Ok(Some(event::read()?))
    }

    fn discard_pending(&mut self) -> Result<usize, AppError> {
        // Bytes typed in cooked mode only become events once raw mode is on
        self.ensure_raw()?;
        let mut dropped = 0;
        while event::poll(Duration::ZERO)? {
            event::read()?;
            dropped += 1;
        }
        Ok(dropped)
    }

    fn release(&mut self) {
        self.raw = None;
    }
}
