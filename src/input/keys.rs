//! Single-key input for timed challenges

use super::KeySource;
use super::events::{CrosstermEvents, TerminalEvents};
use crate::error::AppError;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// Case-insensitive comparison of a pressed key with the expected one
pub fn keys_match(pressed: char, expected: char) -> bool {
    pressed.to_lowercase().eq(expected.to_lowercase())
}

/// Reads keypresses from the terminal through crossterm's event queue.
///
/// Raw mode is switched on at the first read, not at construction, so any
/// prompt text printed before the challenge still gets normal line
/// handling. It is restored when this value is dropped.
pub struct TerminalKeys<E = CrosstermEvents> {
    events: E,
}

impl TerminalKeys<CrosstermEvents> {
    pub fn new() -> Self {
        Self::with_events(CrosstermEvents::new())
    }
}

impl Default for TerminalKeys<CrosstermEvents> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: TerminalEvents> TerminalKeys<E> {
    pub fn with_events(events: E) -> Self {
        Self { events }
    }
}

impl<E: TerminalEvents> KeySource for TerminalKeys<E> {
    fn next_key(&mut self, wait: Duration) -> Result<Option<char>, AppError> {
        match self.events.next_event(wait)? {
            Some(event) => translate(event),
            None => Ok(None),
        }
    }

    fn discard_pending(&mut self) -> Result<(), AppError> {
        let dropped = self.events.discard_pending()?;
        if dropped > 0 {
            tracing::debug!("Discarded {dropped} stale terminal events");
        }
        Ok(())
    }
}

/// Maps a terminal event to a character, surfacing Ctrl+C as an interrupt
fn translate(event: Event) -> Result<Option<char>, AppError> {
    match event {
        Event::Key(KeyEvent {
            code: KeyCode::Char(c),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => {
            if modifiers.contains(KeyModifiers::CONTROL) && keys_match(c, 'c') {
                tracing::info!("Ctrl+C pressed during raw-mode read");
                return Err(AppError::Interrupted);
            }
            Ok(Some(c))
        }
        _ => Ok(None),
    }
}
