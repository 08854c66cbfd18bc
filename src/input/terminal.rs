//! Line input on an interactive terminal.
//!
//! A canonical-mode terminal hands input over only after Enter, long after
//! the typed characters have been echoed onto the indicator's line. Here
//! the terminal is read in raw mode instead: the first keypress is what
//! counts as pending input, and the line is echoed by this reader only once
//! the prompt has cleared the indicator.

use super::events::{CrosstermEvents, TerminalEvents};
use super::{InputReadiness, LineSource, StdinInput, keys_match};
use crate::console::Console;
use crate::constants::polling;
use crate::error::AppError;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::tty::IsTty;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const ERASE_LAST: &str = "\u{8} \u{8}";
const LINE_END: &str = "\r\n";

/// Raw-mode line editor over a terminal event source.
///
/// Echo goes through the shared console so it is ordered with the
/// indicator's frames and clears.
pub struct TerminalLineInput<E, C: Console + 'static> {
    events: E,
    console: Arc<Mutex<C>>,
    pending: Option<KeyEvent>,
}

impl<E: TerminalEvents, C: Console + 'static> TerminalLineInput<E, C> {
    pub fn new(events: E, console: Arc<Mutex<C>>) -> Self {
        Self {
            events,
            console,
            pending: None,
        }
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    fn echo(&self, text: &str) -> Result<(), AppError> {
        let mut console = self
            .console
            .lock()
            .map_err(|_| io::Error::other("console lock poisoned"))?;
        console.write_text(text)?;
        Ok(())
    }

    fn next_press(&mut self) -> Result<KeyEvent, AppError> {
        if let Some(key) = self.pending.take() {
            return Ok(key);
        }
        let wait = Duration::from_millis(polling::LINE_EVENT_MS);
        loop {
            if let Some(Event::Key(key)) = self.events.next_event(wait)?
                && key.kind == KeyEventKind::Press
            {
                return Ok(key);
            }
        }
    }

    fn edit_line(&mut self) -> Result<String, AppError> {
        let mut line = String::new();
        let mut buf = [0u8; 4];
        loop {
            let key = self.next_press()?;
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Enter => {
                    self.echo(LINE_END)?;
                    return Ok(line);
                }
                KeyCode::Char(c) if ctrl && keys_match(c, 'c') => {
                    tracing::info!("Ctrl+C pressed while editing a line");
                    self.echo(LINE_END)?;
                    return Err(AppError::Interrupted);
                }
                KeyCode::Char(c) if ctrl && keys_match(c, 'd') => {
                    if line.is_empty() {
                        self.echo(LINE_END)?;
                        return Err(AppError::EndOfInput);
                    }
                }
                KeyCode::Char(c) if !ctrl => {
                    line.push(c);
                    self.echo(c.encode_utf8(&mut buf))?;
                }
                KeyCode::Backspace => {
                    if line.pop().is_some() {
                        self.echo(ERASE_LAST)?;
                    }
                }
                _ => {}
            }
        }
    }
}

impl<E: TerminalEvents, C: Console + 'static> InputReadiness for TerminalLineInput<E, C> {
    fn input_pending(&mut self, timeout: Duration) -> Result<bool, AppError> {
        if self.pending.is_some() {
            return Ok(true);
        }
        match self.events.next_event(timeout)? {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                self.pending = Some(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

impl<E: TerminalEvents, C: Console + 'static> LineSource for TerminalLineInput<E, C> {
    fn read_line(&mut self) -> Result<String, AppError> {
        let line = self.edit_line();
        // Output between prompts needs the terminal's own line handling
        self.events.release();
        line
    }
}

/// Standard input as the session reads it: raw-mode line editing on a
/// terminal, a non-consuming readiness check on anything else
pub enum StandardInput<C: Console + 'static> {
    Terminal(TerminalLineInput<CrosstermEvents, C>),
    Stream(StdinInput),
}

impl<C: Console + 'static> StandardInput<C> {
    pub fn open(console: &Arc<Mutex<C>>) -> Result<Self, AppError> {
        if io::stdin().is_tty() {
            tracing::debug!("Standard input is a terminal, editing lines in raw mode");
            Ok(Self::Terminal(TerminalLineInput::new(
                CrosstermEvents::new(),
                Arc::clone(console),
            )))
        } else {
            tracing::debug!("Standard input is not a terminal, reading lines as a stream");
            Ok(Self::Stream(StdinInput::new()?))
        }
    }
}

impl<C: Console + 'static> InputReadiness for StandardInput<C> {
    fn input_pending(&mut self, timeout: Duration) -> Result<bool, AppError> {
        match self {
            Self::Terminal(input) => input.input_pending(timeout),
            Self::Stream(input) => input.input_pending(timeout),
        }
    }
}

impl<C: Console + 'static> LineSource for StandardInput<C> {
    fn read_line(&mut self) -> Result<String, AppError> {
        match self {
            Self::Terminal(input) => input.read_line(),
            Self::Stream(input) => input.read_line(),
        }
    }
}
