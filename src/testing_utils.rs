//! Fakes for exercising prompts and challenges without a terminal.
//!
//! - [`RecordingConsole`] records every write with a sequence number
//! - [`ScriptedInput`] becomes ready after a delay and serves queued lines
//! - [`ManualClock`] and [`ScriptedKeys`] simulate a challenge window
//! - [`ScriptedTerminal`] stands in for a raw-mode terminal's event queue

use crate::challenge::Clock;
use crate::console::Console;
use crate::error::AppError;
use crate::indicator::FrameSet;
use crate::input::{InputReadiness, KeySource, LineSource, TerminalEvents, strip_line_ending};
use crate::prompt::{IndicatorSettings, IndicatorStyle};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

/// Settings tuned for fast, deterministic tests: classic frames, 10 ms
/// ticks, no fade and no typewriter delay.
pub fn quiet_settings() -> IndicatorSettings {
    IndicatorSettings {
        style: IndicatorStyle::Fixed(
            FrameSet::builtin("classic").unwrap_or_else(FrameSet::random),
        ),
        tick: Duration::from_millis(10),
        fade: None,
        text_delay: Duration::ZERO,
        readiness_poll: Duration::from_millis(5),
        key_poll: Duration::from_millis(10),
        ..IndicatorSettings::default()
    }
}

/// One write observed by [`RecordingConsole`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Text(String),
    Frame { message: String, frame: String },
    Clear { width: usize },
}

impl ConsoleEvent {
    pub fn is_frame(&self) -> bool {
        matches!(self, ConsoleEvent::Frame { .. })
    }

    pub fn is_clear(&self) -> bool {
        matches!(self, ConsoleEvent::Clear { .. })
    }
}

/// A console event tagged with its position in the global write order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedEvent {
    pub seq: u64,
    pub kind: ConsoleEvent,
}

/// Console that records instead of printing
#[derive(Debug, Default)]
pub struct RecordingConsole {
    events: Vec<RecordedEvent>,
    next_seq: u64,
    fail_frames: bool,
}

impl RecordingConsole {
    pub fn shared() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self::default()))
    }

    /// A console whose frame writes fail, as a closed terminal would
    pub fn failing_frames() -> Self {
        Self {
            fail_frames: true,
            ..Self::default()
        }
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.clone()
    }

    /// Glyphs of every frame drawn, in order
    pub fn frames(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match &e.kind {
                ConsoleEvent::Frame { frame, .. } => Some(frame.clone()),
                _ => None,
            })
            .collect()
    }

    /// Concatenation of all static text
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|e| match &e.kind {
                ConsoleEvent::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn record(&mut self, kind: ConsoleEvent) {
        self.events.push(RecordedEvent {
            seq: self.next_seq,
            kind,
        });
        self.next_seq += 1;
    }
}

impl Console for RecordingConsole {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.record(ConsoleEvent::Text(text.to_string()));
        Ok(())
    }

    fn draw_frame(&mut self, message: &str, frame: &str) -> io::Result<()> {
        if self.fail_frames {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed"));
        }
        self.record(ConsoleEvent::Frame {
            message: message.to_string(),
            frame: frame.to_string(),
        });
        Ok(())
    }

    fn clear_line(&mut self, width: usize) -> io::Result<()> {
        self.record(ConsoleEvent::Clear { width });
        Ok(())
    }
}

/// Input that turns ready after a real-time delay and then serves lines.
///
/// Lines are given with their terminators, like a terminal would deliver
/// them. Once the queue is empty reads report end of input.
#[derive(Debug)]
pub struct ScriptedInput {
    ready_after: Option<Duration>,
    first_check: Option<Instant>,
    lines: VecDeque<String>,
    checks: usize,
}

impl ScriptedInput {
    /// Ready immediately
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::after(Duration::ZERO, lines)
    }

    /// Ready once `delay` has passed since the first readiness check
    pub fn after<I, S>(delay: Duration, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ready_after: Some(delay),
            first_check: None,
            lines: lines.into_iter().map(Into::into).collect(),
            checks: 0,
        }
    }

    /// Stream already at end of input
    pub fn closed() -> Self {
        Self::new(Vec::<String>::new())
    }

    /// Never becomes ready; only an interrupt ends the wait
    pub fn silent() -> Self {
        Self {
            ready_after: None,
            first_check: None,
            lines: VecDeque::new(),
            checks: 0,
        }
    }

    pub fn checks(&self) -> usize {
        self.checks
    }

    /// Makes the input ready again after `delay` for the next queued line
    pub fn rearm(&mut self, delay: Duration) {
        self.ready_after = Some(delay);
        self.first_check = None;
    }
}

impl InputReadiness for ScriptedInput {
    fn input_pending(&mut self, timeout: Duration) -> Result<bool, AppError> {
        self.checks += 1;
        let first = *self.first_check.get_or_insert_with(Instant::now);
        let Some(delay) = self.ready_after else {
            thread::sleep(timeout);
            return Ok(false);
        };
        let elapsed = first.elapsed();
        if elapsed >= delay {
            return Ok(true);
        }
        thread::sleep(timeout.min(delay - elapsed));
        Ok(first.elapsed() >= delay)
    }
}

impl LineSource for ScriptedInput {
    fn read_line(&mut self) -> Result<String, AppError> {
        let mut line = self.lines.pop_front().ok_or(AppError::EndOfInput)?;
        strip_line_ending(&mut line);
        // The next prompt starts a fresh wait
        self.first_check = None;
        Ok(line)
    }
}

/// Simulated monotonic clock; clones share the same time
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, to: Duration) {
        self.nanos.store(to.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::SeqCst))
    }
}

/// Keys injected at fixed simulated times.
///
/// Each `next_key` call moves the shared clock forward by the wait it was
/// given, or only up to the next key's arrival if that comes sooner.
#[derive(Debug)]
pub struct ScriptedKeys {
    clock: ManualClock,
    script: VecDeque<(Duration, char)>,
}

impl ScriptedKeys {
    pub fn new<I>(clock: &ManualClock, script: I) -> Self
    where
        I: IntoIterator<Item = (Duration, char)>,
    {
        let mut script: Vec<(Duration, char)> = script.into_iter().collect();
        script.sort_by_key(|(at, _)| *at);
        Self {
            clock: clock.clone(),
            script: script.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl KeySource for ScriptedKeys {
    fn next_key(&mut self, wait: Duration) -> Result<Option<char>, AppError> {
        let now = self.clock.now();
        match self.script.front() {
            Some(&(at, key)) if at <= now + wait => {
                self.script.pop_front();
                if at > now {
                    self.clock.set(at);
                }
                Ok(Some(key))
            }
            _ => {
                self.clock.advance(wait);
                Ok(None)
            }
        }
    }

    fn discard_pending(&mut self) -> Result<(), AppError> {
        let now = self.clock.now();
        while self.script.front().is_some_and(|&(at, _)| at <= now) {
            self.script.pop_front();
        }
        Ok(())
    }
}

/// Key press with no modifiers
pub fn key_event(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

pub fn char_key(c: char) -> Event {
    key_event(KeyCode::Char(c))
}

pub fn ctrl_key(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}

/// Presses for each character of `text`, one every `gap` from `start`,
/// followed by Enter
pub fn typed_keys(start: Duration, gap: Duration, text: &str) -> Vec<(Duration, Event)> {
    let mut at = start;
    let mut script = Vec::new();
    for c in text.chars() {
        script.push((at, char_key(c)));
        at += gap;
    }
    script.push((at, key_event(KeyCode::Enter)));
    script
}

/// Terminal events arriving at real-time offsets from construction.
///
/// Events due by the time of a read are queued as a terminal would queue
/// them, so [`discard_pending`](TerminalEvents::discard_pending) drops
/// exactly those.
#[derive(Debug)]
pub struct ScriptedTerminal {
    origin: Instant,
    script: VecDeque<(Duration, Event)>,
    releases: usize,
    discarded: usize,
}

impl ScriptedTerminal {
    pub fn new<I>(script: I) -> Self
    where
        I: IntoIterator<Item = (Duration, Event)>,
    {
        let mut script: Vec<(Duration, Event)> = script.into_iter().collect();
        script.sort_by_key(|(at, _)| *at);
        Self {
            origin: Instant::now(),
            script: script.into(),
            releases: 0,
            discarded: 0,
        }
    }

    /// A user typing `text` and pressing Enter, see [`typed_keys`]
    pub fn typing(start: Duration, gap: Duration, text: &str) -> Self {
        Self::new(typed_keys(start, gap, text))
    }

    /// How many times raw mode was given back
    pub fn releases(&self) -> usize {
        self.releases
    }

    pub fn discarded(&self) -> usize {
        self.discarded
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl TerminalEvents for ScriptedTerminal {
    fn next_event(&mut self, wait: Duration) -> Result<Option<Event>, AppError> {
        let elapsed = self.origin.elapsed();
        match self.script.front().map(|(at, _)| *at) {
            Some(at) if at <= elapsed + wait => {
                if at > elapsed {
                    thread::sleep(at - elapsed);
                }
                Ok(self.script.pop_front().map(|(_, event)| event))
            }
            _ => {
                thread::sleep(wait);
                Ok(None)
            }
        }
    }

    fn discard_pending(&mut self) -> Result<usize, AppError> {
        let elapsed = self.origin.elapsed();
        let mut dropped = 0;
        while self.script.front().is_some_and(|(at, _)| *at <= elapsed) {
            self.script.pop_front();
            dropped += 1;
        }
        self.discarded += dropped;
        Ok(dropped)
    }

    fn release(&mut self) {
        self.releases += 1;
    }
}
