//! Timed reaction challenge: press the expected key before the deadline.
//!
//! The indicator runs for the whole window and is stopped and joined before
//! the outcome is returned. Missing the deadline is an ordinary `false`
//! result, not an error. Keys typed before the window opens never count,
//! and keys left over when it closes are dropped with it.

use crate::console::Console;
use crate::error::AppError;
use crate::indicator::{FrameSet, IndicatorSession, IndicatorSpec, StopMode};
use crate::input::{KeySource, keys_match};
use crate::prompt::Prompter;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source, injectable so deadlines can be simulated
pub trait Clock: Send + Sync {
    /// Time elapsed since an arbitrary fixed origin
    fn now(&self) -> Duration;
}

/// Wall-clock time measured from construction
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

impl<C: Console + 'static, I> Prompter<C, I> {
    /// Runs a challenge with the configured style and challenge message.
    ///
    /// Returns `true` the moment `expected` (any case) is pressed, `false`
    /// once `timeout` has elapsed on `clock`.
    pub fn timed_challenge<K: KeySource + ?Sized>(
        &self,
        keys: &mut K,
        clock: &dyn Clock,
        prompt_text: &str,
        expected: char,
        timeout: Duration,
    ) -> Result<bool, AppError> {
        let spec = IndicatorSpec::new(
            self.settings.frames_for_prompt(),
            self.settings.tick,
            self.settings.challenge_message.clone(),
        )?;
        self.run_challenge(keys, clock, prompt_text, spec, expected, timeout)
    }

    /// Runs a challenge with an explicit frame set, tick and message
    #[allow(clippy::too_many_arguments)]
    pub fn timed_challenge_with_indicator<K: KeySource + ?Sized, S: AsRef<str>>(
        &self,
        keys: &mut K,
        clock: &dyn Clock,
        prompt_text: &str,
        frames: &[S],
        tick: Duration,
        message: &str,
        expected: char,
        timeout: Duration,
    ) -> Result<bool, AppError> {
        let frames = FrameSet::new(frames.iter().map(|f| f.as_ref().to_string()))?;
        let spec = IndicatorSpec::new(frames, tick, message)?;
        self.run_challenge(keys, clock, prompt_text, spec, expected, timeout)
    }

    fn run_challenge<K: KeySource + ?Sized>(
        &self,
        keys: &mut K,
        clock: &dyn Clock,
        prompt_text: &str,
        spec: IndicatorSpec,
        expected: char,
        timeout: Duration,
    ) -> Result<bool, AppError> {
        self.check_interrupt()?;
        self.say(prompt_text)?;
        keys.discard_pending()?;

        let session =
            IndicatorSession::start(Arc::clone(&self.console), spec, self.tracker.as_ref())?;
        let outcome = self.await_key(keys, clock, expected, timeout);
        let stopped = session.stop(StopMode::Immediate);
        let success = outcome?;
        stopped?;
        keys.discard_pending()?;
        Ok(success)
    }

    fn await_key<K: KeySource + ?Sized>(
        &self,
        keys: &mut K,
        clock: &dyn Clock,
        expected: char,
        timeout: Duration,
    ) -> Result<bool, AppError> {
        let start = clock.now();
        loop {
            self.check_interrupt()?;

            let elapsed = clock.now().saturating_sub(start);
            if elapsed >= timeout {
                tracing::info!("Challenge for '{expected}' timed out after {timeout:?}");
                return Ok(false);
            }

            let wait = (timeout - elapsed).min(self.settings.key_poll);
            match keys.next_key(wait)? {
                Some(key) if keys_match(key, expected) => {
                    let reaction = clock.now().saturating_sub(start);
                    tracing::info!("Challenge key '{key}' pressed after {reaction:?}");
                    return Ok(true);
                }
                Some(key) => tracing::debug!("Ignoring key '{key}', waiting for '{expected}'"),
                None => {}
            }
        }
    }
}
