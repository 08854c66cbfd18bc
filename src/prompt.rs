//! Prompted line input with a live waiting indicator.
//!
//! A prompt call writes its text, starts an [`IndicatorSession`], polls the
//! input for readiness, stops and joins the indicator, and only then does a
//! single blocking line read. The indicator is joined on every path out of
//! the wait, including end of input and interruption, so a caller's next
//! write can never interleave with a stray frame.

use crate::console::Console;
use crate::constants::{
    DEFAULT_CHALLENGE_MESSAGE, DEFAULT_TICK_MS, DEFAULT_WAITING_MESSAGE, polling,
};
use crate::error::AppError;
use crate::indicator::{
    ActivityTracker, FadeSequence, FrameSet, IndicatorSession, IndicatorSpec, StopMode,
};
use crate::input::{InputReadiness, InterruptFlag, LineSource};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// Which frames a prompt shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndicatorStyle {
    /// A fresh random built-in style per prompt
    Random,
    Fixed(FrameSet),
}

/// Runtime settings for prompts and challenges
#[derive(Debug, Clone)]
pub struct IndicatorSettings {
    pub style: IndicatorStyle,
    pub tick: Duration,
    pub waiting_message: String,
    pub challenge_message: String,
    /// Played on a graceful stop; `None` stops immediately
    pub fade: Option<FadeSequence>,
    /// Delay between prompt characters; zero writes the prompt at once
    pub text_delay: Duration,
    pub readiness_poll: Duration,
    pub key_poll: Duration,
}

impl IndicatorSettings {
    /// Frames for the next prompt, resolving the random style
    pub fn frames_for_prompt(&self) -> FrameSet {
        match &self.style {
            IndicatorStyle::Random => FrameSet::random(),
            IndicatorStyle::Fixed(frames) => frames.clone(),
        }
    }
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            style: IndicatorStyle::Random,
            tick: Duration::from_millis(DEFAULT_TICK_MS),
            waiting_message: DEFAULT_WAITING_MESSAGE.to_string(),
            challenge_message: DEFAULT_CHALLENGE_MESSAGE.to_string(),
            fade: Some(FadeSequence::default()),
            text_delay: Duration::ZERO,
            readiness_poll: Duration::from_millis(polling::READINESS_MS),
            key_poll: Duration::from_millis(polling::CHALLENGE_KEY_MS),
        }
    }
}

/// Drives prompts against a console and an input source
pub struct Prompter<C: Console + 'static, I> {
    pub(crate) console: Arc<Mutex<C>>,
    input: I,
    pub(crate) settings: IndicatorSettings,
    pub(crate) interrupt: InterruptFlag,
    pub(crate) tracker: Option<ActivityTracker>,
}

impl<C: Console + 'static, I> Prompter<C, I> {
    pub fn new(console: C, input: I, settings: IndicatorSettings) -> Self {
        Self::from_shared(Arc::new(Mutex::new(console)), input, settings)
    }

    /// Builds a prompter around a console the caller keeps a handle to
    pub fn from_shared(console: Arc<Mutex<C>>, input: I, settings: IndicatorSettings) -> Self {
        Self {
            console,
            input,
            settings,
            interrupt: InterruptFlag::new(),
            tracker: None,
        }
    }

    pub fn with_interrupt(mut self, interrupt: InterruptFlag) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Counts live indicator threads in `tracker`
    pub fn with_tracker(mut self, tracker: ActivityTracker) -> Self {
        self.tracker = Some(tracker);
        self
    }

    pub fn settings(&self) -> &IndicatorSettings {
        &self.settings
    }

    pub fn console(&self) -> &Arc<Mutex<C>> {
        &self.console
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    /// Writes `text` as its own line, typewriter-style if a text delay is set
    pub fn say(&self, text: &str) -> Result<(), AppError> {
        if self.settings.text_delay.is_zero() {
            self.write(text)?;
        } else {
            let mut buf = [0u8; 4];
            for c in text.chars() {
                self.write(c.encode_utf8(&mut buf))?;
                thread::sleep(self.settings.text_delay);
            }
        }
        if !text.ends_with('\n') {
            self.write("\n")?;
        }
        Ok(())
    }

    pub(crate) fn write(&self, text: &str) -> Result<(), AppError> {
        let mut console = self
            .console
            .lock()
            .map_err(|_| std::io::Error::other("console lock poisoned"))?;
        console.write_text(text)?;
        Ok(())
    }

    /// Fails fast if an interrupt arrived between calls
    pub(crate) fn check_interrupt(&self) -> Result<(), AppError> {
        if self.interrupt.is_raised() {
            return Err(AppError::Interrupted);
        }
        Ok(())
    }
}

impl<C, I> Prompter<C, I>
where
    C: Console + 'static,
    I: InputReadiness + LineSource,
{
    /// Prompts with the configured style, tick and waiting message
    pub fn prompt(&mut self, prompt_text: &str) -> Result<String, AppError> {
        let spec = IndicatorSpec::new(
            self.settings.frames_for_prompt(),
            self.settings.tick,
            self.settings.waiting_message.clone(),
        )?;
        self.prompt_with_spec(prompt_text, spec)
    }

    /// Prompts with an explicit frame set, tick period and indicator message.
    ///
    /// The frames and tick are validated before anything is written. The
    /// returned line has its terminator removed and is otherwise exactly as
    /// typed.
    pub fn prompt_with_indicator<S: AsRef<str>>(
        &mut self,
        prompt_text: &str,
        frames: &[S],
        tick: Duration,
        message: &str,
    ) -> Result<String, AppError> {
        let frames = FrameSet::new(frames.iter().map(|f| f.as_ref().to_string()))?;
        let spec = IndicatorSpec::new(frames, tick, message)?;
        self.prompt_with_spec(prompt_text, spec)
    }

    fn prompt_with_spec(
        &mut self,
        prompt_text: &str,
        spec: IndicatorSpec,
    ) -> Result<String, AppError> {
        self.check_interrupt()?;
        self.say(prompt_text)?;

        let spec = spec.with_fade(self.settings.fade);
        let session =
            IndicatorSession::start(Arc::clone(&self.console), spec, self.tracker.as_ref())?;

        let waited = self.wait_for_input();
        let mode = if waited.is_ok() {
            StopMode::Graceful
        } else {
            StopMode::Immediate
        };
        let stopped = session.stop(mode);
        waited?;
        let report = stopped?;
        tracing::debug!(
            "Input detected after {} indicator frames",
            report.frames_drawn
        );

        let line = self.input.read_line();
        self.check_interrupt()?;
        line
    }

    fn wait_for_input(&mut self) -> Result<(), AppError> {
        loop {
            self.check_interrupt()?;
            if self.input.input_pending(self.settings.readiness_poll)? {
                return Ok(());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{ConsoleEvent, RecordingConsole, ScriptedInput, quiet_settings};

    fn prompter(input: ScriptedInput) -> Prompter<RecordingConsole, ScriptedInput> {
        Prompter::new(RecordingConsole::default(), input, quiet_settings())
    }

    #[test]
    fn test_returns_line_without_terminator() {
        let mut prompter = prompter(ScriptedInput::new(["Ada\n"]));
        let line = prompter
            .prompt_with_indicator(
                "Name? ",
                &["|", "/", "-", "\\"],
                Duration::from_millis(10),
                "Waiting...",
            )
            .unwrap();
        assert_eq!(line, "Ada");
    }

    #[test]
    fn test_line_returned_raw() {
        let mut prompter = prompter(ScriptedInput::new(["  Forest \n"]));
        let line = prompter.prompt("Choose a path: ").unwrap();
        assert_eq!(line, "  Forest ");
    }

    #[test]
    fn test_empty_frames_rejected_before_output() {
        let mut prompter = prompter(ScriptedInput::new(["Ada\n"]));
        let frames: [&str; 0] = [];
        let result =
            prompter.prompt_with_indicator("Name? ", &frames, Duration::from_millis(10), "x");
        assert!(matches!(result, Err(AppError::EmptyFrameSet)));
        assert!(prompter.console().lock().unwrap().events().is_empty());
    }

    #[test]
    fn test_zero_tick_rejected_before_output() {
        let mut prompter = prompter(ScriptedInput::new(["Ada\n"]));
        let result = prompter.prompt_with_indicator("Name? ", &["|"], Duration::ZERO, "x");
        assert!(matches!(result, Err(AppError::Config(_))));
        assert!(prompter.console().lock().unwrap().events().is_empty());
    }

    #[test]
    fn test_prompt_text_written_first_on_own_line() {
        let mut prompter = prompter(ScriptedInput::new(["Ada\n"]));
        prompter.prompt("Name? ").unwrap();
        let events = prompter.console().lock().unwrap().events();
        assert_eq!(events[0].kind, ConsoleEvent::Text("Name? ".to_string()));
        assert_eq!(events[1].kind, ConsoleEvent::Text("\n".to_string()));
    }

    #[test]
    fn test_end_of_input_propagates() {
        let tracker = ActivityTracker::new();
        let mut prompter = prompter(ScriptedInput::closed()).with_tracker(tracker.clone());
        let result = prompter.prompt("Name? ");
        assert!(matches!(result, Err(AppError::EndOfInput)));
        assert_eq!(tracker.active(), 0);
    }

    #[test]
    fn test_pending_interrupt_fails_fast() {
        let interrupt = InterruptFlag::new();
        interrupt.raise();
        let mut prompter = prompter(ScriptedInput::new(["Ada\n"])).with_interrupt(interrupt);
        assert!(matches!(prompter.prompt("Name? "), Err(AppError::Interrupted)));
        assert!(prompter.console().lock().unwrap().events().is_empty());
    }

    #[test]
    fn test_typewriter_writes_per_char() {
        let mut settings = quiet_settings();
        settings.text_delay = Duration::from_millis(1);
        let prompter = Prompter::new(RecordingConsole::default(), ScriptedInput::closed(), settings);
        prompter.say("abc").unwrap();
        let text: Vec<ConsoleEvent> = prompter
            .console()
            .lock()
            .unwrap()
            .events()
            .into_iter()
            .map(|e| e.kind)
            .collect();
        assert_eq!(
            text,
            vec![
                ConsoleEvent::Text("a".to_string()),
                ConsoleEvent::Text("b".to_string()),
                ConsoleEvent::Text("c".to_string()),
                ConsoleEvent::Text("\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_default_settings_use_random_style_and_fade() {
        let settings = IndicatorSettings::default();
        assert_eq!(settings.style, IndicatorStyle::Random);
        assert!(settings.fade.is_some());
        assert_eq!(settings.tick, Duration::from_millis(DEFAULT_TICK_MS));
        assert!(settings.text_delay.is_zero());
    }

    #[test]
    fn test_fixed_style_resolves_to_same_frames() {
        let frames = FrameSet::builtin("quarter").unwrap();
        let settings = IndicatorSettings {
            style: IndicatorStyle::Fixed(frames.clone()),
            ..IndicatorSettings::default()
        };
        assert_eq!(settings.frames_for_prompt(), frames);
    }
}
