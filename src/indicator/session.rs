//! Background indicator thread and its cooperative stop/suspend protocol.
//!
//! One [`IndicatorSession`] exists per prompt call. The thread repaints the
//! current line on every tick until a stop is requested, optionally plays a
//! short fade, then erases the line and exits. [`IndicatorSession::stop`]
//! joins the thread, so once it returns no further indicator writes can
//! happen.

use super::fade::FadeSequence;
use super::frames::{FrameCycle, FrameSet};
use crate::console::Console;
use crate::constants::CLEAR_PADDING;
use crate::error::AppError;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const STOP_NONE: u8 = 0;
const STOP_GRACEFUL: u8 = 1;
const STOP_NOW: u8 = 2;

/// Everything the indicator thread needs to paint itself
#[derive(Debug, Clone)]
pub struct IndicatorSpec {
    frames: FrameSet,
    tick: Duration,
    message: String,
    fade: Option<FadeSequence>,
}

impl IndicatorSpec {
    /// Validates the tick period; the frame set is already known non-empty
    pub fn new(
        frames: FrameSet,
        tick: Duration,
        message: impl Into<String>,
    ) -> Result<Self, AppError> {
        if tick.is_zero() {
            return Err(AppError::config_error(
                "Indicator tick period must be positive",
            ));
        }
        Ok(Self {
            frames,
            tick,
            message: message.into(),
            fade: None,
        })
    }

    /// Plays `fade` when the session is stopped gracefully
    pub fn with_fade(mut self, fade: Option<FadeSequence>) -> Self {
        self.fade = fade;
        self
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Number of blanks needed to fully erase any rendered frame
    pub fn clear_width(&self) -> usize {
        self.message.chars().count() + self.frames.max_width() + CLEAR_PADDING
    }
}

/// Lifecycle of a single indicator session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum IndicatorState {
    Idle = 0,
    Running = 1,
    Fading = 2,
    Stopping = 3,
    Stopped = 4,
}

impl IndicatorState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Running,
            2 => Self::Fading,
            3 => Self::Stopping,
            4 => Self::Stopped,
            _ => Self::Idle,
        }
    }
}

/// How a stop request should end the animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopMode {
    /// Erase the line at the next flag check
    Immediate,
    /// Play the configured fade first, if any
    Graceful,
}

/// Summary returned once the indicator thread has been joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorReport {
    pub frames_drawn: usize,
}

/// Shared counter of live indicator threads.
///
/// The count drops only after the thread has written its final clear, so a
/// zero reading after `stop` confirms nothing is left running.
#[derive(Debug, Clone, Default)]
pub struct ActivityTracker {
    active: Arc<AtomicUsize>,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> usize {
        self.active.load(Ordering::SeqCst)
    }

    fn enter(&self) -> ActivityGuard {
        self.active.fetch_add(1, Ordering::SeqCst);
        ActivityGuard {
            active: Arc::clone(&self.active),
        }
    }
}

struct ActivityGuard {
    active: Arc<AtomicUsize>,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct Control {
    stop: AtomicU8,
    suspended: AtomicBool,
    state: AtomicU8,
    frames_drawn: AtomicUsize,
}

impl Control {
    fn stop_request(&self) -> u8 {
        self.stop.load(Ordering::Acquire)
    }

    fn set_state(&self, state: IndicatorState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

/// Handle to a running indicator thread
pub struct IndicatorSession {
    control: Arc<Control>,
    handle: Option<JoinHandle<()>>,
}

impl IndicatorSession {
    /// Spawns the indicator thread. The first frame is painted right away.
    pub fn start<C>(
        console: Arc<Mutex<C>>,
        spec: IndicatorSpec,
        tracker: Option<&ActivityTracker>,
    ) -> Result<Self, AppError>
    where
        C: Console + 'static,
    {
        let control = Arc::new(Control::default());
        let guard = tracker.map(ActivityTracker::enter);
        let thread_control = Arc::clone(&control);

        tracing::debug!(
            "Starting indicator '{}' with {} frames every {:?}",
            spec.message,
            spec.frames.len(),
            spec.tick
        );

        let handle = thread::Builder::new()
            .name("indicator".to_string())
            .spawn(move || {
                animate(&console, &spec, &thread_control);
                drop(guard);
            })?;

        Ok(Self {
            control,
            handle: Some(handle),
        })
    }

    pub fn state(&self) -> IndicatorState {
        IndicatorState::from_u8(self.control.state.load(Ordering::Acquire))
    }

    pub fn frames_drawn(&self) -> usize {
        self.control.frames_drawn.load(Ordering::Acquire)
    }

    /// Pauses repaints without ending the thread.
    ///
    /// Library API for callers that need the line for something else while
    /// a wait continues. The prompt and challenge flows never pause: they
    /// stop the session once their wait is over.
    pub fn suspend(&self) {
        self.control.suspended.store(true, Ordering::Release);
    }

    /// Restarts repaints paused by [`suspend`](Self::suspend)
    pub fn resume(&self) {
        self.control.suspended.store(false, Ordering::Release);
        self.wake();
    }

    pub fn is_suspended(&self) -> bool {
        self.control.suspended.load(Ordering::Acquire)
    }

    /// Requests a stop and waits for the thread to erase its line and exit
    pub fn stop(mut self, mode: StopMode) -> Result<IndicatorReport, AppError> {
        self.request_stop(mode);
        let joined = match self.handle.take() {
            Some(handle) => handle.join(),
            None => Ok(()),
        };
        let report = IndicatorReport {
            frames_drawn: self.frames_drawn(),
        };
        match joined {
            Ok(()) => {
                tracing::debug!("Indicator stopped after {} frames", report.frames_drawn);
                Ok(report)
            }
            Err(_) => {
                tracing::error!("Indicator thread panicked");
                Err(AppError::IndicatorPanicked)
            }
        }
    }

    fn request_stop(&self, mode: StopMode) {
        let code = match mode {
            StopMode::Immediate => STOP_NOW,
            StopMode::Graceful => STOP_GRACEFUL,
        };
        // An immediate request overrides a graceful one already in flight
        self.control.stop.fetch_max(code, Ordering::AcqRel);
        self.wake();
    }

    fn wake(&self) {
        if let Some(handle) = &self.handle {
            handle.thread().unpark();
        }
    }
}

impl Drop for IndicatorSession {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.control.stop.store(STOP_NOW, Ordering::Release);
            handle.thread().unpark();
            let _ = handle.join();
        }
    }
}

fn animate<C: Console>(console: &Mutex<C>, spec: &IndicatorSpec, control: &Control) {
    control.set_state(IndicatorState::Running);
    let mut cycle = spec.frames.cycle();

    loop {
        match control.stop_request() {
            STOP_NOW => break,
            STOP_GRACEFUL => {
                if let Some(fade) = spec.fade
                    && !control.suspended.load(Ordering::Acquire)
                {
                    control.set_state(IndicatorState::Fading);
                    play_fade(console, spec, control, &mut cycle, &fade);
                }
                break;
            }
            _ => {}
        }

        if !control.suspended.load(Ordering::Acquire) {
            if !paint(console, spec, control, cycle.current_frame()) {
                break;
            }
            cycle.advance();
        }

        wait_until(Instant::now() + spec.tick, || {
            control.stop_request() != STOP_NONE
        });
    }

    control.set_state(IndicatorState::Stopping);
    match console.lock() {
        Ok(mut console) => {
            if let Err(e) = console.clear_line(spec.clear_width()) {
                tracing::warn!("Failed to clear indicator line: {e}");
            }
        }
        Err(_) => tracing::warn!("Console lock poisoned; indicator line left as is"),
    }
    control.set_state(IndicatorState::Stopped);
}

fn play_fade<C: Console>(
    console: &Mutex<C>,
    spec: &IndicatorSpec,
    control: &Control,
    cycle: &mut FrameCycle,
    fade: &FadeSequence,
) {
    for interval in fade.intervals() {
        if control.stop_request() == STOP_NOW {
            return;
        }
        if !paint(console, spec, control, cycle.current_frame()) {
            return;
        }
        cycle.advance();
        wait_until(Instant::now() + interval, || control.stop_request() == STOP_NOW);
    }
}

/// Paints one frame; returns false if the console is no longer usable
fn paint<C: Console>(console: &Mutex<C>, spec: &IndicatorSpec, control: &Control, frame: &str) -> bool {
    let Ok(mut console) = console.lock() else {
        return false;
    };
    match console.draw_frame(&spec.message, frame) {
        Ok(()) => {
            control.frames_drawn.fetch_add(1, Ordering::AcqRel);
            true
        }
        Err(e) => {
            tracing::warn!("Indicator write failed, stopping animation: {e}");
            false
        }
    }
}

/// Parks until `deadline` or until `interrupted` reports true
fn wait_until(deadline: Instant, interrupted: impl Fn() -> bool) {
    loop {
        if interrupted() {
            return;
        }
        let now = Instant::now();
        if now >= deadline {
            return;
        }
        thread::park_timeout(deadline - now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{ConsoleEvent, RecordingConsole};

    fn spec(tick_ms: u64) -> IndicatorSpec {
        IndicatorSpec::new(
            FrameSet::new(["|", "/", "-", "\\"]).unwrap(),
            Duration::from_millis(tick_ms),
            "Waiting...",
        )
        .unwrap()
    }

    #[test]
    fn test_zero_tick_rejected() {
        let frames = FrameSet::new(["|"]).unwrap();
        let result = IndicatorSpec::new(frames, Duration::ZERO, "x");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_clear_width_covers_message_and_widest_frame() {
        let frames = FrameSet::new(["a", "...."]).unwrap();
        let spec = IndicatorSpec::new(frames, Duration::from_millis(10), "abc").unwrap();
        assert_eq!(spec.clear_width(), 3 + 4 + CLEAR_PADDING);
    }

    #[test]
    fn test_stop_clears_line_and_reaches_stopped() {
        let console = RecordingConsole::shared();
        let session = IndicatorSession::start(console.clone(), spec(10), None).unwrap();
        thread::sleep(Duration::from_millis(45));
        let report = session.stop(StopMode::Immediate).unwrap();

        let events = console.lock().unwrap().events();
        assert!(report.frames_drawn >= 2);
        assert!(matches!(
            events.last().map(|e| &e.kind),
            Some(ConsoleEvent::Clear { width }) if *width == spec(10).clear_width()
        ));
    }

    #[test]
    fn test_first_frame_painted_immediately() {
        let console = RecordingConsole::shared();
        let session = IndicatorSession::start(console.clone(), spec(1000), None).unwrap();
        thread::sleep(Duration::from_millis(30));
        assert_eq!(session.frames_drawn(), 1);
        assert_eq!(session.state(), IndicatorState::Running);
        session.stop(StopMode::Immediate).unwrap();
    }

    #[test]
    fn test_stop_latency_bounded_by_wakeup() {
        let console = RecordingConsole::shared();
        let session = IndicatorSession::start(console, spec(5_000), None).unwrap();
        thread::sleep(Duration::from_millis(20));
        let started = Instant::now();
        session.stop(StopMode::Immediate).unwrap();
        assert!(
            started.elapsed() < Duration::from_millis(1_000),
            "stop should not wait out a full 5s tick"
        );
    }

    #[test]
    fn test_tracker_returns_to_zero() {
        let tracker = ActivityTracker::new();
        let console = RecordingConsole::shared();
        let session = IndicatorSession::start(console, spec(10), Some(&tracker)).unwrap();
        assert_eq!(tracker.active(), 1);
        session.stop(StopMode::Immediate).unwrap();
        assert_eq!(tracker.active(), 0);
    }

    #[test]
    fn test_drop_joins_thread() {
        let tracker = ActivityTracker::new();
        let console = RecordingConsole::shared();
        {
            let _session = IndicatorSession::start(console.clone(), spec(10), Some(&tracker)).unwrap();
            thread::sleep(Duration::from_millis(15));
        }
        assert_eq!(tracker.active(), 0);
        let events = console.lock().unwrap().events();
        assert!(matches!(events.last().map(|e| &e.kind), Some(ConsoleEvent::Clear { .. })));
    }

    #[test]
    fn test_suspend_pauses_repaints() {
        let console = RecordingConsole::shared();
        let session = IndicatorSession::start(console.clone(), spec(5), None).unwrap();
        thread::sleep(Duration::from_millis(20));
        session.suspend();
        assert!(session.is_suspended());
        // Let any tick already in flight land before sampling
        thread::sleep(Duration::from_millis(15));
        let paused_at = session.frames_drawn();
        thread::sleep(Duration::from_millis(40));
        assert_eq!(session.frames_drawn(), paused_at);

        session.resume();
        thread::sleep(Duration::from_millis(30));
        assert!(session.frames_drawn() > paused_at);
        session.stop(StopMode::Immediate).unwrap();
    }

    #[test]
    fn test_stop_wins_over_suspend() {
        let tracker = ActivityTracker::new();
        let console = RecordingConsole::shared();
        let session = IndicatorSession::start(console.clone(), spec(10), Some(&tracker)).unwrap();
        session.suspend();
        session.stop(StopMode::Graceful).unwrap();
        assert_eq!(tracker.active(), 0);
        let events = console.lock().unwrap().events();
        assert!(matches!(events.last().map(|e| &e.kind), Some(ConsoleEvent::Clear { .. })));
    }

    #[test]
    fn test_graceful_stop_plays_fade() {
        let fade = FadeSequence::new(3, Duration::from_millis(12), 0.5);
        let console = RecordingConsole::shared();
        let session = IndicatorSession::start(
            console.clone(),
            spec(1_000).with_fade(Some(fade)),
            None,
        )
        .unwrap();
        thread::sleep(Duration::from_millis(20));
        let before = session.frames_drawn();
        let report = session.stop(StopMode::Graceful).unwrap();
        assert_eq!(report.frames_drawn, before + fade.steps());

        let events = console.lock().unwrap().events();
        assert!(matches!(events.last().map(|e| &e.kind), Some(ConsoleEvent::Clear { .. })));
    }

    #[test]
    fn test_graceful_without_fade_is_immediate() {
        let console = RecordingConsole::shared();
        let session = IndicatorSession::start(console, spec(1_000), None).unwrap();
        thread::sleep(Duration::from_millis(20));
        let report = session.stop(StopMode::Graceful).unwrap();
        assert_eq!(report.frames_drawn, 1);
    }
}
