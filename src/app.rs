use crate::challenge::{Clock, SystemClock};
use crate::config::Config;
use crate::console::{Console, TerminalConsole};
use crate::error::AppError;
use crate::indicator::ActivityTracker;
use crate::input::{
    InputReadiness, InterruptFlag, KeySource, LineSource, StandardInput, TerminalKeys,
};
use crate::prompt::Prompter;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const EXIT_NAME: &str = "exit";
const CHALLENGE_KEY: char = 'd';

/// Outcome of a finished session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub rounds: u32,
    pub successes: u32,
}

/// Trims and lowercases an answer for comparison
pub fn normalize_answer(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// Run the interactive session on the real terminal.
///
/// - Prompts and challenges run on a blocking task, since they poll stdin
///   and sleep between indicator checks
/// - End of input and Ctrl+C end the session with a goodbye instead of an
///   error
pub async fn run_interactive(config: &Config, interrupt: InterruptFlag) -> Result<(), AppError> {
    let settings = config.indicator_settings()?;
    let frame_color = config.frame_color();
    let timeout = config.challenge_timeout();
    let tracker = ActivityTracker::new();
    let session_tracker = tracker.clone();

    let result = tokio::task::spawn_blocking(move || {
        let console = Arc::new(Mutex::new(
            TerminalConsole::stdout().with_frame_color(frame_color),
        ));
        let input = StandardInput::open(&console)?;
        let mut prompter = Prompter::from_shared(console, input, settings)
            .with_interrupt(interrupt)
            .with_tracker(session_tracker);
        run_session(
            &mut prompter,
            || Ok(TerminalKeys::new()),
            &SystemClock::new(),
            timeout,
        )
    })
    .await?;

    tracing::debug!("Indicator threads still active: {}", tracker.active());

    match result {
        Ok(summary) => {
            tracing::info!(
                "Session finished: {} of {} challenges won",
                summary.successes,
                summary.rounds
            );
            println!("Goodbye, adventurer!");
            Ok(())
        }
        Err(e) if e.is_termination() => {
            tracing::info!("Session ended: {e}");
            println!();
            println!("Goodbye, adventurer!");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// Plays rounds until the player declines another one or enters `exit`
/// as their name. Each round is a name prompt, one timed challenge and an
/// "again?" prompt.
///
/// `make_keys` is called once per challenge and the key source is dropped
/// before the next prompt, so a terminal key source gives raw mode back in
/// time for line input.
pub fn run_session<C, I, K, F>(
    prompter: &mut Prompter<C, I>,
    mut make_keys: F,
    clock: &dyn Clock,
    timeout: Duration,
) -> Result<SessionSummary, AppError>
where
    C: Console + 'static,
    I: InputReadiness + LineSource,
    K: KeySource,
    F: FnMut() -> Result<K, AppError>,
{
    let mut summary = SessionSummary::default();

    loop {
        let name = prompter.prompt("Enter your character name? ")?;
        let name = name.trim();
        if normalize_answer(name) == EXIT_NAME {
            break;
        }
        prompter.say(&format!("Hello {name}!"))?;

        let success = {
            let mut keys = make_keys()?;
            prompter.timed_challenge(
                &mut keys,
                clock,
                &format!("Press '{CHALLENGE_KEY}' before time runs out!"),
                CHALLENGE_KEY,
                timeout,
            )?
        };
        summary.rounds += 1;
        if success {
            summary.successes += 1;
            prompter.say("Success!")?;
        } else {
            prompter.say("Failed! Time ran out.")?;
        }

        let again = normalize_answer(&prompter.prompt("Play again? [yes/no] ")?);
        if again != "yes" && again != "y" {
            break;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::{
        ManualClock, RecordingConsole, ScriptedInput, ScriptedKeys, quiet_settings,
    };

    fn prompter(lines: &[&str]) -> Prompter<RecordingConsole, ScriptedInput> {
        Prompter::new(
            RecordingConsole::default(),
            ScriptedInput::new(lines.iter().copied()),
            quiet_settings(),
        )
    }

    #[test]
    fn test_normalize_answer() {
        assert_eq!(normalize_answer("  Forest \n"), "forest");
        assert_eq!(normalize_answer("YES"), "yes");
        assert_eq!(normalize_answer(""), "");
    }

    #[test]
    fn test_exit_name_ends_session() {
        let mut prompter = prompter(&["EXIT\n"]);
        let clock = ManualClock::new();
        let summary = run_session(
            &mut prompter,
            || Ok(ScriptedKeys::new(&clock, Vec::new())),
            &clock,
            Duration::from_secs(5),
        )
        .unwrap();
        assert_eq!(summary, SessionSummary::default());
        let text = prompter.console().lock().unwrap().text();
        assert!(!text.contains("Press 'd'"));
    }

    #[test]
    fn test_challenge_won_then_declined() {
        let mut prompter = prompter(&[" Ada \n", "no\n"]);
        let clock = ManualClock::new();
        let summary = run_session(
            &mut prompter,
            || {
                let at = clock.now() + Duration::from_millis(400);
                Ok(ScriptedKeys::new(&clock, [(at, 'D')]))
            },
            &clock,
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            summary,
            SessionSummary {
                rounds: 1,
                successes: 1
            }
        );
        let text = prompter.console().lock().unwrap().text();
        assert!(text.contains("Hello Ada!\n"));
        assert!(text.contains("Success!"));
    }

    #[test]
    fn test_missed_challenge_then_another_round() {
        let mut prompter = prompter(&["Ada\n", "YES\n", "Bo\n", "n\n"]);
        let clock = ManualClock::new();
        let summary = run_session(
            &mut prompter,
            || Ok(ScriptedKeys::new(&clock, Vec::new())),
            &clock,
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            summary,
            SessionSummary {
                rounds: 2,
                successes: 0
            }
        );
        let text = prompter.console().lock().unwrap().text();
        assert_eq!(text.matches("Failed! Time ran out.").count(), 2);
        assert!(text.contains("Hello Bo!"));
    }

    #[test]
    fn test_end_of_input_ends_with_termination_error() {
        let mut prompter = prompter(&["Ada\n"]);
        let clock = ManualClock::new();
        let result = run_session(
            &mut prompter,
            || Ok(ScriptedKeys::new(&clock, Vec::new())),
            &clock,
            Duration::from_secs(5),
        );
        let error = result.unwrap_err();
        assert!(matches!(error, AppError::EndOfInput));
        assert!(error.is_termination());
    }

    #[test]
    fn test_key_source_failure_propagates() {
        let mut prompter = prompter(&["Ada\n"]);
        let clock = ManualClock::new();
        let result = run_session(
            &mut prompter,
            || -> Result<ScriptedKeys, AppError> {
                Err(std::io::Error::other("no terminal").into())
            },
            &clock,
            Duration::from_secs(5),
        );
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
