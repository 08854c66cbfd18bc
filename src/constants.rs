//! Application-wide constants and configuration values
//!
//! This module centralizes the timing values, default messages and
//! environment variable names used by the prompt and challenge code.

/// Default interval between indicator repaints in milliseconds
pub const DEFAULT_TICK_MS: u64 = 100;

/// Default window for a timed reaction challenge in seconds
pub const DEFAULT_CHALLENGE_TIMEOUT_SECONDS: u64 = 5;

/// Default delay between characters of typewriter-style prompt text
pub const DEFAULT_TEXT_DELAY_MS: u64 = 30;

/// Message shown beside the indicator while waiting for a line
pub const DEFAULT_WAITING_MESSAGE: &str = "Waiting for input...";

/// Message shown beside the indicator during a timed challenge
pub const DEFAULT_CHALLENGE_MESSAGE: &str = "React now! ";

/// Style name that selects a random built-in frame set per prompt
pub const RANDOM_STYLE: &str = "random";

/// Extra blanks written past the rendered frame when erasing the line
pub const CLEAR_PADDING: usize = 2;

/// Polling intervals in milliseconds
pub mod polling {
    /// How long a single readiness check may wait for input
    pub const READINESS_MS: u64 = 20;

    /// Upper bound on a single key wait during a timed challenge
    pub const CHALLENGE_KEY_MS: u64 = 50;

    /// Wait per terminal event while a line is being edited
    pub const LINE_EVENT_MS: u64 = 100;
}

/// Fade-out shape used when the indicator stops gracefully
pub mod fade {
    /// Number of repaints in the fade sequence
    pub const STEPS: usize = 4;

    /// First (longest) fade interval in milliseconds
    pub const INITIAL_MS: u64 = 80;

    /// Multiplier applied to each successive interval
    pub const FACTOR: f64 = 0.6;
}

/// Validation limits for configuration values
pub mod limits {
    pub const MAX_TICK_MS: u64 = 2000;
    pub const MAX_CHALLENGE_TIMEOUT_SECONDS: u64 = 60;
    pub const MAX_TEXT_DELAY_MS: u64 = 500;
}

/// Environment variable names
pub mod env_vars {
    /// Environment variable for tick period override
    pub const TICK_MS: &str = "WIZARD_TICK_MS";

    /// Environment variable for indicator style override
    pub const STYLE: &str = "WIZARD_STYLE";

    /// Environment variable for log file path override
    pub const LOG_FILE: &str = "WIZARD_LOG_FILE";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_polling_constants_are_reasonable() {
        // Readiness checks must fit well inside a tick so the indicator
        // stops promptly once typing starts
        assert!(polling::READINESS_MS < DEFAULT_TICK_MS);
        assert!(polling::CHALLENGE_KEY_MS < DEFAULT_CHALLENGE_TIMEOUT_SECONDS * 1000);
    }

    #[test]
    fn test_fade_is_bounded() {
        let mut total = 0.0;
        let mut interval = fade::INITIAL_MS as f64;
        for _ in 0..fade::STEPS {
            total += interval;
            interval *= fade::FACTOR;
        }
        assert!(fade::FACTOR > 0.0 && fade::FACTOR < 1.0);
        assert!(total < 500.0, "fade should finish in well under a second");
    }

    #[test]
    fn test_defaults_within_limits() {
        assert!(DEFAULT_TICK_MS <= limits::MAX_TICK_MS);
        assert!(DEFAULT_CHALLENGE_TIMEOUT_SECONDS <= limits::MAX_CHALLENGE_TIMEOUT_SECONDS);
        assert!(DEFAULT_TEXT_DELAY_MS <= limits::MAX_TEXT_DELAY_MS);
    }

    #[test]
    fn test_env_var_names_share_prefix() {
        for name in [env_vars::TICK_MS, env_vars::STYLE, env_vars::LOG_FILE] {
            assert!(name.starts_with("WIZARD_"));
        }
    }
}
