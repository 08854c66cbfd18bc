use super::Config;
use crate::constants::limits;
use crate::error::AppError;
use crate::indicator::is_known_style;
use std::path::Path;

/// Validates the configuration settings
///
/// # Validation Rules
/// - Tick period must be between 1 ms and `MAX_TICK_MS`
/// - Challenge timeout must be between 1 s and `MAX_CHALLENGE_TIMEOUT_SECONDS`
/// - Text delay cannot exceed `MAX_TEXT_DELAY_MS`
/// - Style must be "random" or a built-in style name
/// - Indicator messages cannot be empty
/// - If log file path is provided, it cannot be empty and its parent
///   directory must exist or be creatable
pub fn validate_config(config: &Config) -> Result<(), AppError> {
    if config.tick_ms == 0 || config.tick_ms > limits::MAX_TICK_MS {
        return Err(AppError::config_error(format!(
            "tick_ms must be between 1 and {}",
            limits::MAX_TICK_MS
        )));
    }

    if config.challenge_timeout_seconds == 0
        || config.challenge_timeout_seconds > limits::MAX_CHALLENGE_TIMEOUT_SECONDS
    {
        return Err(AppError::config_error(format!(
            "challenge_timeout_seconds must be between 1 and {}",
            limits::MAX_CHALLENGE_TIMEOUT_SECONDS
        )));
    }

    if config.text_delay_ms > limits::MAX_TEXT_DELAY_MS {
        return Err(AppError::config_error(format!(
            "text_delay_ms cannot exceed {}",
            limits::MAX_TEXT_DELAY_MS
        )));
    }

    if !is_known_style(&config.indicator_style) {
        return Err(AppError::config_error(format!(
            "Unknown indicator style '{}'",
            config.indicator_style
        )));
    }

    if config.waiting_message.is_empty() || config.challenge_message.is_empty() {
        return Err(AppError::config_error("Indicator messages cannot be empty"));
    }

    // Validate log file path if provided
    if let Some(log_path) = &config.log_file_path {
        if log_path.is_empty() {
            return Err(AppError::config_error("Log file path cannot be empty"));
        }

        // Check if parent directory exists or can be created
        if let Some(parent) = Path::new(log_path).parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::config_error(format!(
                    "Cannot create log directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    Ok(())
}
