use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDeserialize(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    // Indicator configuration errors
    #[error("Indicator frame set must contain at least one frame")]
    EmptyFrameSet,

    // Termination signals raised while waiting for the user
    #[error("End of input reached while waiting for the user")]
    EndOfInput,

    #[error("Interrupted by the user")]
    Interrupted,

    #[error("Indicator thread panicked before it could clean up")]
    IndicatorPanicked,

    #[error("Log setup error: {0}")]
    LogSetup(String),

    #[error("Session task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl AppError {
    /// Create a configuration error with context
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a log setup error with context
    pub fn log_setup_error(msg: impl Into<String>) -> Self {
        Self::LogSetup(msg.into())
    }

    /// Check if error ends the session normally (input closed or Ctrl+C)
    /// rather than indicating a fault.
    pub fn is_termination(&self) -> bool {
        matches!(self, AppError::EndOfInput | AppError::Interrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_helper() {
        let error = AppError::config_error("tick_ms must be positive");
        assert!(matches!(error, AppError::Config(_)));
        assert_eq!(
            error.to_string(),
            "Configuration error: tick_ms must be positive"
        );
    }

    #[test]
    fn test_log_setup_error_helper() {
        let error = AppError::log_setup_error("Failed to create log directory");
        assert!(matches!(error, AppError::LogSetup(_)));
        assert_eq!(
            error.to_string(),
            "Log setup error: Failed to create log directory"
        );
    }

    #[test]
    fn test_termination_classification() {
        assert!(AppError::EndOfInput.is_termination());
        assert!(AppError::Interrupted.is_termination());
        assert!(!AppError::EmptyFrameSet.is_termination());
        assert!(!AppError::IndicatorPanicked.is_termination());
        assert!(!AppError::config_error("x").is_termination());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let error: AppError = io_error.into();
        assert!(matches!(error, AppError::Io(_)));
        assert!(error.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_toml_deserialize_error_conversion() {
        let parse_result: Result<toml::Value, toml::de::Error> = toml::from_str("tick_ms = ");
        let error: AppError = parse_result.unwrap_err().into();
        assert!(matches!(error, AppError::TomlDeserialize(_)));
    }

    #[test]
    fn test_empty_frame_set_message() {
        assert_eq!(
            AppError::EmptyFrameSet.to_string(),
            "Indicator frame set must contain at least one frame"
        );
    }
}
