use crate::constants::{
    DEFAULT_CHALLENGE_MESSAGE, DEFAULT_CHALLENGE_TIMEOUT_SECONDS, DEFAULT_TEXT_DELAY_MS,
    DEFAULT_TICK_MS, DEFAULT_WAITING_MESSAGE, RANDOM_STYLE, env_vars,
};
use crate::error::AppError;
use crate::indicator::{FadeSequence, FrameSet};
use crate::prompt::{IndicatorSettings, IndicatorStyle};
use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the application.
/// Handles loading, saving, and managing indicator and challenge settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Interval between indicator repaints in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// Built-in indicator style name, or "random" for a new pick per prompt.
    #[serde(default = "default_style")]
    pub indicator_style: String,
    /// Message shown beside the indicator while waiting for a line.
    #[serde(default = "default_waiting_message")]
    pub waiting_message: String,
    /// Message shown beside the indicator during a timed challenge.
    #[serde(default = "default_challenge_message")]
    pub challenge_message: String,
    /// Whether the indicator fades out when typing starts.
    #[serde(default = "default_fade")]
    pub fade: bool,
    /// Length of the reaction window in seconds.
    #[serde(default = "default_challenge_timeout")]
    pub challenge_timeout_seconds: u64,
    /// Delay between characters of prompt text. 0 prints prompts at once.
    #[serde(default = "default_text_delay")]
    pub text_delay_ms: u64,
    /// ANSI 256-color value for the indicator line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indicator_color: Option<u8>,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
}

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

fn default_style() -> String {
    RANDOM_STYLE.to_string()
}

fn default_waiting_message() -> String {
    DEFAULT_WAITING_MESSAGE.to_string()
}

fn default_challenge_message() -> String {
    DEFAULT_CHALLENGE_MESSAGE.to_string()
}

fn default_fade() -> bool {
    true
}

fn default_challenge_timeout() -> u64 {
    DEFAULT_CHALLENGE_TIMEOUT_SECONDS
}

fn default_text_delay() -> u64 {
    DEFAULT_TEXT_DELAY_MS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tick_ms: default_tick_ms(),
            indicator_style: default_style(),
            waiting_message: default_waiting_message(),
            challenge_message: default_challenge_message(),
            fade: default_fade(),
            challenge_timeout_seconds: default_challenge_timeout(),
            text_delay_ms: default_text_delay(),
            indicator_color: None,
            log_file_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// A missing file yields the defaults. Environment variables can
    /// override config file values.
    ///
    /// # Environment Variables
    /// - `WIZARD_TICK_MS` - Override tick period in milliseconds
    /// - `WIZARD_STYLE` - Override indicator style
    /// - `WIZARD_LOG_FILE` - Override log file path
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(AppError)` - Error occurred during load or validation
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            tracing::debug!("No config file at {config_path}, using defaults");
            Config::default()
        };

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Applies `WIZARD_*` environment overrides in place
    pub fn apply_env_overrides(&mut self) {
        if let Some(tick_ms) = std::env::var(env_vars::TICK_MS)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            self.tick_ms = tick_ms;
        }

        if let Ok(style) = std::env::var(env_vars::STYLE) {
            self.indicator_style = style;
        }

        if let Ok(log_file_path) = std::env::var(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }
    }

    /// Validates the configuration settings
    ///
    /// # Returns
    /// * `Ok(())` - Configuration is valid
    /// * `Err(AppError)` - Configuration validation failed
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    /// Converts the file settings into the runtime prompt settings
    pub fn indicator_settings(&self) -> Result<IndicatorSettings, AppError> {
        let style = if self.indicator_style == RANDOM_STYLE {
            IndicatorStyle::Random
        } else {
            IndicatorStyle::Fixed(FrameSet::from_style(&self.indicator_style)?)
        };

        Ok(IndicatorSettings {
            style,
            tick: Duration::from_millis(self.tick_ms),
            waiting_message: self.waiting_message.clone(),
            challenge_message: self.challenge_message.clone(),
            fade: self.fade.then(FadeSequence::default),
            text_delay: Duration::from_millis(self.text_delay_ms),
            ..IndicatorSettings::default()
        })
    }

    pub fn challenge_timeout(&self) -> Duration {
        Duration::from_secs(self.challenge_timeout_seconds)
    }

    pub fn frame_color(&self) -> Option<Color> {
        self.indicator_color.map(Color::AnsiValue)
    }

    /// Saves current configuration to the default config file location.
    pub async fn save(&self) -> Result<(), AppError> {
        let config_path = get_config_path();
        self.save_to_path(&config_path).await
    }

    /// Returns the platform-specific path for the config file.
    pub fn get_config_path() -> String {
        paths::get_config_path()
    }

    /// Returns the platform-specific path for the log directory.
    pub fn get_log_dir_path() -> String {
        paths::get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    ///
    /// # Notes
    /// - Shows config file location and effective settings
    /// - Handles case when no config file exists
    pub async fn display() -> Result<(), AppError> {
        let config_path = get_config_path();
        let log_dir = get_log_dir_path();
        let exists = Path::new(&config_path).exists();
        let config = Config::load().await?;

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{config_path}");
        if !exists {
            println!("(Not created yet, showing defaults)");
        }
        println!("────────────────────────────────────");
        println!("Indicator:");
        println!("style {}, tick {} ms", config.indicator_style, config.tick_ms);
        println!("fade {}", if config.fade { "on" } else { "off" });
        if let Some(color) = config.indicator_color {
            println!("color {color}");
        }
        println!("────────────────────────────────────");
        println!("Messages:");
        println!("waiting \"{}\"", config.waiting_message);
        println!("challenge \"{}\"", config.challenge_message);
        println!("────────────────────────────────────");
        println!("Challenge Timeout:");
        println!("{} seconds", config.challenge_timeout_seconds);
        println!("────────────────────────────────────");
        println!("Log File Location:");
        if let Some(custom_path) = &config.log_file_path {
            println!("{custom_path}");
        } else {
            println!("{log_dir}/rpg_wizard.log");
            println!("(Default location)");
        }

        Ok(())
    }

    /// Saves configuration to a custom file path.
    ///
    /// Creates the parent directory if it doesn't exist.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        tracing::info!("Saved configuration to {path}");
        Ok(())
    }

    /// Loads configuration from a custom file path.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
