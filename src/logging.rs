use crate::cli::Args;
use crate::config::Config;
use crate::error::AppError;
use std::io::stderr;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_LOG_FILE: &str = "rpg_wizard.log";
const DEFAULT_DIRECTIVE: &str = "rpg_wizard=info";

/// Sets up logging configuration for the application.
///
/// - Logs always go to a file, since stdout carries the prompts and the
///   indicator animation
/// - `--debug` additionally logs to stderr
/// - Creates log directory if it doesn't exist
/// - Uses daily rolling file appender
///
/// Returns the path to the log file and the guard that must be kept alive
/// for the duration of the program to ensure proper log flushing.
pub async fn setup_logging(args: &Args, config: &Config) -> Result<(String, WorkerGuard), AppError> {
    let (log_dir, log_file_name) =
        resolve_log_location(args.log_file.as_deref(), config.log_file_path.as_deref());

    // Create log directory if it doesn't exist
    if !Path::new(&log_dir).exists() {
        tokio::fs::create_dir_all(&log_dir).await.map_err(|e| {
            AppError::log_setup_error(format!("Failed to create log directory: {e}"))
        })?;
    }

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, &log_file_name);

    // The guard must be kept alive for the duration of the program
    // to ensure logs are flushed properly
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::Layer::new()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(env_filter());

    let stderr_layer = args.debug.then(|| {
        fmt::Layer::new()
            .with_writer(stderr)
            .with_ansi(true)
            .with_filter(env_filter())
    });

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| AppError::log_setup_error(format!("Failed to install subscriber: {e}")))?;

    let log_file_path = format!("{log_dir}/{log_file_name}");
    Ok((log_file_path, guard))
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Picks the log directory and file name: the command line wins over the
/// config file, which wins over the default location.
fn resolve_log_location(cli_path: Option<&str>, config_path: Option<&str>) -> (String, String) {
    match cli_path.or(config_path) {
        Some(custom_path) => {
            let path = Path::new(custom_path);
            let parent = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let file_name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(DEFAULT_LOG_FILE);
            (parent.to_string_lossy().to_string(), file_name.to_string())
        }
        None => (Config::get_log_dir_path(), DEFAULT_LOG_FILE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_location() {
        let (dir, file) = resolve_log_location(None, None);
        assert!(dir.ends_with("logs"));
        assert_eq!(file, "rpg_wizard.log");
    }

    #[test]
    fn test_cli_path_wins_over_config() {
        let (dir, file) = resolve_log_location(Some("/tmp/cli/run.log"), Some("/tmp/cfg/cfg.log"));
        assert_eq!(dir, "/tmp/cli");
        assert_eq!(file, "run.log");
    }

    #[test]
    fn test_config_path_used_without_cli() {
        let (dir, file) = resolve_log_location(None, Some("/var/log/wizard.log"));
        assert_eq!(dir, "/var/log");
        assert_eq!(file, "wizard.log");
    }

    #[test]
    fn test_bare_file_name_logs_to_current_dir() {
        let (dir, file) = resolve_log_location(Some("wizard.log"), None);
        assert_eq!(dir, ".");
        assert_eq!(file, "wizard.log");
    }
}
