use crate::cli::Args;
use crate::config::Config;
use crate::error::AppError;
use crate::indicator::{BUILTIN_STYLES, is_known_style};

/// Validates command line argument combinations.
///
/// Returns an error if incompatible arguments are used together or a style
/// name is not one of the built-ins.
pub fn validate_args(args: &Args) -> Result<(), AppError> {
    if args.new_log_file_path.is_some() && args.clear_log_file_path {
        return Err(AppError::config_error(
            "Cannot use both --set-log-file and --clear-log-file",
        ));
    }

    for style in [&args.style, &args.new_style].into_iter().flatten() {
        if !is_known_style(style) {
            return Err(AppError::config_error(format!(
                "Unknown indicator style '{style}'. Use --list-styles to see the choices"
            )));
        }
    }

    Ok(())
}

/// Applies per-run overrides from the command line on top of the loaded
/// config and re-validates the result.
pub fn apply_overrides(args: &Args, config: &mut Config) -> Result<(), AppError> {
    if let Some(tick_ms) = args.tick_ms {
        config.tick_ms = tick_ms;
    }
    if let Some(style) = &args.style {
        config.indicator_style = style.clone();
    }
    if args.no_fade {
        config.fade = false;
    }
    config.validate()
}

/// Handles the --list-styles command.
///
/// Prints every built-in style with its frames in animation order.
pub fn handle_list_styles() {
    println!("\nIndicator Styles");
    println!("────────────────────────────────────");
    for (name, frames) in BUILTIN_STYLES {
        println!("{name:<10} {}", frames.join(" "));
    }
    println!("{:<10} a different style for every question", crate::constants::RANDOM_STYLE);
}

/// Handles the --list-config command.
pub async fn handle_list_config_command() -> Result<(), AppError> {
    Config::display().await
}

/// Handles configuration update commands (--set-style, --set-log-file, --clear-log-file).
///
/// Updates configuration based on the provided arguments and saves changes.
pub async fn handle_config_update_command(args: &Args) -> Result<(), AppError> {
    let mut config = Config::load().await.unwrap_or_else(|e| {
        tracing::warn!("Could not load existing config, starting from defaults: {e}");
        Config::default()
    });

    update_config(args, &mut config);
    config.validate()?;
    config.save().await?;
    println!("Config updated successfully!");

    Ok(())
}

fn update_config(args: &Args, config: &mut Config) {
    if let Some(style) = &args.new_style {
        config.indicator_style = style.clone();
    }

    if let Some(new_log_path) = &args.new_log_file_path {
        config.log_file_path = Some(new_log_path.clone());
    } else if args.clear_log_file_path {
        config.log_file_path = None;
        println!("Custom log file path cleared. Using default location.");
    }
}
