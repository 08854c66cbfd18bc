// src/main.rs
use clap::Parser;
use rpg_wizard::app;
use rpg_wizard::cli::{Args, is_config_command};
use rpg_wizard::commands::{
    apply_overrides, handle_config_update_command, handle_list_config_command, handle_list_styles,
    validate_args,
};
use rpg_wizard::config::Config;
use rpg_wizard::error::AppError;
use rpg_wizard::input::{InterruptFlag, spawn_ctrl_c_listener};
use rpg_wizard::logging::setup_logging;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Validate argument combinations
    validate_args(&args)?;

    // Handle configuration operations before anything touches the terminal
    if is_config_command(&args) {
        if args.list_styles {
            handle_list_styles();
        } else if args.list_config {
            handle_list_config_command().await?;
        } else {
            handle_config_update_command(&args).await?;
        }
        return Ok(());
    }

    // Load config first to fail early if there's an issue
    let mut config = Config::load().await?;
    apply_overrides(&args, &mut config)?;

    let (log_file_path, _guard) = setup_logging(&args, &config).await?;
    tracing::info!("Logs are being written to: {log_file_path}");
    tracing::info!("Starting {} {}", rpg_wizard::NAME, rpg_wizard::VERSION);

    let interrupt = InterruptFlag::new();
    let ctrl_c = spawn_ctrl_c_listener(interrupt.clone());

    let result = app::run_interactive(&config, interrupt).await;

    ctrl_c.abort();
    if let Err(e) = &result {
        tracing::error!("Session failed: {e}");
    }
    result
}
