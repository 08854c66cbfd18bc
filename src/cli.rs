use clap::Parser;
use clap::builder::styling::{AnsiColor, Effects, Styles};

fn get_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .usage(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Yellow.on_default())
        .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
        .valid(AnsiColor::Green.on_default())
        .invalid(AnsiColor::Red.on_default())
}

/// Determines if the invocation is a configuration command that prints or
/// updates settings and exits without starting an adventure.
pub fn is_config_command(args: &Args) -> bool {
    args.list_styles
        || args.list_config
        || args.new_style.is_some()
        || args.new_log_file_path.is_some()
        || args.clear_log_file_path
}

/// Text adventure wizard with a live waiting indicator.
///
/// Every question shows an animated indicator on its own line until you
/// start typing. Timed challenges give you a few seconds to press the
/// right key.
///
/// - Type `exit` as your name to leave
/// - Press Ctrl+C at any time to quit
/// - Closing input (Ctrl+D) ends the adventure
#[derive(Parser, Debug, Default)]
#[command(author = "miklenn", version, about, long_about = None)]
#[command(styles = get_styles())]
pub struct Args {
    /// Indicator repaint interval in milliseconds for this run.
    #[arg(long = "tick-ms", help_heading = "Indicator", value_name = "MS")]
    pub tick_ms: Option<u64>,

    /// Indicator style for this run. Use --list-styles to see the choices,
    /// or "random" for a new style on every question.
    #[arg(long = "style", help_heading = "Indicator", value_name = "STYLE")]
    pub style: Option<String>,

    /// Stop the indicator instantly instead of fading it out.
    #[arg(long = "no-fade", help_heading = "Indicator")]
    pub no_fade: bool,

    /// List the built-in indicator styles with a preview of their frames.
    #[arg(long = "list-styles", help_heading = "Indicator")]
    pub list_styles: bool,

    /// List current configuration settings
    #[arg(long = "list-config", short = 'l', help_heading = "Configuration")]
    pub list_config: bool,

    /// Persist an indicator style in config.
    #[arg(long = "set-style", help_heading = "Configuration", value_name = "STYLE")]
    pub new_style: Option<String>,

    /// Update log file path in config. This sets a persistent custom log file location.
    #[arg(long = "set-log-file", help_heading = "Configuration")]
    pub new_log_file_path: Option<String>,

    /// Clear the custom log file path from config. This reverts to using the default log location.
    #[arg(long = "clear-log-file", help_heading = "Configuration")]
    pub clear_log_file_path: bool,

    /// Also write logs to stderr.
    #[arg(long = "debug", help_heading = "Debug")]
    pub debug: bool,

    /// Specify a custom log file path. If not provided, logs will be written to the default location.
    #[arg(long = "log-file", help_heading = "Debug")]
    pub log_file: Option<String>,
}
