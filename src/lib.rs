//! Text-adventure wizard with a live waiting indicator.
//!
//! The core of the crate is a prompt that shows an animated indicator on its
//! own line while the program waits for the user, and removes it without a
//! trace as soon as input arrives. Timed challenges reuse the same indicator
//! while waiting for a single keypress against a deadline.
//!
//! # Examples
//!
//! ```rust,no_run
//! use rpg_wizard::console::TerminalConsole;
//! use rpg_wizard::input::StdinInput;
//! use rpg_wizard::prompt::{IndicatorSettings, Prompter};
//! use rpg_wizard::error::AppError;
//! use std::time::Duration;
//!
//! fn main() -> Result<(), AppError> {
//!     let mut prompter = Prompter::new(
//!         TerminalConsole::stdout(),
//!         StdinInput::new()?,
//!         IndicatorSettings::default(),
//!     );
//!
//!     let name = prompter.prompt_with_indicator(
//!         "Name? ",
//!         &["|", "/", "-", "\\"],
//!         Duration::from_millis(100),
//!         "Waiting for input...",
//!     )?;
//!     prompter.say(&format!("Hello {name}!"))?;
//!
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod challenge;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod constants;
pub mod error;
pub mod indicator;
pub mod input;
pub mod logging;
pub mod prompt;
pub mod testing_utils;

// Re-export commonly used types for convenience
pub use challenge::{Clock, SystemClock};
pub use config::Config;
pub use console::{Console, TerminalConsole};
pub use error::AppError;
pub use indicator::{FrameSet, IndicatorSession, IndicatorSpec, StopMode};
pub use input::{InterruptFlag, StandardInput, StdinInput, TerminalKeys};
pub use prompt::{IndicatorSettings, IndicatorStyle, Prompter};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
