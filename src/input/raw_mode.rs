//! Scoped terminal raw mode

use crate::error::AppError;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, is_raw_mode_enabled};

/// Enables raw mode for its lifetime and restores the previous mode on drop.
///
/// If raw mode was already on when the guard was acquired, dropping the
/// guard leaves it on.
pub struct RawModeGuard {
    was_enabled: bool,
}

impl RawModeGuard {
    pub fn acquire() -> Result<Self, AppError> {
        let was_enabled = is_raw_mode_enabled()?;
        if !was_enabled {
            enable_raw_mode()?;
            tracing::debug!("Raw mode enabled");
        }
        Ok(Self { was_enabled })
    }

    /// Whether raw mode was already active before this guard
    pub fn was_enabled(&self) -> bool {
        self.was_enabled
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.was_enabled {
            return;
        }
        match disable_raw_mode() {
            Ok(()) => tracing::debug!("Raw mode restored"),
            Err(e) => tracing::warn!("Failed to restore terminal mode: {e}"),
        }
    }
}
