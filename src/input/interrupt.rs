//! Cooperative interruption flag raised by Ctrl+C

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::task::JoinHandle;

/// Shared flag checked by every wait loop in the prompt and challenge code
#[derive(Debug, Clone, Default)]
pub struct InterruptFlag {
    raised: Arc<AtomicBool>,
}

impl InterruptFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    pub fn clear(&self) {
        self.raised.store(false, Ordering::SeqCst);
    }
}

/// Listens for Ctrl+C and raises `flag`.
///
/// While a line read is blocked the flag is only seen once the read
/// returns, so a second Ctrl+C exits the process directly.
pub fn spawn_ctrl_c_listener(flag: InterruptFlag) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Unable to listen for Ctrl+C: {e}");
                return;
            }
            if flag.is_raised() {
                tracing::warn!("Second Ctrl+C received, exiting");
                std::process::exit(130);
            }
            tracing::info!("Ctrl+C received");
            flag.raise();
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_shared_between_clones() {
        let flag = InterruptFlag::new();
        let other = flag.clone();
        assert!(!other.is_raised());
        flag.raise();
        assert!(other.is_raised());
        other.clear();
        assert!(!flag.is_raised());
    }

    #[tokio::test]
    async fn test_listener_can_be_aborted() {
        let handle = spawn_ctrl_c_listener(InterruptFlag::new());
        handle.abort();
        let result = handle.await;
        assert!(result.unwrap_err().is_cancelled());
    }
}
