//! Shared auto-reply switch. Operators flip it over HTTP; dashboards follow it on the
//! funnel stream.

use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

const CHANNEL_CAPACITY: usize = 16;

pub struct AutoMode {
    enabled: AtomicBool,
    tx: broadcast::Sender<bool>,
}

impl Default for AutoMode {
    fn default() -> Self {
        Self::new(false)
    }
}

impl AutoMode {
    pub fn new(initial: bool) -> Self {
        let (tx, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            enabled: AtomicBool::new(initial),
            tx,
        }
    }

    pub fn get(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Stores the value and publishes it, even when unchanged.
    pub fn set(&self, enabled: bool) -> bool {
        self.enabled.store(enabled, Ordering::SeqCst);
        // No subscribers is fine.
        let _ = self.tx.send(enabled);
        tracing::info!("[auto-mode] {}", if enabled { "on" } else { "off" });
        enabled
    }

    pub fn subscribe(&self) -> broadcast::Receiver<bool> {
        self.tx.subscribe()
    }
}
