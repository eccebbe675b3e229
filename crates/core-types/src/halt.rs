use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A shared emergency-stop flag.
///
/// An external command layer triggers it; the strategy runtime checks it
/// before every new entry evaluation. Triggering never unwinds positions
/// that are already open, it only stops new ones from being opened.
#[derive(Debug, Clone, Default)]
pub struct EmergencyStop {
    triggered: Arc<AtomicBool>,
}

impl EmergencyStop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.triggered.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.triggered.store(false, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.triggered.load(Ordering::SeqCst)
    }
}
