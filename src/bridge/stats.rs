//! Diagnostic counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time snapshot of bridge counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BridgeStats {
    /// Initialization sequences started (successful or not).
    pub init_attempts: u64,
    /// Initialization sequences that completed. Never exceeds 1.
    pub init_successes: u64,
    /// Calls answered by the runtime.
    pub transformed: u64,
    /// Calls that returned their input unchanged.
    pub passthrough: u64,
}

/// Relaxed counters; they order nothing.
#[derive(Debug, Default)]
pub(crate) struct StatsCounters {
    init_attempts: AtomicU64,
    init_successes: AtomicU64,
    transformed: AtomicU64,
    passthrough: AtomicU64,
}

impl StatsCounters {
    pub(crate) fn record_init_attempt(&self) {
        self.init_attempts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_init_success(&self) {
        self.init_successes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_transformed(&self) {
        self.transformed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_passthrough(&self) {
        self.passthrough.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> BridgeStats {
        BridgeStats {
            init_attempts: self.init_attempts.load(Ordering::Relaxed),
            init_successes: self.init_successes.load(Ordering::Relaxed),
            transformed: self.transformed.load(Ordering::Relaxed),
            passthrough: self.passthrough.load(Ordering::Relaxed),
        }
    }
}
