//! Process-wide cooperative cancellation.
//!
//! Long-running operations (simplifier loops, tensor contraction, extraction)
//! poll [`stop_requested`] at their iteration boundaries and return the
//! partially-transformed state when it trips. The flag is set from a signal
//! handler or another thread; the engine itself never blocks on it.

use std::sync::atomic::{AtomicBool, Ordering};

static STOP: AtomicBool = AtomicBool::new(false);

/// Request that in-flight operations stop at their next checkpoint.
pub fn request_stop() {
    STOP.store(true, Ordering::Relaxed);
}

/// Clear the stop flag. Call before starting a new command.
pub fn clear_stop() {
    STOP.store(false, Ordering::Relaxed);
}

/// Check whether a stop has been requested.
pub fn stop_requested() -> bool {
    STOP.load(Ordering::Relaxed)
}
