//! Shared control flags: the pulse interlock and the LED flashing switch.
//!
//! One explicit shared-state object instead of ambient globals.  Handles are
//! cheap clones of an `Arc`; the flags themselves are atomics, which is all
//! the mutual exclusion two booleans updated at 10–100 Hz need.
//!
//! ## Read/write contract
//!
//! | Flag        | Writers                         | Readers                     |
//! |-------------|---------------------------------|-----------------------------|
//! | `interlock` | pulse protocol (via guard only) | sensor poller, LED animator |
//! | `flashing`  | command router                  | LED animator                |
//!
//! The interlock can only be set by acquiring a [`PulseGuard`], which clears
//! it on drop — it can never be left set by an early return or panic in the
//! pulse sequence.  At most one guard exists at a time; a second
//! acquisition attempt fails until the first guard is dropped.

use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Inner {
    interlock: AtomicBool,
    flashing: AtomicBool,
}

/// Cloneable handle to the shared flag pair.
#[derive(Debug, Clone, Default)]
pub struct SharedFlags {
    inner: Arc<Inner>,
}

impl SharedFlags {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a pulse operation is in flight.
    pub fn interlocked(&self) -> bool {
        self.inner.interlock.load(Ordering::Acquire)
    }

    /// Try to start a pulse. Returns `None` if another pulse already holds
    /// the interlock.
    pub fn begin_pulse(&self) -> Option<PulseGuard> {
        self.inner
            .interlock
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PulseGuard {
                flags: self.clone(),
            })
    }

    /// Whether the breathing LED animation is enabled.
    pub fn flashing(&self) -> bool {
        self.inner.flashing.load(Ordering::Acquire)
    }

    pub fn set_flashing(&self, on: bool) {
        self.inner.flashing.store(on, Ordering::Release);
    }
}

/// RAII ownership of the pulse interlock.
#[derive(Debug)]
pub struct PulseGuard {
    flags: SharedFlags,
}

impl Drop for PulseGuard {
    fn drop(&mut self) {
        self.flags.inner.interlock.store(false, Ordering::Release);
    }
}
