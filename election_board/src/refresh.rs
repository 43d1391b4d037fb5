use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Lets at most one refresh cycle run at a time.
///
/// A tick that finds a cycle in flight gets no permit and should do nothing;
/// the next tick retries. This keeps a slow, stale cycle from landing its
/// output after a newer one.
#[derive(Debug, Clone, Default)]
pub struct SingleFlight {
    busy: Arc<AtomicBool>,
}

/// Held for the duration of a cycle. Dropping it frees the slot, including
/// when the cycle panics or is cancelled.
#[derive(Debug)]
pub struct FlightPermit {
    busy: Arc<AtomicBool>,
}

impl SingleFlight {
    pub fn new() -> SingleFlight {
        SingleFlight::default()
    }

    pub fn try_begin(&self) -> Option<FlightPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

impl Drop for FlightPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
