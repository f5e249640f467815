use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Cooperative stop flag shared between the display loop and every capture
/// worker. One writer, many readers; transitions once from running to
/// stopping and never reverts.
#[derive(Clone, Debug, Default)]
pub struct ShutdownSignal {
    stopped: Arc<AtomicBool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Broadcasts the stop request. Idempotent.
    pub fn request_stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Sleeps for `total`, waking early if a stop is requested. Observes the
    /// flag at a coarse poll granularity so stop latency stays bounded by a
    /// fraction of the sleep, not the whole of it.
    pub fn sleep_observing(&self, total: Duration) {
        const POLL: Duration = Duration::from_millis(20);
        let deadline = Instant::now() + total;
        while !self.is_stopped() {
            let now = Instant::now();
            if now >= deadline {
                return;
            }
            std::thread::sleep(POLL.min(deadline - now));
        }
    }
}
