//! Wall-clock pacer for `std` targets (desktop and ESP-IDF).

use std::time::{Duration, Instant};

use crate::cancel::CancelToken;
use crate::traits::{Hold, Pacer};

/// Blocks the calling thread for each hold, waking early on cancellation.
///
/// Holds are scheduled against an accumulated deadline rather than "now",
/// so time lost to wake-up latency in one step is recovered in the next.
/// If the loop falls further behind than `max_lag` (system suspend, a slow
/// device), the schedule is re-anchored to the present instead of rushing
/// through the missed steps.
///
/// # Example
///
/// ```rust
/// use rs_breathe::hal::ThreadPacer;
/// use rs_breathe::traits::{Hold, Pacer};
/// use rs_breathe::CancelToken;
/// use std::time::Duration;
///
/// let mut pacer = ThreadPacer::new();
/// let token = CancelToken::new();
/// assert_eq!(pacer.hold(Duration::from_millis(5), &token), Hold::Elapsed);
/// ```
#[derive(Debug)]
pub struct ThreadPacer {
    deadline: Option<Instant>,
    max_lag: Duration,
}

impl ThreadPacer {
    /// Default tolerated lag before re-anchoring.
    pub const DEFAULT_MAX_LAG: Duration = Duration::from_millis(250);

    /// Creates a pacer with the default lag tolerance.
    pub fn new() -> Self {
        Self {
            deadline: None,
            max_lag: Self::DEFAULT_MAX_LAG,
        }
    }

    /// Set how far behind schedule the loop may fall before re-anchoring.
    pub fn with_max_lag(mut self, max_lag: Duration) -> Self {
        self.max_lag = max_lag;
        self
    }

    fn next_deadline(&self, now: Instant, duration: Duration) -> Option<Instant> {
        let start = match self.deadline {
            Some(previous) if now.saturating_duration_since(previous) <= self.max_lag => previous,
            _ => now,
        };
        start.checked_add(duration)
    }
}

impl Default for ThreadPacer {
    fn default() -> Self {
        Self::new()
    }
}

impl Pacer for ThreadPacer {
    fn hold(&mut self, duration: Duration, cancel: &CancelToken) -> Hold {
        let cancelled = match self.next_deadline(Instant::now(), duration) {
            Some(deadline) => {
                self.deadline = Some(deadline);
                cancel.wait_until(deadline)
            }
            None => {
                self.deadline = None;
                cancel.wait_timeout(duration)
            }
        };
        if cancelled {
            Hold::Cancelled
        } else {
            Hold::Elapsed
        }
    }

    fn reset(&mut self) {
        self.deadline = None;
    }
}
