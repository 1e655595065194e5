//! Cancellation signal for the breathing loop.
//!
//! A [`CancelToken`] is shared between the thread running the loop and
//! whoever decides to stop it (a Ctrl-C handler, a button poller, a test).
//! Cancelling wakes any hold currently blocked on the token, so the loop
//! reacts without waiting for the step to finish.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use rs_breathe::CancelToken;
//!
//! let token = CancelToken::new();
//! let remote = token.clone();
//!
//! let waiter = std::thread::spawn(move || remote.wait_timeout(Duration::from_secs(60)));
//! token.cancel();
//!
//! assert!(waiter.join().unwrap()); // woke early, cancelled
//! ```

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Inner {
    cancelled: Mutex<bool>,
    wake: Condvar,
}

/// Cloneable, thread-safe cancellation flag.
///
/// Once cancelled a token stays cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the token and wakes every waiter.
    pub fn cancel(&self) {
        *self.lock() = true;
        self.inner.wake.notify_all();
    }

    /// Returns true once [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        *self.lock()
    }

    /// Blocks until `deadline` or cancellation, whichever comes first.
    ///
    /// Returns `true` if the token was cancelled.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut cancelled = self.lock();
        loop {
            if *cancelled {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            cancelled = self
                .inner
                .wake
                .wait_timeout(cancelled, deadline - now)
                .unwrap_or_else(PoisonError::into_inner)
                .0;
        }
    }

    /// Blocks for `timeout` or until cancellation.
    ///
    /// Returns `true` if the token was cancelled.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.wait_until(deadline),
            None => self.wait_forever(),
        }
    }

    fn wait_forever(&self) -> bool {
        let mut cancelled = self.lock();
        while !*cancelled {
            cancelled = self
                .inner
                .wake
                .wait(cancelled)
                .unwrap_or_else(PoisonError::into_inner);
        }
        true
    }

    // A panicking holder cannot leave the flag half-written.
    fn lock(&self) -> MutexGuard<'_, bool> {
        self.inner
            .cancelled
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_uncancelled() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());
    }

    #[test]
    fn cancel_is_shared_between_clones() {
        let token = CancelToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn cancel_is_idempotent() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn wait_times_out_when_not_cancelled() {
        let token = CancelToken::new();
        let start = Instant::now();
        assert!(!token.wait_timeout(Duration::from_millis(20)));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn wait_returns_immediately_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        let start = Instant::now();
        assert!(token.wait_timeout(Duration::from_secs(30)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn cancel_wakes_blocked_waiter() {
        let token = CancelToken::new();
        let waiter = {
            let token = token.clone();
            std::thread::spawn(move || {
                let start = Instant::now();
                (token.wait_timeout(Duration::from_secs(30)), start.elapsed())
            })
        };
        std::thread::sleep(Duration::from_millis(20));
        token.cancel();

        let (cancelled, waited) = waiter.join().unwrap();
        assert!(cancelled);
        assert!(waited < Duration::from_secs(5));
    }

    #[test]
    fn past_deadline_does_not_block() {
        let token = CancelToken::new();
        let past = Instant::now();
        std::thread::sleep(Duration::from_millis(1));
        assert!(!token.wait_until(past));
    }
}
