//! Hold/suspension capability.
//!
//! Each [`OutputStep`](crate::OutputStep) carries a hold time. The
//! controller hands that hold to a [`Pacer`], which suspends the loop and
//! reports whether the hold ran to completion or was cut short by
//! cancellation.
//!
//! Use [`ThreadPacer`](crate::hal::ThreadPacer) for wall-clock timing and
//! [`MockPacer`](crate::hal::MockPacer) in tests.

use core::time::Duration;

use crate::cancel::CancelToken;

/// Result of a single hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hold {
    /// The full hold time elapsed.
    Elapsed,
    /// Cancellation was observed before or during the hold.
    Cancelled,
}

/// Suspends the breathing loop between steps.
///
/// # Implementation Notes
///
/// - `hold` must return [`Hold::Cancelled`] promptly once `cancel` is
///   cancelled, including while blocked
/// - Holds are requested back to back; implementations may schedule against
///   an accumulated deadline to avoid drift
pub trait Pacer {
    /// Suspend for `duration`, or until `cancel` fires.
    fn hold(&mut self, duration: Duration, cancel: &CancelToken) -> Hold;

    /// Called when a new breathing session starts.
    ///
    /// Default implementation does nothing.
    fn reset(&mut self) {}
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn hold(&mut self, duration: Duration, cancel: &CancelToken) -> Hold {
        (**self).hold(duration, cancel)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
