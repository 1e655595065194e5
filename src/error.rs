//! Error types for profile computation and the breathing loop.
//!
//! Parameter problems are reported before any device interaction. Device
//! failures abort the loop and carry the device's own error type, the same
//! way [`BreathingDevice::Error`] is threaded through the controller.
//!
//! Manual cancellation is not an error: [`BreathingController::run`]
//! returns `Ok` with a [`RunOutcome`] when stopped.
//!
//! [`BreathingDevice::Error`]: crate::traits::BreathingDevice::Error
//! [`BreathingController::run`]: crate::BreathingController::run
//! [`RunOutcome`]: crate::RunOutcome

use thiserror::Error;

/// A breathing parameter violated its precondition.
///
/// # Example
///
/// ```rust
/// use rs_breathe::{BreathingProfile, ParameterError};
///
/// let err = BreathingProfile::compute(60.0, 1.0, 1.0).unwrap_err();
/// assert!(matches!(err, ParameterError::InvalidParameter { name: "alpha", .. }));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum ParameterError {
    /// The named parameter is outside its valid range.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name (`bpm`, `illness_factor`, `alpha`, `pwm_steps`).
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Which constraint was violated.
        reason: &'static str,
    },
}

impl ParameterError {
    pub(crate) const fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// Errors returned by the breathing loop.
///
/// `E` is the error type of the device capability in use.
#[derive(Debug, Error)]
pub enum BreathingError<E> {
    /// Profile or waveform parameters were rejected.
    #[error(transparent)]
    InvalidParameter(#[from] ParameterError),

    /// Output was requested but no device was supplied.
    #[error("no output device supplied and dry run is disabled")]
    MissingDevice,

    /// The device rejected an operation. The loop is not retried.
    #[error("device rejected operation: {0:?}")]
    Device(E),
}
