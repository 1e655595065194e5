//! Notifications emitted by the breathing loop.

use crate::controller::RunOutcome;
use crate::waveform::Phase;

/// Receives human-facing notices from the controller.
///
/// Both methods default to doing nothing, and `()` implements the trait
/// for callers that don't care.
///
/// # Example
///
/// ```rust
/// use rs_breathe::traits::BreathObserver;
/// use rs_breathe::{Phase, RunOutcome};
///
/// struct Printer;
///
/// impl BreathObserver for Printer {
///     fn phase_label(&mut self, phase: Phase) {
///         println!("{}", phase.label());
///     }
///
///     fn stopped(&mut self, _outcome: &RunOutcome) {
///         println!("Breathing stopped manually...");
///     }
/// }
/// ```
pub trait BreathObserver {
    /// A phase started during a dry run.
    ///
    /// Only called when the controller is not driving a device.
    fn phase_label(&mut self, _phase: Phase) {}

    /// The loop entered its terminal stopped state.
    ///
    /// Called exactly once per controller.
    fn stopped(&mut self, _outcome: &RunOutcome) {}
}

impl BreathObserver for () {}

impl<O: BreathObserver + ?Sized> BreathObserver for &mut O {
    fn phase_label(&mut self, phase: Phase) {
        (**self).phase_label(phase)
    }

    fn stopped(&mut self, outcome: &RunOutcome) {
        (**self).stopped(outcome)
    }
}
