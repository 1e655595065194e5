//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for every capability trait, enabling
//! development and testing on desktop without physical hardware or real
//! sleeps.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockDevice`] | [`BreathingDevice`] | Records on/off/set_value calls, can fail on demand |
//! | [`MockPacer`] | [`Pacer`] | Records holds on a virtual clock, can cancel mid-hold |
//! | [`RecordingObserver`] | [`BreathObserver`] | Captures labels and stop notices |
//!
//! # Example
//!
//! ```rust
//! use rs_breathe::{breathe, BreathingConfig, CancelToken, OutputMode};
//! use rs_breathe::hal::{DeviceCall, MockDevice, MockPacer};
//! use std::time::Duration;
//!
//! let config = BreathingConfig::default().with_mode(OutputMode::Binary);
//! let mut device = MockDevice::new();
//! let mut pacer = MockPacer::new().cancel_after(2);
//!
//! breathe(&config, Some(&mut device), &mut pacer, &CancelToken::new(), &mut ()).unwrap();
//!
//! assert_eq!(device.calls, [DeviceCall::On, DeviceCall::Off, DeviceCall::Off]);
//! // The second hold was cut short, so only the inhale counts
//! assert_eq!(pacer.elapsed, Duration::from_millis(2500));
//! ```
//!
//! [`BreathingDevice`]: crate::traits::BreathingDevice
//! [`Pacer`]: crate::traits::Pacer
//! [`BreathObserver`]: crate::traits::BreathObserver

use std::time::Duration;

use crate::cancel::CancelToken;
use crate::controller::RunOutcome;
use crate::traits::{BreathObserver, BreathingDevice, Hold, Pacer};
use crate::waveform::Phase;

// ============================================================================
// Device Mock
// ============================================================================

/// A single recorded device operation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeviceCall {
    /// `on()` was called.
    On,
    /// `off()` was called.
    Off,
    /// `set_value(duty)` was called.
    SetValue(f32),
}

/// Error returned by [`MockDevice`] once its failure point is reached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockDeviceFault {
    /// Zero-based index of the rejected call.
    pub call: usize,
}

/// Mock output device for testing.
///
/// Records every call for verification. Use the public fields to inspect
/// state after test operations.
///
/// # Example
///
/// ```rust
/// use rs_breathe::hal::{DeviceCall, MockDevice};
/// use rs_breathe::traits::BreathingDevice;
///
/// let mut led = MockDevice::new().fail_after(1);
/// led.set_value(0.4).unwrap();
/// assert!(led.on().is_err());
///
/// assert_eq!(led.level, 0.4);
/// assert_eq!(led.calls, [DeviceCall::SetValue(0.4)]);
/// ```
#[derive(Debug, Default)]
pub struct MockDevice {
    /// Successful calls, in order.
    pub calls: Vec<DeviceCall>,
    /// Last output level (0.0 to 1.0).
    pub level: f32,
    /// Whether the output is currently on.
    pub is_on: bool,
    /// Number of calls to accept before failing every later call.
    pub fail_after: Option<usize>,
    attempts: usize,
}

impl MockDevice {
    /// Creates a new mock device that never fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `calls` operations, then reject all following ones.
    pub fn fail_after(mut self, calls: usize) -> Self {
        self.fail_after = Some(calls);
        self
    }

    fn record(&mut self, call: DeviceCall) -> Result<(), MockDeviceFault> {
        let index = self.attempts;
        self.attempts += 1;
        if self.fail_after.is_some_and(|limit| index >= limit) {
            return Err(MockDeviceFault { call: index });
        }
        self.calls.push(call);
        Ok(())
    }
}

impl BreathingDevice for MockDevice {
    type Error = MockDeviceFault;

    fn on(&mut self) -> Result<(), MockDeviceFault> {
        self.record(DeviceCall::On)?;
        self.is_on = true;
        self.level = 1.0;
        Ok(())
    }

    fn off(&mut self) -> Result<(), MockDeviceFault> {
        self.record(DeviceCall::Off)?;
        self.is_on = false;
        self.level = 0.0;
        Ok(())
    }

    fn set_value(&mut self, duty: f32) -> Result<(), MockDeviceFault> {
        self.record(DeviceCall::SetValue(duty))?;
        self.level = duty;
        self.is_on = duty > 0.0;
        Ok(())
    }
}

// ============================================================================
// Pacer Mock
// ============================================================================

/// Mock pacer for testing.
///
/// Never sleeps. Each hold is recorded and added to a virtual clock.
/// [`cancel_after`](Self::cancel_after) simulates a cancellation arriving
/// while the loop is blocked in the n-th hold.
///
/// # Example
///
/// ```rust
/// use rs_breathe::hal::MockPacer;
/// use rs_breathe::traits::{Hold, Pacer};
/// use rs_breathe::CancelToken;
/// use std::time::Duration;
///
/// let token = CancelToken::new();
/// let mut pacer = MockPacer::new().cancel_after(2);
///
/// assert_eq!(pacer.hold(Duration::from_millis(10), &token), Hold::Elapsed);
/// assert_eq!(pacer.hold(Duration::from_millis(10), &token), Hold::Cancelled);
/// assert!(token.is_cancelled());
/// assert_eq!(pacer.holds.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MockPacer {
    /// Every requested hold, in order.
    pub holds: Vec<Duration>,
    /// Virtual time spent holding.
    pub elapsed: Duration,
    /// Number of times [`Pacer::reset`] was called.
    pub resets: usize,
    /// Cancel the token during this hold (1-based).
    pub cancel_at: Option<usize>,
}

impl MockPacer {
    /// Creates a pacer that never cancels on its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token while blocked in the `holds`-th hold.
    pub fn cancel_after(mut self, holds: usize) -> Self {
        self.cancel_at = Some(holds);
        self
    }
}

impl Pacer for MockPacer {
    fn hold(&mut self, duration: Duration, cancel: &CancelToken) -> Hold {
        if cancel.is_cancelled() {
            return Hold::Cancelled;
        }
        self.holds.push(duration);
        if self.cancel_at == Some(self.holds.len()) {
            cancel.cancel();
            return Hold::Cancelled;
        }
        self.elapsed += duration;
        Hold::Elapsed
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}

// ============================================================================
// Observer Mock
// ============================================================================

/// Observer that records everything it is told.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    /// Dry-run phase labels, in order.
    pub phases: Vec<Phase>,
    /// Stop notices received.
    pub stops: Vec<RunOutcome>,
}

impl RecordingObserver {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded phases as their printed labels.
    pub fn labels(&self) -> Vec<&'static str> {
        self.phases.iter().map(Phase::label).collect()
    }
}

impl BreathObserver for RecordingObserver {
    fn phase_label(&mut self, phase: Phase) {
        self.phases.push(phase);
    }

    fn stopped(&mut self, outcome: &RunOutcome) {
        self.stops.push(*outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_tracks_level() {
        let mut d = MockDevice::new();
        d.on().unwrap();
        assert!(d.is_on);
        assert_eq!(d.level, 1.0);
        d.set_value(0.0).unwrap();
        assert!(!d.is_on);
        d.off().unwrap();
        assert_eq!(d.calls.len(), 3);
    }

    #[test]
    fn device_failure_reports_call_index() {
        let mut d = MockDevice::new().fail_after(2);
        d.on().unwrap();
        d.off().unwrap();
        assert_eq!(d.set_value(0.5), Err(MockDeviceFault { call: 2 }));
        assert_eq!(d.on(), Err(MockDeviceFault { call: 3 }));
        assert_eq!(d.calls, [DeviceCall::On, DeviceCall::Off]);
    }

    #[test]
    fn pacer_accumulates_virtual_time() {
        let token = CancelToken::new();
        let mut p = MockPacer::new();
        p.hold(Duration::from_millis(250), &token);
        p.hold(Duration::from_millis(750), &token);
        assert_eq!(p.elapsed, Duration::from_secs(1));
        assert!(!token.is_cancelled());
    }

    #[test]
    fn pacer_refuses_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        let mut p = MockPacer::new();
        assert_eq!(p.hold(Duration::from_secs(1), &token), Hold::Cancelled);
        assert!(p.holds.is_empty());
    }

    #[test]
    fn observer_records() {
        let mut o = RecordingObserver::new();
        o.phase_label(Phase::Inhale);
        o.phase_label(Phase::Exhale);
        o.stopped(&RunOutcome::default());
        assert_eq!(o.labels(), ["Inhale", "Exhale"]);
        assert_eq!(o.stops.len(), 1);
    }
}
