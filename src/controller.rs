//! Breathing controller that ties profile, waveform and device together.
//!
//! This module provides [`BreathingController`], the state machine that
//! alternates inhale and exhale phases, applies each [`OutputStep`] to a
//! [`BreathingDevice`] and suspends on a [`Pacer`] between steps.
//!
//! # States
//!
//! ```text
//! Idle ──► Inhaling ──► Exhaling ──► Inhaling ──► ...
//!   │          │            │
//!   └──────────┴────────────┴──► Stopped (terminal, cancellation only)
//! ```
//!
//! # Driving the Loop
//!
//! [`run`](BreathingController::run) blocks until the [`CancelToken`] is
//! cancelled. Callers with their own scheduler can instead call
//! [`advance`](BreathingController::advance) for each step and
//! [`stop`](BreathingController::stop) when done.
//!
//! # Example
//!
//! ```rust
//! use rs_breathe::{
//!     BreathingController, BreathingProfile, CancelToken, ControllerState, OutputMode, Waveform,
//!     hal::{MockDevice, MockPacer},
//! };
//!
//! let profile = BreathingProfile::compute(60.0, 1.0, 0.5).unwrap();
//! let mut controller = BreathingController::new(
//!     profile,
//!     Waveform::default(),
//!     OutputMode::Binary,
//!     Some(MockDevice::new()),
//!     false,
//! )
//! .unwrap();
//!
//! // Cancel during the fourth hold: inhale, exhale, inhale, exhale
//! let mut pacer = MockPacer::new().cancel_after(4);
//! let outcome = controller.run(&mut pacer, &CancelToken::new(), &mut ()).unwrap();
//!
//! assert_eq!(controller.state(), ControllerState::Stopped);
//! assert_eq!(outcome.steps_applied, 4);
//! assert_eq!(outcome.cycles_completed, 1);
//! ```

use core::time::Duration;

use crate::cancel::CancelToken;
use crate::config::BreathingConfig;
use crate::error::BreathingError;
use crate::profile::BreathingProfile;
use crate::traits::{BreathObserver, BreathingDevice, Hold, Pacer};
use crate::waveform::{OutputMode, OutputStep, Phase, PhaseSteps, Waveform};

/// Controller lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ControllerState {
    /// Created, no step applied yet.
    #[default]
    Idle,
    /// Running the inhale phase.
    Inhaling,
    /// Running the exhale phase.
    Exhaling,
    /// Cancelled. Terminal.
    Stopped,
}

impl ControllerState {
    /// Returns the state as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ControllerState::Idle => "idle",
            ControllerState::Inhaling => "inhaling",
            ControllerState::Exhaling => "exhaling",
            ControllerState::Stopped => "stopped",
        }
    }

    /// The breathing phase this state runs, if any.
    #[inline]
    pub const fn phase(&self) -> Option<Phase> {
        match self {
            ControllerState::Inhaling => Some(Phase::Inhale),
            ControllerState::Exhaling => Some(Phase::Exhale),
            ControllerState::Idle | ControllerState::Stopped => None,
        }
    }
}

impl From<Phase> for ControllerState {
    fn from(phase: Phase) -> Self {
        match phase {
            Phase::Inhale => ControllerState::Inhaling,
            Phase::Exhale => ControllerState::Exhaling,
        }
    }
}

/// Summary returned when the loop is stopped manually.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunOutcome {
    /// Full inhale + exhale cycles finished before the stop.
    pub cycles_completed: u64,
    /// Steps advanced, including dry-run steps that touched no device.
    pub steps_applied: u64,
    /// Phase that was interrupted, if the loop had started.
    pub interrupted: Option<Phase>,
}

/// Breathing state machine.
///
/// # Type Parameter
///
/// - `D`: The output device ([`BreathingDevice`] trait)
///
/// # Ownership
///
/// The device is moved into the controller and owned exclusively for the
/// controller's lifetime; use [`into_device`](Self::into_device) to get it
/// back. The controller is not thread-safe; share only the [`CancelToken`].
pub struct BreathingController<D: BreathingDevice> {
    profile: BreathingProfile,
    waveform: Waveform,
    mode: OutputMode,
    device: Option<D>,
    dry_run: bool,
    release_on_stop: bool,
    state: ControllerState,
    steps: Option<PhaseSteps>,
    cycles_completed: u64,
    steps_applied: u64,
    interrupted: Option<Phase>,
}

impl<D: BreathingDevice> BreathingController<D> {
    /// Create a new controller.
    ///
    /// # Errors
    ///
    /// [`BreathingError::MissingDevice`] when `dry_run` is false and no
    /// device is given.
    pub fn new(
        profile: BreathingProfile,
        waveform: Waveform,
        mode: OutputMode,
        device: Option<D>,
        dry_run: bool,
    ) -> Result<Self, BreathingError<D::Error>> {
        if !dry_run && device.is_none() {
            return Err(BreathingError::MissingDevice);
        }
        Ok(Self {
            profile,
            waveform,
            mode,
            device,
            dry_run,
            release_on_stop: true,
            state: ControllerState::Idle,
            steps: None,
            cycles_completed: 0,
            steps_applied: 0,
            interrupted: None,
        })
    }

    /// Create a controller from configuration, validating all parameters.
    pub fn from_config(
        config: &BreathingConfig,
        device: Option<D>,
    ) -> Result<Self, BreathingError<D::Error>> {
        let profile = config.profile()?;
        let waveform = config.waveform()?;
        Ok(
            Self::new(profile, waveform, config.mode, device, config.dry_run)?
                .with_release_on_stop(config.release_on_stop),
        )
    }

    /// Whether to switch the device off when entering [`ControllerState::Stopped`].
    pub fn with_release_on_stop(mut self, release: bool) -> Self {
        self.release_on_stop = release;
        self
    }

    /// Run until `cancel` fires.
    ///
    /// Cancellation is checked before every step and observed by the pacer
    /// while holding. Returns the stop summary; a device error aborts the
    /// loop and is returned instead.
    ///
    /// A controller that is already stopped returns immediately without
    /// touching the device or notifying the observer again.
    pub fn run<P, O>(
        &mut self,
        pacer: &mut P,
        cancel: &CancelToken,
        observer: &mut O,
    ) -> Result<RunOutcome, BreathingError<D::Error>>
    where
        P: Pacer + ?Sized,
        O: BreathObserver + ?Sized,
    {
        if self.state == ControllerState::Stopped {
            return Ok(self.outcome());
        }

        log::info!(
            "breathing started: mode={} dry_run={} cycle={:.3} inhale={:?} exhale={:?}",
            self.mode.as_str(),
            self.dry_run,
            self.profile.breathing_cycle(),
            self.profile.inhale_duration(),
            self.profile.exhale_duration(),
        );
        pacer.reset();

        while !cancel.is_cancelled() {
            let Some(step) = self.advance(observer)? else {
                break;
            };
            if pacer.hold(step.hold_time, cancel) == Hold::Cancelled {
                break;
            }
        }

        Ok(self.stop(observer).unwrap_or_else(|| self.outcome()))
    }

    /// Apply the next step and return it.
    ///
    /// Enters the next phase when the current one is exhausted. The caller
    /// is responsible for holding for `step.hold_time` before advancing
    /// again. Returns `Ok(None)` once stopped.
    pub fn advance<O>(
        &mut self,
        observer: &mut O,
    ) -> Result<Option<OutputStep>, BreathingError<D::Error>>
    where
        O: BreathObserver + ?Sized,
    {
        loop {
            let next = self.steps.as_mut().and_then(Iterator::next);
            if let Some(step) = next {
                self.apply(step)?;
                self.steps_applied += 1;
                return Ok(Some(step));
            }

            let phase = match self.state {
                ControllerState::Stopped => return Ok(None),
                ControllerState::Idle => Phase::Inhale,
                ControllerState::Inhaling => Phase::Exhale,
                ControllerState::Exhaling => {
                    self.cycles_completed += 1;
                    Phase::Inhale
                }
            };
            self.enter(phase, observer);
        }
    }

    /// Enter the terminal stopped state.
    ///
    /// Returns the outcome the first time; `None` if already stopped.
    pub fn stop<O>(&mut self, observer: &mut O) -> Option<RunOutcome>
    where
        O: BreathObserver + ?Sized,
    {
        if self.state == ControllerState::Stopped {
            return None;
        }
        self.interrupted = self.state.phase();
        self.state = ControllerState::Stopped;
        self.steps = None;

        if self.release_on_stop && !self.dry_run {
            if let Some(device) = self.device.as_mut() {
                if device.off().is_err() {
                    log::warn!("failed to switch output off on stop");
                }
            }
        }

        let outcome = self.outcome();
        log::info!(
            "breathing stopped manually after {} cycles ({} steps)",
            outcome.cycles_completed,
            outcome.steps_applied
        );
        observer.stopped(&outcome);
        Some(outcome)
    }

    fn enter<O>(&mut self, phase: Phase, observer: &mut O)
    where
        O: BreathObserver + ?Sized,
    {
        let duration = self.phase_duration(phase);
        log::debug!("{} for {:?}", phase.label(), duration);
        self.state = phase.into();
        self.steps = Some(self.waveform.expand(duration, self.mode, phase));
        if self.dry_run {
            observer.phase_label(phase);
        }
    }

    fn apply(&mut self, step: OutputStep) -> Result<(), BreathingError<D::Error>> {
        if self.dry_run {
            return Ok(());
        }
        let device = self.device.as_mut().ok_or(BreathingError::MissingDevice)?;
        log::trace!("duty {:.3} for {:?}", step.duty_cycle, step.hold_time);
        let result = match self.mode {
            OutputMode::Pwm => device.set_value(step.duty_cycle),
            OutputMode::Binary if step.duty_cycle >= 0.5 => device.on(),
            OutputMode::Binary => device.off(),
        };
        result.map_err(BreathingError::Device)
    }

    fn phase_duration(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Inhale => self.profile.inhale_duration(),
            Phase::Exhale => self.profile.exhale_duration(),
        }
    }

    fn outcome(&self) -> RunOutcome {
        RunOutcome {
            cycles_completed: self.cycles_completed,
            steps_applied: self.steps_applied,
            interrupted: self.interrupted,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// The profile this controller runs
    pub fn profile(&self) -> &BreathingProfile {
        &self.profile
    }

    /// Output mode
    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Check if this is a dry run
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Full cycles finished so far
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// Borrow the device, if any
    pub fn device(&self) -> Option<&D> {
        self.device.as_ref()
    }

    /// Consume the controller and return the device
    pub fn into_device(self) -> Option<D> {
        self.device
    }
}

/// Compute the profile from `config` and breathe until `cancel` fires.
///
/// Parameters are validated before the device is touched.
///
/// # Example
///
/// ```rust
/// use rs_breathe::{breathe, BreathingConfig, CancelToken};
/// use rs_breathe::hal::{MockDevice, MockPacer, RecordingObserver};
///
/// let config = BreathingConfig::default().with_dry_run(true);
/// let mut pacer = MockPacer::new().cancel_after(3);
/// let mut observer = RecordingObserver::new();
///
/// breathe(&config, None::<MockDevice>, &mut pacer, &CancelToken::new(), &mut observer).unwrap();
/// assert_eq!(observer.labels(), ["Inhale", "Exhale", "Inhale"]);
/// ```
pub fn breathe<D, P, O>(
    config: &BreathingConfig,
    device: Option<D>,
    pacer: &mut P,
    cancel: &CancelToken,
    observer: &mut O,
) -> Result<RunOutcome, BreathingError<D::Error>>
where
    D: BreathingDevice,
    P: Pacer + ?Sized,
    O: BreathObserver + ?Sized,
{
    BreathingController::from_config(config, device)?.run(pacer, cancel, observer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{DeviceCall, MockDevice, MockPacer, RecordingObserver};

    fn controller(mode: OutputMode, dry_run: bool) -> BreathingController<MockDevice> {
        let profile = BreathingProfile::compute(60.0, 1.0, 0.25).unwrap();
        let device = (!dry_run).then(MockDevice::new);
        BreathingController::new(profile, Waveform::new(4).unwrap(), mode, device, dry_run)
            .unwrap()
    }

    #[test]
    fn starts_idle() {
        let c = controller(OutputMode::Binary, false);
        assert_eq!(c.state(), ControllerState::Idle);
        assert_eq!(c.cycles_completed(), 0);
    }

    #[test]
    fn missing_device_rejected() {
        let profile = BreathingProfile::compute(60.0, 1.0, 0.5).unwrap();
        let result = BreathingController::<MockDevice>::new(
            profile,
            Waveform::default(),
            OutputMode::Pwm,
            None,
            false,
        );
        assert!(matches!(result, Err(BreathingError::MissingDevice)));
    }

    #[test]
    fn advance_alternates_phases() {
        let mut c = controller(OutputMode::Binary, false);
        let mut obs = ();

        let step = c.advance(&mut obs).unwrap().unwrap();
        assert_eq!(c.state(), ControllerState::Inhaling);
        assert_eq!(step.hold_time, Duration::from_millis(1250));

        let step = c.advance(&mut obs).unwrap().unwrap();
        assert_eq!(c.state(), ControllerState::Exhaling);
        assert_eq!(step.hold_time, Duration::from_millis(3750));

        c.advance(&mut obs).unwrap();
        assert_eq!(c.state(), ControllerState::Inhaling);
        assert_eq!(c.cycles_completed(), 1);

        assert_eq!(
            c.device().unwrap().calls,
            [DeviceCall::On, DeviceCall::Off, DeviceCall::On]
        );
    }

    #[test]
    fn pwm_phase_uses_all_steps() {
        let mut c = controller(OutputMode::Pwm, false);
        let mut obs = ();
        for _ in 0..4 {
            c.advance(&mut obs).unwrap();
            assert_eq!(c.state(), ControllerState::Inhaling);
        }
        c.advance(&mut obs).unwrap();
        assert_eq!(c.state(), ControllerState::Exhaling);
        assert_eq!(
            c.device().unwrap().calls,
            [
                DeviceCall::SetValue(0.0),
                DeviceCall::SetValue(0.25),
                DeviceCall::SetValue(0.5),
                DeviceCall::SetValue(0.75),
                DeviceCall::SetValue(1.0),
            ]
        );
    }

    #[test]
    fn stop_is_terminal_and_notifies_once() {
        let mut c = controller(OutputMode::Binary, false);
        let mut obs = RecordingObserver::new();
        c.advance(&mut obs).unwrap();

        let outcome = c.stop(&mut obs).unwrap();
        assert_eq!(outcome.interrupted, Some(Phase::Inhale));
        assert_eq!(c.state(), ControllerState::Stopped);
        assert!(c.stop(&mut obs).is_none());
        assert!(c.advance(&mut obs).unwrap().is_none());
        assert_eq!(obs.stops.len(), 1);
    }

    #[test]
    fn stop_releases_device() {
        let mut c = controller(OutputMode::Binary, false);
        c.advance(&mut ()).unwrap();
        c.stop(&mut ());
        assert_eq!(c.device().unwrap().calls.last(), Some(&DeviceCall::Off));
        assert!(!c.device().unwrap().is_on);
    }

    #[test]
    fn stop_can_leave_device_alone() {
        let mut c = controller(OutputMode::Binary, false).with_release_on_stop(false);
        c.advance(&mut ()).unwrap();
        c.stop(&mut ());
        assert_eq!(c.device().unwrap().calls, [DeviceCall::On]);
    }

    #[test]
    fn stop_from_idle_reports_no_phase() {
        let mut c = controller(OutputMode::Pwm, true);
        let outcome = c.stop(&mut ()).unwrap();
        assert_eq!(outcome, RunOutcome::default());
    }

    #[test]
    fn failing_release_still_stops() {
        let profile = BreathingProfile::compute(60.0, 1.0, 0.5).unwrap();
        let device = MockDevice::new().fail_after(1);
        let mut c = BreathingController::new(
            profile,
            Waveform::default(),
            OutputMode::Binary,
            Some(device),
            false,
        )
        .unwrap();
        c.advance(&mut ()).unwrap();
        assert!(c.stop(&mut ()).is_some());
        assert_eq!(c.state(), ControllerState::Stopped);
    }

    #[test]
    fn run_on_stopped_controller_returns_immediately() {
        let mut c = controller(OutputMode::Binary, false);
        let mut obs = RecordingObserver::new();
        let mut pacer = MockPacer::new().cancel_after(1);
        c.run(&mut pacer, &CancelToken::new(), &mut obs).unwrap();

        let mut second = MockPacer::new();
        let outcome = c.run(&mut second, &CancelToken::new(), &mut obs).unwrap();
        assert_eq!(outcome.steps_applied, 1);
        assert!(second.holds.is_empty());
        assert_eq!(obs.stops.len(), 1);
    }

    #[test]
    fn state_phase_mapping() {
        assert_eq!(ControllerState::Inhaling.phase(), Some(Phase::Inhale));
        assert_eq!(ControllerState::Exhaling.phase(), Some(Phase::Exhale));
        assert_eq!(ControllerState::Idle.phase(), None);
        assert_eq!(ControllerState::Stopped.as_str(), "stopped");
        assert_eq!(ControllerState::from(Phase::Exhale), ControllerState::Exhaling);
    }
}
