//! # rs-breathe
//!
//! A waveform timing engine that makes an LED, buzzer or relay breathe like
//! a living thing.
//!
//! ## Features
//!
//! - **Biological parameters**: beats per minute, an illness multiplier and
//!   an inhale/exhale asymmetry factor
//! - **Two output modes**: on/off for plain outputs, PWM ramps for a smooth glow
//! - **Hardware abstraction**: one small device trait, with mock, `embedded-hal`
//!   and ESP32 implementations
//! - **Prompt cancellation**: a shared token wakes the loop mid-hold
//! - **Dry run**: full timing with phase labels and no device
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `profile` - Derives phase durations from breathing parameters
//! - `waveform` - Expands a phase into duty-cycle steps
//! - `controller` - State machine that applies steps and holds between them
//! - `traits` - Device, pacing and observer capabilities
//! - `hal` - Concrete implementations (mock for testing, thread pacer, esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_breathe::{
//!     BreathingController, BreathingProfile, CancelToken, OutputMode, Waveform,
//!     hal::{MockDevice, MockPacer},
//! };
//!
//! // 60 bpm, healthy, inhale a quarter of each cycle
//! let profile = BreathingProfile::compute(60.0, 1.0, 0.25).unwrap();
//! assert_eq!(profile.inhale_duration().as_millis(), 1250);
//! assert_eq!(profile.exhale_duration().as_millis(), 3750);
//!
//! let mut controller = BreathingController::new(
//!     profile,
//!     Waveform::default(),
//!     OutputMode::Pwm,
//!     Some(MockDevice::new()),
//!     false,
//! )
//! .unwrap();
//!
//! // Run one inhale (1000 steps), then cancel during the first exhale step
//! let mut pacer = MockPacer::new().cancel_after(1001);
//! let outcome = controller.run(&mut pacer, &CancelToken::new(), &mut ()).unwrap();
//! assert_eq!(outcome.steps_applied, 1001);
//! ```

#![warn(missing_docs)]

/// Cancellation signal shared between the loop and whoever stops it.
pub mod cancel;
/// Breathing controller state machine and entry point.
pub mod controller;
/// Error types for parameters and the breathing loop.
pub mod error;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Breathing parameter calculation.
pub mod profile;
/// Capability traits the engine is written against.
pub mod traits;
/// Phase expansion into duty-cycle steps.
pub mod waveform;

/// Shared configuration for the desktop runner and ESP32 firmware.
pub mod config;

// Re-exports for convenience
pub use cancel::CancelToken;
pub use controller::{breathe, BreathingController, ControllerState, RunOutcome};
pub use error::{BreathingError, ParameterError};
pub use profile::{BreathingProfile, ProfileSummary};
pub use traits::{BreathObserver, BreathingDevice, Hold, Pacer};
pub use waveform::{
    BinaryExhale, OutputMode, OutputStep, Phase, PhaseSteps, Waveform, DEFAULT_PWM_STEPS,
};

// Config re-exports
pub use config::{BreathingConfig, Config, DeviceConfig, OutputConfig};
