//! Phase expansion into output steps.
//!
//! A [`Waveform`] expands one breathing phase into a finite sequence of
//! [`OutputStep`]s. The sequence is lazy and one-shot: the controller asks
//! for a fresh [`PhaseSteps`] at the start of every phase.
//!
//! # Modes
//!
//! | Mode | Steps per phase | Duty cycle |
//! |------|-----------------|------------|
//! | [`OutputMode::Binary`] | 1 | 1.0 inhale, 0.0 exhale (see [`BinaryExhale`]) |
//! | [`OutputMode::Pwm`] | `pwm_steps` | linear ramp, rounded to 3 decimals |
//!
//! # Example
//!
//! ```rust
//! use core::time::Duration;
//! use rs_breathe::{OutputMode, Phase, Waveform};
//!
//! let waveform = Waveform::new(4).unwrap();
//! let duties: Vec<f32> = waveform
//!     .expand(Duration::from_secs(2), OutputMode::Pwm, Phase::Inhale)
//!     .map(|step| step.duty_cycle)
//!     .collect();
//! assert_eq!(duties, [0.0, 0.25, 0.5, 0.75]);
//! ```

use core::time::Duration;

use crate::error::ParameterError;

/// Default number of PWM steps per phase.
pub const DEFAULT_PWM_STEPS: u32 = 1000;

/// One half of a breathing cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Phase {
    /// Output rises.
    Inhale,
    /// Output falls.
    Exhale,
}

impl Phase {
    /// Human-readable label, as printed in dry-run mode.
    #[inline]
    pub const fn label(&self) -> &'static str {
        match self {
            Phase::Inhale => "Inhale",
            Phase::Exhale => "Exhale",
        }
    }

    /// The phase that follows this one.
    #[inline]
    pub const fn next(&self) -> Self {
        match self {
            Phase::Inhale => Phase::Exhale,
            Phase::Exhale => Phase::Inhale,
        }
    }
}

/// How the output device is driven.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum OutputMode {
    /// On/off output, one step per phase.
    #[default]
    Binary,
    /// Continuous intensity, ramped over many steps.
    Pwm,
}

impl OutputMode {
    /// Returns the mode as a lowercase string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            OutputMode::Binary => "binary",
            OutputMode::Pwm => "pwm",
        }
    }

    /// Parse a mode from text input.
    ///
    /// Accepts `"binary"`/`"onoff"` and `"pwm"`/`"fade"`, trimmed and
    /// case-insensitive.
    ///
    /// ```
    /// use rs_breathe::OutputMode;
    ///
    /// assert_eq!(OutputMode::from_text(" PWM "), Some(OutputMode::Pwm));
    /// assert_eq!(OutputMode::from_text("onoff"), Some(OutputMode::Binary));
    /// assert_eq!(OutputMode::from_text("sine"), None);
    /// ```
    pub fn from_text(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" | "onoff" => Some(OutputMode::Binary),
            "pwm" | "fade" => Some(OutputMode::Pwm),
            _ => None,
        }
    }
}

/// Binary-mode output level during exhale.
///
/// Older firmware kept the output active through the whole cycle in binary
/// mode. [`Hold`](Self::Hold) reproduces that for installations that depend
/// on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BinaryExhale {
    /// Switch the output off while exhaling.
    #[default]
    Release,
    /// Keep the output on while exhaling.
    Hold,
}

/// One instruction for the output device.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutputStep {
    /// Output intensity in `[0, 1]`.
    pub duty_cycle: f32,
    /// How long to hold this intensity.
    pub hold_time: Duration,
}

/// Phase expander.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Waveform {
    pwm_steps: u32,
    binary_exhale: BinaryExhale,
}

impl Default for Waveform {
    fn default() -> Self {
        Self {
            pwm_steps: DEFAULT_PWM_STEPS,
            binary_exhale: BinaryExhale::Release,
        }
    }
}

impl Waveform {
    /// Creates a waveform with `pwm_steps` steps per PWM phase.
    ///
    /// # Errors
    ///
    /// `pwm_steps` must be at least 1.
    pub fn new(pwm_steps: u32) -> Result<Self, ParameterError> {
        if pwm_steps == 0 {
            return Err(ParameterError::invalid(
                "pwm_steps",
                0.0,
                "must be at least 1",
            ));
        }
        Ok(Self {
            pwm_steps,
            ..Self::default()
        })
    }

    /// Sets the binary-mode exhale level.
    pub fn with_binary_exhale(mut self, binary_exhale: BinaryExhale) -> Self {
        self.binary_exhale = binary_exhale;
        self
    }

    /// Steps per PWM phase.
    #[inline]
    pub fn pwm_steps(&self) -> u32 {
        self.pwm_steps
    }

    /// Binary-mode exhale level.
    #[inline]
    pub fn binary_exhale(&self) -> BinaryExhale {
        self.binary_exhale
    }

    /// Expands a phase of length `duration` into its output steps.
    pub fn expand(&self, duration: Duration, mode: OutputMode, phase: Phase) -> PhaseSteps {
        match mode {
            OutputMode::Binary => {
                let duty = match (phase, self.binary_exhale) {
                    (Phase::Inhale, _) | (Phase::Exhale, BinaryExhale::Hold) => 1.0,
                    (Phase::Exhale, BinaryExhale::Release) => 0.0,
                };
                PhaseSteps {
                    phase,
                    shape: Shape::Level(duty),
                    next: 0,
                    count: 1,
                    hold: duration,
                }
            }
            OutputMode::Pwm => PhaseSteps {
                phase,
                shape: Shape::Ramp,
                next: 0,
                count: self.pwm_steps,
                hold: duration / self.pwm_steps,
            },
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum Shape {
    Level(f32),
    Ramp,
}

/// Lazy step sequence for one phase.
#[derive(Clone, Debug)]
pub struct PhaseSteps {
    phase: Phase,
    shape: Shape,
    next: u32,
    count: u32,
    hold: Duration,
}

impl PhaseSteps {
    /// The phase being expanded.
    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn duty_at(&self, index: u32) -> f32 {
        match self.shape {
            Shape::Level(duty) => duty,
            Shape::Ramp => {
                let frac = f64::from(index) / f64::from(self.count);
                let raw = match self.phase {
                    Phase::Inhale => frac,
                    Phase::Exhale => 1.0 - frac,
                };
                round_milli(raw) as f32
            }
        }
    }
}

impl Iterator for PhaseSteps {
    type Item = OutputStep;

    fn next(&mut self) -> Option<OutputStep> {
        if self.next >= self.count {
            return None;
        }
        let step = OutputStep {
            duty_cycle: self.duty_at(self.next),
            hold_time: self.hold,
        };
        self.next += 1;
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for PhaseSteps {}

impl core::iter::FusedIterator for PhaseSteps {}

fn round_milli(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
