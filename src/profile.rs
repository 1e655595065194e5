//! Breathing parameter calculation.
//!
//! A [`BreathingProfile`] turns the user-facing parameters (beats per
//! minute, illness factor and inhale fraction `alpha`) into the phase
//! durations the controller runs on. Profiles are immutable and are
//! recomputed every time a breathing session starts.
//!
//! # Formulae
//!
//! ```text
//! breathing_cycle = 0.2 * bpm * illness_factor
//! inhale          = alpha       * 60 / breathing_cycle   (seconds)
//! exhale          = (1 - alpha) * 60 / breathing_cycle   (seconds)
//! ```
//!
//! # Example
//!
//! ```rust
//! use rs_breathe::BreathingProfile;
//!
//! let profile = BreathingProfile::compute(60.0, 1.0, 0.25).unwrap();
//! assert_eq!(profile.breathing_cycle(), 12.0);
//! assert!((profile.inhale_duration().as_secs_f64() - 1.25).abs() < 1e-9);
//! assert!((profile.exhale_duration().as_secs_f64() - 3.75).abs() < 1e-9);
//! ```

use core::fmt;
use core::time::Duration;

use crate::error::ParameterError;

/// Scale from beats per minute to the internal cycle rate.
const CYCLE_SCALE: f64 = 0.2;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Derived timing for one breathing session.
///
/// Construct with [`compute`](Self::compute); every value that exists has
/// passed validation, so the durations are always finite and positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreathingProfile {
    bpm: f64,
    illness_factor: f64,
    alpha: f64,
    breathing_cycle: f64,
    inhale: Duration,
    exhale: Duration,
}

impl BreathingProfile {
    /// Computes a profile from raw parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ParameterError::InvalidParameter`] when `bpm` or
    /// `illness_factor` is not strictly positive, when `alpha` is not
    /// strictly within (0, 1), or when any input is not finite. Validation
    /// runs before any division.
    pub fn compute(bpm: f64, illness_factor: f64, alpha: f64) -> Result<Self, ParameterError> {
        require_positive("bpm", bpm)?;
        require_positive("illness_factor", illness_factor)?;
        if !alpha.is_finite() || alpha <= 0.0 || alpha >= 1.0 {
            return Err(ParameterError::invalid(
                "alpha",
                alpha,
                "must be strictly between 0 and 1",
            ));
        }

        let breathing_cycle = CYCLE_SCALE * bpm * illness_factor;
        let period = SECONDS_PER_MINUTE / breathing_cycle;
        let inhale = phase_duration(alpha * period, breathing_cycle)?;
        let exhale = phase_duration((1.0 - alpha) * period, breathing_cycle)?;

        Ok(Self {
            bpm,
            illness_factor,
            alpha,
            breathing_cycle,
            inhale,
            exhale,
        })
    }

    /// Nominal beats per minute.
    #[inline]
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Illness multiplier applied to the cycle rate.
    #[inline]
    pub fn illness_factor(&self) -> f64 {
        self.illness_factor
    }

    /// Fraction of the cycle spent inhaling.
    #[inline]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Derived cycle rate, `0.2 * bpm * illness_factor`.
    #[inline]
    pub fn breathing_cycle(&self) -> f64 {
        self.breathing_cycle
    }

    /// Duration of the inhale phase.
    #[inline]
    pub fn inhale_duration(&self) -> Duration {
        self.inhale
    }

    /// Duration of the exhale phase.
    #[inline]
    pub fn exhale_duration(&self) -> Duration {
        self.exhale
    }

    /// One full inhale plus exhale.
    pub fn cycle_duration(&self) -> Duration {
        self.inhale + self.exhale
    }

    /// Numeric snapshot for visualization and reporting.
    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary {
            bpm: self.bpm,
            illness_factor: self.illness_factor,
            alpha: self.alpha,
            breathing_cycle: self.breathing_cycle,
            inhale_secs: self.inhale.as_secs_f64(),
            exhale_secs: self.exhale.as_secs_f64(),
            cycle_secs: self.cycle_duration().as_secs_f64(),
        }
    }
}

impl fmt::Display for BreathingProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BPM: {}", self.bpm)?;
        writeln!(f, "Breathing cycle: {} per minute", self.breathing_cycle)?;
        writeln!(f, "Illness factor: {}", self.illness_factor)?;
        write!(f, "Alpha: {}", self.alpha)
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ParameterError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ParameterError::invalid(
            name,
            value,
            "must be a finite number greater than zero",
        ))
    }
}

fn phase_duration(secs: f64, breathing_cycle: f64) -> Result<Duration, ParameterError> {
    Duration::try_from_secs_f64(secs).map_err(|_| {
        ParameterError::invalid(
            "breathing_cycle",
            breathing_cycle,
            "phase duration is not representable",
        )
    })
}

/// Derived numbers handed to visualization collaborators.
///
/// Plotting code consumes this and nothing else; it never sees the
/// controller's step sequence.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileSummary {
    /// Nominal beats per minute.
    pub bpm: f64,
    /// Illness multiplier.
    pub illness_factor: f64,
    /// Inhale fraction.
    pub alpha: f64,
    /// Derived cycle rate.
    pub breathing_cycle: f64,
    /// Inhale duration in seconds.
    pub inhale_secs: f64,
    /// Exhale duration in seconds.
    pub exhale_secs: f64,
    /// Full cycle duration in seconds.
    pub cycle_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn secs(d: Duration) -> f64 {
        d.as_secs_f64()
    }

    #[test]
    fn symmetric_baseline() {
        let p = BreathingProfile::compute(60.0, 1.0, 0.5).unwrap();
        assert!((p.breathing_cycle() - 12.0).abs() < EPS);
        assert!((secs(p.inhale_duration()) - 2.5).abs() < EPS);
        assert!((secs(p.exhale_duration()) - 2.5).abs() < EPS);
    }

    #[test]
    fn illness_doubles_rate() {
        let p = BreathingProfile::compute(60.0, 2.0, 0.5).unwrap();
        assert!((p.breathing_cycle() - 24.0).abs() < EPS);
        assert!((secs(p.inhale_duration()) - 1.25).abs() < EPS);
        assert!((secs(p.exhale_duration()) - 1.25).abs() < EPS);
    }

    #[test]
    fn asymmetric_alpha() {
        let p = BreathingProfile::compute(60.0, 1.0, 0.25).unwrap();
        assert!((p.breathing_cycle() - 12.0).abs() < EPS);
        assert!((secs(p.inhale_duration()) - 1.25).abs() < EPS);
        assert!((secs(p.exhale_duration()) - 3.75).abs() < EPS);
    }

    #[test]
    fn inhale_share_equals_alpha() {
        for &(bpm, illness, alpha) in &[
            (12.0, 1.0, 0.1),
            (60.0, 0.5, 0.33),
            (90.0, 1.7, 0.5),
            (5.0, 3.0, 0.9),
            (200.0, 0.25, 0.01),
        ] {
            let p = BreathingProfile::compute(bpm, illness, alpha).unwrap();
            let inhale = secs(p.inhale_duration());
            let total = inhale + secs(p.exhale_duration());
            assert!((inhale / total - alpha).abs() < 1e-6, "alpha {alpha}");
            assert!((p.breathing_cycle() - 0.2 * bpm * illness).abs() < EPS);
        }
    }

    #[test]
    fn cycle_duration_is_sum() {
        let p = BreathingProfile::compute(60.0, 1.0, 0.25).unwrap();
        assert!((secs(p.cycle_duration()) - 5.0).abs() < EPS);
    }

    #[test]
    fn rejects_alpha_bounds() {
        for alpha in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let err = BreathingProfile::compute(60.0, 1.0, alpha).unwrap_err();
            assert!(matches!(
                err,
                ParameterError::InvalidParameter { name: "alpha", .. }
            ));
        }
    }

    #[test]
    fn rejects_non_positive_bpm() {
        for bpm in [0.0, -60.0, f64::INFINITY, f64::NAN] {
            let err = BreathingProfile::compute(bpm, 1.0, 0.5).unwrap_err();
            assert!(matches!(
                err,
                ParameterError::InvalidParameter { name: "bpm", .. }
            ));
        }
    }

    #[test]
    fn rejects_non_positive_illness_factor() {
        let err = BreathingProfile::compute(60.0, 0.0, 0.5).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::InvalidParameter {
                name: "illness_factor",
                ..
            }
        ));
    }

    #[test]
    fn rejects_unrepresentable_duration() {
        let err = BreathingProfile::compute(1e-300, 1e-10, 0.5).unwrap_err();
        assert!(matches!(
            err,
            ParameterError::InvalidParameter {
                name: "breathing_cycle",
                ..
            }
        ));
    }

    #[test]
    fn summary_matches_profile() {
        let p = BreathingProfile::compute(30.0, 1.0, 0.4).unwrap();
        let s = p.summary();
        assert_eq!(s.bpm, 30.0);
        assert_eq!(s.alpha, 0.4);
        assert!((s.breathing_cycle - 6.0).abs() < EPS);
        assert!((s.inhale_secs - 4.0).abs() < EPS);
        assert!((s.exhale_secs - 6.0).abs() < EPS);
        assert!((s.cycle_secs - 10.0).abs() < EPS);
    }

    #[test]
    fn display_report() {
        let p = BreathingProfile::compute(60.0, 1.0, 0.5).unwrap();
        let text = p.to_string();
        assert!(text.starts_with("BPM: 60\n"));
        assert!(text.contains("Illness factor: 1\n"));
        assert!(text.ends_with("Alpha: 0.5"));
    }
}
