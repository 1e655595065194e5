//! Shared configuration for the desktop runner and ESP32 firmware.
//!
//! Uses `heapless::String` for names so the same types work on
//! microcontrollers, and builder-style `with_*` setters for ergonomics.
//! Defaults match a calm, healthy rhythm: 60 bpm, no illness, symmetric
//! inhale/exhale.
//!
//! # Example
//!
//! ```rust
//! use rs_breathe::config::{BreathingConfig, Config, DeviceConfig};
//! use rs_breathe::OutputMode;
//!
//! // Use defaults
//! let config = Config::default();
//! assert_eq!(config.breathing.bpm, 60.0);
//!
//! // Or customize
//! let config = Config::default()
//!     .with_breathing(
//!         BreathingConfig::default()
//!             .with_bpm(72.0)
//!             .with_alpha(0.4)
//!             .with_mode(OutputMode::Pwm),
//!     )
//!     .with_device(DeviceConfig::default().with_name("Hamster"));
//!
//! let profile = config.breathing.profile().unwrap();
//! assert!((profile.breathing_cycle() - 14.4).abs() < 1e-9);
//! ```

use heapless::String as HString;

use crate::error::ParameterError;
use crate::profile::BreathingProfile;
use crate::waveform::{BinaryExhale, OutputMode, Waveform, DEFAULT_PWM_STEPS};

/// Maximum length for short config strings (names, labels)
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    for c in s.chars() {
        if hs.push(c).is_err() {
            break;
        }
    }
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Breathing rhythm and loop behavior
    pub breathing: BreathingConfig,
    /// Hardware PWM output settings
    pub output: OutputConfig,
    /// Device identification
    pub device: DeviceConfig,
}

impl Config {
    /// Set breathing configuration
    pub fn with_breathing(mut self, breathing: BreathingConfig) -> Self {
        self.breathing = breathing;
        self
    }

    /// Set output configuration
    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

// ============================================================================
// Breathing Config
// ============================================================================

/// Breathing rhythm and loop configuration.
///
/// Values are not validated until [`profile`](Self::profile) or
/// [`waveform`](Self::waveform) is called; builders never clamp.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BreathingConfig {
    /// Nominal beats per minute
    pub bpm: f64,
    /// Multiplier on the cycle rate (1.0 = healthy)
    pub illness_factor: f64,
    /// Fraction of each cycle spent inhaling, strictly within (0, 1)
    pub alpha: f64,
    /// Binary on/off or PWM ramp
    pub mode: OutputMode,
    /// Exercise timing without touching a device
    pub dry_run: bool,
    /// Steps per phase in PWM mode
    pub pwm_steps: u32,
    /// Output level while exhaling in binary mode
    pub binary_exhale: BinaryExhale,
    /// Switch the device off when the loop stops
    pub release_on_stop: bool,
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            bpm: 60.0,
            illness_factor: 1.0,
            alpha: 0.5,
            mode: OutputMode::Binary,
            dry_run: false,
            pwm_steps: DEFAULT_PWM_STEPS,
            binary_exhale: BinaryExhale::Release,
            release_on_stop: true,
        }
    }
}

impl BreathingConfig {
    /// Set beats per minute
    pub fn with_bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    /// Set the illness factor
    pub fn with_illness_factor(mut self, illness_factor: f64) -> Self {
        self.illness_factor = illness_factor;
        self
    }

    /// Set the inhale fraction
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    /// Set the output mode
    pub fn with_mode(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enable or disable dry run
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set PWM steps per phase
    pub fn with_pwm_steps(mut self, steps: u32) -> Self {
        self.pwm_steps = steps;
        self
    }

    /// Set the binary-mode exhale level
    pub fn with_binary_exhale(mut self, binary_exhale: BinaryExhale) -> Self {
        self.binary_exhale = binary_exhale;
        self
    }

    /// Enable or disable switching the device off on stop
    pub fn with_release_on_stop(mut self, release: bool) -> Self {
        self.release_on_stop = release;
        self
    }

    /// Validate and compute the breathing profile
    pub fn profile(&self) -> Result<BreathingProfile, ParameterError> {
        BreathingProfile::compute(self.bpm, self.illness_factor, self.alpha)
    }

    /// Validate and build the phase expander
    pub fn waveform(&self) -> Result<Waveform, ParameterError> {
        Ok(Waveform::new(self.pwm_steps)?.with_binary_exhale(self.binary_exhale))
    }
}

// ============================================================================
// Output Config
// ============================================================================

/// Hardware PWM output configuration
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutputConfig {
    /// PWM carrier frequency in Hz
    pub pwm_frequency_hz: u32,
    /// PWM resolution in bits
    pub pwm_resolution_bits: u8,
    /// GPIO number of the output
    pub gpio: i32,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pwm_frequency_hz: 1_000,
            pwm_resolution_bits: 10,
            gpio: 2,
        }
    }
}

impl OutputConfig {
    /// Set the PWM frequency
    pub fn with_pwm_frequency_hz(mut self, hz: u32) -> Self {
        self.pwm_frequency_hz = hz;
        self
    }

    /// Set the PWM resolution, clamped to 1..=14 bits
    pub fn with_pwm_resolution_bits(mut self, bits: u8) -> Self {
        self.pwm_resolution_bits = bits.clamp(1, 14);
        self
    }

    /// Set the output GPIO
    pub fn with_gpio(mut self, gpio: i32) -> Self {
        self.gpio = gpio;
        self
    }

    /// Largest raw duty value at the configured resolution
    pub fn max_duty(&self) -> u32 {
        (1u32 << self.pwm_resolution_bits) - 1
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Device identification configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Human-readable name of the creature being animated
    pub name: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("rs-breathe"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.breathing.bpm, 60.0);
        assert_eq!(config.breathing.illness_factor, 1.0);
        assert_eq!(config.breathing.alpha, 0.5);
        assert_eq!(config.breathing.pwm_steps, 1000);
        assert_eq!(config.breathing.mode, OutputMode::Binary);
        assert!(!config.breathing.dry_run);
        assert!(config.breathing.release_on_stop);
        assert_eq!(config.output.pwm_resolution_bits, 10);
        assert_eq!(config.device.name.as_str(), "rs-breathe");
    }

    #[test]
    fn builder_pattern() {
        let config = Config::default()
            .with_breathing(
                BreathingConfig::default()
                    .with_bpm(30.0)
                    .with_illness_factor(2.0)
                    .with_dry_run(true)
                    .with_binary_exhale(BinaryExhale::Hold),
            )
            .with_output(OutputConfig::default().with_gpio(8).with_pwm_frequency_hz(5000))
            .with_device(DeviceConfig::default().with_name("Turtle"));

        assert_eq!(config.breathing.bpm, 30.0);
        assert_eq!(config.breathing.illness_factor, 2.0);
        assert!(config.breathing.dry_run);
        assert_eq!(config.breathing.binary_exhale, BinaryExhale::Hold);
        assert_eq!(config.output.gpio, 8);
        assert_eq!(config.output.pwm_frequency_hz, 5000);
        assert_eq!(config.device.name.as_str(), "Turtle");
    }

    #[test]
    fn default_profile_is_symmetric() {
        let profile = BreathingConfig::default().profile().unwrap();
        assert_eq!(profile.inhale_duration(), profile.exhale_duration());
    }

    #[test]
    fn invalid_values_are_not_clamped() {
        let config = BreathingConfig::default().with_alpha(1.0);
        assert_eq!(config.alpha, 1.0);
        assert!(config.profile().is_err());
    }

    #[test]
    fn waveform_carries_settings() {
        let waveform = BreathingConfig::default()
            .with_pwm_steps(50)
            .with_binary_exhale(BinaryExhale::Hold)
            .waveform()
            .unwrap();
        assert_eq!(waveform.pwm_steps(), 50);
        assert_eq!(waveform.binary_exhale(), BinaryExhale::Hold);

        assert!(BreathingConfig::default().with_pwm_steps(0).waveform().is_err());
    }

    #[test]
    fn output_resolution_clamped() {
        assert_eq!(OutputConfig::default().with_pwm_resolution_bits(0).pwm_resolution_bits, 1);
        assert_eq!(OutputConfig::default().with_pwm_resolution_bits(20).pwm_resolution_bits, 14);
        assert_eq!(OutputConfig::default().max_duty(), 1023);
    }

    #[test]
    fn short_string_truncation() {
        let long_input = "a".repeat(100);
        let s = short_string(&long_input);
        assert_eq!(s.len(), MAX_SHORT_STRING);
    }

    #[test]
    fn short_string_keeps_utf8_boundaries() {
        let input = "é".repeat(40); // 80 bytes
        let s = short_string(&input);
        assert_eq!(s.len(), 64);
        assert_eq!(s.chars().count(), 32);
    }
}
