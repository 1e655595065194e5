//! LED driven by the ESP32 LEDC PWM peripheral.
//!
//! The LEDC channel is wrapped in [`PwmLed`], so scaling and clamping are
//! shared with every other `embedded-hal` PWM output.

use crate::config::OutputConfig;
use crate::hal::PwmLed;
use crate::traits::BreathingDevice;
use esp_idf_hal::ledc::{config::TimerConfig, LedcDriver, LedcTimerDriver, Resolution};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::prelude::*;
use esp_idf_hal::sys::EspError;

/// Breathing LED on an LEDC channel.
///
/// # Hardware Setup
///
/// - GPIO2 → 330Ω resistor → LED anode
/// - LED cathode → GND
///
/// # Example
///
/// ```ignore
/// use rs_breathe::hal::esp32::Esp32Led;
/// use rs_breathe::config::OutputConfig;
/// use rs_breathe::traits::BreathingDevice;
///
/// let peripherals = Peripherals::take()?;
/// let mut led = Esp32Led::new(
///     peripherals.pins.gpio2,
///     peripherals.ledc.timer0,
///     peripherals.ledc.channel0,
///     &OutputConfig::default(),
/// )?;
///
/// led.set_value(0.5)?; // half brightness
/// ```
pub struct Esp32Led<'d> {
    pwm: PwmLed<LedcDriver<'d>>,
}

impl<'d> Esp32Led<'d> {
    /// Creates the LED and switches it off.
    ///
    /// # Errors
    ///
    /// Returns an error if LEDC initialization fails.
    pub fn new<T, TI, C, CI, P, PI>(
        pin: P,
        timer: T,
        channel: C,
        config: &OutputConfig,
    ) -> Result<Self, EspError>
    where
        TI: esp_idf_hal::ledc::LedcTimer + 'd,
        T: Peripheral<P = TI> + 'd,
        CI: esp_idf_hal::ledc::LedcChannel<SpeedMode = TI::SpeedMode> + 'd,
        C: Peripheral<P = CI> + 'd,
        PI: esp_idf_hal::gpio::OutputPin + 'd,
        P: Peripheral<P = PI> + 'd,
    {
        let timer_config = TimerConfig::default()
            .frequency(config.pwm_frequency_hz.Hz())
            .resolution(resolution(config.pwm_resolution_bits));
        let timer_driver = LedcTimerDriver::new(timer, &timer_config)?;
        let channel = LedcDriver::new(channel, &timer_driver, pin)?;

        Ok(Self {
            pwm: PwmLed::new(channel)?,
        })
    }

    /// Last duty cycle written (0.0 to 1.0).
    #[inline]
    pub fn duty(&self) -> f32 {
        self.pwm.duty()
    }
}

impl BreathingDevice for Esp32Led<'_> {
    type Error = EspError;

    fn on(&mut self) -> Result<(), EspError> {
        self.pwm.on()
    }

    fn off(&mut self) -> Result<(), EspError> {
        self.pwm.off()
    }

    fn set_value(&mut self, duty: f32) -> Result<(), EspError> {
        self.pwm.set_value(duty)
    }
}

fn resolution(bits: u8) -> Resolution {
    match bits {
        0..=1 => Resolution::Bits1,
        2 => Resolution::Bits2,
        3 => Resolution::Bits3,
        4 => Resolution::Bits4,
        5 => Resolution::Bits5,
        6 => Resolution::Bits6,
        7 => Resolution::Bits7,
        8 => Resolution::Bits8,
        9 => Resolution::Bits9,
        10 => Resolution::Bits10,
        11 => Resolution::Bits11,
        12 => Resolution::Bits12,
        13 => Resolution::Bits13,
        _ => Resolution::Bits14,
    }
}
