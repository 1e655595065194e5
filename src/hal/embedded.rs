//! Adapters from `embedded-hal` 1.0 traits to [`BreathingDevice`].
//!
//! Any HAL that implements `embedded_hal::pwm::SetDutyCycle` (ESP-IDF LEDC,
//! RP2040, STM32 timers, ...) can be driven in both modes through
//! [`PwmLed`]. Plain GPIO outputs work in binary mode through [`PinLed`].
//!
//! # Example
//!
//! ```rust,ignore
//! use rs_breathe::hal::PwmLed;
//!
//! let channel = /* your HAL's PWM channel */;
//! let led = PwmLed::new(channel)?;
//! ```

use embedded_hal::digital::OutputPin;
use embedded_hal::pwm::SetDutyCycle;

use crate::traits::BreathingDevice;

/// LED (or any load) on a PWM channel.
#[derive(Debug)]
pub struct PwmLed<C> {
    channel: C,
    duty: f32,
}

impl<C: SetDutyCycle> PwmLed<C> {
    /// Wraps `channel`, switching the output off first.
    pub fn new(mut channel: C) -> Result<Self, C::Error> {
        channel.set_duty_cycle_fully_off()?;
        Ok(Self { channel, duty: 0.0 })
    }

    /// Last duty cycle written (0.0 to 1.0).
    #[inline]
    pub fn duty(&self) -> f32 {
        self.duty
    }

    /// Releases the underlying channel.
    pub fn into_inner(self) -> C {
        self.channel
    }
}

impl<C: SetDutyCycle> BreathingDevice for PwmLed<C> {
    type Error = C::Error;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.channel.set_duty_cycle_fully_on()?;
        self.duty = 1.0;
        Ok(())
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        self.channel.set_duty_cycle_fully_off()?;
        self.duty = 0.0;
        Ok(())
    }

    fn set_value(&mut self, duty: f32) -> Result<(), Self::Error> {
        let duty = duty.clamp(0.0, 1.0);
        let raw = (duty * f32::from(self.channel.max_duty_cycle())).round() as u16;
        self.channel.set_duty_cycle(raw)?;
        self.duty = duty;
        Ok(())
    }
}

/// LED on a plain digital output.
///
/// `set_value` thresholds at 0.5, so PWM mode degrades to a square wave.
#[derive(Debug)]
pub struct PinLed<P> {
    pin: P,
    is_on: bool,
}

impl<P: OutputPin> PinLed<P> {
    /// Wraps `pin`, driving it low first.
    pub fn new(mut pin: P) -> Result<Self, P::Error> {
        pin.set_low()?;
        Ok(Self { pin, is_on: false })
    }

    /// Whether the pin is currently driven high.
    #[inline]
    pub fn is_on(&self) -> bool {
        self.is_on
    }

    /// Releases the underlying pin.
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> BreathingDevice for PinLed<P> {
    type Error = P::Error;

    fn on(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()?;
        self.is_on = true;
        Ok(())
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()?;
        self.is_on = false;
        Ok(())
    }

    fn set_value(&mut self, duty: f32) -> Result<(), Self::Error> {
        if duty >= 0.5 {
            self.on()
        } else {
            self.off()
        }
    }
}
