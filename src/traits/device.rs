//! Output device capability.
//!
//! # Example
//!
//! ```rust
//! use rs_breathe::traits::BreathingDevice;
//! use rs_breathe::hal::MockDevice;
//!
//! let mut led = MockDevice::new();
//! led.on().unwrap();
//! led.set_value(0.25).unwrap();
//! led.off().unwrap();
//!
//! assert_eq!(led.level, 0.0);
//! assert_eq!(led.calls.len(), 3);
//! ```

/// Output driven by the breathing loop.
///
/// Implement this for your LED, buzzer or relay driver. Binary mode only
/// calls [`on`](Self::on) and [`off`](Self::off); PWM mode only calls
/// [`set_value`](Self::set_value).
///
/// # Implementation Notes
///
/// - `set_value` receives a duty cycle in `[0, 1]`; clamp before scaling to
///   hardware resolution
/// - Outputs with no intensity control may treat `set_value` as a threshold
/// - Returning an error aborts the breathing loop
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_breathe::traits::BreathingDevice;
///
/// struct MyLed { /* hardware handles */ }
///
/// impl BreathingDevice for MyLed {
///     type Error = ();
///
///     fn on(&mut self) -> Result<(), ()> {
///         // Drive pin high...
///         Ok(())
///     }
///
///     fn off(&mut self) -> Result<(), ()> {
///         // Drive pin low...
///         Ok(())
///     }
///
///     fn set_value(&mut self, duty: f32) -> Result<(), ()> {
///         let raw = (duty.clamp(0.0, 1.0) * 1023.0) as u32;
///         // Set PWM duty cycle...
///         Ok(())
///     }
/// }
/// ```
pub trait BreathingDevice {
    /// Error type for device operations.
    type Error;

    /// Switch the output fully on.
    fn on(&mut self) -> Result<(), Self::Error>;

    /// Switch the output fully off.
    fn off(&mut self) -> Result<(), Self::Error>;

    /// Set the output intensity as a duty cycle in `[0, 1]`.
    fn set_value(&mut self, duty: f32) -> Result<(), Self::Error>;
}

impl<D: BreathingDevice + ?Sized> BreathingDevice for &mut D {
    type Error = D::Error;

    fn on(&mut self) -> Result<(), Self::Error> {
        (**self).on()
    }

    fn off(&mut self) -> Result<(), Self::Error> {
        (**self).off()
    }

    fn set_value(&mut self, duty: f32) -> Result<(), Self::Error> {
        (**self).set_value(duty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestLed {
        level: f32,
    }

    impl BreathingDevice for TestLed {
        type Error = ();

        fn on(&mut self) -> Result<(), ()> {
            self.level = 1.0;
            Ok(())
        }

        fn off(&mut self) -> Result<(), ()> {
            self.level = 0.0;
            Ok(())
        }

        fn set_value(&mut self, duty: f32) -> Result<(), ()> {
            self.level = duty;
            Ok(())
        }
    }

    fn drive<D: BreathingDevice>(mut device: D) -> Result<(), D::Error> {
        device.on()?;
        device.set_value(0.3)
    }

    #[test]
    fn mutable_reference_forwards() {
        let mut led = TestLed { level: 0.0 };
        drive(&mut led).unwrap();
        assert_eq!(led.level, 0.3);

        (&mut led).off().unwrap();
        assert_eq!(led.level, 0.0);
    }
}
