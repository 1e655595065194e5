//! Push button that cancels the breathing loop.

use std::time::Duration;

use crate::cancel::CancelToken;
use esp_idf_hal::gpio::{Input, InputPin, OutputPin, PinDriver, Pull};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;

/// Active-low stop button with internal pull-up.
///
/// The SuperMini BOOT button on GPIO9 works out of the box.
///
/// # Example
///
/// ```ignore
/// use rs_breathe::hal::esp32::Esp32StopButton;
///
/// let button = Esp32StopButton::new(peripherals.pins.gpio9)?;
/// let token = cancel.clone();
/// std::thread::spawn(move || button.watch(&token, Duration::from_millis(50)));
/// ```
pub struct Esp32StopButton<'d, P>
where
    P: InputPin + OutputPin,
{
    pin: PinDriver<'d, P, Input>,
}

impl<'d, P> Esp32StopButton<'d, P>
where
    P: InputPin + OutputPin,
{
    /// Configures `pin` as a pulled-up input.
    pub fn new(pin: impl Peripheral<P = P> + 'd) -> Result<Self, EspError> {
        let mut pin = PinDriver::input(pin)?;
        pin.set_pull(Pull::Up)?;
        Ok(Self { pin })
    }

    /// Returns true while the button is held.
    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pin.is_low()
    }

    /// Polls the button until it is pressed or `token` is cancelled
    /// elsewhere, then cancels `token`.
    pub fn watch(&self, token: &CancelToken, poll_interval: Duration) {
        loop {
            if self.is_pressed() {
                log::info!("stop button pressed");
                token.cancel();
                return;
            }
            if token.wait_timeout(poll_interval) {
                return;
            }
        }
    }
}
