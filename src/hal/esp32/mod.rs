//! ESP32-C3 SuperMini hardware abstraction layer for breathing outputs.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Output**: LED (or MOSFET-switched load) on an LEDC PWM channel
//! - **Stop**: BOOT button
//!
//! Timing uses [`ThreadPacer`](crate::hal::ThreadPacer); ESP-IDF provides
//! `std` threads and condition variables.
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

mod button;
mod led;

pub use button::Esp32StopButton;
pub use led::Esp32Led;

/// Pin assignments for SuperMini ESP32-C3.
pub mod pins {
    /// Breathing LED output (LEDC channel 0)
    pub const LED: i32 = 2;

    /// BOOT button, active low (only affects programming when held at reset)
    pub const STOP_BUTTON: i32 = 9;
}
