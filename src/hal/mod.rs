//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `thread`: Wall-clock pacer for any `std` target
//! - `embedded`: Adapters for `embedded-hal` PWM channels and output pins
//! - `console`: Terminal gauge and printer for the desktop runner
//! - `esp32`: ESP32-C3 LEDC-driven LED (requires `esp32` feature)

pub mod console;
pub mod embedded;
pub mod mock;
pub mod thread;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use console::*;
pub use embedded::*;
pub use mock::*;
pub use thread::*;

#[cfg(feature = "esp32")]
pub use esp32::*;
