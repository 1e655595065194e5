//! Capability traits the breathing engine is written against.
//!
//! The controller never depends on concrete hardware or on the wall clock.
//! Everything it touches is one of these traits, injected by the caller:
//!
//! - [`BreathingDevice`]: the output being driven (LED, buzzer, relay)
//! - [`Pacer`]: suspends the loop for a step's hold time
//! - [`BreathObserver`]: receives dry-run labels and the stop notice
//!
//! # Submodules
//!
//! - `device`: output capability
//! - `pacing`: hold/suspension capability
//! - `observer`: notifications

pub mod device;
pub mod observer;
pub mod pacing;

pub use device::*;
pub use observer::*;
pub use pacing::*;
