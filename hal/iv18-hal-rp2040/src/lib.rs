//! RP2040 support for the IV-18 display firmware
//!
//! - Dynamic pin allocation for config-driven setup
//! - MAX6921 control lines built from a [`DisplayHwConfig`](iv18_core::config::DisplayHwConfig)

#![no_std]

pub mod lines;
pub mod pins;

pub use lines::{display_pins, DisplayPins};
pub use pins::{PinBank, PinError};
