//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in iv18-core, on top of `embedded-hal` 1.0:
//!
//! - MAX6921 shifters (bit-banged GPIO, hardware SPI)
//! - The multiplexed, polled display driver

#![no_std]
#![deny(unsafe_code)]

pub mod display;
pub mod shifter;

pub use display::{DisplayError, Iv18Display, Page};
pub use shifter::{Line, Max6921, Max6921Pins, Max6921Spi, ShiftError};
