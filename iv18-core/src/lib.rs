//! Board-agnostic core logic for the IV-18 VFD driver
//!
//! This crate contains everything that does not depend on a specific
//! microcontroller or HAL:
//!
//! - Configuration types and startup validation
//! - Frame buffer, seven-segment font and MAX6921 word layout
//! - Multiplex scheduler and OE intensity controller
//! - Hardware abstraction traits (serial shifter, content writer)

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod display;
pub mod scheduler;
pub mod traits;
