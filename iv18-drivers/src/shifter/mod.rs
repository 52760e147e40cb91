//! MAX6921 serial shifters

pub mod line;
pub mod max6921;
pub mod spi;

pub use line::Line;
pub use max6921::{Max6921, Max6921Pins};
pub use spi::Max6921Spi;

/// Shifter error
///
/// `P` is the GPIO error type, `B` the bus error type for shifters that
/// clock data through a peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftError<P, B = core::convert::Infallible> {
    /// GPIO write failed
    Pin(P),
    /// SPI transfer failed
    Bus(B),
}
