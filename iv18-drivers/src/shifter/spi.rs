//! MAX6921 on a hardware SPI bus
//!
//! SPI moves whole bytes, so a word goes out as three bytes, MSB first.
//! The four leading padding bits are pushed through the 20-bit register
//! and out of DOUT before LOAD is pulsed, leaving exactly the low 20 bits
//! in the latch. SPI mode 0, up to 5 MHz.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use iv18_core::traits::SerialShifter;

use super::{Line, ShiftError};

/// Bits carried by one transfer
const TRANSFER_BITS: u8 = 24;

/// SPI-driven MAX6921
pub struct Max6921Spi<SPI, P> {
    spi: SPI,
    latch: Line<P>,
    enable: Line<P>,
    oe: Line<P>,
}

impl<SPI: SpiBus, P: OutputPin> Max6921Spi<SPI, P> {
    /// Create a shifter over an already configured bus
    pub fn new(spi: SPI, latch: Line<P>, enable: Line<P>, oe: Line<P>) -> Self {
        Self {
            spi,
            latch,
            enable,
            oe,
        }
    }

    /// Give back the bus
    pub fn release(self) -> SPI {
        self.spi
    }

    fn load(&mut self) -> Result<(), P::Error> {
        self.latch.set_active(true)?;
        self.latch.set_active(false)
    }
}

impl<SPI: SpiBus, P: OutputPin> SerialShifter for Max6921Spi<SPI, P> {
    type Error = ShiftError<P::Error, SPI::Error>;

    /// Words wider than 24 bits are truncated to their low 24 bits
    fn shift_word(&mut self, word: u32, bits: u8) -> Result<(), Self::Error> {
        let mask = if bits >= TRANSFER_BITS {
            0x00FF_FFFF
        } else {
            (1u32 << bits) - 1
        };
        let bytes = (word & mask).to_be_bytes();

        self.spi.write(&bytes[1..]).map_err(ShiftError::Bus)?;
        self.spi.flush().map_err(ShiftError::Bus)?;
        self.load().map_err(ShiftError::Pin)
    }

    fn set_output_enable(&mut self, on: bool) -> Result<(), Self::Error> {
        self.oe.set_active(on).map_err(ShiftError::Pin)
    }

    fn set_enable(&mut self, on: bool) -> Result<(), Self::Error> {
        self.enable.set_active(on).map_err(ShiftError::Pin)
    }
}
