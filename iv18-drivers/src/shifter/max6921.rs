//! Bit-banged MAX6921 shifter
//!
//! Timing per bit:
//!
//! ```text
//! DIN  ==X=====bit=====X==
//! CLK  ____/‾‾‾‾‾‾\______
//!          ^ sampled on rising edge
//! ```
//!
//! After the last bit a LOAD pulse moves the shift register into the
//! output latch. The MAX6921 accepts a 5 MHz clock, so most MCUs can run
//! with no extra delay; `half_period_ns` stretches the clock for long or
//! slow level-shifted lines.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use iv18_core::traits::SerialShifter;

use super::{Line, ShiftError};

/// The five MAX6921 control lines
pub struct Max6921Pins<P> {
    /// Tube supply enable
    pub enable: Line<P>,
    /// DIN
    pub data: Line<P>,
    /// CLK
    pub clock: Line<P>,
    /// LOAD
    pub latch: Line<P>,
    /// Output enable (BLANK)
    pub oe: Line<P>,
}

/// GPIO-driven MAX6921
pub struct Max6921<P, D> {
    pins: Max6921Pins<P>,
    delay: D,
    half_period_ns: u32,
}

impl<P: OutputPin, D: DelayNs> Max6921<P, D> {
    /// Create a shifter
    ///
    /// The lines are expected to be inactive, as [`Line::new`] leaves them.
    pub fn new(pins: Max6921Pins<P>, delay: D, half_period_ns: u32) -> Self {
        Self {
            pins,
            delay,
            half_period_ns,
        }
    }

    /// Give back the pins and delay
    pub fn release(self) -> (Max6921Pins<P>, D) {
        (self.pins, self.delay)
    }

    fn pulse(line: &mut Line<P>, delay: &mut D, half_period_ns: u32) -> Result<(), P::Error> {
        line.set_active(true)?;
        delay.delay_ns(half_period_ns);
        line.set_active(false)?;
        delay.delay_ns(half_period_ns);
        Ok(())
    }

    fn shift_bits(&mut self, word: u32, bits: u8) -> Result<(), P::Error> {
        let pins = &mut self.pins;
        for i in (0..bits.min(32)).rev() {
            pins.data.set_active((word >> i) & 1 != 0)?;
            Self::pulse(&mut pins.clock, &mut self.delay, self.half_period_ns)?;
        }
        pins.data.set_active(false)?;
        Self::pulse(&mut pins.latch, &mut self.delay, self.half_period_ns)
    }
}

impl<P: OutputPin, D: DelayNs> SerialShifter for Max6921<P, D> {
    type Error = ShiftError<P::Error>;

    fn shift_word(&mut self, word: u32, bits: u8) -> Result<(), Self::Error> {
        self.shift_bits(word, bits).map_err(ShiftError::Pin)
    }

    fn set_output_enable(&mut self, on: bool) -> Result<(), Self::Error> {
        self.pins.oe.set_active(on).map_err(ShiftError::Pin)
    }

    fn set_enable(&mut self, on: bool) -> Result<(), Self::Error> {
        self.pins.enable.set_active(on).map_err(ShiftError::Pin)
    }
}
