//! Serial shift register trait

/// Transport into a MAX6921-style serial-in, parallel-out driver
///
/// Implementations clock `bits` bits of `word` into the shift register,
/// most significant bit first, and latch them onto the outputs. The
/// register has no read-back, so the only errors are those of the
/// underlying pins or bus.
pub trait SerialShifter {
    /// Pin or bus error
    type Error;

    /// Shift `bits` bits of `word`, MSB first, and latch them
    fn shift_word(&mut self, word: u32, bits: u8) -> Result<(), Self::Error>;

    /// Drive the output enable line
    ///
    /// `true` lights the outputs. Polarity of the physical pin is handled
    /// by the implementation.
    fn set_output_enable(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Drive the enable line powering the tube
    fn set_enable(&mut self, on: bool) -> Result<(), Self::Error>;
}

impl<T: SerialShifter + ?Sized> SerialShifter for &mut T {
    type Error = T::Error;

    fn shift_word(&mut self, word: u32, bits: u8) -> Result<(), Self::Error> {
        T::shift_word(self, word, bits)
    }

    fn set_output_enable(&mut self, on: bool) -> Result<(), Self::Error> {
        T::set_output_enable(self, on)
    }

    fn set_enable(&mut self, on: bool) -> Result<(), Self::Error> {
        T::set_enable(self, on)
    }
}
