//! MAX6921 output word layout
//!
//! The MAX6921 has a 20-bit shift register feeding OUT0..OUT19. Which
//! output drives which anode or grid is a property of the PCB, so the
//! mapping is a constant table rather than a runtime parameter.
//!
//! Bits are clocked in MSB first: the first bit shifted ends up in OUT19,
//! the last one in OUT0.

use crate::config::ConfigError;

/// Width of the MAX6921 shift register
pub const REGISTER_BITS: u8 = 20;

/// Maximum digit count (8 outputs are always taken by segments)
pub const MAX_DIGITS: usize = REGISTER_BITS as usize - 8;

/// Segment and grid to output mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WordLayout {
    /// Output driven by each segment bit (a, b, c, d, e, f, g, dp)
    pub segment_outputs: [u8; 8],
    /// Output driving the grid of each digit column, leftmost first
    pub grid_outputs: [u8; MAX_DIGITS],
}

impl WordLayout {
    /// Reference IV-18 clock board
    ///
    /// Segments a..dp on OUT0..OUT7. The eight digit grids are wired right
    /// to left on OUT8..OUT15 (leftmost column on OUT15), the indicator grid
    /// on OUT16. OUT17..OUT19 are unused on this board.
    pub const IV18: Self = Self {
        segment_outputs: [0, 1, 2, 3, 4, 5, 6, 7],
        grid_outputs: [15, 14, 13, 12, 11, 10, 9, 8, 16, 17, 18, 19],
    };

    /// Check the first `digits` grids and all segments map to distinct
    /// outputs inside the register
    pub fn validate(&self, digits: usize) -> Result<(), ConfigError> {
        if digits == 0 || digits > MAX_DIGITS {
            return Err(ConfigError::DigitCount(digits as u8));
        }

        let mut used: u32 = 0;
        let outputs = self
            .segment_outputs
            .iter()
            .chain(self.grid_outputs[..digits].iter());

        for &out in outputs {
            if out >= REGISTER_BITS {
                return Err(ConfigError::InvalidLayout);
            }
            let bit = 1u32 << out;
            if used & bit != 0 {
                return Err(ConfigError::InvalidLayout);
            }
            used |= bit;
        }

        Ok(())
    }

    /// Output bits for a segment mask
    pub fn segment_bits(&self, mask: u8) -> u32 {
        self.segment_outputs
            .iter()
            .enumerate()
            .filter(|(seg, _)| mask & (1 << seg) != 0)
            .fold(0, |word, (_, &out)| word | 1 << out)
    }

    /// Output bit selecting the grid of `digit`
    ///
    /// Zero for digits past [`MAX_DIGITS`].
    pub fn grid_bit(&self, digit: usize) -> u32 {
        self.grid_outputs
            .get(digit)
            .map_or(0, |&out| 1 << out)
    }

    /// Full register word for one multiplex step
    pub fn compose(&self, digit: usize, mask: u8) -> u32 {
        self.segment_bits(mask) | self.grid_bit(digit)
    }
}

impl Default for WordLayout {
    fn default() -> Self {
        Self::IV18
    }
}
