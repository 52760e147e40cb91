//! Segment frame buffer
//!
//! One segment mask per digit position, column 0 being the leftmost digit.
//! The buffer has no knowledge of how digits are wired; that lives in
//! [`WordLayout`](super::WordLayout).

use core::fmt::{self, Write};

use heapless::String;

use super::font::{glyph, SEG_DP};

/// Longest formatted string accepted by [`FrameBuffer::print_fmt`]
pub const MAX_TEXT_LEN: usize = 32;

/// Position past the end of the frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRange {
    /// Requested position
    pub position: usize,
    /// Number of digits in the buffer
    pub digits: usize,
}

/// Fixed-size frame buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameBuffer<const N: usize> {
    digits: [u8; N],
}

impl<const N: usize> Default for FrameBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> FrameBuffer<N> {
    /// Create a blank frame buffer
    pub const fn new() -> Self {
        Self { digits: [0; N] }
    }

    /// Number of digit positions
    pub const fn len(&self) -> usize {
        N
    }

    /// True for a zero-digit buffer
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Set the segment mask of one digit
    ///
    /// The buffer is untouched if `position` is out of range.
    pub fn set(&mut self, position: usize, mask: u8) -> Result<(), OutOfRange> {
        let slot = self.digits.get_mut(position).ok_or(OutOfRange {
            position,
            digits: N,
        })?;
        *slot = mask;
        Ok(())
    }

    /// Get the segment mask of one digit
    pub fn get(&self, position: usize) -> Result<u8, OutOfRange> {
        self.digits.get(position).copied().ok_or(OutOfRange {
            position,
            digits: N,
        })
    }

    /// Light or clear the decimal point of one digit
    pub fn set_dot(&mut self, position: usize, on: bool) -> Result<(), OutOfRange> {
        let mask = self.get(position)?;
        let mask = if on { mask | SEG_DP } else { mask & !SEG_DP };
        self.set(position, mask)
    }

    /// Blank every digit
    pub fn clear(&mut self) {
        self.digits = [0; N];
    }

    /// All masks, leftmost first
    pub fn as_slice(&self) -> &[u8] {
        &self.digits
    }

    /// Render text starting at `column`
    ///
    /// A `.` directly after a character lights that character's decimal
    /// point instead of taking a column of its own. Characters without a
    /// glyph render blank. Text past the last column is dropped.
    ///
    /// Returns the number of columns written.
    pub fn print(&mut self, column: usize, text: &str) -> usize {
        let mut chars = text.chars().peekable();
        let mut col = column;

        while col < N {
            let Some(c) = chars.next() else {
                break;
            };

            let mut mask = if c == '.' { SEG_DP } else { glyph(c) };
            if c != '.' && chars.peek() == Some(&'.') {
                mask |= SEG_DP;
                chars.next();
            }

            self.digits[col] = mask;
            col += 1;
        }

        col.saturating_sub(column)
    }

    /// Format and render text starting at `column`
    ///
    /// Fails if the formatted text exceeds [`MAX_TEXT_LEN`].
    pub fn print_fmt(&mut self, column: usize, args: fmt::Arguments<'_>) -> Result<usize, fmt::Error> {
        let mut text: String<MAX_TEXT_LEN> = String::new();
        text.write_fmt(args)?;
        Ok(self.print(column, &text))
    }
}
