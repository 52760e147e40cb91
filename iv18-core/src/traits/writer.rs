//! Display content writers
//!
//! A writer renders one frame of content each poll tick. Closures with the
//! right signature are writers too, so simple content needs no new type:
//!
//! ```
//! use iv18_core::display::FrameBuffer;
//! use iv18_core::traits::{Writer, WriterError};
//!
//! let mut hello = |fb: &mut FrameBuffer<8>| -> Result<(), WriterError> {
//!     fb.print(0, "HELLO");
//!     Ok(())
//! };
//!
//! let mut fb = FrameBuffer::new();
//! hello.write(&mut fb).unwrap();
//! assert_ne!(fb.get(0), Ok(0));
//! ```

use core::fmt;

use crate::display::{FrameBuffer, OutOfRange};

/// Errors a writer can report
///
/// A failed write is never shown; the previous frame stays on the tube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WriterError {
    /// Wrote past the last digit
    OutOfRange(OutOfRange),
    /// Formatted text did not fit
    Format,
    /// Content source unavailable
    Source,
}

impl From<OutOfRange> for WriterError {
    fn from(err: OutOfRange) -> Self {
        Self::OutOfRange(err)
    }
}

impl From<fmt::Error> for WriterError {
    fn from(_: fmt::Error) -> Self {
        Self::Format
    }
}

/// Content producer for an `N`-digit display
pub trait Writer<const N: usize> {
    /// Render a frame into `buffer`
    ///
    /// `buffer` starts out as a copy of the frame on display.
    fn write(&mut self, buffer: &mut FrameBuffer<N>) -> Result<(), WriterError>;
}

impl<F, const N: usize> Writer<N> for F
where
    F: FnMut(&mut FrameBuffer<N>) -> Result<(), WriterError>,
{
    fn write(&mut self, buffer: &mut FrameBuffer<N>) -> Result<(), WriterError> {
        self(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        value: u8,
    }

    impl Writer<4> for Counter {
        fn write(&mut self, buffer: &mut FrameBuffer<4>) -> Result<(), WriterError> {
            self.value += 1;
            buffer.print_fmt(0, format_args!("{:4}", self.value))?;
            Ok(())
        }
    }

    #[test]
    fn test_struct_writer() {
        let mut writer = Counter { value: 6 };
        let mut fb = FrameBuffer::new();
        writer.write(&mut fb).unwrap();
        assert_eq!(fb.get(0), Ok(0));
        assert_eq!(fb.get(3), Ok(crate::display::glyph('7')));
    }

    #[test]
    fn test_closure_writer_error() {
        let mut writer = |fb: &mut FrameBuffer<2>| -> Result<(), WriterError> {
            fb.set(5, 0xFF)?;
            Ok(())
        };
        let mut fb = FrameBuffer::new();
        assert_eq!(
            writer.write(&mut fb),
            Err(WriterError::OutOfRange(OutOfRange {
                position: 5,
                digits: 2
            }))
        );
    }

    #[test]
    fn test_dyn_writer() {
        let mut blank = |fb: &mut FrameBuffer<3>| -> Result<(), WriterError> {
            fb.clear();
            Ok(())
        };
        let writer: &mut dyn Writer<3> = &mut blank;
        let mut fb = FrameBuffer::new();
        fb.set(1, 0x7F).unwrap();
        writer.write(&mut fb).unwrap();
        assert_eq!(fb.get(1), Ok(0));
    }
}
