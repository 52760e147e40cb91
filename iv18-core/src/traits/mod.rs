//! Hardware abstraction traits
//!
//! These traits define the seams between the display logic and the
//! board-specific transport, and between the display and its content.

pub mod shifter;
pub mod writer;

pub use shifter::SerialShifter;
pub use writer::{Writer, WriterError};
