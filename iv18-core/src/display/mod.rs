//! Display content: frame buffer, font and register word layout

pub mod font;
pub mod framebuffer;
pub mod layout;

pub use font::glyph;
pub use framebuffer::{FrameBuffer, OutOfRange, MAX_TEXT_LEN};
pub use layout::{WordLayout, MAX_DIGITS, REGISTER_BITS};
