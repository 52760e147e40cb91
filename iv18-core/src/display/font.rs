//! Seven-segment font
//!
//! Bit assignment of a segment mask:
//!
//! ```text
//!      -- a --
//!     |       |
//!     f       b
//!     |       |
//!      -- g --
//!     |       |
//!     e       c
//!     |       |
//!      -- d --   . dp
//! ```

/// Top
pub const SEG_A: u8 = 0x01;
/// Top right
pub const SEG_B: u8 = 0x02;
/// Bottom right
pub const SEG_C: u8 = 0x04;
/// Bottom
pub const SEG_D: u8 = 0x08;
/// Bottom left
pub const SEG_E: u8 = 0x10;
/// Top left
pub const SEG_F: u8 = 0x20;
/// Middle
pub const SEG_G: u8 = 0x40;
/// Decimal point
pub const SEG_DP: u8 = 0x80;

const DIGITS: [u8; 10] = [
    0x3F, // 0
    0x06, // 1
    0x5B, // 2
    0x4F, // 3
    0x66, // 4
    0x6D, // 5
    0x7D, // 6
    0x07, // 7
    0x7F, // 8
    0x67, // 9
];

const LOWER: [u8; 26] = [
    0x77, // a
    0x7C, // b
    0x58, // c
    0x5E, // d
    0x79, // e
    0x71, // f
    0x6F, // g
    0x74, // h
    SEG_C, // i
    0x1E, // j
    0x75, // k
    0x38, // l
    0x37, // m
    0x54, // n
    0x5C, // o
    0x73, // p
    0x67, // q
    0x50, // r
    0x6D, // s
    0x78, // t
    0x1C, // u
    0x1C, // v
    0x7E, // w
    0x76, // x
    0x6E, // y
    0x5B, // z
];

const UPPER: [u8; 26] = [
    0x77, // A
    0x7F, // B
    0x39, // C
    0x5E, // D
    0x79, // E
    0x71, // F
    0x6F, // G
    0x76, // H
    0x30, // I
    0x1E, // J
    0x75, // K
    0x38, // L
    0x37, // M
    0x37, // N
    0x3F, // O
    0x73, // P
    0x67, // Q
    0x50, // R
    0x6D, // S
    0x31, // T
    0x3E, // U
    0x3E, // V
    0x7E, // W
    0x76, // X
    0x6E, // Y
    0x5B, // Z
];

/// Segment mask for a character
///
/// Unknown characters (including space) render blank.
pub const fn glyph(c: char) -> u8 {
    match c {
        '0'..='9' => DIGITS[c as usize - '0' as usize],
        'a'..='z' => LOWER[c as usize - 'a' as usize],
        'A'..='Z' => UPPER[c as usize - 'A' as usize],
        '!' => SEG_B | SEG_C | SEG_DP,
        '"' => SEG_F | SEG_B,
        '\'' => SEG_F,
        '`' => SEG_B,
        '@' => SEG_A | SEG_B | SEG_F | SEG_G, // degree
        '_' => SEG_D,
        '-' => SEG_G,
        _ => 0,
    }
}
