//! Configuration types
//!
//! Board-agnostic configuration structures, validated before the display
//! driver is constructed.

pub mod hardware;
pub mod types;

pub use hardware::*;
pub use types::*;

/// Configuration errors
///
/// All of these are fatal at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// GPIO assigned to more than one control line
    DuplicatePin(u8),
    /// Digit count is zero, too large, or does not match the driver
    DigitCount(u8),
    /// Intensity outside 0-15
    IntensityOutOfRange(u8),
    /// Poll interval of zero
    ZeroUpdateInterval,
    /// Multiplex step shorter than the minimum (µs)
    StepTooShort(u32),
    /// Full refresh cycle too slow, would flicker (µs per cycle)
    FlickerRate(u32),
    /// Blanking guard does not fit inside a multiplex step (µs)
    GuardTooLong(u32),
    /// `pages` present but empty
    EmptyPageList,
    /// Page with an empty name
    EmptyPageName,
    /// Two pages share a name
    DuplicatePage,
    /// More pages than the driver can hold
    TooManyPages,
    /// Word layout maps two signals to one output, or past the register
    InvalidLayout,
    /// Embedded configuration blob could not be decoded
    Decode,
}

#[cfg(feature = "serde")]
impl DisplayConfig {
    /// Decode a postcard-serialized configuration and validate it
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Decode)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize into `buf`, returning the used part
    pub fn to_postcard<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Decode)
    }
}
