//! Hardware configuration types
//!
//! Pin assignments for the five MAX6921 control lines.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinConfig {
    /// GPIO pin number
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }
}

/// MAX6921 control lines
///
/// All five lines are outputs from the host's point of view. `data` and
/// `clock` may be routed to a hardware SPI peripheral instead of being
/// bit-banged, in which case their numbers select the SPI pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayHwConfig {
    /// Tube supply / driver enable (filament and boost converter)
    pub enable_pin: PinConfig,
    /// Serial data into DIN
    pub data_pin: PinConfig,
    /// Serial clock into CLK
    pub clock_pin: PinConfig,
    /// LOAD strobe, transfers the shift register to the output latch
    pub latch_pin: PinConfig,
    /// Output enable (drives BLANK, usually inverted)
    pub oe_pin: PinConfig,
}

impl DisplayHwConfig {
    /// All control pins in a fixed order
    pub fn pins(&self) -> [PinConfig; 5] {
        [
            self.enable_pin,
            self.data_pin,
            self.clock_pin,
            self.latch_pin,
            self.oe_pin,
        ]
    }

    /// Check that no GPIO is assigned to two control lines
    pub fn validate(&self) -> Result<(), ConfigError> {
        let pins = self.pins();
        for (i, a) in pins.iter().enumerate() {
            if pins[i + 1..].iter().any(|b| b.pin == a.pin) {
                return Err(ConfigError::DuplicatePin(a.pin));
            }
        }
        Ok(())
    }
}
