//! Control line with configurable polarity
//!
//! Every MAX6921 control line may sit behind a level shifter or transistor
//! that inverts it, so each one carries its own polarity.

use embedded_hal::digital::OutputPin;
use iv18_core::config::PinConfig;

/// Output pin with logical active state
pub struct Line<P> {
    pin: P,
    /// If true, active = pin LOW
    inverted: bool,
    /// Current logical state
    active: bool,
}

impl<P: OutputPin> Line<P> {
    /// Wrap a pin and drive it inactive
    pub fn new(pin: P, inverted: bool) -> Result<Self, P::Error> {
        let mut line = Self {
            pin,
            inverted,
            active: false,
        };
        line.set_active(false)?;
        Ok(line)
    }

    /// Wrap a pin with the polarity from its configuration
    pub fn from_config(pin: P, config: &PinConfig) -> Result<Self, P::Error> {
        Self::new(pin, config.inverted)
    }

    /// Drive the line to a logical level
    pub fn set_active(&mut self, active: bool) -> Result<(), P::Error> {
        if active != self.inverted {
            self.pin.set_high()?;
        } else {
            self.pin.set_low()?;
        }
        self.active = active;
        Ok(())
    }

    /// Last logical level driven
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Give back the pin
    pub fn release(self) -> P {
        self.pin
    }
}
