//! MAX6921 control lines on RP2040 GPIOs

use embassy_rp::gpio::Output;
use iv18_core::config::{DisplayHwConfig, PinConfig};
use iv18_drivers::{Line, Max6921Pins};

use crate::pins::{PinBank, PinError};

/// Control lines as RP2040 outputs
pub type DisplayPins = Max6921Pins<Output<'static>>;

fn line(bank: &mut PinBank, config: &PinConfig) -> Result<Line<Output<'static>>, PinError> {
    let pin = bank.output(config)?;
    Line::from_config(pin, config).map_err(|never| match never {})
}

/// Take all five control lines named by the configuration
///
/// Every line starts inactive: OE blanked, tube supply off.
pub fn display_pins(bank: &mut PinBank, hw: &DisplayHwConfig) -> Result<DisplayPins, PinError> {
    Ok(Max6921Pins {
        enable: line(bank, &hw.enable_pin)?,
        data: line(bank, &hw.data_pin)?,
        clock: line(bank, &hw.clock_pin)?,
        latch: line(bank, &hw.latch_pin)?,
        oe: line(bank, &hw.oe_pin)?,
    })
}
