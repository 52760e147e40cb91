//! IV-18 VFD clock firmware
//!
//! Drives an IV-18 tube through a MAX6921 from an RP2040. Pin assignment,
//! timing and content pages come from display.toml, which is validated and
//! embedded at build time.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_time::Delay;
use heapless::Vec;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use iv18_core::config::{DisplayConfig, MAX_PAGES};
use iv18_core::display::WordLayout;
use iv18_drivers::{Iv18Display, Max6921};
use iv18_hal_rp2040::{display_pins, PinBank};

use crate::tasks::Display;
use crate::writers::{PageWriter, UptimeWriter};

mod tasks;
mod writers;

include!(concat!(env!("OUT_DIR"), "/display_digits.rs"));

/// Validated display.toml, postcard encoded by build.rs
static EMBEDDED_CONFIG: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/display_config.bin"));

/// Half clock period on the MAX6921 serial lines (ns)
const SHIFT_HALF_PERIOD_NS: u32 = 100;

// Static cells for configuration and writers (borrowed by the display task)
static CONFIG: StaticCell<DisplayConfig> = StaticCell::new();
static PAGE_WRITERS: StaticCell<Vec<PageWriter, MAX_PAGES>> = StaticCell::new();
static DEFAULT_WRITER: StaticCell<UptimeWriter> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("IV-18 firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config: &'static DisplayConfig = CONFIG.init(unwrap!(DisplayConfig::from_postcard(EMBEDDED_CONFIG)));
    dump_config(config);

    // Control lines
    let mut bank = PinBank::new(p);
    let pins = unwrap!(display_pins(&mut bank, &config.hardware));
    let shifter = Max6921::new(pins, Delay, SHIFT_HALF_PERIOD_NS);
    info!("MAX6921 lines initialized");

    let mut display: Display = unwrap!(Iv18Display::new(shifter, config, WordLayout::IV18));

    // Content: pages if configured, uptime otherwise
    if let Some(pages) = &config.pages {
        let page_writers = PAGE_WRITERS.init(Vec::new());
        for page in pages {
            let writer = unwrap!(writers::for_page(page));
            if page_writers.push(writer).is_err() {
                defmt::panic!("More pages than writer slots");
            }
        }
        for (page, writer) in pages.iter().zip(page_writers.iter_mut()) {
            unwrap!(display.add_page(page.name.as_str(), writer));
        }
    } else {
        display.set_writer(DEFAULT_WRITER.init(UptimeWriter::new()));
    }

    if let Err(e) = display.init() {
        warn!("Initial render failed: {}", Debug2Format(&e));
    }
    info!("Display initialized");

    spawner.spawn(tasks::display_task(display)).unwrap();

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Log the active configuration
fn dump_config(config: &DisplayConfig) {
    let hw = &config.hardware;
    info!("MAX6921 display:");
    info!("  Digits: {}", config.digits);
    info!(
        "  Pins: enable=GPIO{} data=GPIO{} clock=GPIO{} latch=GPIO{} oe=GPIO{}{}",
        hw.enable_pin.pin,
        hw.data_pin.pin,
        hw.clock_pin.pin,
        hw.latch_pin.pin,
        hw.oe_pin.pin,
        if hw.oe_pin.inverted { " (inverted)" } else { "" }
    );
    info!("  Intensity: {} ({})", config.intensity, config.dimming);
    info!("  Update interval: {}ms", config.update_interval_ms);
    info!(
        "  Multiplex: {}us/step, {}us guard, {}us/cycle",
        config.multiplex_step_us,
        config.blank_guard_us,
        config.refresh_cycle_us()
    );
    if let Some(pages) = &config.pages {
        for page in pages {
            info!("  Page: {}", page.name.as_str());
        }
    }
}
