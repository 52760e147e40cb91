//! Display refresh task
//!
//! Multiplexing and writer polling share this one task. The poll deadline
//! is checked between multiplex steps, so a writer only ever runs while OE
//! is blanked and never races the refresh.

use defmt::*;
use embassy_rp::gpio::Output;
use embassy_time::{Delay, Duration, Instant, Timer};

use iv18_drivers::{Iv18Display, Max6921};

use crate::DIGITS;

/// Display as wired on RP2040 GPIOs
pub type Display = Iv18Display<'static, Max6921<Output<'static>, Delay>, DIGITS>;

/// Back-off after a failed shift (ms)
const SHIFT_RETRY_MS: u64 = 100;

fn us(micros: u32) -> Duration {
    Duration::from_micros(micros as u64)
}

fn set_oe(display: &mut Display, on: bool) {
    if let Err(e) = display.set_output_enable(on) {
        error!("OE write failed: {}", Debug2Format(&e));
    }
}

/// Display refresh task
#[embassy_executor::task]
pub async fn display_task(mut display: Display) {
    info!("Display task started");

    let poll = Duration::from_millis(display.update_interval_ms() as u64);
    let mut next_poll = Instant::now() + poll;

    loop {
        // Poll tick
        let now = Instant::now();
        if now >= next_poll {
            if let Err(e) = display.update() {
                warn!("Writer failed, keeping last frame: {}", e);
            }
            next_poll += poll;
            if next_poll <= now {
                // Fell behind, skip the missed ticks
                next_poll = now + poll;
            }
        }

        // Multiplex step
        let start = Instant::now();
        let window = match display.step() {
            Ok(window) => window,
            Err(e) => {
                error!("Shift failed: {}", Debug2Format(&e));
                Timer::after_millis(SHIFT_RETRY_MS).await;
                continue;
            }
        };

        Timer::at(start + us(window.guard_us)).await;
        if !window.is_dark() {
            set_oe(&mut display, true);
            Timer::at(start + us(window.guard_us + window.on_us)).await;
            set_oe(&mut display, false);
        }
        Timer::at(start + us(window.period_us())).await;
    }
}
