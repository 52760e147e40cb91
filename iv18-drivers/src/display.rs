//! Multiplexed, polled IV-18 display
//!
//! Two independent timing domains run through this type:
//!
//! - **Multiplex step** ([`Iv18Display::step`]), every `multiplex_step_us`:
//!   blank OE, select the next digit, shift its word out. The caller then
//!   waits out the returned [`OeWindow`], lighting OE for `on_us`.
//! - **Poll tick** ([`Iv18Display::update`]), every `update_interval_ms`:
//!   run the active writer into the back buffer and commit it if the
//!   writer succeeds.
//!
//! Both are meant to be driven from one execution context; nothing here is
//! synchronized.
//!
//! # Usage
//!
//! ```ignore
//! let mut display: Iv18Display<_, 9> = Iv18Display::new(shifter, &config, WordLayout::IV18)?;
//! display.set_writer(&mut clock_writer);
//! display.init()?;
//!
//! loop {
//!     if poll_due() {
//!         display.update()?;
//!     }
//!     display.step_blocking(&mut delay)?;
//! }
//! ```

use core::fmt;

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use iv18_core::config::{ConfigError, DisplayConfig, MAX_PAGES};
use iv18_core::display::{FrameBuffer, OutOfRange, WordLayout, REGISTER_BITS};
use iv18_core::scheduler::{Intensity, IntensityController, MultiplexScheduler, OeWindow};
use iv18_core::traits::{SerialShifter, Writer, WriterError};

/// Display driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayError<E> {
    /// Shifter failed
    Shifter(E),
    /// Writer failed, previous frame kept
    Writer(WriterError),
}

/// Named content page
pub struct Page<'a, const N: usize> {
    name: &'a str,
    writer: &'a mut dyn Writer<N>,
}

impl<const N: usize> Page<'_, N> {
    /// Page name
    pub fn name(&self) -> &str {
        self.name
    }
}

/// IV-18 display on a MAX6921
pub struct Iv18Display<'a, S, const N: usize> {
    shifter: S,
    layout: WordLayout,
    /// Frame being multiplexed
    front: FrameBuffer<N>,
    /// Frame the writer renders into
    back: FrameBuffer<N>,
    scheduler: MultiplexScheduler<N>,
    intensity: IntensityController,
    writer: Option<&'a mut dyn Writer<N>>,
    pages: Vec<Page<'a, N>, MAX_PAGES>,
    page_index: usize,
    update_interval_ms: u32,
}

impl<'a, S: SerialShifter, const N: usize> Iv18Display<'a, S, N> {
    /// Create a display from a configuration
    ///
    /// Fails if the configuration is invalid, its digit count is not `N`,
    /// or the layout does not fit `N` digits.
    pub fn new(shifter: S, config: &DisplayConfig, layout: WordLayout) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.digits as usize != N {
            return Err(ConfigError::DigitCount(config.digits));
        }
        layout.validate(N)?;

        Ok(Self {
            shifter,
            layout,
            front: FrameBuffer::new(),
            back: FrameBuffer::new(),
            scheduler: MultiplexScheduler::new(),
            intensity: IntensityController::new(
                config.initial_intensity()?,
                config.dimming,
                config.multiplex_step_us,
                config.blank_guard_us,
            ),
            writer: None,
            pages: Vec::new(),
            page_index: 0,
            update_interval_ms: config.update_interval_ms,
        })
    }

    /// Power up the tube and render the first frame
    ///
    /// Switches the enable line on with OE blanked, clears the shift
    /// register and runs the writer once.
    pub fn init(&mut self) -> Result<(), DisplayError<S::Error>> {
        self.shifter
            .set_output_enable(false)
            .map_err(DisplayError::Shifter)?;
        self.shifter.set_enable(true).map_err(DisplayError::Shifter)?;
        self.shifter
            .shift_word(0, REGISTER_BITS)
            .map_err(DisplayError::Shifter)?;
        self.scheduler.reset();
        self.update().map_err(DisplayError::Writer)
    }

    /// Blank the outputs and switch the tube supply off
    pub fn shutdown(&mut self) -> Result<(), S::Error> {
        self.shifter.set_output_enable(false)?;
        self.shifter.shift_word(0, REGISTER_BITS)?;
        self.shifter.set_enable(false)
    }

    // ---- Brightness ----

    /// Set brightness, effective from the next multiplex step
    pub fn set_intensity(&mut self, intensity: Intensity) {
        self.intensity.set_intensity(intensity);
    }

    /// Current brightness
    pub fn intensity(&self) -> Intensity {
        self.intensity.intensity()
    }

    // ---- Content ----

    /// Install the writer run on every poll tick
    ///
    /// Ignored while pages are configured.
    pub fn set_writer(&mut self, writer: &'a mut dyn Writer<N>) {
        self.writer = Some(writer);
    }

    /// Remove the writer; the frame buffer keeps its content
    pub fn clear_writer(&mut self) {
        self.writer = None;
    }

    /// Frame on display
    pub fn frame(&self) -> &FrameBuffer<N> {
        &self.front
    }

    /// Direct access to the frame on display
    ///
    /// Changes show from the next multiplex step. A writer will overwrite
    /// them on the next poll tick.
    pub fn frame_mut(&mut self) -> &mut FrameBuffer<N> {
        &mut self.front
    }

    /// Set one digit of the frame on display
    pub fn set(&mut self, position: usize, mask: u8) -> Result<(), OutOfRange> {
        self.front.set(position, mask)
    }

    /// Get one digit of the frame on display
    pub fn get(&self, position: usize) -> Result<u8, OutOfRange> {
        self.front.get(position)
    }

    /// Render text onto the frame on display
    pub fn print(&mut self, column: usize, text: &str) -> usize {
        self.front.print(column, text)
    }

    /// Render formatted text onto the frame on display
    pub fn print_fmt(&mut self, column: usize, args: fmt::Arguments<'_>) -> Result<usize, fmt::Error> {
        self.front.print_fmt(column, args)
    }

    /// Blank the frame on display
    pub fn clear(&mut self) {
        self.front.clear();
    }

    // ---- Pages ----

    /// Register a named page
    ///
    /// The first page added becomes the current one.
    pub fn add_page(&mut self, name: &'a str, writer: &'a mut dyn Writer<N>) -> Result<(), ConfigError> {
        if name.is_empty() {
            return Err(ConfigError::EmptyPageName);
        }
        if self.pages.iter().any(|p| p.name == name) {
            return Err(ConfigError::DuplicatePage);
        }
        self.pages
            .push(Page { name, writer })
            .map_err(|_| ConfigError::TooManyPages)
    }

    /// Registered pages
    pub fn pages(&self) -> &[Page<'a, N>] {
        &self.pages
    }

    /// Name of the current page
    pub fn current_page(&self) -> Option<&str> {
        self.pages.get(self.page_index).map(|p| p.name)
    }

    /// Switch to a page by name
    ///
    /// Returns false, leaving the current page, if no page has that name.
    pub fn show_page(&mut self, name: &str) -> bool {
        match self.pages.iter().position(|p| p.name == name) {
            Some(index) => {
                self.page_index = index;
                true
            }
            None => false,
        }
    }

    /// Switch to the next page, wrapping after the last
    pub fn show_next_page(&mut self) {
        if !self.pages.is_empty() {
            self.page_index = (self.page_index + 1) % self.pages.len();
        }
    }

    /// Switch to the previous page, wrapping before the first
    pub fn show_prev_page(&mut self) {
        let count = self.pages.len();
        if count != 0 {
            self.page_index = (self.page_index + count - 1) % count;
        }
    }

    // ---- Timing ----

    /// Poll interval from the configuration
    pub fn update_interval_ms(&self) -> u32 {
        self.update_interval_ms
    }

    /// Poll tick: run the active writer and commit its frame
    ///
    /// The writer renders into the back buffer, seeded with the frame on
    /// display. On success the buffers swap; on failure the frame on
    /// display is left untouched and the error is returned. With no writer
    /// this is a no-op.
    pub fn update(&mut self) -> Result<(), WriterError> {
        let writer = match self.pages.get_mut(self.page_index) {
            Some(page) => Some(&mut *page.writer),
            None => self.writer.as_deref_mut(),
        };
        let Some(writer) = writer else {
            return Ok(());
        };

        self.back = self.front;
        writer.write(&mut self.back)?;
        core::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    /// Multiplex step: select the next digit and shift its word out
    ///
    /// OE is deasserted before the latch changes and stays deasserted on
    /// return. The returned window tells the caller how long to wait
    /// before lighting, how long to light and how long to stay dark.
    pub fn step(&mut self) -> Result<OeWindow, S::Error> {
        self.shifter.set_output_enable(false)?;

        let digit = self.scheduler.advance();
        let mask = self.front.get(digit).unwrap_or(0);
        self.shifter
            .shift_word(self.layout.compose(digit, mask), REGISTER_BITS)?;

        Ok(self.intensity.window())
    }

    /// Drive OE for the current step
    ///
    /// Never asserts OE while the intensity maps to a zero on-time.
    pub fn set_output_enable(&mut self, on: bool) -> Result<(), S::Error> {
        let on = on && !self.intensity.window().is_dark();
        self.shifter.set_output_enable(on)
    }

    /// One complete multiplex step, busy-waiting through the OE window
    pub fn step_blocking<D: DelayNs>(&mut self, delay: &mut D) -> Result<(), S::Error> {
        let window = self.step()?;

        delay.delay_us(window.guard_us);
        if !window.is_dark() {
            self.shifter.set_output_enable(true)?;
            delay.delay_us(window.on_us);
            self.shifter.set_output_enable(false)?;
        }
        delay.delay_us(window.off_us);

        Ok(())
    }

    /// Digit selected by the last step
    pub fn current_digit(&self) -> usize {
        self.scheduler.current()
    }

    /// Underlying shifter
    pub fn shifter(&self) -> &S {
        &self.shifter
    }

    /// Give back the shifter
    pub fn release(self) -> S {
        self.shifter
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::convert::Infallible;
    use iv18_core::config::{DisplayHwConfig, PinConfig};
    use iv18_core::display::glyph;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Shift(u32),
        Oe(bool),
        Enable(bool),
    }

    /// Shifter that records every call
    #[derive(Default)]
    struct MockShifter {
        events: Vec<Event, 128>,
    }

    impl MockShifter {
        fn shifts(&self) -> impl Iterator<Item = u32> + '_ {
            self.events.iter().filter_map(|e| match e {
                Event::Shift(word) => Some(*word),
                _ => None,
            })
        }

        fn oe_asserted(&self) -> bool {
            self.events.iter().any(|&e| e == Event::Oe(true))
        }
    }

    impl SerialShifter for MockShifter {
        type Error = Infallible;

        fn shift_word(&mut self, word: u32, bits: u8) -> Result<(), Self::Error> {
            assert_eq!(bits, REGISTER_BITS);
            let _ = self.events.push(Event::Shift(word));
            Ok(())
        }

        fn set_output_enable(&mut self, on: bool) -> Result<(), Self::Error> {
            let _ = self.events.push(Event::Oe(on));
            Ok(())
        }

        fn set_enable(&mut self, on: bool) -> Result<(), Self::Error> {
            let _ = self.events.push(Event::Enable(on));
            Ok(())
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn config(digits: u8) -> DisplayConfig {
        DisplayConfig {
            hardware: DisplayHwConfig {
                enable_pin: PinConfig::new(2),
                data_pin: PinConfig::new(3),
                clock_pin: PinConfig::new(4),
                latch_pin: PinConfig::new(5),
                oe_pin: PinConfig::inverted(6),
            },
            digits,
            ..Default::default()
        }
    }

    fn display<'a>() -> Iv18Display<'a, MockShifter, 4> {
        Iv18Display::new(MockShifter::default(), &config(4), WordLayout::IV18).unwrap()
    }

    #[test]
    fn test_digit_count_must_match() {
        let result: Result<Iv18Display<'_, MockShifter, 4>, _> =
            Iv18Display::new(MockShifter::default(), &config(8), WordLayout::IV18);
        assert!(matches!(result, Err(ConfigError::DigitCount(8))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let bad = DisplayConfig {
            intensity: 16,
            ..config(4)
        };
        let result: Result<Iv18Display<'_, MockShifter, 4>, _> =
            Iv18Display::new(MockShifter::default(), &bad, WordLayout::IV18);
        assert!(matches!(result, Err(ConfigError::IntensityOutOfRange(16))));
    }

    #[test]
    fn test_full_cycle_shifts_each_digit_once() {
        let mut display = display();
        display.set_intensity(Intensity::FULL);
        for (i, mask) in [0x1, 0x2, 0x4, 0x8].into_iter().enumerate() {
            display.set(i, mask).unwrap();
        }

        for _ in 0..4 {
            display.step_blocking(&mut NoDelay).unwrap();
        }

        let layout = WordLayout::IV18;
        let shifter = display.release();
        let words: Vec<u32, 4> = shifter.shifts().collect();
        assert_eq!(words.len(), 4);

        let mut grids = 0u32;
        for (digit, (&word, mask)) in words.iter().zip([0x1u8, 0x2, 0x4, 0x8]).enumerate() {
            assert_eq!(word, layout.compose(digit, mask));
            assert_eq!(word & 0xFF, mask as u32);

            let grid = word & !0xFF;
            assert_eq!(grid.count_ones(), 1);
            assert_eq!(grids & grid, 0);
            grids |= grid;
        }
        assert!(shifter.oe_asserted());
    }

    #[test]
    fn test_oe_blanked_before_every_shift() {
        let mut display = display();
        display.print(0, "8888");

        for _ in 0..8 {
            display.step_blocking(&mut NoDelay).unwrap();
        }

        let shifter = display.release();
        let mut lit = false;
        for &event in shifter.events.iter() {
            match event {
                Event::Oe(on) => lit = on,
                Event::Shift(_) => assert!(!lit),
                Event::Enable(_) => {}
            }
        }
    }

    #[test]
    fn test_zero_intensity_stays_dark() {
        let mut display = display();
        display.print(0, "8.8.8.8.");
        display.set_intensity(Intensity::OFF);

        for _ in 0..8 {
            display.step_blocking(&mut NoDelay).unwrap();
        }
        display.set_output_enable(true).unwrap();

        assert!(!display.release().oe_asserted());
    }

    #[test]
    fn test_step_window_follows_intensity() {
        let mut display = display();
        display.set_intensity(Intensity::new(8).unwrap());
        let dim = display.step().unwrap();
        display.set_intensity(Intensity::FULL);
        let bright = display.step().unwrap();

        assert!(dim.on_us < bright.on_us);
        assert_eq!(dim.period_us(), 1000);
        assert_eq!(bright.guard_us, 20);
    }

    #[test]
    fn test_init_powers_up_and_renders() {
        let mut hello = |fb: &mut FrameBuffer<4>| -> Result<(), WriterError> {
            fb.print(0, "HI");
            Ok(())
        };
        let mut display = display();
        display.set_writer(&mut hello);

        display.init().unwrap();

        assert_eq!(display.get(0), Ok(glyph('H')));
        assert_eq!(display.get(1), Ok(glyph('I')));
        let events = &display.shifter().events;
        assert_eq!(
            events[..],
            [Event::Oe(false), Event::Enable(true), Event::Shift(0)]
        );
    }

    #[test]
    fn test_update_without_writer_keeps_frame() {
        let mut display = display();
        display.print(0, "AB");
        let before = *display.frame();

        display.update().unwrap();
        assert_eq!(*display.frame(), before);
    }

    #[test]
    fn test_writer_error_keeps_last_frame() {
        let mut calls = 0;
        let mut flaky = |fb: &mut FrameBuffer<4>| -> Result<(), WriterError> {
            calls += 1;
            fb.print_fmt(0, format_args!("{:4}", calls))?;
            if calls > 1 {
                // Half-rendered frame must not show
                fb.set(4, 0)?;
            }
            Ok(())
        };
        let mut display = display();
        display.set_writer(&mut flaky);

        display.update().unwrap();
        let good = *display.frame();
        assert_eq!(good.get(3), Ok(glyph('1')));

        assert_eq!(
            display.update(),
            Err(WriterError::OutOfRange(OutOfRange {
                position: 4,
                digits: 4
            }))
        );
        assert_eq!(*display.frame(), good);

        // Multiplexing carries on with the last good frame
        display.step().unwrap();
        assert_eq!(
            display.shifter().shifts().last(),
            Some(WordLayout::IV18.compose(0, 0))
        );
    }

    #[test]
    fn test_clear_writer() {
        let mut count = 0;
        let mut counter = |fb: &mut FrameBuffer<4>| -> Result<(), WriterError> {
            count += 1;
            fb.print_fmt(0, format_args!("{}", count))?;
            Ok(())
        };
        let mut display = display();
        display.set_writer(&mut counter);
        display.update().unwrap();
        display.clear_writer();
        display.update().unwrap();

        assert_eq!(display.get(0), Ok(glyph('1')));
    }

    #[test]
    fn test_pages_cycle() {
        let mut a = |fb: &mut FrameBuffer<4>| -> Result<(), WriterError> {
            fb.clear();
            fb.print(0, "A");
            Ok(())
        };
        let mut b = |fb: &mut FrameBuffer<4>| -> Result<(), WriterError> {
            fb.clear();
            fb.print(0, "B");
            Ok(())
        };
        let mut plain = |fb: &mut FrameBuffer<4>| -> Result<(), WriterError> {
            fb.print(0, "P");
            Ok(())
        };

        let mut display = display();
        display.set_writer(&mut plain);
        display.add_page("a", &mut a).unwrap();
        display.add_page("b", &mut b).unwrap();
        assert_eq!(display.current_page(), Some("a"));

        // Pages take precedence over the plain writer
        display.update().unwrap();
        assert_eq!(display.get(0), Ok(glyph('A')));

        display.show_next_page();
        display.update().unwrap();
        assert_eq!(display.get(0), Ok(glyph('B')));

        display.show_next_page();
        assert_eq!(display.current_page(), Some("a"));

        display.show_prev_page();
        assert_eq!(display.current_page(), Some("b"));

        assert!(display.show_page("a"));
        assert!(!display.show_page("missing"));
        assert_eq!(display.current_page(), Some("a"));
    }

    #[test]
    fn test_page_names_checked() {
        let mut a = |_: &mut FrameBuffer<4>| -> Result<(), WriterError> { Ok(()) };
        let mut b = |_: &mut FrameBuffer<4>| -> Result<(), WriterError> { Ok(()) };
        let mut c = |_: &mut FrameBuffer<4>| -> Result<(), WriterError> { Ok(()) };

        let mut display = display();
        assert_eq!(display.add_page("", &mut a), Err(ConfigError::EmptyPageName));
        display.add_page("x", &mut b).unwrap();
        assert_eq!(display.add_page("x", &mut c), Err(ConfigError::DuplicatePage));
        assert_eq!(display.pages().len(), 1);
        assert_eq!(display.pages()[0].name(), "x");
    }

    #[test]
    fn test_shutdown() {
        let mut display = display();
        display.shutdown().unwrap();
        assert_eq!(
            display.shifter().events[..],
            [Event::Oe(false), Event::Shift(0), Event::Enable(false)]
        );
    }
}
