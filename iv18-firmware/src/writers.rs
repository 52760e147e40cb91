//! Built-in content writers

use embassy_time::Instant;

use iv18_core::config::PageConfig;
use iv18_core::display::FrameBuffer;
use iv18_core::traits::{Writer, WriterError};

use crate::DIGITS;

/// Page without text and without a built-in writer of that name
#[derive(Debug, Clone, Copy, defmt::Format)]
pub struct UnknownPage;

/// Time since boot as `HH-MM-SS`
pub struct UptimeWriter {
    start: Instant,
}

impl UptimeWriter {
    /// Start counting from now
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for UptimeWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer<DIGITS> for UptimeWriter {
    fn write(&mut self, buffer: &mut FrameBuffer<DIGITS>) -> Result<(), WriterError> {
        let secs = self.start.elapsed().as_secs();
        let (h, m, s) = ((secs / 3600) % 100, (secs / 60) % 60, secs % 60);

        buffer.clear();
        buffer.print_fmt(0, format_args!("{:02}-{:02}-{:02}", h, m, s))?;
        Ok(())
    }
}

/// Fixed text
pub struct TextWriter {
    text: &'static str,
}

impl Writer<DIGITS> for TextWriter {
    fn write(&mut self, buffer: &mut FrameBuffer<DIGITS>) -> Result<(), WriterError> {
        buffer.clear();
        buffer.print(0, self.text);
        Ok(())
    }
}

/// Writer behind a configured page
pub enum PageWriter {
    Uptime(UptimeWriter),
    Text(TextWriter),
    Blank,
}

impl Writer<DIGITS> for PageWriter {
    fn write(&mut self, buffer: &mut FrameBuffer<DIGITS>) -> Result<(), WriterError> {
        match self {
            Self::Uptime(w) => w.write(buffer),
            Self::Text(w) => w.write(buffer),
            Self::Blank => {
                buffer.clear();
                Ok(())
            }
        }
    }
}

/// Pick the writer for a page: its text if it has one, else by name
pub fn for_page(page: &'static PageConfig) -> Result<PageWriter, UnknownPage> {
    if let Some(text) = &page.text {
        return Ok(PageWriter::Text(TextWriter {
            text: text.as_str(),
        }));
    }

    match page.name.as_str() {
        "uptime" => Ok(PageWriter::Uptime(UptimeWriter::new())),
        "blank" => Ok(PageWriter::Blank),
        _ => Err(UnknownPage),
    }
}
