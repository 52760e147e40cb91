//! Configuration type definitions
//!
//! Configuration is authored as TOML on the host, validated at build time
//! and embedded into the firmware as postcard-serialized binary data.

use heapless::{String, Vec};

use crate::display::MAX_DIGITS;
use crate::scheduler::{DimmingCurve, Intensity, MAX_INTENSITY};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{ConfigError, DisplayHwConfig};

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum pages per config
pub const MAX_PAGES: usize = 8;

/// Default poll interval (ms)
pub const DEFAULT_UPDATE_INTERVAL_MS: u32 = 1000;

/// Default multiplex step (µs)
pub const DEFAULT_MULTIPLEX_STEP_US: u32 = 1000;

/// Default dead time between latch and OE assertion (µs)
pub const DEFAULT_BLANK_GUARD_US: u32 = 20;

/// Shortest accepted multiplex step (µs)
pub const MIN_MULTIPLEX_STEP_US: u32 = 100;

/// Longest accepted full refresh cycle (µs), i.e. 60 Hz
pub const MAX_REFRESH_CYCLE_US: u32 = 1_000_000 / 60;

/// Display page configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageConfig {
    /// Page name
    pub name: String<MAX_LABEL_LEN>,
    /// Static text shown by the page (pages without text use a built-in
    /// writer selected by name)
    #[cfg_attr(feature = "serde", serde(default))]
    pub text: Option<String<MAX_LABEL_LEN>>,
}

/// Complete display configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplayConfig {
    /// Control pin assignment
    pub hardware: DisplayHwConfig,
    /// Number of multiplexed digit positions
    pub digits: u8,
    /// Initial brightness (0-15)
    pub intensity: u8,
    /// Writer poll interval in ms
    pub update_interval_ms: u32,
    /// Time each digit stays selected, in µs
    pub multiplex_step_us: u32,
    /// OE stays deasserted this long after every latch, in µs
    pub blank_guard_us: u32,
    /// Intensity to OE duty mapping
    pub dimming: DimmingCurve,
    /// Named content pages
    pub pages: Option<Vec<PageConfig, MAX_PAGES>>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            hardware: DisplayHwConfig::default(),
            digits: 8,
            intensity: MAX_INTENSITY,
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            multiplex_step_us: DEFAULT_MULTIPLEX_STEP_US,
            blank_guard_us: DEFAULT_BLANK_GUARD_US,
            dimming: DimmingCurve::Linear,
            pages: None,
        }
    }
}

impl DisplayConfig {
    /// Validate every field
    ///
    /// Returns the first problem found. A config that passes can be handed
    /// to the display driver without further checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.hardware.validate()?;

        if self.digits == 0 || self.digits as usize > MAX_DIGITS {
            return Err(ConfigError::DigitCount(self.digits));
        }

        Intensity::new(self.intensity)?;

        if self.update_interval_ms == 0 {
            return Err(ConfigError::ZeroUpdateInterval);
        }

        if self.multiplex_step_us < MIN_MULTIPLEX_STEP_US {
            return Err(ConfigError::StepTooShort(self.multiplex_step_us));
        }

        let cycle_us = self.refresh_cycle_us();
        if cycle_us > MAX_REFRESH_CYCLE_US {
            return Err(ConfigError::FlickerRate(cycle_us));
        }

        if self.blank_guard_us >= self.multiplex_step_us {
            return Err(ConfigError::GuardTooLong(self.blank_guard_us));
        }

        if let Some(pages) = &self.pages {
            if pages.is_empty() {
                return Err(ConfigError::EmptyPageList);
            }
            for (i, page) in pages.iter().enumerate() {
                if page.name.is_empty() {
                    return Err(ConfigError::EmptyPageName);
                }
                if pages[i + 1..].iter().any(|p| p.name == page.name) {
                    return Err(ConfigError::DuplicatePage);
                }
            }
        }

        Ok(())
    }

    /// Validated initial intensity
    pub fn initial_intensity(&self) -> Result<Intensity, ConfigError> {
        Intensity::new(self.intensity)
    }

    /// Duration of one full multiplex cycle over all digits (µs)
    pub fn refresh_cycle_us(&self) -> u32 {
        self.multiplex_step_us.saturating_mul(self.digits as u32)
    }

    /// Find a page by name
    pub fn find_page(&self, name: &str) -> Option<&PageConfig> {
        self.pages
            .as_ref()
            .and_then(|pages| pages.iter().find(|p| p.name.as_str() == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PinConfig;

    fn valid() -> DisplayConfig {
        DisplayConfig {
            hardware: DisplayHwConfig {
                enable_pin: PinConfig::new(2),
                data_pin: PinConfig::new(3),
                clock_pin: PinConfig::new(4),
                latch_pin: PinConfig::new(5),
                oe_pin: PinConfig::inverted(6),
            },
            ..Default::default()
        }
    }

    fn page(name: &str) -> PageConfig {
        let mut label = String::new();
        label.push_str(name).unwrap();
        PageConfig {
            name: label,
            text: None,
        }
    }

    #[test]
    fn test_defaults() {
        let config = DisplayConfig::default();
        assert_eq!(config.intensity, 15);
        assert_eq!(config.update_interval_ms, 1000);
        assert_eq!(config.digits, 8);
        assert!(config.pages.is_none());
    }

    #[test]
    fn test_valid_config() {
        assert_eq!(valid().validate(), Ok(()));
        assert_eq!(valid().refresh_cycle_us(), 8000);
    }

    #[test]
    fn test_intensity_out_of_range() {
        let config = DisplayConfig {
            intensity: 16,
            ..valid()
        };
        assert_eq!(config.validate(), Err(ConfigError::IntensityOutOfRange(16)));
    }

    #[test]
    fn test_digit_count_limits() {
        let none = DisplayConfig {
            digits: 0,
            ..valid()
        };
        assert_eq!(none.validate(), Err(ConfigError::DigitCount(0)));

        let too_many = DisplayConfig {
            digits: (MAX_DIGITS + 1) as u8,
            multiplex_step_us: MIN_MULTIPLEX_STEP_US,
            ..valid()
        };
        assert_eq!(
            too_many.validate(),
            Err(ConfigError::DigitCount((MAX_DIGITS + 1) as u8))
        );
    }

    #[test]
    fn test_zero_update_interval() {
        let config = DisplayConfig {
            update_interval_ms: 0,
            ..valid()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroUpdateInterval));
    }

    #[test]
    fn test_step_bounds() {
        let short = DisplayConfig {
            multiplex_step_us: 50,
            ..valid()
        };
        assert_eq!(short.validate(), Err(ConfigError::StepTooShort(50)));

        // 8 digits x 2.5ms = 20ms per cycle, below 60 Hz
        let slow = DisplayConfig {
            multiplex_step_us: 2500,
            ..valid()
        };
        assert_eq!(slow.validate(), Err(ConfigError::FlickerRate(20_000)));
    }

    #[test]
    fn test_guard_must_fit_in_step() {
        let config = DisplayConfig {
            blank_guard_us: 1000,
            ..valid()
        };
        assert_eq!(config.validate(), Err(ConfigError::GuardTooLong(1000)));
    }

    #[test]
    fn test_empty_page_list_rejected() {
        let config = DisplayConfig {
            pages: Some(Vec::new()),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ConfigError::EmptyPageList));
    }

    #[test]
    fn test_duplicate_page_rejected() {
        let mut pages = Vec::new();
        pages.push(page("clock")).unwrap();
        pages.push(page("clock")).unwrap();
        let config = DisplayConfig {
            pages: Some(pages),
            ..valid()
        };
        assert_eq!(config.validate(), Err(ConfigError::DuplicatePage));
    }

    #[test]
    fn test_find_page() {
        let mut pages = Vec::new();
        pages.push(page("uptime")).unwrap();
        pages.push(page("hello")).unwrap();
        let config = DisplayConfig {
            pages: Some(pages),
            ..valid()
        };
        assert_eq!(config.validate(), Ok(()));
        assert!(config.find_page("hello").is_some());
        assert!(config.find_page("missing").is_none());
    }
}
