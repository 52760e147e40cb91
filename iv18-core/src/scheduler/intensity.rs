//! OE intensity control
//!
//! Brightness is set by how long the outputs stay enabled within each
//! multiplex step. A step is split into three phases:
//!
//! ```text
//! |<------------------- step_us ------------------->|
//! | guard  |<---- on_us ---->|<------ off_us ------>|
//!  ^ latch   OE asserted        OE deasserted
//! ```
//!
//! OE is always deasserted while the shift register is latched, and the
//! guard keeps it deasserted for a short while after, so the previous
//! digit's segments never bleed onto the newly selected grid.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Highest brightness level
pub const MAX_INTENSITY: u8 = 15;

/// Perceptually spaced duty cycles (out of 255)
const PERCEPTUAL_DUTY: [u8; 16] = [
    0, 2, 4, 7, 11, 16, 23, 32, 43, 56, 72, 91, 114, 142, 177, 255,
];

/// Brightness level, 0 (dark) to 15 (full)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Intensity(u8);

impl Intensity {
    /// Display dark
    pub const OFF: Self = Self(0);
    /// Full brightness
    pub const FULL: Self = Self(MAX_INTENSITY);

    /// Create from a level, rejecting values above 15
    pub fn new(level: u8) -> Result<Self, ConfigError> {
        if level > MAX_INTENSITY {
            return Err(ConfigError::IntensityOutOfRange(level));
        }
        Ok(Self(level))
    }

    /// Create from a level, clamping values above 15
    pub const fn saturating(level: u8) -> Self {
        if level > MAX_INTENSITY {
            Self(MAX_INTENSITY)
        } else {
            Self(level)
        }
    }

    /// Raw level
    pub const fn level(self) -> u8 {
        self.0
    }

    /// One level brighter, saturating at full
    pub const fn brighter(self) -> Self {
        Self::saturating(self.0 + 1)
    }

    /// One level dimmer, saturating at off
    pub const fn dimmer(self) -> Self {
        Self(self.0.saturating_sub(1))
    }
}

impl Default for Intensity {
    fn default() -> Self {
        Self::FULL
    }
}

/// Mapping from intensity level to OE duty cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DimmingCurve {
    /// Duty proportional to level
    #[default]
    Linear,
    /// Roughly logarithmic steps, closer to perceived brightness
    Perceptual,
}

impl DimmingCurve {
    /// Duty cycle out of 255
    pub fn duty(self, intensity: Intensity) -> u8 {
        let level = intensity.level();
        match self {
            Self::Linear => level * 17,
            Self::Perceptual => PERCEPTUAL_DUTY[level as usize],
        }
    }
}

/// OE timing for one multiplex step, in µs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OeWindow {
    /// Dead time after the latch, OE deasserted
    pub guard_us: u32,
    /// OE asserted
    pub on_us: u32,
    /// Remainder of the step, OE deasserted
    pub off_us: u32,
}

impl OeWindow {
    /// OE stays deasserted for the whole step
    pub fn is_dark(&self) -> bool {
        self.on_us == 0
    }

    /// Total step length
    pub fn period_us(&self) -> u32 {
        self.guard_us + self.on_us + self.off_us
    }
}

/// Intensity controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntensityController {
    intensity: Intensity,
    curve: DimmingCurve,
    step_us: u32,
    guard_us: u32,
}

impl IntensityController {
    /// Create a controller for a given step length and blanking guard
    pub fn new(intensity: Intensity, curve: DimmingCurve, step_us: u32, guard_us: u32) -> Self {
        Self {
            intensity,
            curve,
            step_us,
            guard_us: guard_us.min(step_us),
        }
    }

    /// Change brightness, effective from the next step
    pub fn set_intensity(&mut self, intensity: Intensity) {
        self.intensity = intensity;
    }

    /// Current brightness
    pub fn intensity(&self) -> Intensity {
        self.intensity
    }

    /// Active curve
    pub fn curve(&self) -> DimmingCurve {
        self.curve
    }

    /// Compute the OE window for the current intensity
    pub fn window(&self) -> OeWindow {
        let usable = self.step_us - self.guard_us;
        let duty = self.curve.duty(self.intensity) as u64;
        let on_us = (usable as u64 * duty / 255) as u32;

        OeWindow {
            guard_us: self.guard_us,
            on_us,
            off_us: usable - on_us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(level: u8) -> IntensityController {
        IntensityController::new(
            Intensity::new(level).unwrap(),
            DimmingCurve::Linear,
            1000,
            20,
        )
    }

    #[test]
    fn test_intensity_range() {
        assert!(Intensity::new(0).is_ok());
        assert!(Intensity::new(15).is_ok());
        assert_eq!(Intensity::new(16), Err(ConfigError::IntensityOutOfRange(16)));
        assert_eq!(Intensity::saturating(200), Intensity::FULL);
    }

    #[test]
    fn test_brighter_dimmer_saturate() {
        assert_eq!(Intensity::FULL.brighter(), Intensity::FULL);
        assert_eq!(Intensity::OFF.dimmer(), Intensity::OFF);
        assert_eq!(Intensity::OFF.brighter().level(), 1);
    }

    #[test]
    fn test_zero_is_dark() {
        let window = controller(0).window();
        assert!(window.is_dark());
        assert_eq!(window.on_us, 0);
        assert_eq!(window.period_us(), 1000);
    }

    #[test]
    fn test_full_uses_whole_window() {
        let window = controller(15).window();
        assert_eq!(window.guard_us, 20);
        assert_eq!(window.on_us, 980);
        assert_eq!(window.off_us, 0);
    }

    #[test]
    fn test_linear_midpoint() {
        // 8 * 17 = 136 / 255 of 980us
        let window = controller(8).window();
        assert_eq!(window.on_us, 980 * 136 / 255);
        assert_eq!(window.period_us(), 1000);
    }

    #[test]
    fn test_perceptual_endpoints() {
        assert_eq!(DimmingCurve::Perceptual.duty(Intensity::OFF), 0);
        assert_eq!(DimmingCurve::Perceptual.duty(Intensity::FULL), 255);
        assert_eq!(DimmingCurve::Linear.duty(Intensity::FULL), 255);
    }

    #[test]
    fn test_set_intensity() {
        let mut ctrl = controller(15);
        ctrl.set_intensity(Intensity::OFF);
        assert_eq!(ctrl.intensity(), Intensity::OFF);
        assert!(ctrl.window().is_dark());
    }

    #[test]
    fn test_guard_clamped_to_step() {
        let ctrl = IntensityController::new(Intensity::FULL, DimmingCurve::Linear, 100, 500);
        let window = ctrl.window();
        assert_eq!(window.guard_us, 100);
        assert!(window.is_dark());
    }
}
