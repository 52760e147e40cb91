//! Refresh timing: digit multiplexing and OE dimming

pub mod intensity;
pub mod multiplex;

pub use intensity::{DimmingCurve, Intensity, IntensityController, OeWindow, MAX_INTENSITY};
pub use multiplex::MultiplexScheduler;
