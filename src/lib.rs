#![no_std]

pub mod color;
pub mod driver;
pub mod generator;
pub mod intent;
#[cfg(feature = "esp32-log")]
pub mod logging;
pub mod math8;
pub mod palette;
pub mod pattern;
pub mod registry;
pub mod trigger;
pub mod visualizer;

pub use driver::{SmartLedsDriver, SmartLedsError};
pub use generator::{
    FnSink, GeneratorConfig, PatternGenerator, SampleSink, StartError, TickResult,
};
pub use intent::{ControlError, GeneratorControl, PaletteControl};
pub use palette::{Palette, SampleRange};
pub use pattern::{Pattern, PatternSlot};
pub use registry::{LedPort, PeripheralRegistry};
pub use trigger::{
    AccelSample, RemoteCommand, RemoteCommandHandler, ThresholdListener, ThresholdMonitor,
};
pub use visualizer::{Visualizer, VisualizerConfig, VisualizerError};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The visualizer is generic over this trait.
pub trait OutputDriver {
    type Error: core::fmt::Debug;

    /// Configure the output channel for `pixel_count` pixels
    fn configure(&mut self, pixel_count: usize) -> Result<(), Self::Error>;

    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]) -> Result<(), Self::Error>;
}
