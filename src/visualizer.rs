//! Color-mapped visualizer
//!
//! Maps samples to colors through the active palette and commits whole
//! frames to an [`OutputDriver`]. A frame is composed in a staging buffer
//! and only becomes the committed frame once the driver accepted it, so a
//! partially written frame is never visible.

use core::fmt;

use log::{debug, info, warn};

use crate::OutputDriver;
use crate::color::{BLACK, Rgb};
use crate::generator::SampleSink;
use crate::intent::PaletteControl;
use crate::palette::{Palette, SampleRange};
use crate::pattern::Pattern;
use crate::registry::{ClaimError, LedPort, PeripheralRegistry, PortClaim};

/// Configuration for the visualizer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualizerConfig {
    /// Output channel and data pin of the strip
    pub port: LedPort,
    /// Expected sample domain
    pub sample_range: SampleRange,
    /// Palette used until another one is requested
    pub palette: Palette,
}

impl VisualizerConfig {
    pub const DEFAULT: Self = Self {
        port: LedPort::new(0, 21),
        sample_range: SampleRange::DEFAULT,
        palette: Palette::HeatMap,
    };
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Visualizer error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisualizerError<E> {
    /// `init` has not claimed the port yet
    NotInitialized,
    /// The port's channel or pin is owned by another port
    HardwareConflict(LedPort),
    /// No room left in the peripheral registry
    RegistryFull,
    /// The LED driver failed
    Driver(E),
}

impl<E: fmt::Debug> fmt::Display for VisualizerError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisualizerError::NotInitialized => write!(f, "Visualizer is not initialized"),
            VisualizerError::HardwareConflict(owner) => write!(
                f,
                "Hardware conflict with channel {} pin {}",
                owner.channel, owner.pin
            ),
            VisualizerError::RegistryFull => write!(f, "Peripheral registry is full"),
            VisualizerError::Driver(e) => write!(f, "LED driver error: {:?}", e),
        }
    }
}

impl<E> From<ClaimError> for VisualizerError<E> {
    fn from(e: ClaimError) -> Self {
        match e {
            ClaimError::Conflict(owner) => VisualizerError::HardwareConflict(owner),
            ClaimError::Full => VisualizerError::RegistryFull,
        }
    }
}

/// LED strip visualizer with `PIXELS` lanes
pub struct Visualizer<'a, D: OutputDriver, const PIXELS: usize> {
    // External dependencies and configuration
    driver: D,
    registry: &'a PeripheralRegistry,
    palettes: &'a PaletteControl,
    port: LedPort,
    range: SampleRange,

    // Internal state
    claim: Option<PortClaim<'a>>,
    palette: Palette,
    cursor: usize,
    dropped_frames: u32,
    frame: [Rgb; PIXELS],
    staging: [Rgb; PIXELS],
}

impl<'a, D: OutputDriver, const PIXELS: usize> Visualizer<'a, D, PIXELS> {
    pub fn new(
        driver: D,
        registry: &'a PeripheralRegistry,
        palettes: &'a PaletteControl,
        config: &VisualizerConfig,
    ) -> Self {
        Self {
            driver,
            registry,
            palettes,
            port: config.port,
            range: config.sample_range,
            claim: None,
            palette: config.palette,
            cursor: 0,
            dropped_frames: 0,
            frame: [BLACK; PIXELS],
            staging: [BLACK; PIXELS],
        }
    }

    /// Claim the port and configure the driver for `PIXELS` pixels
    ///
    /// Calling it again once initialized does nothing.
    pub fn init(&mut self) -> Result<(), VisualizerError<D::Error>> {
        if self.claim.is_some() {
            return Ok(());
        }

        let registry = self.registry;
        let claim = registry.claim(self.port).map_err(|e| {
            warn!("visualizer: cannot claim port: {}", e);
            VisualizerError::from(e)
        })?;

        // Dropping the claim on failure releases the port
        self.driver.configure(PIXELS).map_err(|e| {
            warn!("visualizer: driver configuration failed: {:?}", e);
            VisualizerError::Driver(e)
        })?;

        info!(
            "visualizer: {} pixels on channel {} pin {}",
            PIXELS, self.port.channel, self.port.pin
        );
        self.claim = Some(claim);
        Ok(())
    }

    /// Map one sample into the lane under the write cursor and commit
    ///
    /// The cursor advances (and wraps) once the frame is committed.
    pub fn give_data_point(&mut self, sample: f32) -> Result<(), VisualizerError<D::Error>> {
        self.ensure_initialized()?;
        self.take_palette();

        self.staging = self.frame;
        let lane = self.cursor;
        if let Some(color) = self.staging.get_mut(lane) {
            *color = self.palette.map(sample, self.range);
        }

        self.commit()?;
        if PIXELS > 0 {
            self.cursor = (lane + 1) % PIXELS;
        }
        Ok(())
    }

    /// Map a burst into lanes `0..samples.len()` and commit
    ///
    /// Lanes past the burst are cleared to the palette's zero color. Samples
    /// beyond `PIXELS` are ignored.
    pub fn give_data_points(&mut self, samples: &[f32]) -> Result<(), VisualizerError<D::Error>> {
        self.ensure_initialized()?;
        self.take_palette();

        if samples.len() > PIXELS {
            debug!(
                "visualizer: burst of {} clamped to {} pixels",
                samples.len(),
                PIXELS
            );
        }
        let len = samples.len().min(PIXELS);
        for (color, sample) in self.staging.iter_mut().zip(samples) {
            *color = self.palette.map(*sample, self.range);
        }
        self.staging[len..].fill(self.palette.zero_color());

        self.commit()
    }

    /// Committed frame, as last accepted by the driver
    pub fn frame(&self) -> &[Rgb] {
        &self.frame
    }

    /// Palette of the last commit
    pub fn palette(&self) -> Palette {
        self.palette
    }

    /// Lane the next single sample is written to
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Frames dropped because the driver failed
    pub fn dropped_frames(&self) -> u32 {
        self.dropped_frames
    }

    pub fn is_initialized(&self) -> bool {
        self.claim.is_some()
    }

    /// Get a reference to the driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Get a mutable reference to the driver.
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    fn ensure_initialized(&self) -> Result<(), VisualizerError<D::Error>> {
        if self.claim.is_some() {
            Ok(())
        } else {
            Err(VisualizerError::NotInitialized)
        }
    }

    /// Apply a pending palette request before composing the frame
    fn take_palette(&mut self) {
        if let Some(palette) = self.palettes.take() {
            debug!("visualizer: palette {}", palette.as_str());
            self.palette = palette;
        }
    }

    /// Write the staging frame and swap it in once the driver accepted it
    fn commit(&mut self) -> Result<(), VisualizerError<D::Error>> {
        match self.driver.write(&self.staging) {
            Ok(()) => {
                core::mem::swap(&mut self.frame, &mut self.staging);
                Ok(())
            }
            Err(e) => {
                self.dropped_frames = self.dropped_frames.saturating_add(1);
                warn!("visualizer: frame dropped: {:?}", e);
                Err(VisualizerError::Driver(e))
            }
        }
    }
}

impl<D: OutputDriver, const PIXELS: usize> SampleSink for Visualizer<'_, D, PIXELS> {
    fn on_samples(&mut self, samples: &[f32], _pattern: Pattern, _cycle_complete: bool) {
        let result = match samples {
            [] => return,
            [sample] => self.give_data_point(*sample),
            _ => self.give_data_points(samples),
        };
        // Driver errors are already logged by the commit
        if let Err(VisualizerError::NotInitialized) = result {
            warn!("visualizer: samples before init dropped");
        }
    }
}
