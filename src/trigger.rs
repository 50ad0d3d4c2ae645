//! Trigger sources
//!
//! Adapters that turn external events into generator and palette intents:
//! a sensor threshold monitor and the remote command dispatcher.

use log::debug;

use crate::intent::{ControlError, GeneratorControl, PaletteControl};
use crate::palette::Palette;
use crate::pattern::Pattern;

/// Magnitude that counts as a tap, in milli-g
pub const DEFAULT_THRESHOLD_MG: f32 = 1800.0;

/// One accelerometer reading, in milli-g
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelSample {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean norm of the reading
    pub fn magnitude(&self) -> f32 {
        libm::sqrtf(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}

/// Notified when the monitored magnitude exceeds the threshold
pub trait ThresholdListener {
    fn on_threshold_crossed(&mut self, magnitude: f32);
}

impl ThresholdListener for () {
    fn on_threshold_crossed(&mut self, _magnitude: f32) {}
}

/// Restarts the generator whenever a reading exceeds the threshold
pub struct ThresholdMonitor<'a, L: ThresholdListener> {
    control: &'a GeneratorControl,
    listener: L,
    threshold_mg: f32,
}

impl<'a, L: ThresholdListener> ThresholdMonitor<'a, L> {
    pub const fn new(control: &'a GeneratorControl, listener: L) -> Self {
        Self {
            control,
            listener,
            threshold_mg: DEFAULT_THRESHOLD_MG,
        }
    }

    /// Set the threshold
    #[must_use]
    pub const fn with_threshold(mut self, threshold_mg: f32) -> Self {
        self.threshold_mg = threshold_mg;
        self
    }

    pub const fn threshold(&self) -> f32 {
        self.threshold_mg
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    /// Feed one reading, returns whether it crossed the threshold
    pub fn on_sample(&mut self, sample: AccelSample) -> bool {
        let magnitude = sample.magnitude();
        if magnitude.is_nan() || magnitude <= self.threshold_mg {
            return false;
        }

        if let Err(e) = self.control.restart() {
            debug!("trigger: restart on threshold ignored: {}", e);
        }
        self.listener.on_threshold_crossed(magnitude);
        true
    }
}

/// Command delivered by the remote channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Restart the current pattern
    Trigger,
    /// Select a pattern by its integer code
    SelectPattern(i32),
}

/// Palette paired with each pattern on selection
pub const fn palette_for(pattern: Pattern) -> Palette {
    match pattern {
        Pattern::BulkKnightRider => Palette::RedScale,
        Pattern::None
        | Pattern::HannWindowPulse
        | Pattern::HannWindowRepeating
        | Pattern::Noise
        | Pattern::MorseCodeSos
        | Pattern::HalfScaledHannWindowPulse
        | Pattern::HalfScaledHannWindowRepeating
        | Pattern::MorseCodeSosRepeating => Palette::HeatMap,
    }
}

/// Applies remote commands to a generator and a visualizer palette
#[derive(Clone, Copy)]
pub struct RemoteCommandHandler<'a> {
    generator: &'a GeneratorControl,
    palettes: &'a PaletteControl,
}

impl<'a> RemoteCommandHandler<'a> {
    pub const fn new(generator: &'a GeneratorControl, palettes: &'a PaletteControl) -> Self {
        Self {
            generator,
            palettes,
        }
    }

    /// Handle one command
    ///
    /// Unknown pattern codes are ignored. Returns the selected pattern, if any.
    pub fn handle(&self, command: RemoteCommand) -> Result<Option<Pattern>, ControlError> {
        match command {
            RemoteCommand::Trigger => {
                self.generator.restart()?;
                Ok(None)
            }
            RemoteCommand::SelectPattern(code) => {
                let Some(pattern) = u8::try_from(code).ok().and_then(Pattern::from_raw) else {
                    debug!("trigger: unknown pattern code {} ignored", code);
                    return Ok(None);
                };
                self.generator.change_pattern(pattern, true)?;
                self.palettes.set_palette(palette_for(pattern));
                Ok(Some(pattern))
            }
        }
    }
}
