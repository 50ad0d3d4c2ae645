//! Pending intents
//!
//! Trigger sources never touch generator or visualizer state directly.
//! They write single-slot, overwrite-on-write atomics that the owning
//! context takes once at the start of its next tick or commit.

use core::fmt;
use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU16, Ordering};

use log::warn;

use crate::palette::Palette;
use crate::pattern::Pattern;

const NO_SWITCH: u16 = u16::MAX;
const RESTART_IMMEDIATELY_BIT: u16 = 0x100;
const NO_PALETTE: u8 = u8::MAX;

/// Error returned when a control request is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlError {
    /// The generator has not been started yet
    NotStarted,
    /// No pattern has this code
    UnknownPattern(u8),
    /// No palette has this code
    UnknownPalette(u8),
}

impl fmt::Display for ControlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlError::NotStarted => write!(f, "Generator is not started"),
            ControlError::UnknownPattern(code) => write!(f, "Unknown pattern code {}", code),
            ControlError::UnknownPalette(code) => write!(f, "Unknown palette code {}", code),
        }
    }
}

/// Request to switch the active pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternSwitch {
    pub pattern: Pattern,
    /// Apply at the next tick instead of the next cycle boundary
    pub restart_immediately: bool,
}

impl PatternSwitch {
    fn encode(self) -> u16 {
        let code = u16::from(self.pattern.as_raw());
        if self.restart_immediately {
            code | RESTART_IMMEDIATELY_BIT
        } else {
            code
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn decode(raw: u16) -> Option<Self> {
        if raw == NO_SWITCH {
            return None;
        }
        let pattern = Pattern::from_raw((raw & 0xFF) as u8)?;
        Some(Self {
            pattern,
            restart_immediately: raw & RESTART_IMMEDIATELY_BIT != 0,
        })
    }
}

/// Intents taken by the generator at the start of a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GeneratorIntents {
    pub restart: bool,
    pub switch: Option<PatternSwitch>,
}

/// Control surface of a [`PatternGenerator`](crate::PatternGenerator)
///
/// Shared by reference between the generator and any number of trigger
/// sources. Requests made between two ticks collapse: repeated restarts
/// become one restart, and the last pattern switch wins.
#[derive(Debug)]
pub struct GeneratorControl {
    started: AtomicBool,
    restart: AtomicBool,
    switch: AtomicU16,
}

impl GeneratorControl {
    pub const fn new() -> Self {
        Self {
            started: AtomicBool::new(false),
            restart: AtomicBool::new(false),
            switch: AtomicU16::new(NO_SWITCH),
        }
    }

    /// Whether a generator bound to this control has been started
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Restart the current pattern from phase zero at the next tick
    pub fn restart(&self) -> Result<(), ControlError> {
        self.ensure_started()?;
        self.restart.store(true, Ordering::Release);
        Ok(())
    }

    /// Request a switch to `pattern`
    ///
    /// With `restart_immediately` the switch happens at the next tick,
    /// otherwise at the next natural cycle boundary of the current pattern.
    pub fn change_pattern(
        &self,
        pattern: Pattern,
        restart_immediately: bool,
    ) -> Result<(), ControlError> {
        self.ensure_started()?;
        let switch = PatternSwitch {
            pattern,
            restart_immediately,
        };
        self.switch.store(switch.encode(), Ordering::Release);
        Ok(())
    }

    /// Request a switch to the pattern with code `code`
    pub fn change_pattern_raw(
        &self,
        code: u8,
        restart_immediately: bool,
    ) -> Result<Pattern, ControlError> {
        let pattern = Pattern::from_raw(code).ok_or(ControlError::UnknownPattern(code))?;
        self.change_pattern(pattern, restart_immediately)?;
        Ok(pattern)
    }

    pub(crate) fn mark_started(&self) {
        self.started.store(true, Ordering::Release);
    }

    /// Take every pending intent, leaving the slots empty
    pub(crate) fn take(&self) -> GeneratorIntents {
        GeneratorIntents {
            restart: self.restart.swap(false, Ordering::AcqRel),
            switch: PatternSwitch::decode(self.switch.swap(NO_SWITCH, Ordering::AcqRel)),
        }
    }

    fn ensure_started(&self) -> Result<(), ControlError> {
        if self.is_started() {
            return Ok(());
        }
        warn!("generator: control request before start rejected");
        Err(ControlError::NotStarted)
    }
}

impl Default for GeneratorControl {
    fn default() -> Self {
        Self::new()
    }
}

/// Palette selection for a [`Visualizer`](crate::Visualizer)
///
/// A new palette applies to the next committed frame only.
#[derive(Debug)]
pub struct PaletteControl {
    pending: AtomicU8,
}

impl PaletteControl {
    pub const fn new() -> Self {
        Self {
            pending: AtomicU8::new(NO_PALETTE),
        }
    }

    pub fn set_palette(&self, palette: Palette) {
        self.pending.store(palette.as_raw(), Ordering::Release);
    }

    /// Select the palette with code `code`
    pub fn set_palette_raw(&self, code: u8) -> Result<Palette, ControlError> {
        let palette = Palette::from_raw(code).ok_or(ControlError::UnknownPalette(code))?;
        self.set_palette(palette);
        Ok(palette)
    }

    pub fn change_colors_to_heat_map(&self) {
        self.set_palette(Palette::HeatMap);
    }

    pub fn change_colors_to_red_scale(&self) {
        self.set_palette(Palette::RedScale);
    }

    /// Take the pending palette, leaving the slot empty
    pub(crate) fn take(&self) -> Option<Palette> {
        Palette::from_raw(self.pending.swap(NO_PALETTE, Ordering::AcqRel))
    }
}

impl Default for PaletteControl {
    fn default() -> Self {
        Self::new()
    }
}
