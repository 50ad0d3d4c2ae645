//! Morse code blink sequence
//!
//! Walks a fixed timeline of on/off steps measured in Morse units and emits
//! one sample per tick: the amplitude while a mark is on, zero otherwise.

use super::Waveform;

/// One timeline step: lit or dark for a number of units
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MorseStep {
    pub on: bool,
    pub units: u8,
}

const fn mark(units: u8) -> MorseStep {
    MorseStep { on: true, units }
}

const fn gap(units: u8) -> MorseStep {
    MorseStep { on: false, units }
}

const DOT: u8 = 1;
const DASH: u8 = 3;
const SYMBOL_GAP: u8 = 1;
const LETTER_GAP: u8 = 3;
const WORD_GAP: u8 = 7;

/// `... --- ...` followed by a word gap
const SOS_TIMELINE: [MorseStep; 18] = [
    mark(DOT),
    gap(SYMBOL_GAP),
    mark(DOT),
    gap(SYMBOL_GAP),
    mark(DOT),
    gap(LETTER_GAP),
    mark(DASH),
    gap(SYMBOL_GAP),
    mark(DASH),
    gap(SYMBOL_GAP),
    mark(DASH),
    gap(LETTER_GAP),
    mark(DOT),
    gap(SYMBOL_GAP),
    mark(DOT),
    gap(SYMBOL_GAP),
    mark(DOT),
    gap(WORD_GAP),
];

#[derive(Debug, Clone)]
pub struct MorseWaveform {
    amplitude: f32,
    timeline: &'static [MorseStep],
    /// Ticks per Morse unit
    unit_ticks: u32,
    repeating: bool,
}

impl MorseWaveform {
    /// The SOS distress call, single-shot
    pub fn sos(amplitude: f32, unit_ticks: u32) -> Self {
        Self {
            amplitude,
            timeline: &SOS_TIMELINE,
            unit_ticks: unit_ticks.max(1),
            repeating: false,
        }
    }

    /// Restart the timeline once it ends
    #[must_use]
    pub fn with_repeat(mut self) -> Self {
        self.repeating = true;
        self
    }

    fn total_units(&self) -> u32 {
        self.timeline.iter().map(|step| u32::from(step.units)).sum()
    }

    /// Whether the timeline is lit at `unit`
    fn is_on(&self, unit: u32) -> bool {
        let mut start = 0;
        for step in self.timeline {
            let end = start + u32::from(step.units);
            if unit < end {
                return step.on;
            }
            start = end;
        }
        false
    }
}

impl Waveform for MorseWaveform {
    fn cycle_len(&self, _pixel_count: usize) -> u32 {
        self.total_units().saturating_mul(self.unit_ticks).max(1)
    }

    fn render(&mut self, phase: u32, out: &mut [f32]) -> usize {
        let Some(sample) = out.first_mut() else {
            return 0;
        };
        *sample = if self.is_on(phase / self.unit_ticks) {
            self.amplitude
        } else {
            0.0
        };
        1
    }

    fn is_repeating(&self) -> bool {
        self.repeating
    }

    fn is_scalar(&self) -> bool {
        true
    }
}
