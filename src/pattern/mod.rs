//! Pattern system with compile-time known pattern variants
//!
//! All waveforms are stored in an enum to avoid heap allocations.
//! Each waveform implements the `Waveform` trait.

mod hann;
mod knight_rider;
mod morse;
mod noise;

use embassy_time::Duration;
pub use hann::HannWindowWaveform;
pub use knight_rider::KnightRiderWaveform;
pub use morse::MorseWaveform;
pub use noise::NoiseWaveform;

use crate::generator::GeneratorConfig;

const PATTERN_NAME_NONE: &str = "none";
const PATTERN_NAME_HANN_WINDOW_PULSE: &str = "hann_window_pulse";
const PATTERN_NAME_HANN_WINDOW_REPEATING: &str = "hann_window_repeating";
const PATTERN_NAME_NOISE: &str = "noise";
const PATTERN_NAME_MORSE_CODE_SOS: &str = "morse_code_sos";
const PATTERN_NAME_HALF_SCALED_HANN_WINDOW_PULSE: &str = "half_scaled_hann_window_pulse";
const PATTERN_NAME_HALF_SCALED_HANN_WINDOW_REPEATING: &str = "half_scaled_hann_window_repeating";
const PATTERN_NAME_BULK_KNIGHT_RIDER: &str = "bulk_knight_rider";
const PATTERN_NAME_MORSE_CODE_SOS_REPEATING: &str = "morse_code_sos_repeating";

const PATTERN_ID_NONE: u8 = 0;
const PATTERN_ID_HANN_WINDOW_PULSE: u8 = 1;
const PATTERN_ID_HANN_WINDOW_REPEATING: u8 = 2;
const PATTERN_ID_NOISE: u8 = 3;
const PATTERN_ID_MORSE_CODE_SOS: u8 = 4;
const PATTERN_ID_HALF_SCALED_HANN_WINDOW_PULSE: u8 = 5;
const PATTERN_ID_HALF_SCALED_HANN_WINDOW_REPEATING: u8 = 6;
const PATTERN_ID_BULK_KNIGHT_RIDER: u8 = 7;
const PATTERN_ID_MORSE_CODE_SOS_REPEATING: u8 = 8;

/// Amplitude factor of the half-scaled variants
const HALF_SCALE: f32 = 0.5;

pub trait Waveform {
    /// Number of ticks in one natural cycle for `pixel_count` lanes
    fn cycle_len(&self, pixel_count: usize) -> u32;

    /// Render the samples of tick `phase` into `out`
    ///
    /// `out` covers every lane. Returns the number of samples written.
    fn render(&mut self, phase: u32, out: &mut [f32]) -> usize;

    /// Whether the next cycle starts right after the current one
    fn is_repeating(&self) -> bool {
        true
    }

    /// Whether the waveform emits one sample per tick instead of a burst
    fn is_scalar(&self) -> bool {
        false
    }
}

/// Pattern slot - enum containing all possible waveforms
#[derive(Debug, Clone)]
pub enum PatternSlot {
    /// All lanes off
    Silence,
    /// Hann window pulse, single-shot or repeating
    HannWindow(HannWindowWaveform),
    /// Uniform noise burst on every tick
    Noise(NoiseWaveform),
    /// Morse code blink sequence
    Morse(MorseWaveform),
    /// Single bright lane sweeping along the strip
    KnightRider(KnightRiderWaveform),
}

/// Known patterns that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Pattern {
    None = PATTERN_ID_NONE,
    HannWindowPulse = PATTERN_ID_HANN_WINDOW_PULSE,
    HannWindowRepeating = PATTERN_ID_HANN_WINDOW_REPEATING,
    Noise = PATTERN_ID_NOISE,
    MorseCodeSos = PATTERN_ID_MORSE_CODE_SOS,
    HalfScaledHannWindowPulse = PATTERN_ID_HALF_SCALED_HANN_WINDOW_PULSE,
    HalfScaledHannWindowRepeating = PATTERN_ID_HALF_SCALED_HANN_WINDOW_REPEATING,
    BulkKnightRider = PATTERN_ID_BULK_KNIGHT_RIDER,
    MorseCodeSosRepeating = PATTERN_ID_MORSE_CODE_SOS_REPEATING,
}

impl Pattern {
    /// Every known pattern, in code order
    pub const ALL: [Self; 9] = [
        Self::None,
        Self::HannWindowPulse,
        Self::HannWindowRepeating,
        Self::Noise,
        Self::MorseCodeSos,
        Self::HalfScaledHannWindowPulse,
        Self::HalfScaledHannWindowRepeating,
        Self::BulkKnightRider,
        Self::MorseCodeSosRepeating,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            PATTERN_ID_NONE => Self::None,
            PATTERN_ID_HANN_WINDOW_PULSE => Self::HannWindowPulse,
            PATTERN_ID_HANN_WINDOW_REPEATING => Self::HannWindowRepeating,
            PATTERN_ID_NOISE => Self::Noise,
            PATTERN_ID_MORSE_CODE_SOS => Self::MorseCodeSos,
            PATTERN_ID_HALF_SCALED_HANN_WINDOW_PULSE => Self::HalfScaledHannWindowPulse,
            PATTERN_ID_HALF_SCALED_HANN_WINDOW_REPEATING => Self::HalfScaledHannWindowRepeating,
            PATTERN_ID_BULK_KNIGHT_RIDER => Self::BulkKnightRider,
            PATTERN_ID_MORSE_CODE_SOS_REPEATING => Self::MorseCodeSosRepeating,
            _ => return None,
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => PATTERN_NAME_NONE,
            Self::HannWindowPulse => PATTERN_NAME_HANN_WINDOW_PULSE,
            Self::HannWindowRepeating => PATTERN_NAME_HANN_WINDOW_REPEATING,
            Self::Noise => PATTERN_NAME_NOISE,
            Self::MorseCodeSos => PATTERN_NAME_MORSE_CODE_SOS,
            Self::HalfScaledHannWindowPulse => PATTERN_NAME_HALF_SCALED_HANN_WINDOW_PULSE,
            Self::HalfScaledHannWindowRepeating => PATTERN_NAME_HALF_SCALED_HANN_WINDOW_REPEATING,
            Self::BulkKnightRider => PATTERN_NAME_BULK_KNIGHT_RIDER,
            Self::MorseCodeSosRepeating => PATTERN_NAME_MORSE_CODE_SOS_REPEATING,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|pattern| pattern.as_str() == s)
    }

    /// Build the waveform for this pattern
    ///
    /// `seed` feeds the random source of the noise pattern.
    pub fn to_slot(self, config: &GeneratorConfig, update_rate_hz: u32, seed: u64) -> PatternSlot {
        let pulse_ticks = ticks_for(config.pulse_duration, update_rate_hz);
        let morse_unit_ticks = ticks_for(config.morse_unit, update_rate_hz);
        match self {
            Self::None => PatternSlot::Silence,
            Self::HannWindowPulse => {
                PatternSlot::HannWindow(HannWindowWaveform::new(config.amplitude, pulse_ticks))
            }
            Self::HannWindowRepeating => PatternSlot::HannWindow(
                HannWindowWaveform::new(config.amplitude, pulse_ticks).with_repeat(),
            ),
            Self::HalfScaledHannWindowPulse => PatternSlot::HannWindow(HannWindowWaveform::new(
                config.amplitude * HALF_SCALE,
                pulse_ticks,
            )),
            Self::HalfScaledHannWindowRepeating => PatternSlot::HannWindow(
                HannWindowWaveform::new(config.amplitude * HALF_SCALE, pulse_ticks).with_repeat(),
            ),
            Self::Noise => PatternSlot::Noise(NoiseWaveform::new(config.amplitude, seed)),
            Self::MorseCodeSos => {
                PatternSlot::Morse(MorseWaveform::sos(config.amplitude, morse_unit_ticks))
            }
            Self::MorseCodeSosRepeating => PatternSlot::Morse(
                MorseWaveform::sos(config.amplitude, morse_unit_ticks).with_repeat(),
            ),
            Self::BulkKnightRider => PatternSlot::KnightRider(KnightRiderWaveform::new(
                config.amplitude,
                config.trail_length,
            )),
        }
    }
}

impl PatternSlot {
    pub fn cycle_len(&self, pixel_count: usize) -> u32 {
        match self {
            Self::Silence => 1,
            Self::HannWindow(waveform) => waveform.cycle_len(pixel_count),
            Self::Noise(waveform) => waveform.cycle_len(pixel_count),
            Self::Morse(waveform) => waveform.cycle_len(pixel_count),
            Self::KnightRider(waveform) => waveform.cycle_len(pixel_count),
        }
    }

    /// Render the current tick, returns the number of samples written
    pub fn render(&mut self, phase: u32, out: &mut [f32]) -> usize {
        match self {
            Self::Silence => {
                out.fill(0.0);
                out.len()
            }
            Self::HannWindow(waveform) => waveform.render(phase, out),
            Self::Noise(waveform) => waveform.render(phase, out),
            Self::Morse(waveform) => waveform.render(phase, out),
            Self::KnightRider(waveform) => waveform.render(phase, out),
        }
    }

    /// Render the terminal all-zero state with the waveform's own arity
    pub fn render_idle(&self, out: &mut [f32]) -> usize {
        let len = if self.is_scalar() { 1 } else { out.len() };
        let len = len.min(out.len());
        out[..len].fill(0.0);
        len
    }

    pub fn is_repeating(&self) -> bool {
        match self {
            Self::Silence => true,
            Self::HannWindow(waveform) => waveform.is_repeating(),
            Self::Noise(waveform) => waveform.is_repeating(),
            Self::Morse(waveform) => waveform.is_repeating(),
            Self::KnightRider(waveform) => waveform.is_repeating(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        match self {
            Self::Silence => false,
            Self::HannWindow(waveform) => waveform.is_scalar(),
            Self::Noise(waveform) => waveform.is_scalar(),
            Self::Morse(waveform) => waveform.is_scalar(),
            Self::KnightRider(waveform) => waveform.is_scalar(),
        }
    }
}

/// Number of ticks covering `duration` at `update_rate_hz`, at least one
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn ticks_for(duration: Duration, update_rate_hz: u32) -> u32 {
    let ticks = duration.as_millis() * u64::from(update_rate_hz) / 1000;
    ticks.clamp(1, u64::from(u32::MAX)) as u32
}
