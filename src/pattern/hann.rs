//! Hann window pulse
//!
//! Every burst is a spatial Hann window (peak at the strip center, zero at
//! both ends) whose amplitude follows a temporal Hann envelope across the
//! cycle, so the pulse swells and fades once per cycle.

use core::f32::consts::PI;

use super::Waveform;

#[derive(Debug, Clone)]
pub struct HannWindowWaveform {
    /// Peak sample value
    amplitude: f32,
    /// Ticks in one pulse
    cycle_ticks: u32,
    /// Start the next pulse right after the current one
    repeating: bool,
}

impl HannWindowWaveform {
    /// Create a single-shot pulse
    pub fn new(amplitude: f32, cycle_ticks: u32) -> Self {
        Self {
            amplitude,
            cycle_ticks: cycle_ticks.max(1),
            repeating: false,
        }
    }

    /// Make the pulse continuous
    #[must_use]
    pub fn with_repeat(mut self) -> Self {
        self.repeating = true;
        self
    }
}

/// Hann window coefficient of point `index` in a window of `len` points
#[allow(clippy::cast_precision_loss)]
pub(crate) fn hann(index: usize, len: usize) -> f32 {
    if len <= 1 {
        return 1.0;
    }
    let x = 2.0 * PI * index as f32 / (len - 1) as f32;
    0.5 * (1.0 - libm::cosf(x))
}

impl Waveform for HannWindowWaveform {
    fn cycle_len(&self, _pixel_count: usize) -> u32 {
        self.cycle_ticks
    }

    fn render(&mut self, phase: u32, out: &mut [f32]) -> usize {
        // Envelope points 1..=cycle_ticks of a window padded by one on each
        // side, so neither the first nor the last tick is dark.
        let phase = phase.min(self.cycle_ticks - 1) as usize;
        let envelope = hann(phase + 1, self.cycle_ticks as usize + 2);
        let scale = self.amplitude * envelope;

        let len = out.len();
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = scale * hann(i, len);
        }
        len
    }

    fn is_repeating(&self) -> bool {
        self.repeating
    }
}
