//! Sweeping bright lane with a fading trail

use super::Waveform;

/// Longest supported trail, in lanes
pub const MAX_TRAIL: u8 = 8;

#[derive(Debug, Clone)]
pub struct KnightRiderWaveform {
    amplitude: f32,
    /// Lanes lit behind the head, each at half the previous intensity
    trail: u8,
}

impl KnightRiderWaveform {
    pub fn new(amplitude: f32, trail: u8) -> Self {
        Self {
            amplitude,
            trail: trail.min(MAX_TRAIL),
        }
    }
}

impl Waveform for KnightRiderWaveform {
    #[allow(clippy::cast_possible_truncation)]
    fn cycle_len(&self, pixel_count: usize) -> u32 {
        pixel_count.clamp(1, u32::MAX as usize) as u32
    }

    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, phase: u32, out: &mut [f32]) -> usize {
        let len = out.len();
        if len == 0 {
            return 0;
        }
        let head = phase as usize % len;
        for (i, sample) in out.iter_mut().enumerate() {
            // Lanes behind the head; the trail wraps past the strip start.
            let distance = (head + len - i) % len;
            *sample = if distance <= usize::from(self.trail) {
                self.amplitude / (1u32 << distance) as f32
            } else {
                0.0
            };
        }
        len
    }
}
