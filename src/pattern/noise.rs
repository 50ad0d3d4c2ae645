//! Uniform noise fill

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::Waveform;

/// Fills every lane with an independent sample in `[0, amplitude)`
#[derive(Debug, Clone)]
pub struct NoiseWaveform {
    amplitude: f32,
    rng: SmallRng,
}

impl NoiseWaveform {
    pub fn new(amplitude: f32, seed: u64) -> Self {
        Self {
            amplitude,
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Waveform for NoiseWaveform {
    fn cycle_len(&self, _pixel_count: usize) -> u32 {
        1
    }

    fn render(&mut self, _phase: u32, out: &mut [f32]) -> usize {
        for sample in out.iter_mut() {
            *sample = self.rng.r#gen::<f32>() * self.amplitude;
        }
        out.len()
    }
}
