#![allow(dead_code)]

use myrtio_pattern_visualizer::{OutputDriver, Pattern, Rgb, SampleSink};

/// Everything the generator pushed, one entry per tick
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub bursts: Vec<Vec<f32>>,
    pub patterns: Vec<Pattern>,
    pub completes: Vec<bool>,
}

impl RecordingSink {
    pub fn last(&self) -> &[f32] {
        self.bursts.last().map(Vec::as_slice).unwrap_or(&[])
    }
}

impl SampleSink for RecordingSink {
    fn on_samples(&mut self, samples: &[f32], pattern: Pattern, cycle_complete: bool) {
        self.bursts.push(samples.to_vec());
        self.patterns.push(pattern);
        self.completes.push(cycle_complete);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// LED driver keeping every written frame
#[derive(Debug, Default)]
pub struct MockDriver {
    pub configured: Option<usize>,
    pub frames: Vec<Vec<Rgb>>,
    pub fail_configure: bool,
    pub fail_writes: usize,
}

impl MockDriver {
    pub fn failing_writes(count: usize) -> Self {
        Self {
            fail_writes: count,
            ..Self::default()
        }
    }
}

impl OutputDriver for MockDriver {
    type Error = MockError;

    fn configure(&mut self, pixel_count: usize) -> Result<(), Self::Error> {
        if self.fail_configure {
            return Err(MockError);
        }
        self.configured = Some(pixel_count);
        Ok(())
    }

    fn write(&mut self, colors: &[Rgb]) -> Result<(), Self::Error> {
        if self.fail_writes > 0 {
            self.fail_writes -= 1;
            return Err(MockError);
        }
        self.frames.push(colors.to_vec());
        Ok(())
    }
}
