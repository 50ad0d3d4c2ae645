//! Adapter between [`OutputDriver`] and `smart-leds` writers.

use smart_leds::SmartLedsWrite;

use crate::OutputDriver;
use crate::color::Rgb;

/// Drives any `smart-leds` writer (RMT, SPI or bit-banged adapters)
///
/// These writers are sized when constructed, so `configure` only records
/// the pixel count and rejects frames of any other length.
pub struct SmartLedsDriver<W> {
    writer: W,
    pixel_count: Option<usize>,
}

/// Error of a [`SmartLedsDriver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmartLedsError<E> {
    /// `write` was called before `configure`
    NotConfigured,
    /// Frame length differs from the configured pixel count
    LengthMismatch { expected: usize, actual: usize },
    /// The underlying writer failed
    Write(E),
}

impl<W> SmartLedsDriver<W> {
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            pixel_count: None,
        }
    }

    /// Release the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputDriver for SmartLedsDriver<W>
where
    W: SmartLedsWrite<Color = Rgb>,
    W::Error: core::fmt::Debug,
{
    type Error = SmartLedsError<W::Error>;

    fn configure(&mut self, pixel_count: usize) -> Result<(), Self::Error> {
        self.pixel_count = Some(pixel_count);
        Ok(())
    }

    fn write(&mut self, colors: &[Rgb]) -> Result<(), Self::Error> {
        let expected = self.pixel_count.ok_or(SmartLedsError::NotConfigured)?;
        if colors.len() != expected {
            return Err(SmartLedsError::LengthMismatch {
                expected,
                actual: colors.len(),
            });
        }
        self.writer
            .write(colors.iter().copied())
            .map_err(SmartLedsError::Write)
    }
}
