//! Sample-to-color palettes
//!
//! A sample is first normalized against a [`SampleRange`] into a 0-255
//! level, then the active [`Palette`] turns the level into a color.
//! Every palette is monotonic in brightness and saturates at its endpoints.

use crate::color::{BLACK, Rgb, blend_colors, rgb_from_u32};
use crate::math8::unit_to_u8;

const PALETTE_NAME_HEAT_MAP: &str = "heat_map";
const PALETTE_NAME_RED_SCALE: &str = "red_scale";

const PALETTE_ID_HEAT_MAP: u8 = 0;
const PALETTE_ID_RED_SCALE: u8 = 1;

/// Create a palette from a list of hex colors (0xRRGGBB format)
macro_rules! hex_palette {
    ($($color:expr),*) => {
        [
            $(rgb_from_u32($color)),*
        ]
    };
}

// Every channel is non-decreasing from one stop to the next.
#[allow(clippy::unreadable_literal)]
const HEAT_MAP_STOPS: [Rgb; 5] = hex_palette![
    0x000000, // Black
    0xFF0000, // Red
    0xFF8000, // Orange
    0xFFFF00, // Yellow
    0xFFFFFF  // White
];

/// Expected input domain of the samples
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleRange {
    min: f32,
    max: f32,
}

impl SampleRange {
    /// Full scale of the built-in patterns
    pub const DEFAULT: Self = Self {
        min: 0.0,
        max: 2000.0,
    };

    /// Create a range, returns `None` unless both bounds are finite and
    /// `min < max`
    pub fn new(min: f32, max: f32) -> Option<Self> {
        if !min.is_finite() || !max.is_finite() || min >= max {
            return None;
        }
        Some(Self { min, max })
    }

    pub const fn min(self) -> f32 {
        self.min
    }

    pub const fn max(self) -> f32 {
        self.max
    }

    /// Normalize a sample to a 0-255 level
    ///
    /// NaN and values below the range map to 0, values above it map to 255.
    pub fn normalize(self, sample: f32) -> u8 {
        if sample.is_nan() {
            return 0;
        }
        unit_to_u8((sample - self.min) / (self.max - self.min))
    }
}

impl Default for SampleRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Known palettes that can be requested.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Palette {
    /// Black, red, orange, yellow, white
    #[default]
    HeatMap = PALETTE_ID_HEAT_MAP,
    /// Red channel proportional to the level
    RedScale = PALETTE_ID_RED_SCALE,
}

impl Palette {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            PALETTE_ID_HEAT_MAP => Self::HeatMap,
            PALETTE_ID_RED_SCALE => Self::RedScale,
            _ => return None,
        })
    }

    pub const fn as_raw(self) -> u8 {
        self as u8
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HeatMap => PALETTE_NAME_HEAT_MAP,
            Self::RedScale => PALETTE_NAME_RED_SCALE,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            PALETTE_NAME_HEAT_MAP => Some(Self::HeatMap),
            PALETTE_NAME_RED_SCALE => Some(Self::RedScale),
            _ => None,
        }
    }

    /// Map a normalized level (0-255) to a color
    pub fn color(self, level: u8) -> Rgb {
        match self {
            Self::HeatMap => sample_stops(&HEAT_MAP_STOPS, level),
            Self::RedScale => Rgb {
                r: level,
                g: 0,
                b: 0,
            },
        }
    }

    /// Color used for cleared lanes
    pub fn zero_color(self) -> Rgb {
        self.color(0)
    }

    /// Normalize a sample against `range` and map it to a color
    pub fn map(self, sample: f32, range: SampleRange) -> Rgb {
        self.color(range.normalize(sample))
    }
}

/// Sample the gradient stops at position t (0-255)
///
/// 255 lands exactly on the last stop.
#[allow(clippy::cast_possible_truncation)]
fn sample_stops(stops: &[Rgb], t: u8) -> Rgb {
    let segments = stops.len().saturating_sub(1);
    if segments == 0 {
        return stops.first().copied().unwrap_or(BLACK);
    }

    let scaled = usize::from(t) * segments; // 0..=255*(N-1)
    let segment = scaled / 255;
    if segment >= segments {
        return stops[segments];
    }
    let local_t = (scaled % 255) as u8;

    blend_colors(stops[segment], stops[segment + 1], local_t)
}
