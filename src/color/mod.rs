mod utils;

use smart_leds::RGB8;

pub use utils::{blend_colors, rgb_from_u32};

pub type Rgb = RGB8;

/// All channels off
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
