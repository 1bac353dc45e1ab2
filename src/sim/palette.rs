//! Colors and glyph sets shared by the scenes

use rand::Rng;
use serde::{Deserialize, Serialize};

/// 24-bit RGB color (0xRRGGBB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);

    /// CSS hex form, e.g. `#ff6b9d`
    pub fn css(&self) -> String {
        format!("#{:06x}", self.0 & 0xff_ffff)
    }
}

/// Firework spark and shell colors
pub const FIREWORK_COLORS: [Color; 7] = [
    Color(0xff6b9d),
    Color(0xff8a5c),
    Color(0xffd93d),
    Color(0xff69b4),
    Color(0xff1493),
    Color(0xffb6c1),
    Color(0xffa07a),
];

/// Floating symbol colors
pub const SYMBOL_COLORS: [Color; 6] = [
    Color(0xff6b9d),
    Color(0xffb6c1),
    Color(0xffd93d),
    Color(0xff8a5c),
    Color(0xff69b4),
    Color(0xc44569),
];

/// Glyphs a floating symbol may wear
pub const SYMBOL_GLYPHS: [&str; 12] = [
    "★", "✦", "✧", "✨", "🌸", "⭐", "✿", "🌷", "💫", "🌺", "🦋", "🍀",
];

/// Small decorative glyphs mixed into pop fragments
pub const FRAGMENT_GLYPHS: [&str; 5] = ["✦", "✧", "·", "★", "✨"];

/// Pointer sparkle colors
pub const SPARKLE_COLORS: [Color; 6] = [
    Color(0xff6b9d),
    Color(0xffb6c1),
    Color(0xffd93d),
    Color(0xff8a5c),
    Color(0xffffff),
    Color(0xc44569),
];

/// Pointer sparkle glyphs
pub const SPARKLE_GLYPHS: [&str; 6] = ["✦", "✧", "★", "🌸", "✨", "·"];

/// Night sky behind the celebration
pub const NIGHT_SKY: Color = Color(0x050208);
/// Exit control fill
pub const CONTROL_FILL: Color = Color(0x1a0f18);
/// Exit control label
pub const CONTROL_TEXT: Color = Color(0xff6b9d);
/// First reveal line
pub const LINE1_COLOR: Color = Color(0xff6b9d);
/// Second reveal line
pub const LINE2_COLOR: Color = Color(0xffd93d);

/// Uniform pick from a non-empty table
#[inline]
pub fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, table: &[T]) -> T {
    table[rng.random_range(0..table.len())]
}
