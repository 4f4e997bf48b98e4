//! Color model for cube faces.
//!
//! Colors are plain 8-bit sRGB triples ([`palette::Srgb<u8>`]). Every
//! transform here clamps its output into `0..=255`, so callers never have to.

use std::str::FromStr;

use image::Rgba;
use palette::Srgb;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::{PixelCubeError, Result};

/// An 8-bit RGB color.
pub type Color = Srgb<u8>;

/// 16-bit era inspired palette used whenever no base color is given.
pub const GAMING_PALETTE: [&str; 48] = [
    // Bright primaries
    "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
    // Darker primaries
    "#CC0000", "#00CC00", "#0000CC", "#CCCC00", "#CC00CC", "#00CCCC",
    // Earth tones
    "#8B4513", "#A0522D", "#CD853F", "#DEB887", "#F4A460", "#D2691E",
    // Purples and pinks
    "#800080", "#9932CC", "#BA55D3", "#DA70D6", "#FF69B4", "#FFB6C1",
    // Greens
    "#228B22", "#32CD32", "#7CFC00", "#ADFF2F", "#9ACD32", "#6B8E23",
    // Blues
    "#4169E1", "#6495ED", "#87CEEB", "#87CEFA", "#00BFFF", "#1E90FF",
    // Oranges and reds
    "#FF4500", "#FF6347", "#FA8072", "#E9967A", "#FFA07A", "#FF7F50",
    // Grays
    "#696969", "#808080", "#A9A9A9", "#C0C0C0", "#D3D3D3", "#DCDCDC",
];

/// Per-channel multipliers used by [`vary`], indexed by `index % 10`.
const VARIATIONS: [(f64, f64, f64); 10] = [
    (1.0, 1.0, 1.0),
    (1.2, 0.8, 0.9),
    (0.8, 1.2, 0.9),
    (0.9, 0.8, 1.2),
    (1.1, 1.1, 0.8),
    (0.9, 1.1, 1.1),
    (1.1, 0.9, 1.1),
    (0.85, 0.85, 0.85),
    (1.15, 1.15, 1.15),
    (1.0, 1.3, 0.7),
];

/// Channel spread applied by [`related_colors`].
pub const RELATED_SPREAD: i32 = 30;

// ============================================================================
// Parsing
// ============================================================================

/// Parses a `#RRGGBB` (or `RRGGBB`) string.
///
/// Short forms such as `#F00` are rejected.
pub fn hex_to_rgb(hex: &str) -> Result<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(PixelCubeError::InvalidColorFormat(hex.to_string()));
    }
    Srgb::<u8>::from_str(digits).map_err(|_| PixelCubeError::InvalidColorFormat(hex.to_string()))
}

/// Formats a color as an uppercase `#RRGGBB` string.
pub fn rgb_to_hex(color: Color) -> String {
    format!("#{:02X}{:02X}{:02X}", color.red, color.green, color.blue)
}

/// Converts a color to an opaque RGBA pixel.
pub fn to_rgba(color: Color) -> Rgba<u8> {
    Rgba([color.red, color.green, color.blue, 255])
}

// ============================================================================
// Transforms
// ============================================================================

fn scale_channel(channel: u8, factor: f64) -> u8 {
    (channel as f64 * factor).floor().clamp(0.0, 255.0) as u8
}

fn offset_channel(channel: u8, delta: i32) -> u8 {
    (channel as i32).saturating_add(delta).clamp(0, 255) as u8
}

/// Multiplies every channel by `factor` (expected in `(0, 1]`), flooring.
pub fn darken(color: Color, factor: f64) -> Color {
    Srgb::new(
        scale_channel(color.red, factor),
        scale_channel(color.green, factor),
        scale_channel(color.blue, factor),
    )
}

/// Multiplies every channel by `factor` (expected `>= 1`), saturating at 255.
pub fn lighten(color: Color, factor: f64) -> Color {
    Srgb::new(
        scale_channel(color.red, factor),
        scale_channel(color.green, factor),
        scale_channel(color.blue, factor),
    )
}

/// Applies one of ten fixed channel multipliers, picked by `index % 10`.
///
/// Deterministic: the same index always yields the same variant, which is
/// how several cubes sharing one base color stay distinguishable.
pub fn vary(color: Color, index: usize) -> Color {
    let (r, g, b) = VARIATIONS[index % VARIATIONS.len()];
    Srgb::new(
        scale_channel(color.red, r),
        scale_channel(color.green, g),
        scale_channel(color.blue, b),
    )
}

/// Adds an independent offset in `-spread..=spread` to each channel.
///
/// Negative spreads act like their magnitude. Spreads beyond 255 cannot move
/// a channel any further and are capped there.
pub fn jitter<R: Rng + ?Sized>(color: Color, spread: i32, rng: &mut R) -> Color {
    let spread = spread.unsigned_abs().min(255) as i32;
    let mut offset = || rng.random_range(-spread..=spread);
    Srgb::new(
        offset_channel(color.red, offset()),
        offset_channel(color.green, offset()),
        offset_channel(color.blue, offset()),
    )
}

/// Three loosely related colors around `base`, one per cube face.
pub fn related_colors<R: Rng + ?Sized>(base: Color, rng: &mut R) -> [Color; 3] {
    [
        jitter(base, RELATED_SPREAD, rng),
        jitter(base, RELATED_SPREAD, rng),
        jitter(base, RELATED_SPREAD, rng),
    ]
}

/// Draws a uniformly random entry from [`GAMING_PALETTE`].
pub fn random_palette_color<R: Rng + ?Sized>(rng: &mut R) -> Color {
    let hex = GAMING_PALETTE.choose(rng).copied().unwrap_or("#808080");
    palette_color(hex)
}

/// Parses a palette literal. Palette entries are known-good, so a parse
/// failure can only come from a typo in [`GAMING_PALETTE`]; mid gray stands in.
fn palette_color(hex: &str) -> Color {
    hex_to_rgb(hex).unwrap_or(Srgb::new(128, 128, 128))
}

// ============================================================================
// Tests
// ============================================================================
