//! Face painting: shading, outline and pixel-noise texture.

use image::Rgba;
use rand::Rng;

use crate::canvas::Canvas;
use crate::color::{self, Color};
use crate::geometry::{FacePolygon, FaceRole, Point};

/// Lightening applied to top faces.
pub const TOP_LIGHTEN: f64 = 1.2;

/// Darkening applied to right faces.
pub const RIGHT_DARKEN: f64 = 0.8;

/// Outline color for every face.
pub const OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Texture speckles attempted per face.
pub const TEXTURE_ATTEMPTS: u32 = 3;

/// Chance that each attempted speckle is drawn.
pub const TEXTURE_PROBABILITY: f64 = 0.3;

/// Channel spread of a speckle around the face color.
pub const TEXTURE_SPREAD: i32 = 20;

impl FaceRole {
    /// The color a face of this role is filled with, given its base color.
    pub fn shade(self, base: Color) -> Color {
        match self {
            FaceRole::Top => color::lighten(base, TOP_LIGHTEN),
            FaceRole::Left => base,
            FaceRole::Right => color::darken(base, RIGHT_DARKEN),
        }
    }
}

/// Speckle edge length for a given base cube size.
pub fn texture_pixel_size(base_cube_size: i32) -> i32 {
    (base_cube_size / 16).max(1)
}

/// Paints one face: shaded fill, black outline, then texture.
pub fn paint<R: Rng + ?Sized>(
    canvas: &mut Canvas,
    face: &FacePolygon,
    base_color: Color,
    pixel_size: i32,
    rng: &mut R,
) {
    let shaded = face.role.shade(base_color);
    canvas.fill_polygon(&face.points, color::to_rgba(shaded));
    canvas.outline_polygon(&face.points, OUTLINE);
    add_texture(canvas, face, shaded, pixel_size, rng);
}

/// Scatters up to [`TEXTURE_ATTEMPTS`] small squares inside the face's
/// bounding box. Faces whose box is not wider and taller than two speckles
/// are left plain.
fn add_texture<R: Rng + ?Sized>(
    canvas: &mut Canvas,
    face: &FacePolygon,
    shaded: Color,
    pixel_size: i32,
    rng: &mut R,
) {
    let bbox = face.bounding_box();
    let (x_lo, x_hi) = (bbox.min_x + pixel_size, bbox.max_x - pixel_size);
    let (y_lo, y_hi) = (bbox.min_y + pixel_size, bbox.max_y - pixel_size);
    if x_hi <= x_lo || y_hi <= y_lo {
        return;
    }

    for _ in 0..TEXTURE_ATTEMPTS {
        if !rng.random_bool(TEXTURE_PROBABILITY) {
            continue;
        }
        let px = rng.random_range(x_lo..=x_hi);
        let py = rng.random_range(y_lo..=y_hi);
        let speckle = color::jitter(shaded, TEXTURE_SPREAD, rng);
        canvas.fill_rect(
            Point::new(px, py),
            Point::new(px + pixel_size, py + pixel_size),
            color::to_rgba(speckle),
        );
    }
}

// ============================================================================
// Tests
// ============================================================================
