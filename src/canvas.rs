//! Raster surface the cubes are painted onto.
//!
//! [`Canvas`] wraps a tiny-skia [`Pixmap`] and exposes the few primitives the
//! face renderer needs. Everything is drawn without anti-aliasing so faces
//! keep hard pixel edges. Integer coordinates name pixels; paths run through
//! pixel centres. Drawing clips to the pixmap, so coordinates may fall
//! partly outside.

use image::{Rgba, RgbaImage};
use rand::Rng;
use resvg::tiny_skia::{
    self, FillRule, LineJoin, Paint, Path, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use crate::color::{self, Color};
use crate::error::{PixelCubeError, Result};
use crate::geometry::Point;

/// Darkening applied to a palette color drawn as background.
pub const PALETTE_BACKGROUND_FACTOR: f64 = 0.3;

/// Largest accepted canvas edge, in pixels.
pub const MAX_DIMENSION: u32 = 256;

/// How the canvas is filled before any cube is drawn.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Background {
    /// Fully transparent pixels.
    Transparent,
    /// A random palette color, darkened for contrast.
    Palette,
    /// An explicit opaque color.
    Color(Color),
}

impl Background {
    /// Interprets a background parameter.
    ///
    /// `"transparent"` and `"palette"` select those modes, a string starting
    /// with `#` must be a valid hex color, anything else falls back to
    /// transparent.
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "transparent" => Ok(Self::Transparent),
            "palette" => Ok(Self::Palette),
            hex if hex.starts_with('#') => Ok(Self::Color(color::hex_to_rgb(hex)?)),
            other => {
                if !other.is_empty() {
                    tracing::debug!(background = other, "unknown background, using transparent");
                }
                Ok(Self::Transparent)
            }
        }
    }
}

/// Immutable canvas parameters for one generation call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasConfig {
    pub width: u32,
    pub height: u32,
    pub background: Background,
}

impl CanvasConfig {
    /// Creates a config, clamping both edges into `1..=MAX_DIMENSION`.
    pub fn new(width: u32, height: u32, background: Background) -> Self {
        Self {
            width: width.clamp(1, MAX_DIMENSION),
            height: height.clamp(1, MAX_DIMENSION),
            background,
        }
    }

    /// The shorter canvas edge.
    pub fn min_dimension(&self) -> u32 {
        self.width.min(self.height)
    }
}

/// An RGBA drawing surface.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Allocates a canvas and paints its background.
    pub fn new<R: Rng + ?Sized>(config: &CanvasConfig, rng: &mut R) -> Result<Self> {
        let mut pixmap = Pixmap::new(config.width, config.height).ok_or(PixelCubeError::Canvas {
            width: config.width,
            height: config.height,
        })?;

        let fill = match config.background {
            Background::Transparent => None,
            Background::Palette => {
                let base = color::random_palette_color(rng);
                Some(color::darken(base, PALETTE_BACKGROUND_FACTOR))
            }
            Background::Color(c) => Some(c),
        };
        if let Some(c) = fill {
            pixmap.fill(tiny_skia::Color::from_rgba8(c.red, c.green, c.blue, 255));
        }

        Ok(Self { pixmap })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Fills the polygon through the given vertices.
    pub fn fill_polygon(&mut self, points: &[Point], color: Rgba<u8>) {
        if let Some(path) = polygon_path(points) {
            self.pixmap.fill_path(
                &path,
                &solid_paint(color),
                FillRule::Winding,
                Transform::identity(),
                None,
            );
        }
    }

    /// Strokes the closed polygon with a 1px line.
    pub fn outline_polygon(&mut self, points: &[Point], color: Rgba<u8>) {
        let Some(path) = polygon_path(points) else {
            return;
        };
        // bevel joins keep the stroke inside the polygon's pixel bounds
        let stroke = Stroke {
            width: 1.0,
            line_join: LineJoin::Bevel,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &solid_paint(color), &stroke, Transform::identity(), None);
    }

    /// Fills the rectangle spanning both corner pixels, edges inclusive.
    pub fn fill_rect(&mut self, top_left: Point, bottom_right: Point, color: Rgba<u8>) {
        let (x0, x1) = (top_left.x.min(bottom_right.x), top_left.x.max(bottom_right.x));
        let (y0, y1) = (top_left.y.min(bottom_right.y), top_left.y.max(bottom_right.y));
        if let Some(rect) = Rect::from_ltrb(x0 as f32, y0 as f32, (x1 + 1) as f32, (y1 + 1) as f32) {
            self.pixmap
                .fill_rect(rect, &solid_paint(color), Transform::identity(), None);
        }
    }

    /// Copies the pixels out as straight (non-premultiplied) RGBA.
    pub fn to_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width(), self.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }
}

fn solid_paint(color: Rgba<u8>) -> Paint<'static> {
    let [r, g, b, a] = color.0;
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = false;
    paint
}

/// Closed path through the centres of the given pixels.
fn polygon_path(points: &[Point]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let centre = |p: &Point| (p.x as f32 + 0.5, p.y as f32 + 0.5);

    let mut builder = PathBuilder::new();
    let (x, y) = centre(first);
    builder.move_to(x, y);
    for p in rest {
        let (x, y) = centre(p);
        builder.line_to(x, y);
    }
    builder.close();
    builder.finish()
}

// ============================================================================
// Tests
// ============================================================================
