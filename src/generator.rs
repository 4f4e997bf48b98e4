//! Composition pipeline: request in, painted raster out.

use image::RgbaImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::canvas::{Canvas, CanvasConfig};
use crate::color::{self, Color};
use crate::encode::{self, OutputFormat};
use crate::error::Result;
use crate::face;
use crate::geometry;
use crate::placement::{self, CubeSpec};
use crate::request::{GenerationRequest, PatternMode, ResolvedRequest, SizeTier};

/// Top-face lightening for the gradient pattern.
pub const GRADIENT_LIGHTEN: f64 = 1.4;

/// Right-face darkening for the gradient pattern.
pub const GRADIENT_DARKEN: f64 = 0.6;

/// Base color used by the pattern part of [`CubeGenerator::showcase`].
pub const SHOWCASE_COLOR: &str = "#FF6B35";

/// Edge length every cube is derived from.
///
/// One cube gets a third of the shorter canvas edge; with more cubes the
/// divisor grows with `floor(sqrt(count))` so denser images use smaller
/// cubes. Never below 1.
pub fn base_cube_size(canvas: &CanvasConfig, cube_count: u32) -> i32 {
    let min_dim = canvas.min_dimension();
    let size = if cube_count <= 1 {
        min_dim / 3
    } else {
        min_dim / (2 + (cube_count as f64).sqrt() as u32)
    };
    size.max(1) as i32
}

/// Face colors `[top, left, right]` for one cube, before shading.
pub fn face_colors<R: Rng + ?Sized>(pattern: PatternMode, base: Color, rng: &mut R) -> [Color; 3] {
    match pattern {
        PatternMode::Solid => [base; 3],
        PatternMode::Gradient => [
            color::lighten(base, GRADIENT_LIGHTEN),
            base,
            color::darken(base, GRADIENT_DARKEN),
        ],
        PatternMode::Mixed => color::related_colors(base, rng),
    }
}

/// Base color for the cube at `index` (in paint order).
///
/// Without a base color every cube draws its own palette color. With one,
/// a lone cube uses it as-is and several cubes each get [`color::vary`]
/// so they stay distinguishable.
pub fn cube_color<R: Rng + ?Sized>(
    base: Option<Color>,
    cube_count: u32,
    index: usize,
    rng: &mut R,
) -> Color {
    match base {
        None => color::random_palette_color(rng),
        Some(base) if cube_count > 1 => color::vary(base, index),
        Some(base) => base,
    }
}

/// A generated image together with the plan it was drawn from.
#[derive(Debug, Clone)]
pub struct PixelCubeImage {
    pub image: RgbaImage,
    /// Cubes in paint order.
    pub cubes: Vec<CubeSpec>,
    pub base_cube_size: i32,
    pub pattern: PatternMode,
    pub format: OutputFormat,
}

impl PixelCubeImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Encodes the image in the requested format.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode::encode(&self.image, self.format)
    }

    /// Encodes the image and wraps it as a `data:` URL.
    pub fn to_data_url(&self) -> Result<String> {
        Ok(encode::to_data_url(&self.encode()?, self.format))
    }
}

/// One labeled sample from [`CubeGenerator::showcase`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowcaseEntry {
    pub title: String,
    pub data_url: String,
}

/// Generates cube images from requests.
///
/// Owns its random source so calls never share state. Seed it through
/// [`with_rng`](Self::with_rng) for reproducible output:
///
/// ```
/// use pixelcube::{CubeGenerator, GenerationRequest, SizeTier};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let request = GenerationRequest::new().with_size(SizeTier::S).with_cube_count(3);
/// let a = CubeGenerator::with_rng(StdRng::seed_from_u64(7)).generate(&request).unwrap();
/// let b = CubeGenerator::with_rng(StdRng::seed_from_u64(7)).generate(&request).unwrap();
/// assert_eq!(a.image, b.image);
/// ```
pub struct CubeGenerator<R = StdRng> {
    rng: R,
}

impl CubeGenerator<StdRng> {
    /// A generator seeded from operating-system entropy.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl Default for CubeGenerator<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> CubeGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Resolves and renders a request.
    ///
    /// Fails only on a malformed color, before anything is allocated.
    pub fn generate(&mut self, request: &GenerationRequest) -> Result<PixelCubeImage> {
        let resolved = request.resolve(&mut self.rng)?;
        self.render(&resolved)
    }

    /// Renders an already resolved request.
    pub fn render(&mut self, resolved: &ResolvedRequest) -> Result<PixelCubeImage> {
        let canvas_config = resolved.canvas;
        let base_size = base_cube_size(&canvas_config, resolved.cube_count);
        let pixel_size = face::texture_pixel_size(base_size);

        tracing::debug!(
            width = canvas_config.width,
            height = canvas_config.height,
            cubes = resolved.cube_count,
            base_size,
            pattern = resolved.pattern.name(),
            "rendering pixel cubes"
        );

        let mut canvas = Canvas::new(&canvas_config, &mut self.rng)?;
        let cubes = placement::plan(resolved.cube_count, &canvas_config, base_size, &mut self.rng);

        for (index, cube) in cubes.iter().enumerate() {
            let base = cube_color(resolved.base_color, resolved.cube_count, index, &mut self.rng);
            let [top_color, left_color, right_color] =
                face_colors(resolved.pattern, base, &mut self.rng);
            let faces = geometry::faces_for_cube(cube.center, cube.size, cube.depth_offset);

            face::paint(&mut canvas, &faces.left, left_color, pixel_size, &mut self.rng);
            face::paint(&mut canvas, &faces.right, right_color, pixel_size, &mut self.rng);
            face::paint(&mut canvas, &faces.top, top_color, pixel_size, &mut self.rng);
        }

        Ok(PixelCubeImage {
            image: canvas.to_image(),
            cubes,
            base_cube_size: base_size,
            pattern: resolved.pattern,
            format: resolved.format,
        })
    }

    /// Renders and encodes a request in its requested format.
    pub fn generate_bytes(&mut self, request: &GenerationRequest) -> Result<Vec<u8>> {
        self.generate(request)?.encode()
    }

    /// Renders a request and returns it as a `data:` URL.
    pub fn generate_data_url(&mut self, request: &GenerationRequest) -> Result<String> {
        self.generate(request)?.to_data_url()
    }

    /// Renders a request as an `<img>` element with an embedded PNG.
    ///
    /// The request's format is ignored; markup always embeds PNG.
    pub fn generate_img_tag(
        &mut self,
        request: &GenerationRequest,
        css_class: &str,
        alt: &str,
        extra_attributes: &[(&str, &str)],
    ) -> Result<String> {
        let request = request.clone().with_format(OutputFormat::Png);
        let data_url = self.generate_data_url(&request)?;
        Ok(encode::img_tag(&data_url, css_class, alt, extra_attributes))
    }

    /// Sample gallery: one image per size tier, one per pattern in
    /// [`SHOWCASE_COLOR`] at size `l`, and six random palette colors.
    pub fn showcase(&mut self) -> Result<Vec<ShowcaseEntry>> {
        let mut entries = Vec::new();

        for tier in SizeTier::ALL {
            let (w, h) = tier.dimensions();
            let data_url = self.generate_data_url(&GenerationRequest::new().with_size(tier))?;
            entries.push(ShowcaseEntry {
                title: format!("Size: {} ({w}x{h})", tier.name().to_uppercase()),
                data_url,
            });
        }

        for pattern in PatternMode::ALL {
            let request = GenerationRequest::new()
                .with_size(SizeTier::L)
                .with_pattern(pattern)
                .with_color(SHOWCASE_COLOR);
            let name = pattern.name();
            let mut title = String::from("Pattern: ");
            title.push_str(&name[..1].to_uppercase());
            title.push_str(&name[1..]);
            entries.push(ShowcaseEntry {
                title,
                data_url: self.generate_data_url(&request)?,
            });
        }

        for _ in 0..6 {
            let hex = color::rgb_to_hex(color::random_palette_color(&mut self.rng));
            let request = GenerationRequest::new().with_size(SizeTier::L).with_color(hex.as_str());
            entries.push(ShowcaseEntry {
                title: format!("Color: {hex}"),
                data_url: self.generate_data_url(&request)?,
            });
        }

        Ok(entries)
    }
}

/// Generates an image with a freshly seeded generator.
pub fn generate(request: &GenerationRequest) -> Result<PixelCubeImage> {
    CubeGenerator::new().generate(request)
}

/// Generates an image and returns it as a `data:` URL.
pub fn generate_data_url(request: &GenerationRequest) -> Result<String> {
    CubeGenerator::new().generate_data_url(request)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::Background;
    use palette::Srgb;

    fn seeded(seed: u64) -> CubeGenerator<StdRng> {
        CubeGenerator::with_rng(StdRng::seed_from_u64(seed))
    }

    fn canvas(width: u32, height: u32) -> CanvasConfig {
        CanvasConfig::new(width, height, Background::Transparent)
    }

    #[test]
    fn base_size_shrinks_with_count() {
        assert_eq!(base_cube_size(&canvas(64, 64), 1), 21);
        assert_eq!(base_cube_size(&canvas(64, 64), 2), 21); // 64 / (2 + 1)
        assert_eq!(base_cube_size(&canvas(64, 64), 4), 16); // 64 / (2 + 2)
        assert_eq!(base_cube_size(&canvas(64, 64), 9), 12); // 64 / (2 + 3)
        assert_eq!(base_cube_size(&canvas(64, 64), 20), 10); // 64 / (2 + 4)
        assert_eq!(base_cube_size(&canvas(128, 32), 1), 10);
        assert_eq!(base_cube_size(&canvas(2, 2), 20), 1);
    }

    #[test]
    fn solid_and_gradient_face_colors() {
        let mut rng = StdRng::seed_from_u64(0);
        let base = Srgb::new(100, 100, 100);
        assert_eq!(face_colors(PatternMode::Solid, base, &mut rng), [base; 3]);
        assert_eq!(
            face_colors(PatternMode::Gradient, base, &mut rng),
            [Srgb::new(140, 140, 140), base, Srgb::new(60, 60, 60)]
        );
    }

    #[test]
    fn mixed_face_colors_stay_near_base() {
        let mut rng = StdRng::seed_from_u64(0);
        let base = Srgb::new(100, 100, 100);
        for c in face_colors(PatternMode::Mixed, base, &mut rng) {
            for channel in [c.red, c.green, c.blue] {
                assert!((70..=130).contains(&channel));
            }
        }
    }

    #[test]
    fn lone_cube_keeps_base_color() {
        let mut rng = StdRng::seed_from_u64(0);
        let base = Srgb::new(200, 100, 50);
        assert_eq!(cube_color(Some(base), 1, 0, &mut rng), base);
    }

    #[test]
    fn several_cubes_vary_the_base_color() {
        let mut rng = StdRng::seed_from_u64(0);
        let base = Srgb::new(200, 100, 50);
        assert_eq!(cube_color(Some(base), 3, 0, &mut rng), base);
        // index 1 scales by (1.2, 0.8, 0.9)
        assert_eq!(cube_color(Some(base), 3, 1, &mut rng), Srgb::new(240, 80, 45));
        for index in 0..12 {
            assert_eq!(cube_color(Some(base), 12, index, &mut rng), color::vary(base, index));
        }
    }

    #[test]
    fn missing_base_color_draws_from_palette() {
        let mut rng = StdRng::seed_from_u64(3);
        let palette: Vec<Color> = color::GAMING_PALETTE
            .iter()
            .map(|hex| color::hex_to_rgb(hex).unwrap())
            .collect();
        let picks: Vec<Color> = (0..40).map(|i| cube_color(None, 40, i, &mut rng)).collect();
        assert!(picks.iter().all(|c| palette.contains(c)));
        // independent draws, not one color repeated
        assert!(picks.iter().any(|c| *c != picks[0]));
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let request = GenerationRequest::new().with_size(SizeTier::M).with_cube_count(5);
        let a = seeded(99).generate(&request).unwrap();
        let b = seeded(99).generate(&request).unwrap();
        assert_eq!(a.image, b.image);
        assert_eq!(a.cubes, b.cubes);
    }

    #[test]
    fn render_reports_plan() {
        let request = GenerationRequest::new().with_size((100, 60)).with_cube_count(4);
        let out = seeded(1).generate(&request).unwrap();
        assert_eq!((out.width(), out.height()), (100, 60));
        assert_eq!(out.cubes.len(), 4);
        assert_eq!(out.base_cube_size, 15); // 60 / (2 + 2)
    }

    #[test]
    fn img_tag_embeds_png() {
        let request = GenerationRequest::new()
            .with_size(SizeTier::Xs)
            .with_format(OutputFormat::Jpeg);
        let tag = seeded(4)
            .generate_img_tag(&request, "test-class", "Pixel Cube", &[])
            .unwrap();
        assert!(tag.starts_with("<img src=\"data:image/png;base64,"));
        assert!(tag.contains("class=\"test-class\""));
        assert!(tag.contains("alt=\"Pixel Cube\""));
    }

    #[test]
    fn showcase_has_all_sections() {
        let entries = seeded(8).showcase().unwrap();
        assert_eq!(entries.len(), 5 + 3 + 6);
        assert_eq!(entries[0].title, "Size: XS (16x16)");
        assert_eq!(entries[4].title, "Size: XL (256x256)");
        assert_eq!(entries[5].title, "Pattern: Solid");
        assert!(entries[8].title.starts_with("Color: #"));
        assert!(entries.iter().all(|e| e.data_url.starts_with("data:image/png;base64,")));
    }
}
