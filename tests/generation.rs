use image::Rgba;
use pixelcube::{
    CubeGenerator, GenerationRequest, OutputFormat, PatternMode, PixelCubeError, SizeTier,
};
use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

const OUTLINE: Rgba<u8> = Rgba([0, 0, 0, 255]);

fn seeded(seed: u64) -> CubeGenerator<StdRng> {
    CubeGenerator::with_rng(StdRng::seed_from_u64(seed))
}

/// True for outline pixels and for shades of pure red (with speckle noise).
fn is_red_shade(pixel: &Rgba<u8>) -> bool {
    let [r, g, b, a] = pixel.0;
    *pixel == OUTLINE || (a == 255 && r >= 184 && g <= 20 && b <= 20)
}

#[test]
fn single_red_solid_cube_on_small_transparent_canvas() {
    let request = GenerationRequest::new()
        .with_size(SizeTier::S)
        .with_color("#FF0000")
        .with_pattern(PatternMode::Solid)
        .with_cube_count(1)
        .with_background("transparent");

    for seed in 0..20 {
        let out = seeded(seed).generate(&request).unwrap();
        assert_eq!((out.width(), out.height()), (32, 32));
        assert_eq!(out.cubes.len(), 1);

        assert_eq!(out.image.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(out.image.get_pixel(31, 31).0, [0, 0, 0, 0]);

        let painted: Vec<_> = out.image.pixels().filter(|p| p[3] != 0).collect();
        assert!(!painted.is_empty());
        assert!(
            painted.iter().all(|p| is_red_shade(p)),
            "seed {seed}: a face left the red family"
        );
    }
}

#[test]
fn large_red_cube_shows_unchanged_and_darker_faces() {
    let request = GenerationRequest::new()
        .with_size(SizeTier::Xl)
        .with_color("#FF0000")
        .with_pattern(PatternMode::Solid)
        .with_cube_count(1);
    let out = seeded(3).generate(&request).unwrap();

    let has = |color: [u8; 4]| out.image.pixels().any(|p| p.0 == color);
    // top (lightened, saturates) and left (unchanged) are both pure red
    assert!(has([255, 0, 0, 255]));
    // right face darkened to 80%
    assert!(has([204, 0, 0, 255]));
    assert!(has(OUTLINE.0));
}

#[test]
fn cube_count_above_limit_is_clamped() {
    let request = GenerationRequest::new().with_size(SizeTier::M).with_cube_count(25);
    let out = seeded(1).generate(&request).unwrap();
    assert_eq!(out.cubes.len(), 20);
}

#[test]
fn malformed_color_is_rejected() {
    let request = GenerationRequest::new().with_color("not-a-color");
    let err = seeded(0).generate(&request).unwrap_err();
    assert!(matches!(err, PixelCubeError::InvalidColorFormat(ref s) if s == "not-a-color"));
}

#[test]
fn unknown_pattern_falls_back_to_a_valid_one() {
    let request = GenerationRequest::new().with_pattern_name("unknown");
    let mut generator = seeded(12);
    let mut seen = std::collections::HashSet::new();
    for _ in 0..60 {
        let out = generator.generate(&request).unwrap();
        seen.insert(out.pattern);
    }
    assert_eq!(seen.len(), PatternMode::ALL.len());
}

#[test]
fn unknown_everything_still_renders() {
    let request = GenerationRequest::from_query_pairs([
        ("size", "gigantic"),
        ("pattern", "plaid"),
        ("format", "tiff"),
        ("cubes", "-3"),
    ]);
    let out = seeded(2).generate(&request).unwrap();
    assert_eq!((out.width(), out.height()), (64, 64));
    assert_eq!(out.cubes.len(), 1);
    assert_eq!(out.format, OutputFormat::Png);
}

#[test]
fn every_tier_has_its_dimensions() {
    let mut generator = seeded(5);
    for tier in SizeTier::ALL {
        let out = generator.generate(&GenerationRequest::new().with_size(tier)).unwrap();
        assert_eq!((out.width(), out.height()), tier.dimensions(), "{}", tier.name());
    }
}

#[test]
fn png_round_trip_keeps_dimensions() {
    let mut generator = seeded(6);
    for tier in SizeTier::ALL {
        let bytes = generator
            .generate_bytes(&GenerationRequest::new().with_size(tier))
            .unwrap();
        let decoded = image::load_from_memory_with_format(&bytes, image::ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), tier.dimensions());
    }
}

#[test]
fn every_format_encodes() {
    let mut generator = seeded(7);
    for format in OutputFormat::ALL {
        let request = GenerationRequest::new()
            .with_size(SizeTier::S)
            .with_format(format)
            .with_background("palette");
        let url = generator.generate_data_url(&request).unwrap();
        assert!(url.starts_with(&format!("data:{};base64,", format.mime_type())));
    }
}

#[test]
fn explicit_background_fills_corners() {
    let request = GenerationRequest::new()
        .with_size((48, 20))
        .with_background("#203040")
        .with_cube_count(1);
    let out = seeded(8).generate(&request).unwrap();
    assert_eq!((out.width(), out.height()), (48, 20));
    assert_eq!(out.image.get_pixel(0, 0).0, [0x20, 0x30, 0x40, 255]);
}

#[test]
fn json_request_drives_generation() {
    let request = GenerationRequest::from_json(
        r##"{"size":"l","color":"#4ECDC4","pattern":"mixed","cubeCount":3,"background":"palette"}"##,
    )
    .unwrap();
    let out = seeded(9).generate(&request).unwrap();
    assert_eq!((out.width(), out.height()), (128, 128));
    assert_eq!(out.cubes.len(), 3);
    assert_eq!(out.pattern, PatternMode::Mixed);
    // palette background is opaque
    assert_eq!(out.image.get_pixel(0, 0)[3], 255);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn plan_is_complete_bounded_and_back_to_front(count in 1i64..=20, tier_index in 0usize..5, seed: u64) {
        let tier = SizeTier::ALL[tier_index];
        let (width, height) = tier.dimensions();
        let request = GenerationRequest::new().with_size(tier).with_cube_count(count);
        let out = seeded(seed).generate(&request).unwrap();

        prop_assert_eq!(out.cubes.len(), count as usize);
        let margin = out.base_cube_size;
        for cube in &out.cubes {
            prop_assert!(cube.center.x >= margin && cube.center.x <= width as i32 - margin);
            prop_assert!(cube.center.y >= margin && cube.center.y <= height as i32 - margin);
        }
        prop_assert!(out.cubes.windows(2).all(|w| w[0].center.y <= w[1].center.y));
    }
}
