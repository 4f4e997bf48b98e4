//! pixelcube: procedural isometric pixel-art cube images
//!
//! This crate synthesizes small "block" images made of isometric cubes from
//! a handful of parameters: canvas size, base color, coloring pattern, cube
//! count and background. Each call scatters cubes over the canvas, paints
//! them back to front with shaded, outlined and speckled faces, and encodes
//! the result as PNG, JPEG or WEBP.
//!
//! # Example
//!
//! ```
//! use pixelcube::{CubeGenerator, GenerationRequest, PatternMode, SizeTier};
//!
//! let request = GenerationRequest::new()
//!     .with_size(SizeTier::S)
//!     .with_color("#FF0000")
//!     .with_pattern(PatternMode::Gradient)
//!     .with_cube_count(3)
//!     .with_background("palette");
//!
//! let mut generator = CubeGenerator::new();
//! let image = generator.generate(&request).unwrap();
//! assert_eq!((image.width(), image.height()), (32, 32));
//! assert_eq!(image.cubes.len(), 3);
//!
//! let data_url = image.to_data_url().unwrap();
//! assert!(data_url.starts_with("data:image/png;base64,"));
//! ```
//!
//! # Leniency
//!
//! Unknown size tiers, patterns, formats and backgrounds, and out-of-range
//! cube counts, are replaced with defaults instead of failing. Only a
//! malformed hex color is an error:
//!
//! ```
//! use pixelcube::{GenerationRequest, PixelCubeError};
//!
//! let err = pixelcube::generate(&GenerationRequest::new().with_color("not-a-color")).unwrap_err();
//! assert!(matches!(err, PixelCubeError::InvalidColorFormat(_)));
//! ```

mod canvas;
mod color;
mod encode;
mod error;
mod face;
mod generator;
mod geometry;
mod placement;
mod request;

pub use canvas::{Background, Canvas, CanvasConfig, MAX_DIMENSION};
pub use color::{
    Color, GAMING_PALETTE, darken, hex_to_rgb, jitter, lighten, random_palette_color,
    related_colors, rgb_to_hex, vary,
};
pub use encode::{CACHE_CONTROL, OutputFormat, encode, img_tag, to_data_url};
pub use error::{PixelCubeError, Result};
pub use face::{paint, texture_pixel_size};
pub use generator::{
    CubeGenerator, PixelCubeImage, ShowcaseEntry, base_cube_size, cube_color, face_colors, generate,
    generate_data_url,
};
pub use geometry::{BoundingBox, CubeFaces, FacePolygon, FaceRole, Point, faces_for_cube};
pub use placement::{CubeSpec, plan};
pub use request::{
    CanvasSize, GenerationRequest, MAX_CUBES, MIN_CUBES, PatternMode, ResolvedRequest, SizeTier,
};
