//! Error types for cube generation.

use thiserror::Error;

/// Errors that can escape a generation call.
///
/// Malformed sizes, patterns, formats and cube counts never show up here:
/// they are normalized to defaults while the request is resolved.
#[derive(Debug, Error)]
pub enum PixelCubeError {
    /// A color string was not exactly six hex digits (an optional leading `#` aside).
    #[error("invalid color format: {0:?}")]
    InvalidColorFormat(String),

    /// The drawing surface could not be allocated.
    #[error("cannot allocate a {width}x{height} canvas")]
    Canvas { width: u32, height: u32 },

    /// The raster could not be written in the requested format.
    #[error("failed to encode {format} image: {source}")]
    Encoding {
        format: &'static str,
        #[source]
        source: image::ImageError,
    },
}

pub type Result<T> = std::result::Result<T, PixelCubeError>;
