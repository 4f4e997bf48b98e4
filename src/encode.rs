//! Raster encoding and data-URL helpers.

use std::fmt;
use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, RgbaImage};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{PixelCubeError, Result};

/// `Cache-Control` value for served cube images. Short-lived because every
/// request renders a fresh random image.
pub const CACHE_CONTROL: &str = "public, max-age=1800";

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "jsonschema", schemars(rename_all = "UPPERCASE"))]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [Self::Png, Self::Jpeg, Self::Webp];

    /// Looks a format up by name, ignoring case. `JPG` is accepted for JPEG.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "PNG" => Some(Self::Png),
            "JPEG" | "JPG" => Some(Self::Jpeg),
            "WEBP" => Some(Self::Webp),
            _ => None,
        }
    }

    /// Like [`from_name`](Self::from_name) but unknown names become PNG.
    pub fn parse_lenient(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            tracing::debug!(format = name, "unknown output format, using PNG");
            Self::Png
        })
    }

    /// Canonical uppercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Jpeg => "JPEG",
            Self::Webp => "WEBP",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
            Self::Webp => image::ImageFormat::WebP,
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for OutputFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for OutputFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse_lenient(&name))
    }
}

// ============================================================================
// Encoding
// ============================================================================

/// Encodes an image into `format`.
///
/// PNG and WEBP (lossless) keep the alpha channel. JPEG has none, so the
/// image is flattened to RGB first and transparent pixels come out black.
pub fn encode(image: &RgbaImage, format: OutputFormat) -> Result<Vec<u8>> {
    let dynamic = match format {
        OutputFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(image.clone()).to_rgb8()),
        OutputFormat::Png | OutputFormat::Webp => DynamicImage::ImageRgba8(image.clone()),
    };

    let mut buffer = Cursor::new(Vec::new());
    dynamic
        .write_to(&mut buffer, format.image_format())
        .map_err(|source| PixelCubeError::Encoding {
            format: format.name(),
            source,
        })?;
    Ok(buffer.into_inner())
}

/// Wraps encoded bytes as `data:<mime>;base64,<payload>`.
pub fn to_data_url(bytes: &[u8], format: OutputFormat) -> String {
    format!("data:{};base64,{}", format.mime_type(), STANDARD.encode(bytes))
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Builds an `<img>` element for a data URL.
///
/// Empty `css_class` or `alt` are omitted. Extra attribute names have
/// underscores turned into hyphens (`data_id` becomes `data-id`).
pub fn img_tag(data_url: &str, css_class: &str, alt: &str, extra: &[(&str, &str)]) -> String {
    let mut tag = format!("<img src=\"{}\"", escape_attr(data_url));
    if !css_class.is_empty() {
        tag.push_str(&format!(" class=\"{}\"", escape_attr(css_class)));
    }
    if !alt.is_empty() {
        tag.push_str(&format!(" alt=\"{}\"", escape_attr(alt)));
    }
    for (name, value) in extra {
        tag.push_str(&format!(" {}=\"{}\"", name.replace('_', "-"), escape_attr(value)));
    }
    tag.push('>');
    tag
}

// ============================================================================
// Tests
// ============================================================================
