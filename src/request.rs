//! The external generation contract and its normalization.
//!
//! A [`GenerationRequest`] carries parameters the way callers supply them:
//! a size tier name or explicit dimensions, optional hex strings, loose
//! cube-count bounds. [`GenerationRequest::resolve`] turns it into a
//! [`ResolvedRequest`], substituting defaults for anything out of range or
//! unrecognized. The only hard failure is a malformed color.
//!
//! # Example
//!
//! ```
//! use pixelcube::{GenerationRequest, PatternMode, SizeTier};
//!
//! let request = GenerationRequest::new()
//!     .with_size(SizeTier::S)
//!     .with_color("#FF0000")
//!     .with_pattern(PatternMode::Solid)
//!     .with_cube_count(1);
//!
//! let json = request.to_json().unwrap();
//! let restored = GenerationRequest::from_json(&json).unwrap();
//! assert_eq!(restored.cube_count, Some(1));
//! ```

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::de::value::{self, StrDeserializer};
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Deserializer, Serialize};

use crate::canvas::{Background, CanvasConfig};
use crate::color::{self, Color};
use crate::encode::OutputFormat;
use crate::error::Result;

/// Hard bounds on the number of cubes per image.
pub const MIN_CUBES: i64 = 1;
pub const MAX_CUBES: i64 = 20;

/// Random cube-count range used when no explicit count is given.
pub const DEFAULT_MIN_CUBES: i64 = 1;
pub const DEFAULT_MAX_CUBES: i64 = 10;

/// Case-insensitive lookup through an enum's lowercase serde names.
fn by_serde_name<T: DeserializeOwned>(name: &str) -> Option<T> {
    let name = name.trim().to_ascii_lowercase();
    let deserializer: StrDeserializer<'_, value::Error> = name.as_str().into_deserializer();
    T::deserialize(deserializer).ok()
}

// ============================================================================
// Size tiers
// ============================================================================

/// Named square canvas sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum SizeTier {
    Xs,
    S,
    #[default]
    M,
    L,
    Xl,
}

impl SizeTier {
    pub const ALL: [SizeTier; 5] = [Self::Xs, Self::S, Self::M, Self::L, Self::Xl];

    pub fn from_name(name: &str) -> Option<Self> {
        by_serde_name(name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Xs => "xs",
            Self::S => "s",
            Self::M => "m",
            Self::L => "l",
            Self::Xl => "xl",
        }
    }

    /// Pixel dimensions `(width, height)`.
    pub fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Xs => (16, 16),
            Self::S => (32, 32),
            Self::M => (64, 64),
            Self::L => (128, 128),
            Self::Xl => (256, 256),
        }
    }
}

/// Canvas size as requested: a tier name or explicit dimensions.
///
/// Serializes as either `"m"` or `{ "width": 40, "height": 24 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum CanvasSize {
    Named(String),
    Explicit { width: u32, height: u32 },
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self::Named(SizeTier::default().name().to_string())
    }
}

impl From<SizeTier> for CanvasSize {
    fn from(tier: SizeTier) -> Self {
        Self::Named(tier.name().to_string())
    }
}

impl From<(u32, u32)> for CanvasSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::Explicit { width, height }
    }
}

impl CanvasSize {
    /// Pixel dimensions. Unknown tier names fall back to [`SizeTier::M`].
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Named(name) => SizeTier::from_name(name)
                .unwrap_or_else(|| {
                    tracing::debug!(size = %name, "unknown size tier, using m");
                    SizeTier::M
                })
                .dimensions(),
            Self::Explicit { width, height } => (*width, *height),
        }
    }
}

// ============================================================================
// Pattern mode
// ============================================================================

/// How a cube's three faces are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum PatternMode {
    /// One color on all faces; only the renderer's shading differs.
    Solid,
    /// Lighter top, base left, darker right.
    Gradient,
    /// Three independently jittered colors.
    Mixed,
}

impl PatternMode {
    pub const ALL: [PatternMode; 3] = [Self::Solid, Self::Gradient, Self::Mixed];

    /// Looks a pattern up by name. `"random"` and unknown names give `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        by_serde_name(name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Gradient => "gradient",
            Self::Mixed => "mixed",
        }
    }

    /// Uniform pick among the three patterns.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&Self::Solid)
    }
}

fn lenient_pattern<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<PatternMode>, D::Error> {
    let name = Option::<String>::deserialize(deserializer)?;
    Ok(name.as_deref().and_then(pattern_or_random))
}

/// Pattern by name, `None` (random) for `"random"` and unknown names.
fn pattern_or_random(name: &str) -> Option<PatternMode> {
    let pattern = PatternMode::from_name(name);
    if pattern.is_none() && !name.trim().eq_ignore_ascii_case("random") {
        tracing::debug!(pattern = name, "unknown pattern, picking one at random");
    }
    pattern
}

// ============================================================================
// GenerationRequest
// ============================================================================

fn default_min_cubes() -> i64 {
    DEFAULT_MIN_CUBES
}

fn default_max_cubes() -> i64 {
    DEFAULT_MAX_CUBES
}

fn default_background() -> String {
    "transparent".to_string()
}

/// Everything a caller can ask of the generator.
///
/// # JSON Format
///
/// ```json
/// {
///   "size": "l",
///   "color": "#00FF00",
///   "pattern": "gradient",
///   "format": "PNG",
///   "cubeCount": 3,
///   "minCubes": 1,
///   "maxCubes": 10,
///   "background": "palette"
/// }
/// ```
///
/// Every field is optional. `pattern` values other than `solid`, `gradient`
/// and `mixed` (including `random`) mean "pick one at random", and unknown
/// formats mean PNG.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GenerationRequest {
    #[serde(default)]
    pub size: CanvasSize,

    /// Base color as `#RRGGBB`. `None` draws each cube from the palette.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// `None` picks a pattern at random.
    #[serde(
        default,
        deserialize_with = "lenient_pattern",
        skip_serializing_if = "Option::is_none"
    )]
    #[cfg_attr(feature = "jsonschema", schemars(with = "Option<PatternMode>"))]
    pub pattern: Option<PatternMode>,

    #[serde(default)]
    pub format: OutputFormat,

    /// Exact cube count, clamped to `1..=20`. `None` draws from
    /// `min_cubes..=max_cubes`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cube_count: Option<i64>,

    #[serde(default = "default_min_cubes")]
    pub min_cubes: i64,

    #[serde(default = "default_max_cubes")]
    pub max_cubes: i64,

    /// `"transparent"`, `"palette"` or a `#RRGGBB` color.
    #[serde(default = "default_background")]
    pub background: String,
}

impl Default for GenerationRequest {
    fn default() -> Self {
        Self {
            size: CanvasSize::default(),
            color: None,
            pattern: None,
            format: OutputFormat::Png,
            cube_count: None,
            min_cubes: DEFAULT_MIN_CUBES,
            max_cubes: DEFAULT_MAX_CUBES,
            background: default_background(),
        }
    }
}

impl GenerationRequest {
    /// A request with every parameter at its default.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, size: impl Into<CanvasSize>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_pattern(mut self, pattern: PatternMode) -> Self {
        self.pattern = Some(pattern);
        self
    }

    /// Sets the pattern from a name; `"random"` or unknown names clear it.
    pub fn with_pattern_name(mut self, name: &str) -> Self {
        self.pattern = pattern_or_random(name);
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_cube_count(mut self, count: i64) -> Self {
        self.cube_count = Some(count);
        self
    }

    pub fn with_cube_range(mut self, min_cubes: i64, max_cubes: i64) -> Self {
        self.min_cubes = min_cubes;
        self.max_cubes = max_cubes;
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = background.into();
        self
    }

    /// Builds a request from HTTP-style query parameters.
    ///
    /// Recognized keys are `size`, `color`, `pattern`, `format`, `cubes`,
    /// `min_cubes`, `max_cubes` and `background`; others are ignored. Colors
    /// may omit the leading `#`. Values must already be percent-decoded.
    /// Unparsable numbers keep their defaults.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut request = Self::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "size" => request.size = CanvasSize::Named(value.to_string()),
                "color" if !value.is_empty() => request.color = Some(with_hash(value)),
                "pattern" => request.pattern = pattern_or_random(value),
                "format" => request.format = OutputFormat::parse_lenient(value),
                "cubes" => request.cube_count = value.trim().parse().ok(),
                "min_cubes" => {
                    if let Ok(n) = value.trim().parse() {
                        request.min_cubes = n;
                    }
                }
                "max_cubes" => {
                    if let Ok(n) = value.trim().parse() {
                        request.max_cubes = n;
                    }
                }
                "background" if !value.is_empty() => {
                    request.background = match value {
                        "transparent" | "palette" => value.to_string(),
                        hex => with_hash(hex),
                    };
                }
                _ => {}
            }
        }
        request
    }

    /// Serializes the request to a JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a request from a JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Normalizes every parameter.
    ///
    /// Colors are validated first, so a malformed color fails before any
    /// random draw or allocation happens.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ResolvedRequest> {
        let base_color = self.color.as_deref().map(color::hex_to_rgb).transpose()?;
        let background = Background::parse(&self.background)?;

        let (width, height) = self.size.dimensions();
        let canvas = CanvasConfig::new(width, height, background);

        let cube_count: i64 = match self.cube_count {
            Some(count) => count.clamp(MIN_CUBES, MAX_CUBES),
            None => {
                let (lo, hi) = cube_bounds(self.min_cubes, self.max_cubes);
                rng.random_range(lo..=hi)
            }
        };

        let pattern = match self.pattern {
            Some(pattern) => pattern,
            None => PatternMode::random(rng),
        };

        Ok(ResolvedRequest {
            canvas,
            cube_count: cube_count as u32,
            base_color,
            pattern,
            format: self.format,
        })
    }
}

fn with_hash(value: &str) -> String {
    if value.starts_with('#') {
        value.to_string()
    } else {
        format!("#{value}")
    }
}

/// Clamps both bounds into `MIN_CUBES..=MAX_CUBES` and orders them.
fn cube_bounds(min_cubes: i64, max_cubes: i64) -> (i64, i64) {
    let lo = min_cubes.clamp(MIN_CUBES, MAX_CUBES);
    let hi = max_cubes.clamp(MIN_CUBES, MAX_CUBES);
    (lo.min(hi), lo.max(hi))
}

/// A request with every parameter decided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedRequest {
    pub canvas: CanvasConfig,
    /// Always within `1..=20`.
    pub cube_count: u32,
    pub base_color: Option<Color>,
    pub pattern: PatternMode,
    pub format: OutputFormat,
}

// ============================================================================
// Tests
// ============================================================================
