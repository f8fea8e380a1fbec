use std::path::Path;
use std::str::FromStr;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::assets::color::Fill;
use crate::foundation::core::Axis;
use crate::foundation::error::{WireError, WireResult};

/// Axis along which images are glued together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Left to right; canvas height is the tallest image.
    #[default]
    Horizontal,
    /// Top to bottom; canvas width is the widest image.
    Vertical,
}

impl Direction {
    /// Axis that accumulates image extents.
    pub fn main_axis(self) -> Axis {
        match self {
            Self::Horizontal => Axis::Width,
            Self::Vertical => Axis::Height,
        }
    }

    /// Axis that takes the largest extent.
    pub fn cross_axis(self) -> Axis {
        match self {
            Self::Horizontal => Axis::Height,
            Self::Vertical => Axis::Width,
        }
    }
}

impl FromStr for Direction {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "h" | "row" => Ok(Self::Horizontal),
            "vertical" | "v" | "column" => Ok(Self::Vertical),
            other => Err(WireError::validation(format!(
                "unknown direction \"{other}\" (expected horizontal|vertical)"
            ))),
        }
    }
}

/// Output encoding, written as a MIME type in configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OutputFormat {
    /// `image/png` (lossless).
    #[default]
    Png,
    /// `image/jpeg` (lossy, no alpha).
    Jpeg,
    /// `image/webp` (lossy, keeps alpha).
    WebP,
}

impl OutputFormat {
    /// MIME type string.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Whether `quality` affects the output.
    pub fn is_lossy(self) -> bool {
        matches!(self, Self::Jpeg | Self::WebP)
    }

    /// Usual file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::WebP => "webp",
        }
    }

    /// Parse a MIME type (`image/png`, `image/jpeg`, `image/jpg`, `image/webp`) or bare name.
    pub fn from_mime(s: &str) -> WireResult<Self> {
        let t = s.trim().to_ascii_lowercase();
        let t = t.strip_prefix("image/").unwrap_or(&t);
        match t {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::WebP),
            _ => Err(WireError::encode(format!(
                "unsupported output type \"{s}\" (expected image/png, image/jpeg or image/webp)"
            ))),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_mime(s)
    }
}

impl TryFrom<String> for OutputFormat {
    type Error = WireError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_mime(&s)
    }
}

impl From<OutputFormat> for String {
    fn from(f: OutputFormat) -> Self {
        f.mime().to_owned()
    }
}

/// Default lossy quality.
pub const DEFAULT_QUALITY: f32 = 0.92;

/// Compositing options. Missing JSON fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    /// Pixels between consecutive images along the layout axis.
    pub gap: u32,
    /// Layout direction.
    pub direction: Direction,
    /// Output encoding.
    #[serde(rename = "type")]
    pub format: OutputFormat,
    /// Lossy quality in `[0, 1]`.
    pub quality: f32,
    /// Background fill. `None` leaves the background transparent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Fill>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            gap: 0,
            direction: Direction::Horizontal,
            format: OutputFormat::Png,
            quality: DEFAULT_QUALITY,
            color: None,
        }
    }
}

impl Options {
    /// Parse options JSON; missing fields take defaults.
    pub fn from_json_str(s: &str) -> WireResult<Self> {
        serde_json::from_str(s).map_err(|e| WireError::serde(e.to_string()))
    }

    /// Read and parse an options JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> WireResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read options '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Set `gap`.
    pub fn with_gap(mut self, gap: u32) -> Self {
        self.gap = gap;
        self
    }

    /// Set `direction`.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set `quality`.
    pub fn with_quality(mut self, quality: f32) -> Self {
        self.quality = quality;
        self
    }

    /// Set the background fill.
    pub fn with_color(mut self, color: Fill) -> Self {
        self.color = Some(color);
        self
    }

    /// Check `quality` is a finite number in `[0, 1]`.
    pub fn validate(&self) -> WireResult<()> {
        if !self.quality.is_finite() || !(0.0..=1.0).contains(&self.quality) {
            return Err(WireError::encode(format!(
                "quality must be within [0, 1], got {}",
                self.quality
            )));
        }
        Ok(())
    }
}

/// Partially specified options. Present fields override, absent ones fall back.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialOptions {
    /// See [`Options::gap`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<u32>,
    /// See [`Options::direction`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// See [`Options::format`].
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub format: Option<OutputFormat>,
    /// See [`Options::quality`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<f32>,
    /// See [`Options::color`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Fill>,
}

impl PartialOptions {
    /// Shallow override: every field set here replaces the one in `base`.
    pub fn merge_onto(self, base: Options) -> Options {
        Options {
            gap: self.gap.unwrap_or(base.gap),
            direction: self.direction.unwrap_or(base.direction),
            format: self.format.unwrap_or(base.format),
            quality: self.quality.unwrap_or(base.quality),
            color: self.color.or(base.color),
        }
    }

    /// Layer `over` on top of `self`; fields set in `over` win.
    pub fn overlay(self, over: PartialOptions) -> PartialOptions {
        PartialOptions {
            gap: over.gap.or(self.gap),
            direction: over.direction.or(self.direction),
            format: over.format.or(self.format),
            quality: over.quality.or(self.quality),
            color: over.color.or(self.color),
        }
    }

    /// Parse partial options JSON.
    pub fn from_json_str(s: &str) -> WireResult<Self> {
        serde_json::from_str(s).map_err(|e| WireError::serde(e.to_string()))
    }

    /// Read and parse a partial options JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> WireResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read options '{}'", path.display()))?;
        Self::from_json_str(&s)
    }
}

impl From<PartialOptions> for Options {
    fn from(p: PartialOptions) -> Self {
        p.merge_onto(Options::default())
    }
}

#[cfg(test)]
#[path = "../tests/unit/options.rs"]
mod tests;
