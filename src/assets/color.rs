use std::str::FromStr;

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{WireError, WireResult};

/// Straight-alpha color with normalized `0..=1` channels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorDef {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
    /// Alpha channel.
    pub a: f64,
}

impl ColorDef {
    /// Construct a color from normalized channels.
    pub fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Construct an opaque color from 8-bit channels.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            1.0,
        )
    }

    /// Quantize to premultiplied RGBA8.
    pub fn to_rgba8_premul(self) -> Rgba8Premul {
        fn to_u8(x: f64) -> u8 {
            (x.clamp(0.0, 1.0) * 255.0).round() as u8
        }

        let a = self.a.clamp(0.0, 1.0);
        let r = (self.r.clamp(0.0, 1.0) * a).clamp(0.0, 1.0);
        let g = (self.g.clamp(0.0, 1.0) * a).clamp(0.0, 1.0);
        let b = (self.b.clamp(0.0, 1.0) * a).clamp(0.0, 1.0);

        Rgba8Premul {
            r: to_u8(r),
            g: to_u8(g),
            b: to_u8(b),
            a: to_u8(a),
        }
    }

    fn premul_f64(self) -> [f64; 4] {
        let a = self.a.clamp(0.0, 1.0);
        [
            self.r.clamp(0.0, 1.0) * a,
            self.g.clamp(0.0, 1.0) * a,
            self.b.clamp(0.0, 1.0) * a,
            a,
        ]
    }
}

impl FromStr for ColorDef {
    type Err = WireError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color_str(s).map_err(WireError::validation)
    }
}

impl<'de> Deserialize<'de> for ColorDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Str(String),
            RgbaObj {
                r: f64,
                g: f64,
                b: f64,
                #[serde(default = "one")]
                a: f64,
            },
            HslaObj {
                h: f64,
                s: f64,
                l: f64,
                #[serde(default = "one")]
                a: f64,
            },
            Arr(Vec<f64>),
        }

        fn one() -> f64 {
            1.0
        }

        match Repr::deserialize(deserializer)? {
            Repr::Str(s) => parse_color_str(&s).map_err(serde::de::Error::custom),
            Repr::RgbaObj { r, g, b, a } => Ok(Self::rgba(r, g, b, a)),
            Repr::HslaObj { h, s, l, a } => Ok(hsla_to_rgba(h, s, l, a)),
            Repr::Arr(v) => {
                if v.len() == 3 {
                    Ok(Self::rgba(v[0], v[1], v[2], 1.0))
                } else if v.len() == 4 {
                    Ok(Self::rgba(v[0], v[1], v[2], v[3]))
                } else {
                    Err(serde::de::Error::custom(
                        "rgba array must have len 3 ([r,g,b]) or 4 ([r,g,b,a])",
                    ))
                }
            }
        }
    }
}

/// Any CSS color string: hex with or without `#`, named colors, `rgb()`, `hsl()`, `hwb()`...
fn parse_color_str(s: &str) -> Result<ColorDef, String> {
    let s = s.trim();
    csscolorparser::parse(s)
        .map(from_css)
        .map_err(|e| format!("unknown color \"{s}\": {e}"))
}

fn from_css(c: csscolorparser::Color) -> ColorDef {
    ColorDef::rgba(
        f64::from(c.r),
        f64::from(c.g),
        f64::from(c.b),
        f64::from(c.a),
    )
}

fn hsla_to_rgba(h: f64, s: f64, l: f64, a: f64) -> ColorDef {
    from_css(csscolorparser::Color::from_hsla(
        h as _,
        s.clamp(0.0, 1.0) as _,
        l.clamp(0.0, 1.0) as _,
        a as _,
    ))
}

/// One gradient color stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorStop {
    /// Position along the gradient in `0..=1`.
    pub offset: f64,
    /// Color at `offset`.
    pub color: ColorDef,
}

/// How a pattern tile repeats across the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternRepeat {
    /// Tile on both axes.
    #[default]
    Repeat,
    /// Tile horizontally only.
    RepeatX,
    /// Tile vertically only.
    RepeatY,
    /// Paint a single tile at the origin.
    NoRepeat,
}

impl PatternRepeat {
    pub(crate) fn repeats_x(self) -> bool {
        matches!(self, Self::Repeat | Self::RepeatX)
    }

    pub(crate) fn repeats_y(self) -> bool {
        matches!(self, Self::Repeat | Self::RepeatY)
    }
}

/// Background fill painted over the whole canvas before images are drawn.
///
/// In JSON a bare color (`"red"`, `"#ff000080"`, `{"r":1,"g":0,"b":0}`) is a solid fill. The other
/// kinds are externally tagged, e.g. `{"linear_gradient": {"from": {"x":0,"y":0}, ...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Fill {
    /// Uniform color.
    Solid(ColorDef),
    /// Linear gradient between two canvas-space points.
    LinearGradient {
        /// Start point (offset 0).
        from: Point,
        /// End point (offset 1).
        to: Point,
        /// Color stops.
        stops: Vec<ColorStop>,
    },
    /// Radial gradient around a center out to `radius`.
    RadialGradient {
        /// Center point (offset 0).
        center: Point,
        /// Distance at offset 1.
        radius: f64,
        /// Color stops.
        stops: Vec<ColorStop>,
    },
    /// Image tile loaded from a URI and repeated from the canvas origin.
    Pattern {
        /// Image URI, resolved like any other source.
        source: String,
        /// Repetition mode.
        repeat: PatternRepeat,
    },
}

impl Fill {
    /// Solid fill shorthand.
    pub fn solid(color: ColorDef) -> Self {
        Self::Solid(color)
    }

    /// URI of the pattern image, if this fill needs one loaded.
    pub fn pattern_source(&self) -> Option<&str> {
        match self {
            Self::Pattern { source, .. } => Some(source.as_str()),
            _ => None,
        }
    }
}

impl FromStr for Fill {
    type Err = WireError;

    /// Parse either a color string or a JSON fill object.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        if t.starts_with('{') || t.starts_with('[') {
            return serde_json::from_str(t).map_err(|e| WireError::serde(e.to_string()));
        }
        Ok(Self::Solid(t.parse()?))
    }
}

impl<'de> Deserialize<'de> for Fill {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "snake_case")]
        enum Tagged {
            Solid(ColorDef),
            LinearGradient {
                from: Point,
                to: Point,
                stops: Vec<ColorStop>,
            },
            RadialGradient {
                center: Point,
                radius: f64,
                stops: Vec<ColorStop>,
            },
            Pattern {
                source: String,
                #[serde(default)]
                repeat: PatternRepeat,
            },
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Tagged(Tagged),
            Color(ColorDef),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Color(c) | Repr::Tagged(Tagged::Solid(c)) => Fill::Solid(c),
            Repr::Tagged(Tagged::LinearGradient { from, to, stops }) => {
                Fill::LinearGradient { from, to, stops }
            }
            Repr::Tagged(Tagged::RadialGradient {
                center,
                radius,
                stops,
            }) => Fill::RadialGradient {
                center,
                radius,
                stops,
            },
            Repr::Tagged(Tagged::Pattern { source, repeat }) => Fill::Pattern { source, repeat },
        })
    }
}

/// Piecewise-linear ramp over sorted color stops, interpolated in premultiplied space.
#[derive(Debug, Clone)]
pub struct Ramp {
    stops: Vec<(f64, [f64; 4])>,
}

impl Ramp {
    /// Validate and sort `stops`.
    pub fn new(stops: &[ColorStop]) -> WireResult<Self> {
        let mut out = Vec::with_capacity(stops.len());
        for s in stops {
            if !s.offset.is_finite() || !(0.0..=1.0).contains(&s.offset) {
                return Err(WireError::validation(
                    "gradient stop offset must be within [0, 1]",
                ));
            }
            out.push((s.offset, s.color.premul_f64()));
        }
        // Stable sort keeps author order for equal offsets (hard edges).
        out.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(Self { stops: out })
    }

    /// Color at offset `t`, clamped to the end stops. No stops means transparent.
    pub fn sample(&self, t: f64) -> Rgba8Premul {
        let Some(first) = self.stops.first() else {
            return Rgba8Premul::transparent();
        };
        let t = t.clamp(0.0, 1.0);
        let mut c = first.1;
        if t > first.0 {
            c = self.stops[self.stops.len() - 1].1;
            for w in self.stops.windows(2) {
                let (o0, c0) = w[0];
                let (o1, c1) = w[1];
                if t <= o1 {
                    let span = o1 - o0;
                    let k = if span <= f64::EPSILON {
                        1.0
                    } else {
                        (t - o0) / span
                    };
                    c = std::array::from_fn(|i| c0[i] + (c1[i] - c0[i]) * k);
                    break;
                }
            }
        }
        let q = |x: f64| (x.clamp(0.0, 1.0) * 255.0).round() as u8;
        Rgba8Premul {
            r: q(c[0]),
            g: q(c[1]),
            b: q(c[2]),
            a: q(c[3]),
        }
    }
}

/// Offset of `p` along the axis `from -> to`, or `None` when the axis is degenerate.
pub(crate) fn linear_offset(from: Point, to: Point, p: Point) -> Option<f64> {
    let d: Vec2 = to - from;
    let len2 = d.hypot2();
    if len2 <= f64::EPSILON {
        return None;
    }
    Some((p - from).dot(d) / len2)
}

/// Normalized distance of `p` from `center`, or `None` for a non-positive radius.
pub(crate) fn radial_offset(center: Point, radius: f64, p: Point) -> Option<f64> {
    if !radius.is_finite() || radius <= 0.0 {
        return None;
    }
    Some((p - center).hypot() / radius)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
