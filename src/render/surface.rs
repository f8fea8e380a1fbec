use kurbo::Point;

use crate::assets::color::{Fill, PatternRepeat, Ramp, linear_offset, radial_offset};
use crate::assets::decode::DecodedImage;
use crate::foundation::core::{Position, Rgba8Premul, Size, unpremultiply};
use crate::foundation::error::{WireError, WireResult};
use crate::render::composite::{over, over_in_place};

/// Background fill with its color ramp built and pattern image decoded.
#[derive(Clone, Debug)]
pub enum ResolvedFill {
    /// Uniform color.
    Solid(Rgba8Premul),
    /// Linear gradient.
    Linear {
        /// Offset-0 point.
        from: Point,
        /// Offset-1 point.
        to: Point,
        /// Stop ramp.
        ramp: Ramp,
    },
    /// Radial gradient.
    Radial {
        /// Offset-0 point.
        center: Point,
        /// Distance at offset 1.
        radius: f64,
        /// Stop ramp.
        ramp: Ramp,
    },
    /// Tiled image.
    Pattern {
        /// Tile.
        image: DecodedImage,
        /// Repetition mode.
        repeat: PatternRepeat,
    },
}

impl ResolvedFill {
    /// Resolve `fill`. `pattern` must hold the decoded tile when `fill` is a pattern.
    pub fn resolve(fill: &Fill, pattern: Option<DecodedImage>) -> WireResult<Self> {
        Ok(match fill {
            Fill::Solid(c) => Self::Solid(c.to_rgba8_premul()),
            Fill::LinearGradient { from, to, stops } => Self::Linear {
                from: *from,
                to: *to,
                ramp: Ramp::new(stops)?,
            },
            Fill::RadialGradient {
                center,
                radius,
                stops,
            } => Self::Radial {
                center: *center,
                radius: *radius,
                ramp: Ramp::new(stops)?,
            },
            Fill::Pattern { repeat, .. } => Self::Pattern {
                image: pattern.ok_or_else(|| {
                    WireError::validation("pattern fill resolved without its image")
                })?,
                repeat: *repeat,
            },
        })
    }

    /// Premultiplied fill color at pixel `(x, y)`, or `None` where the fill paints nothing.
    fn sample(&self, x: u32, y: u32) -> Option<Rgba8Premul> {
        let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
        match self {
            Self::Solid(c) => Some(*c),
            Self::Linear { from, to, ramp } => linear_offset(*from, *to, p).map(|t| ramp.sample(t)),
            Self::Radial {
                center,
                radius,
                ramp,
            } => radial_offset(*center, *radius, p).map(|t| ramp.sample(t)),
            Self::Pattern { image, repeat } => {
                let tx = tile_coord(x, image.width, repeat.repeats_x())?;
                let ty = tile_coord(y, image.height, repeat.repeats_y())?;
                let [r, g, b, a] = image.texel(tx, ty);
                Some(Rgba8Premul { r, g, b, a })
            }
        }
    }
}

fn tile_coord(v: u32, extent: u32, repeats: bool) -> Option<u32> {
    if extent == 0 {
        None
    } else if repeats {
        Some(v % extent)
    } else {
        (v < extent).then_some(v)
    }
}

/// Premultiplied RGBA8 raster the images are drawn onto.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(size: Size) -> WireResult<Self> {
        let len = (size.width as usize)
            .checked_mul(size.height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| {
                WireError::validation(format!(
                    "canvas {}x{} is too large to allocate",
                    size.width, size.height
                ))
            })?;
        Ok(Self {
            width: size.width,
            height: size.height,
            data: vec![0u8; len],
        })
    }

    /// Surface size.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Premultiplied bytes, row-major.
    pub fn premul_data(&self) -> &[u8] {
        &self.data
    }

    fn row_stride(&self) -> usize {
        self.width as usize * 4
    }

    /// Paint `fill` over the whole surface.
    pub fn fill(&mut self, fill: &ResolvedFill) {
        let stride = self.row_stride();
        if stride == 0 {
            return;
        }
        for (y, row) in self.data.chunks_exact_mut(stride).enumerate() {
            for (x, px) in row.chunks_exact_mut(4).enumerate() {
                if let Some(c) = fill.sample(x as u32, y as u32) {
                    let out = over([px[0], px[1], px[2], px[3]], c.to_array());
                    px.copy_from_slice(&out);
                }
            }
        }
    }

    /// Draw `img` with its top-left corner at `at`, clipped to the surface.
    pub fn draw_image(&mut self, img: &DecodedImage, at: Position) -> WireResult<()> {
        if at.x >= self.width || at.y >= self.height {
            return Ok(());
        }
        let cols = img.width.min(self.width - at.x) as usize;
        let rows = img.height.min(self.height - at.y) as usize;
        let stride = self.row_stride();
        let src_stride = img.width as usize * 4;

        for row in 0..rows {
            let dst_start = (at.y as usize + row) * stride + at.x as usize * 4;
            let src_start = row * src_stride;
            over_in_place(
                &mut self.data[dst_start..dst_start + cols * 4],
                &img.rgba8_premul[src_start..src_start + cols * 4],
            )?;
        }
        Ok(())
    }

    /// Straight-alpha pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = y as usize * self.row_stride() + x as usize * 4;
        let p = &self.data[i..i + 4];
        Some(unpremultiply([p[0], p[1], p[2], p[3]]))
    }

    /// Straight-alpha RGBA8 copy for encoders.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for p in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply([p[0], p[1], p[2], p[3]]));
        }
        out
    }

    /// RGB8 copy of the premultiplied channels, i.e. the surface composited over black.
    pub fn to_rgb8_over_black(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len() / 4 * 3);
        for p in self.data.chunks_exact(4) {
            out.extend_from_slice(&p[..3]);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
