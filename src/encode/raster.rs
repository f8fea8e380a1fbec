use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::assets::handles::Blob;
use crate::foundation::error::{WireError, WireResult};
use crate::options::OutputFormat;
use crate::render::surface::Surface;

/// Map a `[0, 1]` quality onto the JPEG encoder's `1..=100` scale.
pub fn jpeg_quality(quality: f32) -> u8 {
    ((quality * 100.0).round() as i32).clamp(1, 100) as u8
}

/// Map a `[0, 1]` quality onto libwebp's `0..=100` scale.
pub fn webp_quality(quality: f32) -> f32 {
    (quality * 100.0).clamp(0.0, 100.0)
}

/// Encode `surface` as `format`.
///
/// - PNG is lossless and keeps alpha. `quality` does not apply.
/// - JPEG has no alpha; pixels are written as if composited over black.
/// - WebP is lossy at `quality` and keeps alpha.
#[tracing::instrument(skip(surface), fields(w = surface.size().width, h = surface.size().height))]
pub fn encode_surface(surface: &Surface, format: OutputFormat, quality: f32) -> WireResult<Blob> {
    if !quality.is_finite() || !(0.0..=1.0).contains(&quality) {
        return Err(WireError::encode(format!(
            "quality must be within [0, 1], got {quality}"
        )));
    }

    let size = surface.size();
    let mut buf = Vec::new();
    let res = match format {
        OutputFormat::Png => PngEncoder::new(&mut buf).write_image(
            &surface.to_straight_rgba8(),
            size.width,
            size.height,
            ExtendedColorType::Rgba8,
        ),
        OutputFormat::Jpeg => JpegEncoder::new_with_quality(&mut buf, jpeg_quality(quality))
            .write_image(
                &surface.to_rgb8_over_black(),
                size.width,
                size.height,
                ExtendedColorType::Rgb8,
            ),
        OutputFormat::WebP => {
            let rgba = surface.to_straight_rgba8();
            let encoded = webp::Encoder::from_rgba(&rgba, size.width, size.height)
                .encode_simple(false, webp_quality(quality))
                .map_err(|e| WireError::encode(format!("{}: {e:?}", format.mime())))?;
            buf.extend_from_slice(&encoded);
            Ok(())
        }
    };
    res.map_err(|e| WireError::encode(format!("{}: {e}", format.mime())))?;

    tracing::debug!(bytes = buf.len(), mime = format.mime(), "encoded surface");
    Ok(Blob::new(buf, format.mime()))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/raster.rs"]
mod tests;
