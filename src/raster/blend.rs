use crate::foundation::core::{BitDepth, Color};
use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::math::mul_div255_u8;
use crate::raster::bitmap::LazyBitmap;
use crate::raster::buffer::PixelBuffer;
use crate::raster::image::AcceleratedImage;

/// Combine a transparency value with a color: `t + (255 - t) * luma(color) / 255`.
///
/// Both inputs act as transparencies, so the result is at least as transparent as either.
pub fn blend_value(transparency: u8, color: Color) -> u8 {
    let t = u16::from(transparency);
    let other = u16::from(color.luminance());
    transparency.saturating_add(mul_div255_u8(255 - t, other))
}

/// Replace `alpha` with the blend of itself and `other`, as an 8-bit transparency bitmap.
///
/// Two erase colors blend analytically and stay an erase color. Anything else materializes both
/// buffers and blends per pixel; the result caches an image when either input had one.
pub(crate) fn blend_into(alpha: &mut LazyBitmap, other: &mut LazyBitmap) -> RasterResult<()> {
    if alpha.size() != other.size() {
        return Err(RasterError::validation(format!(
            "blend size mismatch: {}x{} vs {}x{}",
            alpha.width(),
            alpha.height(),
            other.width(),
            other.height()
        )));
    }

    if let (Some(a), Some(c)) = (alpha.erase_color(), other.erase_color()) {
        let v = blend_value(a.luminance(), c);
        tracing::debug!(alpha = a.luminance(), other = ?c, result = v, "blend erase fast path");
        alpha.convert(BitDepth::Bits8)?;
        alpha.erase(Color::gray(v));
        return Ok(());
    }

    let keep_image = alpha.settings().accelerated && (alpha.has_image() || other.has_image());
    tracing::debug!(
        w = alpha.width(),
        h = alpha.height(),
        keep_image,
        "blend per-pixel path"
    );

    let other_buf = other.buffer()?;
    let alpha_buf = alpha.buffer()?;
    let mut out = PixelBuffer::zeroed(alpha_buf.size(), BitDepth::Bits8);
    for y in 0..out.size().height {
        for x in 0..out.size().width {
            let t = alpha_buf.color_unchecked(x, y).luminance();
            let v = blend_value(t, other_buf.color_unchecked(x, y));
            out.write_unchecked(x, y, Color::gray(v));
        }
    }

    let image = if keep_image {
        Some(AcceleratedImage::from_buffer(&out)?)
    } else {
        None
    };

    alpha.set_buffer(out, BitDepth::Bits8);
    alpha.image = image;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/blend.rs"]
mod tests;
