use crate::device::composite::{PremulRgba8, opacity_of, over};
use crate::foundation::core::{Affine, Color, Point, Rect, Size};
use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::settings::RasterSettings;
use crate::raster::alpha::{AlphaMask, BitmapEx};
use crate::raster::bitmap::{LazyBitmap, Sampler};

/// CPU drawing surface that consumes lazy bitmaps.
///
/// Pixels are premultiplied RGBA8. Erase-color bitmaps are drawn as a constant color without
/// materializing; other bitmaps are sampled through their accelerated image when acceleration is
/// on and the bitmap fits one, and through their buffer otherwise. All paths produce identical
/// pixels.
pub struct VirtualDevice {
    size: Size,
    settings: RasterSettings,
    background: Color,
    pixels: Vec<u8>,
}

/// Integer device-space bounds, half-open.
#[derive(Clone, Copy, Debug)]
struct Span {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl VirtualDevice {
    /// Device filled with a white background.
    pub fn new(size: Size) -> Self {
        Self::with_settings(size, RasterSettings::default())
    }

    /// Device with explicit settings.
    pub fn with_settings(size: Size, settings: RasterSettings) -> Self {
        let mut dev = Self {
            size,
            settings,
            background: Color::WHITE,
            pixels: vec![0; size.area() * 4],
        };
        dev.erase();
        dev
    }

    /// Dimensions.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Background color used by [`VirtualDevice::erase`].
    pub fn background(&self) -> Color {
        self.background
    }

    /// Change the background color. Takes effect on the next [`VirtualDevice::erase`].
    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Fill the whole surface with the background color.
    pub fn erase(&mut self) {
        let px = self.background.to_premul();
        for dst in self.pixels.chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
    }

    /// Straight-alpha color at an integer point.
    pub fn get_pixel(&self, p: Point) -> RasterResult<Color> {
        if p.x < 0.0 || p.y < 0.0 {
            return Err(RasterError::out_of_bounds(
                p.x.max(0.0) as u32,
                p.y.max(0.0) as u32,
                self.size.width,
                self.size.height,
            ));
        }
        let (x, y) = (p.x as u32, p.y as u32);
        self.size.check(x, y)?;
        let o = (y as usize * self.size.width as usize + x as usize) * 4;
        let px = &self.pixels[o..o + 4];
        Ok(Color::from_premul([px[0], px[1], px[2], px[3]]))
    }

    /// Raw premultiplied RGBA8 bytes, row-major.
    pub fn premul_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy `bitmap` unscaled with its top-left corner at `at`.
    pub fn draw_bitmap(&mut self, at: Point, bitmap: &mut LazyBitmap) -> RasterResult<()> {
        tracing::trace!(x = at.x, y = at.y, "draw_bitmap");
        self.draw_at(at, bitmap, None)
    }

    /// Draw `bitmap` unscaled at `at`, composited through its mask.
    pub fn draw_bitmap_ex(&mut self, at: Point, bitmap: &mut BitmapEx) -> RasterResult<()> {
        tracing::trace!(x = at.x, y = at.y, "draw_bitmap_ex");
        let (bmp, alpha) = bitmap.parts_mut();
        self.draw_at(at, bmp, alpha)
    }

    /// Draw the `src_size` region at `src_at` of `bitmap` into the `dest_size` region at `dest_at`.
    ///
    /// Sampling is nearest-neighbour at pixel centers.
    pub fn draw_bitmap_ex_scaled(
        &mut self,
        dest_at: Point,
        dest_size: Size,
        src_at: Point,
        src_size: Size,
        bitmap: &mut BitmapEx,
    ) -> RasterResult<()> {
        tracing::trace!(
            dx = dest_at.x,
            dy = dest_at.y,
            dw = dest_size.width,
            dh = dest_size.height,
            sx = src_at.x,
            sy = src_at.y,
            sw = src_size.width,
            sh = src_size.height,
            "draw_bitmap_ex_scaled"
        );
        let (dx0, dy0) = (dest_at.x.round(), dest_at.y.round());
        let (sx0, sy0) = (src_at.x.round(), src_at.y.round());
        let Some(span) = self.clip(Rect::new(
            dx0,
            dy0,
            dx0 + f64::from(dest_size.width),
            dy0 + f64::from(dest_size.height),
        )) else {
            return Ok(());
        };
        let kx = f64::from(src_size.width) / f64::from(dest_size.width);
        let ky = f64::from(src_size.height) / f64::from(dest_size.height);
        let limit = Rect::new(
            sx0,
            sy0,
            sx0 + f64::from(src_size.width),
            sy0 + f64::from(src_size.height),
        );
        let (bmp, alpha) = bitmap.parts_mut();
        self.composite(span, bmp, alpha, |x, y| {
            let sx = sx0 + ((x + 0.5 - dx0) * kx).floor();
            let sy = sy0 + ((y + 0.5 - dy0) * ky).floor();
            (sx < limit.x1 && sy < limit.y1).then_some(Point::new(sx, sy))
        })
    }

    /// Draw `bitmap` mapped onto the unit square and then through `transform`.
    pub fn draw_transformed_bitmap_ex(
        &mut self,
        transform: Affine,
        bitmap: &mut BitmapEx,
    ) -> RasterResult<()> {
        tracing::trace!(coeffs = ?transform.as_coeffs(), "draw_transformed_bitmap_ex");
        let size = bitmap.size();
        let (w, h) = (f64::from(size.width), f64::from(size.height));
        let full = transform * Affine::scale_non_uniform(1.0 / w, 1.0 / h);
        if full.determinant().abs() < f64::EPSILON {
            return Ok(());
        }
        let inverse = full.inverse();
        let Some(span) = self.clip(full.transform_rect_bbox(Rect::new(0.0, 0.0, w, h))) else {
            return Ok(());
        };
        let (bmp, alpha) = bitmap.parts_mut();
        self.composite(span, bmp, alpha, |x, y| {
            let q = inverse * Point::new(x + 0.5, y + 0.5);
            (q.x >= 0.0 && q.y >= 0.0 && q.x < w && q.y < h)
                .then_some(Point::new(q.x.floor(), q.y.floor()))
        })
    }

    fn draw_at(
        &mut self,
        at: Point,
        bitmap: &mut LazyBitmap,
        alpha: Option<&mut AlphaMask>,
    ) -> RasterResult<()> {
        let (x0, y0) = (at.x.round(), at.y.round());
        let Some(span) = self.clip(Rect::new(
            x0,
            y0,
            x0 + f64::from(bitmap.width()),
            y0 + f64::from(bitmap.height()),
        )) else {
            return Ok(());
        };
        self.composite(span, bitmap, alpha, |x, y| Some(Point::new(x - x0, y - y0)))
    }

    /// Write every device pixel in `span` whose source coordinate `map` yields.
    ///
    /// Without a mask the source pixel is copied; with one it is composited source-over at the
    /// mask's opacity.
    fn composite(
        &mut self,
        span: Span,
        bitmap: &mut LazyBitmap,
        alpha: Option<&mut AlphaMask>,
        map: impl Fn(f64, f64) -> Option<Point>,
    ) -> RasterResult<()> {
        let src_size = bitmap.size();
        let color = sampler_for(bitmap, self.settings)?;
        let mask = match alpha {
            Some(a) => Some(sampler_for(a.bitmap_mut(), self.settings)?),
            None => None,
        };

        let width = self.size.width as usize;
        for y in span.y0..span.y1 {
            for x in span.x0..span.x1 {
                let Some(src) = map(f64::from(x), f64::from(y)) else {
                    continue;
                };
                if src.x < 0.0 || src.y < 0.0 {
                    continue;
                }
                let (sx, sy) = (src.x as u32, src.y as u32);
                if !src_size.contains(sx, sy) {
                    continue;
                }
                let o = (y as usize * width + x as usize) * 4;
                let src = color.premul(sx, sy);
                let out = match &mask {
                    Some(m) => {
                        let dst: PremulRgba8 = [
                            self.pixels[o],
                            self.pixels[o + 1],
                            self.pixels[o + 2],
                            self.pixels[o + 3],
                        ];
                        over(dst, src, opacity_of(m.color(sx, sy).luminance()))
                    }
                    None => src,
                };
                self.pixels[o..o + 4].copy_from_slice(&out);
            }
        }
        Ok(())
    }

    fn clip(&self, r: Rect) -> Option<Span> {
        let x0 = r.x0.floor().max(0.0);
        let y0 = r.y0.floor().max(0.0);
        let x1 = r.x1.ceil().min(f64::from(self.size.width));
        let y1 = r.y1.ceil().min(f64::from(self.size.height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Span {
            x0: x0 as u32,
            y0: y0 as u32,
            x1: x1 as u32,
            y1: y1 as u32,
        })
    }
}

/// Device settings win: a software device never builds images for its sources.
fn sampler_for(bitmap: &mut LazyBitmap, settings: RasterSettings) -> RasterResult<Sampler<'_>> {
    if !settings.accelerated && !bitmap.has_erase_color() {
        return Ok(Sampler::Buffer(bitmap.buffer()?));
    }
    bitmap.sampler()
}

#[cfg(test)]
#[path = "../../tests/unit/device/virtual_device.rs"]
mod tests;
