use crate::foundation::core::{BitDepth, Color, Size};
use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::settings::RasterSettings;
use crate::raster::buffer::PixelBuffer;
use crate::raster::image::AcceleratedImage;

/// Authoritative representation of a bitmap's pixels.
#[derive(Clone, Debug)]
pub(crate) enum Repr {
    /// Nothing written yet. Reads as all-zero pixels.
    Empty,
    /// Uniformly one color, already quantized to the bitmap's depth.
    Erase(Color),
    /// CPU pixel buffer.
    Buffer(PixelBuffer),
    /// Accelerated image with no CPU copy.
    Image(AcceleratedImage),
}

/// Which representations a bitmap currently holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BitmapState {
    /// A CPU pixel buffer is allocated and authoritative.
    pub has_buffer: bool,
    /// An accelerated image exists, authoritative or cached.
    pub has_image: bool,
    /// The bitmap is a pure erase color.
    pub has_erase_color: bool,
}

/// A bitmap that allocates pixel storage only when a consumer needs it.
///
/// At most one representation is authoritative: nothing, an erase color, a [`PixelBuffer`], or an
/// [`AcceleratedImage`]. An image may additionally be cached next to an erase color or a buffer.
/// Reading or writing pixels materializes the buffer and drops the erase color; requesting the
/// image builds it without touching the authoritative source.
#[derive(Clone, Debug)]
pub struct LazyBitmap {
    size: Size,
    depth: BitDepth,
    settings: RasterSettings,
    pub(crate) repr: Repr,
    pub(crate) image: Option<AcceleratedImage>,
}

impl LazyBitmap {
    /// Empty bitmap with default settings.
    pub fn new(size: Size, depth: BitDepth) -> Self {
        Self::with_settings(size, depth, RasterSettings::default())
    }

    /// Empty bitmap with explicit settings.
    pub fn with_settings(size: Size, depth: BitDepth, settings: RasterSettings) -> Self {
        Self {
            size,
            depth,
            settings,
            repr: Repr::Empty,
            image: None,
        }
    }

    /// Validate raw dimensions and bit count, then build an empty bitmap.
    pub fn from_dimensions(width: u32, height: u32, bits: u16) -> RasterResult<Self> {
        Ok(Self::new(Size::new(width, height)?, BitDepth::from_bits(bits)?))
    }

    /// Dimensions.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Current bit depth.
    pub fn bit_depth(&self) -> BitDepth {
        self.depth
    }

    /// Settings this bitmap was built with.
    pub fn settings(&self) -> RasterSettings {
        self.settings
    }

    /// `true` when a CPU buffer is authoritative.
    pub fn has_buffer(&self) -> bool {
        matches!(self.repr, Repr::Buffer(_))
    }

    /// `true` when an accelerated image exists, authoritative or cached.
    pub fn has_image(&self) -> bool {
        matches!(self.repr, Repr::Image(_)) || self.image.is_some()
    }

    /// `true` when the bitmap is a pure erase color.
    pub fn has_erase_color(&self) -> bool {
        matches!(self.repr, Repr::Erase(_))
    }

    /// The erase color, if that is the authoritative representation.
    pub fn erase_color(&self) -> Option<Color> {
        match self.repr {
            Repr::Erase(c) => Some(c),
            _ => None,
        }
    }

    /// Snapshot of the representation flags.
    pub fn state(&self) -> BitmapState {
        BitmapState {
            has_buffer: self.has_buffer(),
            has_image: self.has_image(),
            has_erase_color: self.has_erase_color(),
        }
    }

    /// Make the bitmap uniformly `color` without allocating pixels.
    pub fn erase(&mut self, color: Color) {
        let color = self.depth.quantize(color);
        tracing::debug!(?color, bits = self.depth.bits(), "erase");
        self.repr = Repr::Erase(color);
        self.image = None;
    }

    /// 32-bit bitmap backed only by `image`.
    ///
    /// The buffer is derived on first pixel access by unpremultiplying, so translucent pixels read
    /// back only as precisely as their premultiplied bytes allow.
    pub fn from_image(image: AcceleratedImage) -> Self {
        let mut bitmap = Self::new(image.size(), BitDepth::Bits32);
        bitmap.repr = Repr::Image(image);
        bitmap
    }

    /// Read the color at `(x, y)`, materializing the buffer.
    pub fn read_pixel(&mut self, x: u32, y: u32) -> RasterResult<Color> {
        self.size.check(x, y)?;
        self.buffer()?.get_color(x, y)
    }

    /// Read the palette index at `(x, y)`, materializing the buffer.
    ///
    /// Only valid for 1-bit and 8-bit bitmaps.
    pub fn pixel_index(&mut self, x: u32, y: u32) -> RasterResult<u8> {
        self.size.check(x, y)?;
        if !self.depth.is_palettized() {
            return Err(RasterError::conversion(format!(
                "{}-bit bitmap has no palette indices",
                self.depth.bits()
            )));
        }
        self.buffer()?.get_index(x, y)
    }

    /// Write one pixel. Drops any cached image.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) -> RasterResult<()> {
        self.size.check(x, y)?;
        self.buffer_mut()?.set_color(x, y, color)
    }

    /// Write one palette index. Drops any cached image.
    pub fn set_index(&mut self, x: u32, y: u32, index: u8) -> RasterResult<()> {
        self.size.check(x, y)?;
        if !self.depth.is_palettized() {
            return Err(RasterError::conversion(format!(
                "{}-bit bitmap has no palette indices",
                self.depth.bits()
            )));
        }
        self.buffer_mut()?.set_index(x, y, index)
    }

    /// Fill a `width x height` rectangle at `(x, y)`, clipped to the bitmap.
    pub fn fill_rect(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: Color,
    ) -> RasterResult<()> {
        let buf = self.buffer_mut()?;
        buf.fill_rect(x, y, x.saturating_add(width), y.saturating_add(height), color);
        Ok(())
    }

    /// Read access to the materialized buffer.
    pub fn buffer(&mut self) -> RasterResult<&PixelBuffer> {
        self.ensure_buffer()?;
        match &self.repr {
            Repr::Buffer(b) => Ok(b),
            _ => Err(RasterError::conversion("buffer materialization failed")),
        }
    }

    fn buffer_mut(&mut self) -> RasterResult<&mut PixelBuffer> {
        self.ensure_buffer()?;
        if self.image.take().is_some() {
            tracing::debug!("pixel write invalidated cached image");
        }
        match &mut self.repr {
            Repr::Buffer(b) => Ok(b),
            _ => Err(RasterError::conversion("buffer materialization failed")),
        }
    }

    fn ensure_buffer(&mut self) -> RasterResult<()> {
        let buffer = match &self.repr {
            Repr::Buffer(_) => return Ok(()),
            Repr::Empty => {
                tracing::debug!(w = self.size.width, h = self.size.height, "zeroed buffer");
                PixelBuffer::zeroed(self.size, self.depth)
            }
            Repr::Erase(c) => {
                tracing::debug!(
                    w = self.size.width,
                    h = self.size.height,
                    color = ?c,
                    "buffer from erase color"
                );
                PixelBuffer::filled(self.size, self.depth, *c)
            }
            Repr::Image(img) => {
                tracing::debug!(w = self.size.width, h = self.size.height, "buffer from image");
                let buffer = img.to_buffer(self.depth);
                self.image = Some(img.clone());
                buffer
            }
        };
        self.repr = Repr::Buffer(buffer);
        Ok(())
    }

    /// The accelerated image, built from the authoritative source if missing.
    ///
    /// An erase color stays authoritative; the image is kept as a cache next to it.
    pub fn accelerated_image(&mut self) -> RasterResult<AcceleratedImage> {
        if let Repr::Image(img) = &self.repr {
            return Ok(img.clone());
        }
        if let Some(img) = &self.image {
            return Ok(img.clone());
        }
        let img = match &self.repr {
            Repr::Empty => {
                tracing::debug!("image from empty bitmap");
                AcceleratedImage::from_color(self.size, empty_color(self.depth))?
            }
            Repr::Erase(c) => {
                tracing::debug!(color = ?c, "image from erase color");
                AcceleratedImage::from_color(self.size, *c)?
            }
            Repr::Buffer(b) => {
                tracing::debug!("image from buffer");
                AcceleratedImage::from_buffer(b)?
            }
            Repr::Image(img) => img.clone(),
        };
        self.image = Some(img.clone());
        Ok(img)
    }

    /// Re-quantize to `depth`.
    ///
    /// An erase color is re-quantized and stays an erase color. A buffer is converted pixel by
    /// pixel; a cached image is rebuilt from the converted buffer. An image-backed bitmap converts
    /// its image.
    pub fn convert(&mut self, depth: BitDepth) -> RasterResult<()> {
        if depth == self.depth {
            return Ok(());
        }
        let from = self.depth.bits();
        let (repr, image) = match &self.repr {
            Repr::Erase(c) => {
                let c = depth.quantize(*c);
                tracing::debug!(from, to = depth.bits(), color = ?c, "convert erase color");
                (Repr::Erase(c), None)
            }
            Repr::Buffer(b) => {
                let converted = b.convert(depth);
                let image = match self.image {
                    Some(_) => Some(AcceleratedImage::from_buffer(&converted)?),
                    None => None,
                };
                tracing::debug!(
                    from,
                    to = depth.bits(),
                    rebuild_image = image.is_some(),
                    "convert buffer"
                );
                (Repr::Buffer(converted), image)
            }
            Repr::Image(img) => {
                tracing::debug!(from, to = depth.bits(), "convert image");
                (Repr::Image(img.convert(depth)?), None)
            }
            Repr::Empty => (Repr::Empty, None),
        };
        self.repr = repr;
        self.image = image;
        self.depth = depth;
        Ok(())
    }

    /// Install `buffer` as the authoritative representation at `depth`, dropping any image.
    pub(crate) fn set_buffer(&mut self, buffer: PixelBuffer, depth: BitDepth) {
        self.repr = Repr::Buffer(buffer);
        self.image = None;
        self.depth = depth;
    }

    /// Whether drawing through the accelerated path is cheaper than a CPU blit.
    pub fn prefer_accelerated_path(&self) -> bool {
        match self.repr {
            Repr::Erase(_) => true,
            _ => self.settings.accelerated && self.has_image(),
        }
    }

    /// Borrow a sampler over the cheapest available representation.
    ///
    /// Erase colors are sampled without materializing anything.
    pub(crate) fn sampler(&mut self) -> RasterResult<Sampler<'_>> {
        if let Repr::Erase(c) = self.repr {
            return Ok(Sampler::Solid(c));
        }
        if self.settings.accelerated {
            if AcceleratedImage::fits(self.size) {
                return Ok(Sampler::Image(self.accelerated_image()?));
            }
            tracing::debug!(
                w = self.size.width,
                h = self.size.height,
                "too large for an accelerated image, sampling buffer"
            );
        }
        Ok(Sampler::Buffer(self.buffer()?))
    }

    /// Build a 32-bit bitmap holding a copy of `image`.
    pub fn from_rgba_image(image: &::image::RgbaImage) -> RasterResult<Self> {
        let size = Size::new(image.width(), image.height())?;
        let mut buffer = PixelBuffer::zeroed(size, BitDepth::Bits32);
        for (x, y, px) in image.enumerate_pixels() {
            let [r, g, b, a] = px.0;
            buffer.write_unchecked(x, y, Color::rgba(r, g, b, a));
        }
        let mut bitmap = Self::new(size, BitDepth::Bits32);
        bitmap.repr = Repr::Buffer(buffer);
        Ok(bitmap)
    }

    /// Copy pixels out as straight RGBA8, materializing the buffer.
    pub fn to_rgba_image(&mut self) -> RasterResult<::image::RgbaImage> {
        let buffer = self.buffer()?;
        Ok(::image::RgbaImage::from_fn(
            buffer.size().width,
            buffer.size().height,
            |x, y| {
                let c = buffer.color_unchecked(x, y);
                ::image::Rgba([c.r, c.g, c.b, c.a])
            },
        ))
    }
}

/// Read-only view used by devices.
pub(crate) enum Sampler<'a> {
    Solid(Color),
    Image(AcceleratedImage),
    Buffer(&'a PixelBuffer),
}

impl Sampler<'_> {
    /// Color at `(x, y)`. Callers guarantee the coordinate is in bounds.
    pub(crate) fn color(&self, x: u32, y: u32) -> Color {
        match self {
            Self::Solid(c) => *c,
            Self::Image(img) => img.pixel(x, y).unwrap_or(Color::TRANSPARENT),
            Self::Buffer(b) => b.color_unchecked(x, y),
        }
    }

    /// Premultiplied pixel at `(x, y)`. Images hand out their stored bytes unchanged.
    pub(crate) fn premul(&self, x: u32, y: u32) -> [u8; 4] {
        match self {
            Self::Solid(c) => c.to_premul(),
            Self::Image(img) => img.premul_pixel(x, y).unwrap_or([0; 4]),
            Self::Buffer(b) => b.color_unchecked(x, y).to_premul(),
        }
    }
}

fn empty_color(depth: BitDepth) -> Color {
    match depth {
        BitDepth::Bits32 => Color::TRANSPARENT,
        _ => Color::BLACK,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/bitmap.rs"]
mod tests;
