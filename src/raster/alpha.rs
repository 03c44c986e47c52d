use crate::foundation::core::{BitDepth, Color, Size};
use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::settings::RasterSettings;
use crate::raster::bitmap::{BitmapState, LazyBitmap};
use crate::raster::blend;
use crate::raster::image::AcceleratedImage;

/// 8-bit transparency mask: `0` is opaque, `255` fully transparent.
#[derive(Clone, Debug)]
pub struct AlphaMask {
    bitmap: LazyBitmap,
}

impl AlphaMask {
    /// Empty (fully opaque) mask.
    pub fn new(size: Size) -> Self {
        Self::with_settings(size, RasterSettings::default())
    }

    /// Empty mask with explicit settings.
    pub fn with_settings(size: Size, settings: RasterSettings) -> Self {
        Self {
            bitmap: LazyBitmap::with_settings(size, BitDepth::Bits8, settings),
        }
    }

    /// Dimensions.
    pub fn size(&self) -> Size {
        self.bitmap.size()
    }

    /// Always 8-bit.
    pub fn bit_depth(&self) -> BitDepth {
        self.bitmap.bit_depth()
    }

    /// Set every pixel to `transparency` without allocating.
    pub fn erase(&mut self, transparency: u8) {
        self.bitmap.erase(Color::gray(transparency));
    }

    /// Transparency at `(x, y)`, materializing the buffer.
    pub fn value(&mut self, x: u32, y: u32) -> RasterResult<u8> {
        self.bitmap.pixel_index(x, y)
    }

    /// Write the transparency at `(x, y)`.
    pub fn set_value(&mut self, x: u32, y: u32, transparency: u8) -> RasterResult<()> {
        self.bitmap.set_index(x, y, transparency)
    }

    /// Blend `other` into this mask.
    ///
    /// Each result pixel is `t + (255 - t) * luma(other) / 255`. When both sides are erase colors
    /// the mask stays an erase color.
    pub fn blend_with(&mut self, other: &mut LazyBitmap) -> RasterResult<()> {
        blend::blend_into(&mut self.bitmap, other)
    }

    /// Blend another mask into this one.
    pub fn blend_with_mask(&mut self, other: &mut AlphaMask) -> RasterResult<()> {
        blend::blend_into(&mut self.bitmap, &mut other.bitmap)
    }

    /// The accelerated image, built if missing.
    pub fn accelerated_image(&mut self) -> RasterResult<AcceleratedImage> {
        self.bitmap.accelerated_image()
    }

    /// See [`LazyBitmap::has_buffer`].
    pub fn has_buffer(&self) -> bool {
        self.bitmap.has_buffer()
    }

    /// See [`LazyBitmap::has_image`].
    pub fn has_image(&self) -> bool {
        self.bitmap.has_image()
    }

    /// See [`LazyBitmap::has_erase_color`].
    pub fn has_erase_color(&self) -> bool {
        self.bitmap.has_erase_color()
    }

    /// Erase transparency, if that is the authoritative representation.
    pub fn erase_value(&self) -> Option<u8> {
        self.bitmap.erase_color().map(Color::luminance)
    }

    /// Representation flags.
    pub fn state(&self) -> BitmapState {
        self.bitmap.state()
    }

    /// See [`LazyBitmap::prefer_accelerated_path`].
    pub fn prefer_accelerated_path(&self) -> bool {
        self.bitmap.prefer_accelerated_path()
    }

    /// Underlying bitmap.
    pub fn as_bitmap(&self) -> &LazyBitmap {
        &self.bitmap
    }

    pub(crate) fn bitmap_mut(&mut self) -> &mut LazyBitmap {
        &mut self.bitmap
    }
}

/// A bitmap with an optional transparency mask of the same size.
#[derive(Clone, Debug)]
pub struct BitmapEx {
    bitmap: LazyBitmap,
    alpha: Option<AlphaMask>,
}

impl BitmapEx {
    /// Pair `bitmap` with `alpha`. Fails when the sizes differ.
    pub fn new(bitmap: LazyBitmap, alpha: AlphaMask) -> RasterResult<Self> {
        if bitmap.size() != alpha.size() {
            return Err(RasterError::validation(format!(
                "alpha mask {}x{} does not match bitmap {}x{}",
                alpha.size().width,
                alpha.size().height,
                bitmap.width(),
                bitmap.height()
            )));
        }
        Ok(Self {
            bitmap,
            alpha: Some(alpha),
        })
    }

    /// Dimensions.
    pub fn size(&self) -> Size {
        self.bitmap.size()
    }

    /// Color bitmap.
    pub fn bitmap(&self) -> &LazyBitmap {
        &self.bitmap
    }

    /// Mutable color bitmap.
    pub fn bitmap_mut(&mut self) -> &mut LazyBitmap {
        &mut self.bitmap
    }

    /// Transparency mask, if any.
    pub fn alpha(&self) -> Option<&AlphaMask> {
        self.alpha.as_ref()
    }

    /// Mutable transparency mask, if any.
    pub fn alpha_mut(&mut self) -> Option<&mut AlphaMask> {
        self.alpha.as_mut()
    }

    /// Split back into parts.
    pub fn into_parts(self) -> (LazyBitmap, Option<AlphaMask>) {
        (self.bitmap, self.alpha)
    }

    pub(crate) fn parts_mut(&mut self) -> (&mut LazyBitmap, Option<&mut AlphaMask>) {
        (&mut self.bitmap, self.alpha.as_mut())
    }
}

impl From<LazyBitmap> for BitmapEx {
    fn from(bitmap: LazyBitmap) -> Self {
        Self {
            bitmap,
            alpha: None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/alpha.rs"]
mod tests;
