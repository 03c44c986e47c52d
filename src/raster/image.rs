use std::sync::Arc;

use crate::foundation::core::{BitDepth, Color, Size};
use crate::foundation::error::{RasterError, RasterResult};
use crate::raster::buffer::PixelBuffer;

/// Accelerated image handle: a premultiplied RGBA8 `vello_cpu::Pixmap` shared by reference count.
///
/// Handles are immutable once built; cloning one is a refcount bump.
#[derive(Clone)]
pub struct AcceleratedImage {
    size: Size,
    pixmap: Arc<vello_cpu::Pixmap>,
}

impl std::fmt::Debug for AcceleratedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AcceleratedImage")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

impl AcceleratedImage {
    /// Image uniformly filled with `color`.
    pub fn from_color(size: Size, color: Color) -> RasterResult<Self> {
        let mut pixmap = new_pixmap(size)?;
        let px = color.to_premul();
        for dst in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
            dst.copy_from_slice(&px);
        }
        Ok(Self::wrap(size, pixmap))
    }

    /// Upload a CPU buffer.
    pub fn from_buffer(buffer: &PixelBuffer) -> RasterResult<Self> {
        let size = buffer.size();
        let mut pixmap = new_pixmap(size)?;
        for (dst, color) in pixmap
            .data_as_u8_slice_mut()
            .chunks_exact_mut(4)
            .zip(buffer.colors())
        {
            dst.copy_from_slice(&color.to_premul());
        }
        Ok(Self::wrap(size, pixmap))
    }

    fn wrap(size: Size, pixmap: vello_cpu::Pixmap) -> Self {
        Self {
            size,
            pixmap: Arc::new(pixmap),
        }
    }

    /// Dimensions.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn premul_bytes(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn premul_pixel(&self, x: u32, y: u32) -> RasterResult<[u8; 4]> {
        self.size.check(x, y)?;
        let o = (y as usize * self.size.width as usize + x as usize) * 4;
        let b = self.premul_bytes();
        Ok([b[o], b[o + 1], b[o + 2], b[o + 3]])
    }

    /// Straight-alpha color at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> RasterResult<Color> {
        self.premul_pixel(x, y).map(Color::from_premul)
    }

    /// Download into a CPU buffer at `depth`.
    pub fn to_buffer(&self, depth: BitDepth) -> PixelBuffer {
        let mut out = PixelBuffer::zeroed(self.size, depth);
        let w = self.size.width as usize;
        for (i, px) in self.premul_bytes().chunks_exact(4).enumerate() {
            let color = Color::from_premul([px[0], px[1], px[2], px[3]]);
            out.write_unchecked((i % w) as u32, (i / w) as u32, color);
        }
        out
    }

    /// New image with every pixel re-quantized to `depth`.
    pub fn convert(&self, depth: BitDepth) -> RasterResult<Self> {
        let mut pixmap = new_pixmap(self.size)?;
        for (dst, src) in pixmap
            .data_as_u8_slice_mut()
            .chunks_exact_mut(4)
            .zip(self.premul_bytes().chunks_exact(4))
        {
            let color = depth.quantize(Color::from_premul([src[0], src[1], src[2], src[3]]));
            dst.copy_from_slice(&color.to_premul());
        }
        Ok(Self::wrap(self.size, pixmap))
    }

    /// Return `true` when an image of `size` can be built. Pixmap sides are limited to `u16`.
    pub fn fits(size: Size) -> bool {
        u16::try_from(size.width).is_ok() && u16::try_from(size.height).is_ok()
    }

    /// Return `true` when both handles share storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.pixmap, &other.pixmap)
    }
}

fn new_pixmap(size: Size) -> RasterResult<vello_cpu::Pixmap> {
    let w: u16 = size
        .width
        .try_into()
        .map_err(|_| RasterError::conversion("accelerated image width exceeds u16"))?;
    let h: u16 = size
        .height
        .try_into()
        .map_err(|_| RasterError::conversion("accelerated image height exceeds u16"))?;
    Ok(vello_cpu::Pixmap::new(w, h))
}

#[cfg(test)]
#[path = "../../tests/unit/raster/image.rs"]
mod tests;
