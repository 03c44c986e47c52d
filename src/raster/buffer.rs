use crate::foundation::core::{BitDepth, Color, Size};
use crate::foundation::error::{RasterError, RasterResult};

/// CPU-side pixel storage at a fixed depth.
///
/// Layout per depth: 1-bit rows are packed MSB first and padded to whole bytes, 8-bit stores one
/// palette index per pixel, 24-bit stores `R,G,B`, 32-bit stores straight `R,G,B,A`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    size: Size,
    depth: BitDepth,
    stride: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// All-zero buffer: black, or transparent black at 32-bit.
    pub fn zeroed(size: Size, depth: BitDepth) -> Self {
        let stride = depth.stride(size.width);
        Self {
            size,
            depth,
            stride,
            data: vec![0; stride * size.height as usize],
        }
    }

    /// Buffer with every pixel set to `color` quantized to `depth`.
    pub fn filled(size: Size, depth: BitDepth, color: Color) -> Self {
        let mut buf = Self::zeroed(size, depth);
        buf.fill_all(color);
        buf
    }

    /// Dimensions.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Storage depth.
    pub fn depth(&self) -> BitDepth {
        self.depth
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Raw row-major bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Read the color at `(x, y)`.
    pub fn get_color(&self, x: u32, y: u32) -> RasterResult<Color> {
        self.size.check(x, y)?;
        Ok(self.color_unchecked(x, y))
    }

    /// Read the palette index at `(x, y)`. Fails on true-color depths.
    pub fn get_index(&self, x: u32, y: u32) -> RasterResult<u8> {
        self.size.check(x, y)?;
        self.require_palette()?;
        Ok(self.index_unchecked(x, y))
    }

    /// Write `color`, quantized to this buffer's depth.
    pub fn set_color(&mut self, x: u32, y: u32, color: Color) -> RasterResult<()> {
        self.size.check(x, y)?;
        self.write_unchecked(x, y, color);
        Ok(())
    }

    /// Write a raw palette index. Fails on true-color depths or indices past the palette.
    pub fn set_index(&mut self, x: u32, y: u32, index: u8) -> RasterResult<()> {
        self.size.check(x, y)?;
        self.require_palette()?;
        if self.depth.palette_color(index).is_none() {
            return Err(RasterError::validation(format!(
                "palette index {index} out of range for {}-bit",
                self.depth.bits()
            )));
        }
        self.write_index(x, y, index);
        Ok(())
    }

    /// Fill `[x0, x1) x [y0, y1)` with `color`, clipped to the buffer.
    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, color: Color) {
        let x1 = x1.min(self.size.width);
        let y1 = y1.min(self.size.height);
        for y in y0..y1 {
            for x in x0..x1 {
                self.write_unchecked(x, y, color);
            }
        }
    }

    /// Set every pixel to `color`.
    pub fn fill_all(&mut self, color: Color) {
        match self.depth {
            BitDepth::Bits1 => {
                let byte = if self.depth.index_of(color) == Some(1) {
                    0xFF
                } else {
                    0x00
                };
                self.data.fill(byte);
            }
            BitDepth::Bits8 => self.data.fill(color.luminance()),
            BitDepth::Bits24 => {
                for px in self.data.chunks_exact_mut(3) {
                    px.copy_from_slice(&[color.r, color.g, color.b]);
                }
            }
            BitDepth::Bits32 => {
                for px in self.data.chunks_exact_mut(4) {
                    px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
                }
            }
        }
    }

    /// Per-pixel conversion into a new buffer at `depth`.
    pub fn convert(&self, depth: BitDepth) -> Self {
        if depth == self.depth {
            return self.clone();
        }
        let mut out = Self::zeroed(self.size, depth);
        for y in 0..self.size.height {
            for x in 0..self.size.width {
                out.write_unchecked(x, y, self.color_unchecked(x, y));
            }
        }
        out
    }

    /// Iterate colors in row-major order.
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        let w = self.size.width;
        (0..self.size.height).flat_map(move |y| (0..w).map(move |x| self.color_unchecked(x, y)))
    }

    pub(crate) fn color_unchecked(&self, x: u32, y: u32) -> Color {
        let row = y as usize * self.stride;
        let x = x as usize;
        match self.depth {
            BitDepth::Bits1 | BitDepth::Bits8 => {
                let idx = self.index_unchecked(x as u32, y);
                self.depth.palette_color(idx).unwrap_or(Color::BLACK)
            }
            BitDepth::Bits24 => {
                let o = row + x * 3;
                Color::rgb(self.data[o], self.data[o + 1], self.data[o + 2])
            }
            BitDepth::Bits32 => {
                let o = row + x * 4;
                Color::rgba(
                    self.data[o],
                    self.data[o + 1],
                    self.data[o + 2],
                    self.data[o + 3],
                )
            }
        }
    }

    fn index_unchecked(&self, x: u32, y: u32) -> u8 {
        let row = y as usize * self.stride;
        let x = x as usize;
        match self.depth {
            BitDepth::Bits1 => (self.data[row + x / 8] >> (7 - (x % 8))) & 1,
            _ => self.data[row + x],
        }
    }

    pub(crate) fn write_unchecked(&mut self, x: u32, y: u32, color: Color) {
        let row = y as usize * self.stride;
        let xu = x as usize;
        match self.depth {
            BitDepth::Bits1 | BitDepth::Bits8 => {
                let idx = self.depth.index_of(color).unwrap_or(0);
                self.write_index(x, y, idx);
            }
            BitDepth::Bits24 => {
                let o = row + xu * 3;
                self.data[o..o + 3].copy_from_slice(&[color.r, color.g, color.b]);
            }
            BitDepth::Bits32 => {
                let o = row + xu * 4;
                self.data[o..o + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
            }
        }
    }

    fn write_index(&mut self, x: u32, y: u32, index: u8) {
        let row = y as usize * self.stride;
        let x = x as usize;
        match self.depth {
            BitDepth::Bits1 => {
                let byte = &mut self.data[row + x / 8];
                let mask = 0x80u8 >> (x % 8);
                if index & 1 == 1 {
                    *byte |= mask;
                } else {
                    *byte &= !mask;
                }
            }
            _ => self.data[row + x] = index,
        }
    }

    fn require_palette(&self) -> RasterResult<()> {
        if self.depth.is_palettized() {
            Ok(())
        } else {
            Err(RasterError::conversion(format!(
                "{}-bit buffer has no palette indices",
                self.depth.bits()
            )))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/buffer.rs"]
mod tests;
