use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::math;

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Pixel dimensions of a bitmap or device. Both sides are non-zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a validated size.
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::validation(format!(
                "bitmap size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Number of pixels.
    pub fn area(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Return `true` when `(x, y)` addresses a pixel.
    pub fn contains(self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    pub(crate) fn check(self, x: u32, y: u32) -> RasterResult<()> {
        if self.contains(x, y) {
            Ok(())
        } else {
            Err(RasterError::out_of_bounds(x, y, self.width, self.height))
        }
    }
}

/// Straight-alpha RGBA8 color. `a == 255` is opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from straight RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray with all channels set to `v`.
    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// Integer luma of the RGB channels.
    pub fn luminance(self) -> u8 {
        math::luminance(self.r, self.g, self.b)
    }

    /// The same color with alpha forced to opaque.
    pub fn opaque(self) -> Self {
        Self { a: 255, ..self }
    }

    /// Premultiplied `[r, g, b, a]`.
    pub fn to_premul(self) -> [u8; 4] {
        [
            math::premul(self.r, self.a),
            math::premul(self.g, self.a),
            math::premul(self.b, self.a),
            self.a,
        ]
    }

    /// Inverse of [`Color::to_premul`]. Lossy for partially transparent colors.
    pub fn from_premul(px: [u8; 4]) -> Self {
        let [r, g, b, a] = px;
        Self {
            r: math::unpremul(r, a),
            g: math::unpremul(g, a),
            b: math::unpremul(b, a),
            a,
        }
    }
}

/// Supported bits per pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum BitDepth {
    /// Black/white palette.
    Bits1,
    /// 256-level grayscale palette.
    Bits8,
    /// RGB.
    Bits24,
    /// Straight RGBA.
    Bits32,
}

impl BitDepth {
    /// Parse a bit count. Only 1, 8, 24 and 32 are supported.
    pub fn from_bits(bits: u16) -> RasterResult<Self> {
        match bits {
            1 => Ok(Self::Bits1),
            8 => Ok(Self::Bits8),
            24 => Ok(Self::Bits24),
            32 => Ok(Self::Bits32),
            other => Err(RasterError::validation(format!(
                "unsupported bit depth {other}"
            ))),
        }
    }

    /// Bits per pixel.
    pub fn bits(self) -> u16 {
        match self {
            Self::Bits1 => 1,
            Self::Bits8 => 8,
            Self::Bits24 => 24,
            Self::Bits32 => 32,
        }
    }

    /// Return `true` for palette-indexed depths.
    pub fn is_palettized(self) -> bool {
        matches!(self, Self::Bits1 | Self::Bits8)
    }

    /// Bytes needed for one row of `width` pixels.
    pub fn stride(self, width: u32) -> usize {
        let w = width as usize;
        match self {
            Self::Bits1 => w.div_ceil(8),
            Self::Bits8 => w,
            Self::Bits24 => w * 3,
            Self::Bits32 => w * 4,
        }
    }

    /// Palette index `color` quantizes to. `None` for true-color depths.
    pub fn index_of(self, color: Color) -> Option<u8> {
        match self {
            Self::Bits1 => Some(u8::from(color.luminance() >= 128)),
            Self::Bits8 => Some(color.luminance()),
            Self::Bits24 | Self::Bits32 => None,
        }
    }

    /// Palette entry for `index`. `None` for true-color depths or indices past the palette.
    pub fn palette_color(self, index: u8) -> Option<Color> {
        match self {
            Self::Bits1 => match index {
                0 => Some(Color::BLACK),
                1 => Some(Color::WHITE),
                _ => None,
            },
            Self::Bits8 => Some(Color::gray(index)),
            Self::Bits24 | Self::Bits32 => None,
        }
    }

    /// The color `color` reads back as after being stored at this depth.
    pub fn quantize(self, color: Color) -> Color {
        match self {
            Self::Bits1 | Self::Bits8 => self
                .index_of(color)
                .and_then(|i| self.palette_color(i))
                .unwrap_or(Color::BLACK),
            Self::Bits24 => color.opaque(),
            Self::Bits32 => color,
        }
    }
}

impl TryFrom<u16> for BitDepth {
    type Error = RasterError;

    fn try_from(bits: u16) -> RasterResult<Self> {
        Self::from_bits(bits)
    }
}

impl From<BitDepth> for u16 {
    fn from(depth: BitDepth) -> Self {
        depth.bits()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
