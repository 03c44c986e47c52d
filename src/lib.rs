//! Lazily materialized raster bitmaps.
//!
//! A [`LazyBitmap`] starts out with no pixel storage. Erasing it to a color records only that
//! color; a CPU [`PixelBuffer`] is allocated the first time pixels are read or written, and an
//! [`AcceleratedImage`] is built only when a consumer asks for one. [`AlphaMask::blend_with`]
//! composes masks analytically while both operands are still pure erase colors, and a small
//! [`VirtualDevice`] draws bitmaps and masks with identical output whatever their representation.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod device;
mod foundation;
mod raster;

/// Scene descriptions rendered by the `lazyraster` binary.
pub mod scene;

pub use crate::device::composite::{PremulRgba8, opacity_of, over};
pub use crate::device::virtual_device::VirtualDevice;
pub use crate::foundation::core::{Affine, BitDepth, Color, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{RasterError, RasterResult};
pub use crate::foundation::settings::{ACCEL_ENV, RasterSettings};
pub use crate::raster::alpha::{AlphaMask, BitmapEx};
pub use crate::raster::bitmap::{BitmapState, LazyBitmap};
pub use crate::raster::blend::blend_value;
pub use crate::raster::buffer::PixelBuffer;
pub use crate::raster::image::AcceleratedImage;
