use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::device::virtual_device::VirtualDevice;
use crate::foundation::core::{Affine, BitDepth, Color, Point, Size};
use crate::foundation::error::{RasterError, RasterResult};
use crate::foundation::settings::RasterSettings;
use crate::raster::alpha::{AlphaMask, BitmapEx};
use crate::raster::bitmap::{BitmapState, LazyBitmap};

/// A device plus a list of bitmap draws and the pixels to probe afterwards.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    /// Target surface.
    pub device: DeviceDef,
    /// Settings shared by the device and every bitmap.
    #[serde(default)]
    pub settings: RasterSettings,
    /// Draws, in order.
    #[serde(default)]
    pub draws: Vec<DrawDef>,
    /// Device pixels to report.
    #[serde(default)]
    pub probes: Vec<[i64; 2]>,
}

/// Target surface description.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DeviceDef {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Background RGB; white when omitted.
    #[serde(default = "white")]
    pub background: [u8; 3],
}

/// One bitmap draw.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct DrawDef {
    /// Color bitmap.
    pub bitmap: BitmapDef,
    /// Optional transparency mask, same size as the bitmap.
    #[serde(default)]
    pub alpha: Option<AlphaDef>,
    /// Top-left corner for unscaled and scaled draws.
    #[serde(default)]
    pub at: [f64; 2],
    /// Scale a source region into a destination region.
    #[serde(default)]
    pub scaled: Option<ScaledDef>,
    /// Affine coefficients `[a, b, c, d, e, f]` applied to the unit square; overrides `at`.
    #[serde(default)]
    pub transform: Option<[f64; 6]>,
}

/// Color bitmap description.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct BitmapDef {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Bits per pixel.
    #[serde(default = "depth24")]
    pub depth: BitDepth,
    /// Erase color.
    #[serde(default)]
    pub erase: Option<[u8; 3]>,
    /// Rectangles written after the erase, which materializes the buffer.
    #[serde(default)]
    pub fill_rects: Vec<FillRectDef>,
}

/// A filled rectangle inside a bitmap.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FillRectDef {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
    /// Fill RGB.
    pub color: [u8; 3],
}

/// Uniform transparency mask.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AlphaDef {
    /// Transparency, `0` opaque.
    pub erase: u8,
}

/// Source and destination regions for a scaled draw.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ScaledDef {
    /// Destination size.
    pub dest_size: [u32; 2],
    /// Source top-left corner.
    pub src: [f64; 2],
    /// Source size.
    pub src_size: [u32; 2],
}

/// What [`Scene::render`] observed.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneReport {
    /// Probed device pixels, in request order.
    pub probes: Vec<ProbeReport>,
    /// Representation state of each drawn bitmap after its draw.
    pub draws: Vec<DrawReport>,
}

/// A probed device pixel.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProbeReport {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
    /// RGB at that pixel, or `None` when the probe is off the device.
    pub rgb: Option<[u8; 3]>,
}

/// Bitmap state after a draw.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DrawReport {
    /// Color bitmap flags.
    pub bitmap: BitmapState,
    /// Mask flags, if a mask was drawn.
    pub alpha: Option<BitmapState>,
    /// Whether the bitmap preferred the accelerated path when drawn.
    pub prefer_accelerated: bool,
}

fn white() -> [u8; 3] {
    [255, 255, 255]
}

fn depth24() -> BitDepth {
    BitDepth::Bits24
}

fn rgb(c: [u8; 3]) -> Color {
    Color::rgb(c[0], c[1], c[2])
}

impl Scene {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> RasterResult<Self> {
        serde_json::from_reader(r).map_err(|e| RasterError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> RasterResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            RasterError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check sizes before anything is allocated.
    pub fn validate(&self) -> RasterResult<()> {
        Size::new(self.device.width, self.device.height)?;
        for (i, draw) in self.draws.iter().enumerate() {
            Size::new(draw.bitmap.width, draw.bitmap.height)
                .map_err(|e| RasterError::validation(format!("draws[{i}].bitmap: {e}")))?;
            if let Some(s) = &draw.scaled {
                Size::new(s.dest_size[0], s.dest_size[1])
                    .map_err(|e| RasterError::validation(format!("draws[{i}].dest_size: {e}")))?;
                Size::new(s.src_size[0], s.src_size[1])
                    .map_err(|e| RasterError::validation(format!("draws[{i}].src_size: {e}")))?;
            }
            if draw.scaled.is_some() && draw.transform.is_some() {
                return Err(RasterError::validation(format!(
                    "draws[{i}]: `scaled` and `transform` are exclusive"
                )));
            }
        }
        Ok(())
    }

    /// Validate, draw everything onto a fresh device, and probe it.
    #[tracing::instrument(skip(self), fields(draws = self.draws.len()))]
    pub fn render(&self) -> RasterResult<SceneReport> {
        self.validate()?;
        let mut device = VirtualDevice::with_settings(
            Size::new(self.device.width, self.device.height)?,
            self.settings,
        );
        device.set_background(rgb(self.device.background));
        device.erase();

        let mut draws = Vec::with_capacity(self.draws.len());
        for def in &self.draws {
            draws.push(self.draw_one(&mut device, def)?);
        }

        let probes = self
            .probes
            .iter()
            .map(|&[x, y]| ProbeReport {
                x,
                y,
                rgb: device
                    .get_pixel(Point::new(x as f64, y as f64))
                    .ok()
                    .map(|c| [c.r, c.g, c.b]),
            })
            .collect();

        Ok(SceneReport { probes, draws })
    }

    fn draw_one(&self, device: &mut VirtualDevice, def: &DrawDef) -> RasterResult<DrawReport> {
        let size = Size::new(def.bitmap.width, def.bitmap.height)?;
        let mut bitmap = LazyBitmap::with_settings(size, def.bitmap.depth, self.settings);
        if let Some(c) = def.bitmap.erase {
            bitmap.erase(rgb(c));
        }
        for r in &def.bitmap.fill_rects {
            bitmap.fill_rect(r.x, r.y, r.width, r.height, rgb(r.color))?;
        }
        let prefer_accelerated = bitmap.prefer_accelerated_path();

        let mut ex = match &def.alpha {
            Some(a) => {
                let mut mask = AlphaMask::with_settings(size, self.settings);
                mask.erase(a.erase);
                BitmapEx::new(bitmap, mask)?
            }
            None => BitmapEx::from(bitmap),
        };

        let at = Point::new(def.at[0], def.at[1]);
        match (&def.scaled, def.transform) {
            (Some(s), _) => device.draw_bitmap_ex_scaled(
                at,
                Size::new(s.dest_size[0], s.dest_size[1])?,
                Point::new(s.src[0], s.src[1]),
                Size::new(s.src_size[0], s.src_size[1])?,
                &mut ex,
            )?,
            (None, Some(coeffs)) => device.draw_transformed_bitmap_ex(Affine::new(coeffs), &mut ex)?,
            (None, None) => device.draw_bitmap_ex(at, &mut ex)?,
        }

        Ok(DrawReport {
            bitmap: ex.bitmap().state(),
            alpha: ex.alpha().map(AlphaMask::state),
            prefer_accelerated,
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/scene.rs"]
mod tests;
