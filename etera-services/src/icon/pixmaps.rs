// SPDX-License-Identifier: LGPL-3.0-only
//! Multi-size raster icons.

use std::fmt;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::RgbaImage;

/// Pixel sizes every prepared icon is rendered at.
pub const ICON_SIZES: [u32; 6] = [32, 48, 64, 96, 128, 256];

/// Index into [`ICON_SIZES`] of the size list views use by default (48 px).
pub const DEFAULT_ICON_SIZE_INDEX: usize = 1;

/// A set of raster images of one glyph at different sizes.
///
/// Pixmaps are kept ordered by area. Cloning is cheap: pixel data is shared.
#[derive(Clone, Default, PartialEq)]
pub struct Icon {
    pixmaps: Vec<Arc<RgbaImage>>,
}

impl Icon {
    /// Create an icon without pixmaps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an icon from a single image.
    pub fn from_image(image: RgbaImage) -> Self {
        let mut icon = Self::new();
        icon.add_pixmap(image);
        icon
    }

    /// Add a pixmap. Empty images are ignored.
    pub fn add_pixmap(&mut self, image: RgbaImage) {
        if image.width() == 0 || image.height() == 0 {
            return;
        }
        let area = area(&image);
        let at = self.pixmaps.partition_point(|p| area_of(p) <= area);
        self.pixmaps.insert(at, Arc::new(image));
    }

    /// Whether the icon has no pixmaps at all.
    pub fn is_null(&self) -> bool {
        self.pixmaps.is_empty()
    }

    /// Widths of the stored pixmaps, smallest first.
    pub fn sizes(&self) -> Vec<u32> {
        self.pixmaps.iter().map(|p| p.width()).collect()
    }

    /// Stored pixmaps, smallest first.
    pub fn pixmaps(&self) -> impl Iterator<Item = &RgbaImage> {
        self.pixmaps.iter().map(|p| p.as_ref())
    }

    /// The exact pixmap of the given width, if one is stored.
    pub fn exact(&self, size: u32) -> Option<&RgbaImage> {
        self.pixmaps().find(|p| p.width() == size)
    }

    /// Render the icon to fit in a `size` x `size` box.
    ///
    /// The smallest pixmap covering the box is scaled down keeping its aspect
    /// ratio. When no pixmap is large enough, the largest one is returned
    /// unscaled, so the result may be smaller than requested.
    pub fn pixmap(&self, size: u32) -> Option<RgbaImage> {
        let best = self
            .pixmaps
            .iter()
            .find(|p| p.width() >= size && p.height() >= size)
            .or_else(|| self.pixmaps.last())?;

        if best.width() <= size && best.height() <= size {
            return Some(best.as_ref().clone());
        }

        let longest = best.width().max(best.height()) as f64;
        let scale = size as f64 / longest;
        let width = ((best.width() as f64 * scale).round() as u32).max(1);
        let height = ((best.height() as f64 * scale).round() as u32).max(1);
        Some(imageops::resize(best.as_ref(), width, height, FilterType::Lanczos3))
    }

    /// Render the icon at every size of [`ICON_SIZES`] divided by `scale`.
    ///
    /// Pixmaps narrower than the target are stretched to a square, or centered
    /// on a transparent square when `center` is set. Null icons produce
    /// transparent squares.
    pub fn prepare(&self, scale: u32, center: bool) -> Icon {
        let scale = scale.max(1);
        let mut result = Icon::new();

        for base in ICON_SIZES {
            let size = base / scale;
            let pixmap = match self.pixmap(size) {
                Some(pixmap) if pixmap.width() < size => {
                    if center {
                        let mut canvas = RgbaImage::new(size, size);
                        let dx = (size - pixmap.width()) / 2;
                        let dy = size.saturating_sub(pixmap.height()) / 2;
                        imageops::overlay(&mut canvas, &pixmap, dx as i64, dy as i64);
                        canvas
                    } else {
                        imageops::resize(&pixmap, size, size, FilterType::Lanczos3)
                    }
                },
                Some(pixmap) => pixmap,
                None => RgbaImage::new(size, size),
            };
            result.add_pixmap(pixmap);
        }

        result
    }

    /// Draw `badge` over the bottom-right quadrant of every fixed size.
    pub fn with_badge(&self, badge: &Icon) -> Icon {
        let mut result = Icon::new();

        for size in ICON_SIZES {
            let half = size / 2;
            let mut base = self
                .pixmap(size)
                .unwrap_or_else(|| RgbaImage::new(size, size));
            if let Some(emblem) = badge.pixmap(half) {
                imageops::overlay(&mut base, &emblem, half as i64, half as i64);
            }
            result.add_pixmap(base);
        }

        result
    }
}

impl fmt::Debug for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<(u32, u32)> = self.pixmaps.iter().map(|p| p.dimensions()).collect();
        f.debug_struct("Icon").field("pixmaps", &dims).finish()
    }
}

fn area(image: &RgbaImage) -> u64 {
    image.width() as u64 * image.height() as u64
}

fn area_of(image: &Arc<RgbaImage>) -> u64 {
    area(image.as_ref())
}
