// SPDX-License-Identifier: LGPL-3.0-only
//! Icon loader for PNG and SVG files.

use std::fs;
use std::path::Path;

use image::RgbaImage;
use resvg::{tiny_skia, usvg};

use crate::icon::error::IconError;

/// Loads icon files from disk into RGBA pixmaps.
///
/// Raster files load at their own size. Vector files are rendered at the
/// requested size.
pub struct IconLoader;

impl IconLoader {
    /// Create a new icon loader.
    pub fn new() -> Self {
        Self
    }

    /// Whether `path` is a vector icon that renders at any size.
    pub fn is_scalable(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
    }

    /// Load an icon from a file path. `size` applies to vector icons.
    pub fn load_icon(&self, path: &Path, size: u32) -> Result<RgbaImage, IconError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "svg" => self.load_svg(path, size),
            "png" => self.load_png(path),
            _ => Err(IconError::InvalidFormat(format!(
                "Unsupported icon format: {}",
                extension
            ))),
        }
    }

    fn load_svg(&self, path: &Path, size: u32) -> Result<RgbaImage, IconError> {
        let data = fs::read(path)?;
        self.render_svg(&data, size)
    }

    fn load_png(&self, path: &Path) -> Result<RgbaImage, IconError> {
        let bytes = fs::read(path)?;
        let img = image::load_from_memory(&bytes).map_err(|source| IconError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(img.to_rgba8())
    }

    /// Render SVG markup into a `size` x `size` pixmap, stretched to fill it.
    pub fn render_svg(&self, data: &[u8], size: u32) -> Result<RgbaImage, IconError> {
        let tree = usvg::Tree::from_data(data, &usvg::Options::default())
            .map_err(|e| IconError::InvalidFormat(format!("Failed to load SVG: {}", e)))?;

        let mut pixmap = tiny_skia::Pixmap::new(size, size).ok_or_else(|| {
            IconError::InvalidFormat(format!("Cannot render SVG at {}x{}", size, size))
        })?;
        let source = tree.size();
        let transform = tiny_skia::Transform::from_scale(
            size as f32 / source.width(),
            size as f32 / source.height(),
        );
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        // tiny-skia stores premultiplied alpha.
        let pixels = pixmap
            .pixels()
            .iter()
            .flat_map(|pixel| {
                let color = pixel.demultiply();
                [color.red(), color.green(), color.blue(), color.alpha()]
            })
            .collect();
        RgbaImage::from_raw(size, size, pixels).ok_or_else(|| {
            IconError::InvalidFormat(format!("SVG render produced a short buffer at {}", size))
        })
    }
}

impl Default for IconLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16">
  <rect x="0" y="0" width="8" height="16" fill="#ff0000"/>
</svg>"##;

    #[test]
    fn rejects_unknown_formats() {
        let loader = IconLoader::new();
        let result = loader.load_icon(Path::new("/nonexistent/folder.xpm"), 48);
        assert!(matches!(result, Err(IconError::InvalidFormat(_))));
    }

    #[test]
    fn loads_png_and_reports_corrupt_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        RgbaImage::new(4, 2).save(&good).unwrap();
        let bad = dir.path().join("bad.png");
        fs::write(&bad, b"not a png").unwrap();

        let loader = IconLoader::new();
        assert_eq!(loader.load_icon(&good, 48).unwrap().dimensions(), (4, 2));
        assert!(matches!(loader.load_icon(&bad, 48), Err(IconError::Decode { .. })));
    }

    #[test]
    fn renders_svg_at_requested_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("half.svg");
        fs::write(&path, SQUARE).unwrap();

        let loader = IconLoader::new();
        assert!(IconLoader::is_scalable(&path));
        for size in [32, 96] {
            let pixmap = loader.load_icon(&path, size).unwrap();
            assert_eq!(pixmap.dimensions(), (size, size));
            assert_eq!(pixmap.get_pixel(2, size / 2).0, [255, 0, 0, 255]);
            assert_eq!(pixmap.get_pixel(size - 2, size / 2).0[3], 0);
        }
    }

    #[test]
    fn reports_broken_svg() {
        let loader = IconLoader::new();
        assert!(matches!(
            loader.render_svg(b"<svg", 32),
            Err(IconError::InvalidFormat(_))
        ));
        assert!(loader.render_svg(SQUARE.as_bytes(), 0).is_err());
    }
}
