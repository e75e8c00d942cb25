// SPDX-License-Identifier: LGPL-3.0-only
//! Bundled fallback icons.
//!
//! A small set of SVG glyphs is compiled into the crate so the client always
//! has something to show, even without an icon theme. A resource directory
//! of `<name>.svg` or `<name>.png` files takes precedence when configured.

use std::path::{Path, PathBuf};

use crate::icon::error::IconError;
use crate::icon::loader::IconLoader;
use crate::icon::lookup::ICON_EXTENSIONS;
use crate::icon::pixmaps::{Icon, ICON_SIZES};
use crate::icon::source::FallbackIcons;

macro_rules! bundled {
    ($($name:literal),* $(,)?) => {
        &[$(($name, include_bytes!(concat!("../../resources/icons/", $name, ".svg")))),*]
    };
}

const BUNDLED: &[(&str, &[u8])] = bundled![
    "application-x-executable",
    "audio-x-generic",
    "emblem-symbolic-link",
    "folder",
    "font-x-generic",
    "image-x-generic",
    "package-x-generic",
    "text-html",
    "text-x-generic",
    "text-x-script",
    "video-x-generic",
    "x-office-document",
    "x-office-spreadsheet",
];

/// Bundled icons, optionally overridden from a directory.
#[derive(Debug, Default, Clone)]
pub struct BuiltinIcons {
    resource_dir: Option<PathBuf>,
}

impl BuiltinIcons {
    /// Compiled-in glyphs only.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer `<dir>/<name>.svg` or `<dir>/<name>.png` over the compiled-in
    /// glyphs.
    pub fn with_resource_dir(resource_dir: Option<PathBuf>) -> Self {
        Self { resource_dir }
    }

    fn from_resource_dir(&self, name: &str) -> Option<Icon> {
        let dir = self.resource_dir.as_ref()?;
        let path = ICON_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{}.{}", name, ext)))
            .find(|path| path.is_file())?;
        match load_file(&path) {
            Ok(icon) => Some(icon),
            Err(e) => {
                log::warn!("BuiltinIcons: Ignoring resource {:?}: {}", path, e);
                None
            },
        }
    }
}

fn load_file(path: &Path) -> Result<Icon, IconError> {
    let loader = IconLoader::new();
    if !IconLoader::is_scalable(path) {
        return Ok(Icon::from_image(loader.load_icon(path, 0)?));
    }
    let mut icon = Icon::new();
    for size in ICON_SIZES {
        icon.add_pixmap(loader.load_icon(path, size)?);
    }
    Ok(icon)
}

fn render_bundled(name: &str, data: &[u8]) -> Option<Icon> {
    let loader = IconLoader::new();
    let mut icon = Icon::new();
    for size in ICON_SIZES {
        match loader.render_svg(data, size) {
            Ok(pixmap) => icon.add_pixmap(pixmap),
            Err(e) => {
                log::error!("BuiltinIcons: Bundled glyph '{}' does not render: {}", name, e);
                return None;
            },
        }
    }
    Some(icon)
}

impl FallbackIcons for BuiltinIcons {
    fn resource(&self, name: &str) -> Option<Icon> {
        if let Some(icon) = self.from_resource_dir(name) {
            return Some(icon);
        }
        let (_, data) = BUNDLED.iter().find(|(n, _)| *n == name)?;
        render_bundled(name, data)
    }
}
