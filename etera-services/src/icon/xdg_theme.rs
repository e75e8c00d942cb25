// SPDX-License-Identifier: LGPL-3.0-only
//! Icons from an XDG icon theme and the MIME icon naming scheme.

use std::collections::HashSet;
use std::path::PathBuf;
use std::rc::Rc;

use crate::icon::loader::IconLoader;
use crate::icon::lookup::IconLookup;
use crate::icon::pixmaps::{Icon, DEFAULT_ICON_SIZE_INDEX, ICON_SIZES};
use crate::icon::source::{NativeIcon, NativeIconSource, ThemeIcons};
use crate::icon::theme::IconContext;

/// [`ThemeIcons`] backed by an XDG icon theme on disk.
pub struct XdgThemeIcons {
    theme: String,
    lookup: IconLookup,
    loader: IconLoader,
}

impl XdgThemeIcons {
    /// Use the named theme from the standard icon directories.
    pub fn new(theme: impl Into<String>) -> Self {
        Self::with_lookup(theme, IconLookup::new())
    }

    /// Use the named theme from a custom lookup.
    pub fn with_lookup(theme: impl Into<String>, lookup: IconLookup) -> Self {
        let theme = theme.into();
        if let Err(e) = lookup.load_theme(&theme) {
            log::warn!("XdgThemeIcons: {}; only hicolor and bundled icons will be used", e);
        }
        Self {
            theme,
            lookup,
            loader: IconLoader::new(),
        }
    }

    /// Name of the configured theme.
    pub fn theme(&self) -> &str {
        &self.theme
    }

    fn find(&self, name: &str, size: u32) -> Option<PathBuf> {
        self.lookup
            .lookup_icon(name, size, IconContext::guess(name), &self.theme)
    }
}

impl ThemeIcons for XdgThemeIcons {
    fn has_icon(&self, name: &str) -> bool {
        self.find(name, ICON_SIZES[DEFAULT_ICON_SIZE_INDEX]).is_some()
    }

    fn icon(&self, name: &str) -> Option<Icon> {
        let mut seen = HashSet::new();
        let mut icon = Icon::new();

        for size in ICON_SIZES {
            let Some(path) = self.find(name, size) else {
                continue;
            };
            // Raster files load once; vector files render at every size.
            if !IconLoader::is_scalable(&path) && !seen.insert(path.clone()) {
                continue;
            }
            match self.loader.load_icon(&path, size) {
                Ok(pixmap) => icon.add_pixmap(pixmap),
                Err(e) => log::debug!("XdgThemeIcons: {}", e),
            }
        }

        if icon.is_null() {
            None
        } else {
            Some(icon)
        }
    }
}

/// File type icons by MIME type, resolved through the icon theme.
///
/// `type/subtype` maps to the theme icon `type-subtype`, then to the
/// generic `type-x-generic`.
pub struct XdgMimeIcons {
    theme: Rc<dyn ThemeIcons>,
}

impl XdgMimeIcons {
    /// Resolve MIME icons through `theme`.
    pub fn new(theme: Rc<dyn ThemeIcons>) -> Self {
        Self { theme }
    }
}

/// Theme icon names for a MIME type: the specific name and the generic one.
pub fn mime_icon_names(mime: &mime::Mime) -> (String, String) {
    let specific = mime.essence_str().replace('/', "-");
    let generic = format!("{}-x-generic", mime.type_());
    (specific, generic)
}

impl NativeIconSource for XdgMimeIcons {
    fn name(&self) -> &'static str {
        "xdg-mime"
    }

    fn lookup(&self, key: &str) -> NativeIcon {
        let mime: mime::Mime = match key.parse() {
            Ok(mime) => mime,
            Err(e) => {
                log::debug!("XdgMimeIcons: Invalid MIME type '{}': {}", key, e);
                return NativeIcon::Missing;
            },
        };

        if mime == mime::APPLICATION_OCTET_STREAM {
            return NativeIcon::Missing;
        }

        let (specific, generic) = mime_icon_names(&mime);
        let name = if self.theme.has_icon(&specific) {
            specific
        } else if self.theme.has_icon(&generic) {
            generic
        } else {
            return NativeIcon::Missing;
        };

        match self.theme.icon(&name) {
            Some(icon) => NativeIcon::Found {
                icon,
                center: false,
            },
            None => NativeIcon::Missing,
        }
    }
}
