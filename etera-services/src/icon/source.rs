// SPDX-License-Identifier: LGPL-3.0-only
//! Seams between the icon provider and the platform.

use crate::icon::pixmaps::Icon;

/// Named icons from the desktop icon theme.
pub trait ThemeIcons {
    /// Whether the theme provides an icon with this name.
    fn has_icon(&self, name: &str) -> bool;
    /// Load every available size of a themed icon.
    fn icon(&self, name: &str) -> Option<Icon>;
}

/// Icons bundled with the application, used when the theme lacks one.
pub trait FallbackIcons {
    /// Load a bundled icon by resource name.
    fn resource(&self, name: &str) -> Option<Icon>;
}

/// Outcome of asking the platform for a file type icon.
#[derive(Debug, Clone)]
pub enum NativeIcon {
    /// The platform returned an icon.
    Found {
        /// Raw icon, not yet prepared.
        icon: Icon,
        /// Center the glyph instead of stretching it when it is too small.
        center: bool,
    },
    /// The platform has no icon for this key; asking again is pointless.
    Missing,
    /// The query itself failed; it may succeed later.
    Unavailable,
}

/// A platform icon service keyed by a file type (extension or MIME type).
pub trait NativeIconSource {
    /// Short name used in logs.
    fn name(&self) -> &'static str;
    /// Ask the platform for the icon of `key`.
    fn lookup(&self, key: &str) -> NativeIcon;
}

/// A theme without any icons.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTheme;

impl ThemeIcons for NoTheme {
    fn has_icon(&self, _name: &str) -> bool {
        false
    }

    fn icon(&self, _name: &str) -> Option<Icon> {
        None
    }
}

/// Resolve a themed icon, falling back to a bundled resource.
pub fn themed_icon(
    theme: &dyn ThemeIcons,
    fallback: &dyn FallbackIcons,
    theme_name: Option<&str>,
    resource_name: Option<&str>,
) -> Option<Icon> {
    theme_name
        .and_then(|name| theme.icon(name))
        .or_else(|| resource_name.and_then(|name| fallback.resource(name)))
}
