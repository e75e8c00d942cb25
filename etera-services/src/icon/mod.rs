// SPDX-License-Identifier: LGPL-3.0-only
//! Icon system
//!
//! Multi-size icons, the XDG icon theme implementation, bundled fallback
//! glyphs and the platform file type icon sources used by the provider.

mod cache;
mod error;
mod fallback;
mod glyphs;
mod loader;
mod lookup;
mod pixmaps;
#[cfg(windows)]
mod shell;
mod source;
mod theme;
mod xdg_theme;

pub use cache::NativeIconCache;
pub use error::IconError;
pub use fallback::BuiltinIcons;
pub use glyphs::{Glyphs, MediaIconEntry, MEDIA_ICONS};
pub use loader::IconLoader;
pub use lookup::IconLookup;
pub use pixmaps::{Icon, DEFAULT_ICON_SIZE_INDEX, ICON_SIZES};
#[cfg(windows)]
pub use shell::ShellExtensionIcons;
pub use source::{themed_icon, FallbackIcons, NativeIcon, NativeIconSource, NoTheme, ThemeIcons};
pub use theme::{DirectoryType, IconContext, IconDirectory, IconTheme};
pub use xdg_theme::{mime_icon_names, XdgMimeIcons, XdgThemeIcons};
