// SPDX-License-Identifier: LGPL-3.0-only
//! Prepared base glyphs: directory, file, link badge and media categories.

use std::collections::HashMap;

use crate::icon::pixmaps::Icon;
use crate::icon::source::{themed_icon, FallbackIcons, ThemeIcons};
use crate::item::MediaType;

/// Theme icon name and bundled resource for a media category.
#[derive(Debug, Clone, Copy)]
pub struct MediaIconEntry {
    /// Media category.
    pub media_type: MediaType,
    /// Icon theme name, if the category has one.
    pub theme_icon: Option<&'static str>,
    /// Bundled fallback resource, if the category has one.
    pub resource_icon: Option<&'static str>,
}

const fn entry(
    media_type: MediaType,
    theme_icon: Option<&'static str>,
    resource_icon: Option<&'static str>,
) -> MediaIconEntry {
    MediaIconEntry {
        media_type,
        theme_icon,
        resource_icon,
    }
}

/// Icons of the media categories. Categories listed with neither a theme
/// icon nor a resource have no media icon.
pub const MEDIA_ICONS: &[MediaIconEntry] = &[
    entry(MediaType::Audio, Some("audio-x-generic"), Some("audio-x-generic")),
    entry(MediaType::Backup, Some("package-x-generic"), Some("package-x-generic")),
    entry(MediaType::Book, None, None),
    entry(MediaType::Compressed, Some("package-x-generic"), Some("package-x-generic")),
    entry(MediaType::Data, None, None),
    entry(MediaType::Development, Some("text-x-script"), Some("text-x-script")),
    entry(MediaType::Diskimage, Some("package-x-generic"), Some("package-x-generic")),
    entry(MediaType::Document, Some("x-office-document"), Some("x-office-document")),
    entry(MediaType::Encoded, None, None),
    entry(MediaType::Executable, Some("application-x-executable"), Some("application-x-executable")),
    entry(MediaType::Flash, Some("video-x-generic"), Some("video-x-generic")),
    entry(MediaType::Font, Some("font-x-generic"), Some("font-x-generic")),
    entry(MediaType::Image, Some("image-x-generic"), Some("image-x-generic")),
    entry(MediaType::Settings, None, None),
    entry(MediaType::Spreadsheet, Some("x-office-spreadsheet"), Some("x-office-spreadsheet")),
    entry(MediaType::Text, Some("text-x-generic"), Some("text-x-generic")),
    entry(MediaType::Video, Some("video-x-generic"), Some("video-x-generic")),
    entry(MediaType::Web, Some("text-html"), Some("text-html")),
    entry(MediaType::Unknown, None, None),
];

/// Every static glyph the provider hands out, in plain and linked form.
pub struct Glyphs {
    /// The link badge, prepared at half size.
    pub link: Icon,
    dir: Icon,
    dir_link: Icon,
    file: Icon,
    file_link: Icon,
    media: HashMap<MediaType, (Icon, Icon)>,
}

impl Glyphs {
    /// Resolve and prepare every glyph.
    pub fn load(theme: &dyn ThemeIcons, fallback: &dyn FallbackIcons) -> Self {
        let base = |name: &str| {
            themed_icon(theme, fallback, Some(name), Some(name)).unwrap_or_else(|| {
                log::warn!("Glyphs: No icon for '{}', using a blank glyph", name);
                Icon::new()
            })
        };

        let link = base("emblem-symbolic-link").prepare(2, false);

        let dir = base("folder").prepare(1, false);
        let dir_link = dir.with_badge(&link);

        let file = base("text-x-generic").prepare(1, false);
        let file_link = file.with_badge(&link);

        let mut media = HashMap::new();
        for entry in MEDIA_ICONS {
            if entry.theme_icon.is_none() && entry.resource_icon.is_none() {
                continue;
            }
            let Some(icon) = themed_icon(theme, fallback, entry.theme_icon, entry.resource_icon)
            else {
                log::debug!("Glyphs: No icon for media type '{}'", entry.media_type.as_str());
                continue;
            };
            let plain = icon.prepare(1, false);
            let linked = plain.with_badge(&link);
            media.insert(entry.media_type, (plain, linked));
        }

        Self {
            link,
            dir,
            dir_link,
            file,
            file_link,
            media,
        }
    }

    /// Directory icon.
    pub fn directory(&self, shared: bool) -> &Icon {
        if shared {
            &self.dir_link
        } else {
            &self.dir
        }
    }

    /// Generic file icon.
    pub fn file(&self, shared: bool) -> &Icon {
        if shared {
            &self.file_link
        } else {
            &self.file
        }
    }

    /// Icon of a media category, if it has one.
    pub fn media(&self, media_type: MediaType, shared: bool) -> Option<&Icon> {
        self.media
            .get(&media_type)
            .map(|(plain, linked)| if shared { linked } else { plain })
    }
}
