// SPDX-License-Identifier: LGPL-3.0-only
//! Coarse media categories reported by the disk API.

use serde::Deserialize;

/// Media category of a disk resource, independent of its exact MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Audio tracks.
    Audio,
    /// Backup archives.
    Backup,
    /// E-books.
    Book,
    /// Compressed archives.
    Compressed,
    /// Database-like data files.
    Data,
    /// Source code.
    Development,
    /// Disk images.
    Diskimage,
    /// Office documents.
    Document,
    /// Encrypted or encoded files.
    Encoded,
    /// Executables and installers.
    Executable,
    /// Flash movies.
    Flash,
    /// Font files.
    Font,
    /// Raster and vector images.
    Image,
    /// Configuration files.
    Settings,
    /// Spreadsheets.
    Spreadsheet,
    /// Plain text.
    Text,
    /// Video.
    Video,
    /// Web pages.
    Web,
    /// Anything the server could not classify.
    #[default]
    #[serde(other)]
    Unknown,
}

impl MediaType {
    /// Every category, in API order.
    pub const ALL: [MediaType; 19] = [
        Self::Audio,
        Self::Backup,
        Self::Book,
        Self::Compressed,
        Self::Data,
        Self::Development,
        Self::Diskimage,
        Self::Document,
        Self::Encoded,
        Self::Executable,
        Self::Flash,
        Self::Font,
        Self::Image,
        Self::Settings,
        Self::Spreadsheet,
        Self::Text,
        Self::Video,
        Self::Web,
        Self::Unknown,
    ];

    /// Parse the API name of a category. Unrecognized names map to [`MediaType::Unknown`].
    pub fn from_api_name(s: &str) -> Self {
        match s {
            "audio" => Self::Audio,
            "backup" => Self::Backup,
            "book" => Self::Book,
            "compressed" => Self::Compressed,
            "data" => Self::Data,
            "development" => Self::Development,
            "diskimage" => Self::Diskimage,
            "document" => Self::Document,
            "encoded" => Self::Encoded,
            "executable" => Self::Executable,
            "flash" => Self::Flash,
            "font" => Self::Font,
            "image" => Self::Image,
            "settings" => Self::Settings,
            "spreadsheet" => Self::Spreadsheet,
            "text" => Self::Text,
            "video" => Self::Video,
            "web" => Self::Web,
            _ => Self::Unknown,
        }
    }

    /// API name of the category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Backup => "backup",
            Self::Book => "book",
            Self::Compressed => "compressed",
            Self::Data => "data",
            Self::Development => "development",
            Self::Diskimage => "diskimage",
            Self::Document => "document",
            Self::Encoded => "encoded",
            Self::Executable => "executable",
            Self::Flash => "flash",
            Self::Font => "font",
            Self::Image => "image",
            Self::Settings => "settings",
            Self::Spreadsheet => "spreadsheet",
            Self::Text => "text",
            Self::Video => "video",
            Self::Web => "web",
            Self::Unknown => "unknown",
        }
    }
}
