// SPDX-License-Identifier: LGPL-3.0-only
//! Disk resource model consumed by the icon services.
//!
//! The client's item model lives elsewhere; the services only need the
//! handful of properties exposed by [`DiskItem`]. [`Resource`] is a plain
//! implementation deserialized from the disk REST API.

mod media;

pub use media::MediaType;

use serde::Deserialize;

use crate::icon::Icon;

/// Read-only view of a disk resource.
pub trait DiskItem {
    /// The resource is a directory.
    fn is_dir(&self) -> bool;
    /// The resource is a regular file.
    fn is_file(&self) -> bool;
    /// The resource has a public share link.
    fn is_public(&self) -> bool;
    /// Lowercase file extension, without the dot.
    fn extension(&self) -> Option<&str>;
    /// MIME type of the file contents.
    fn mime_type(&self) -> Option<&str>;
    /// Coarse media category.
    fn media_type(&self) -> MediaType;
    /// Identifier (URL) of the server-rendered preview.
    fn preview(&self) -> Option<&str>;
}

/// A list widget row that displays a disk item.
///
/// Rows live on the UI thread; `set_icon` takes `&self` so the row can be
/// shared through `Rc` and updated when a preview arrives.
pub trait ListItem {
    /// The disk item shown by this row.
    fn item(&self) -> &dyn DiskItem;
    /// Replace the row's icon.
    fn set_icon(&self, icon: Icon);
}

/// Kind of disk resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// A directory.
    Dir,
    /// A regular file.
    File,
}

#[derive(Debug, Clone, Deserialize)]
struct ResourceRecord {
    name: String,
    #[serde(default)]
    path: String,
    #[serde(rename = "type")]
    resource_type: ResourceType,
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    media_type: MediaType,
    #[serde(default)]
    preview: Option<String>,
    #[serde(default)]
    public_url: Option<String>,
    #[serde(default)]
    public_key: Option<String>,
    #[serde(default)]
    size: Option<u64>,
}

/// A disk resource as returned by the REST API.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "ResourceRecord")]
pub struct Resource {
    /// Display name.
    pub name: String,
    /// Full disk path (`disk:/...`).
    pub path: String,
    /// Directory or file.
    pub resource_type: ResourceType,
    /// MIME type, reported by the server or guessed from the extension.
    pub mime_type: Option<String>,
    /// Media category.
    pub media_type: MediaType,
    /// Preview URL.
    pub preview: Option<String>,
    /// Public link, if the resource is shared.
    pub public_url: Option<String>,
    /// Public key, if the resource is shared.
    pub public_key: Option<String>,
    /// File size in bytes.
    pub size: Option<u64>,
    extension: Option<String>,
}

impl Resource {
    /// Create a directory resource.
    pub fn dir(name: impl Into<String>) -> Self {
        Self::new(name.into(), ResourceType::Dir)
    }

    /// Create a file resource.
    pub fn file(name: impl Into<String>) -> Self {
        Self::new(name.into(), ResourceType::File)
    }

    fn new(name: String, resource_type: ResourceType) -> Self {
        Resource::from(ResourceRecord {
            path: format!("disk:/{}", name),
            name,
            resource_type,
            mime_type: None,
            media_type: MediaType::Unknown,
            preview: None,
            public_url: None,
            public_key: None,
            size: None,
        })
    }

    /// Parse a resource from the JSON body of a resource request.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Set the media category.
    pub fn with_media_type(mut self, media_type: MediaType) -> Self {
        self.media_type = media_type;
        self
    }

    /// Set the MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Set the preview URL.
    pub fn with_preview(mut self, preview: impl Into<String>) -> Self {
        self.preview = Some(preview.into());
        self
    }

    /// Mark the resource as published under the given link.
    pub fn with_public_url(mut self, url: impl Into<String>) -> Self {
        self.public_url = Some(url.into());
        self
    }
}

impl From<ResourceRecord> for Resource {
    fn from(record: ResourceRecord) -> Self {
        let extension = extension_of(&record.name);
        let mime_type = match record.mime_type {
            Some(mime) if !mime.is_empty() => Some(mime),
            _ if record.resource_type == ResourceType::File => {
                extension.as_deref().and_then(guess_mime_type)
            },
            _ => None,
        };

        Self {
            name: record.name,
            path: record.path,
            resource_type: record.resource_type,
            mime_type,
            media_type: record.media_type,
            preview: record.preview.filter(|p| !p.is_empty()),
            public_url: record.public_url.filter(|u| !u.is_empty()),
            public_key: record.public_key.filter(|k| !k.is_empty()),
            size: record.size,
            extension,
        }
    }
}

impl DiskItem for Resource {
    fn is_dir(&self) -> bool {
        self.resource_type == ResourceType::Dir
    }

    fn is_file(&self) -> bool {
        self.resource_type == ResourceType::File
    }

    fn is_public(&self) -> bool {
        self.public_url.is_some() || self.public_key.is_some()
    }

    fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    fn mime_type(&self) -> Option<&str> {
        self.mime_type.as_deref()
    }

    fn media_type(&self) -> MediaType {
        self.media_type
    }

    fn preview(&self) -> Option<&str> {
        self.preview.as_deref()
    }
}

/// Lowercase suffix after the last dot. Dotfiles have no extension.
fn extension_of(name: &str) -> Option<String> {
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

fn guess_mime_type(ext: &str) -> Option<String> {
    let mime = mime_guess2::from_ext(ext).first()?;
    log::debug!("Resource: guessed MIME type '{}' for extension '{}'", mime, ext);
    Some(mime.to_string())
}
