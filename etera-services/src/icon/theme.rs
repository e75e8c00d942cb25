// SPDX-License-Identifier: LGPL-3.0-only
//! XDG Icon Theme parsing.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::icon::error::IconError;

/// Icon context (directory type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconContext {
    /// Actions context.
    Actions,
    /// Applications context.
    Apps,
    /// Devices context.
    Devices,
    /// Emblems context.
    Emblems,
    /// MIME types context.
    Mimetypes,
    /// Places context.
    Places,
    /// Status context.
    Status,
    /// Unknown context.
    Unknown,
}

impl IconContext {
    /// Parse context from an `index.theme` value.
    pub fn parse(s: &str) -> Self {
        match s {
            "Actions" => Self::Actions,
            "Applications" | "Apps" => Self::Apps,
            "Devices" => Self::Devices,
            "Emblems" => Self::Emblems,
            "MimeTypes" | "Mimetypes" => Self::Mimetypes,
            "Places" => Self::Places,
            "Status" => Self::Status,
            _ => Self::Unknown,
        }
    }

    /// Guess the context an icon name belongs to.
    pub fn guess(icon_name: &str) -> Self {
        if icon_name.starts_with("folder") {
            Self::Places
        } else if icon_name.starts_with("emblem-") {
            Self::Emblems
        } else if icon_name.starts_with("media-") || icon_name.starts_with("drive-") {
            Self::Devices
        } else if ["text-", "image-", "audio-", "video-", "application-", "font-", "package-", "x-office-"]
            .iter()
            .any(|prefix| icon_name.starts_with(prefix))
        {
            Self::Mimetypes
        } else {
            Self::Unknown
        }
    }
}

/// Directory type for icon directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryType {
    /// Fixed size directory.
    Fixed,
    /// Scalable directory.
    Scalable,
    /// Threshold directory.
    Threshold,
}

impl DirectoryType {
    /// Parse directory type from an `index.theme` value.
    pub fn parse(s: &str) -> Self {
        match s {
            "Scalable" => Self::Scalable,
            "Threshold" => Self::Threshold,
            _ => Self::Fixed,
        }
    }
}

/// Icon directory information.
#[derive(Debug, Clone)]
pub struct IconDirectory {
    /// Directory name, relative to the theme root.
    pub name: String,
    /// Nominal size of icons in this directory.
    pub size: u32,
    /// Scale factor (usually 1).
    pub scale: u32,
    /// Context of icons.
    pub context: IconContext,
    /// Directory type.
    pub directory_type: DirectoryType,
    /// Minimum size (for scalable).
    pub min_size: Option<u32>,
    /// Maximum size (for scalable).
    pub max_size: Option<u32>,
    /// Threshold (for threshold directories).
    pub threshold: Option<u32>,
}

impl IconDirectory {
    /// How badly this directory matches a requested size; lower is better.
    ///
    /// Larger directories are preferred over smaller ones, since downscaling
    /// keeps quality and upscaling blurs.
    pub fn size_distance(&self, size: u32) -> i64 {
        const UPSCALE_PENALTY: i64 = 10_000;
        let diff = |a: u32, b: u32| (a as i64 - b as i64).abs();

        match self.directory_type {
            DirectoryType::Fixed => {
                if self.size >= size {
                    diff(self.size, size)
                } else {
                    diff(self.size, size) + UPSCALE_PENALTY
                }
            },
            DirectoryType::Scalable => {
                let min = self.min_size.unwrap_or(self.size);
                let max = self.max_size.unwrap_or(self.size);
                if size >= min && size <= max {
                    0
                } else if size < min {
                    diff(min, size)
                } else {
                    diff(size, max) + UPSCALE_PENALTY
                }
            },
            DirectoryType::Threshold => {
                let threshold = self.threshold.unwrap_or(2) as i64;
                let d = diff(self.size, size);
                if d <= threshold {
                    0
                } else if self.size > size {
                    d
                } else {
                    d + UPSCALE_PENALTY
                }
            },
        }
    }
}

/// XDG Icon Theme.
#[derive(Debug, Clone)]
pub struct IconTheme {
    /// Theme name.
    pub name: String,
    /// Inherited themes (fallback chain).
    pub inherits: Vec<String>,
    /// Directories in this theme.
    pub directories: Vec<IconDirectory>,
    /// Base path to theme directory.
    pub base_path: PathBuf,
}

impl IconTheme {
    /// Load an icon theme from a directory containing `index.theme`.
    pub fn load(theme_name: &str, base_path: PathBuf) -> Result<Self, IconError> {
        let index_path = base_path.join("index.theme");

        if !index_path.exists() {
            return Err(IconError::ThemeNotFound(theme_name.to_string()));
        }

        let content = std::fs::read_to_string(&index_path)?;
        Self::parse(theme_name, base_path, &content)
    }

    /// Parse the contents of an `index.theme` file.
    pub fn parse(theme_name: &str, base_path: PathBuf, content: &str) -> Result<Self, IconError> {
        let ini = parse_ini(content);

        let theme_section = ini
            .get("Icon Theme")
            .ok_or_else(|| IconError::IndexParseError("Missing [Icon Theme] section".to_string()))?;

        let name = theme_section
            .get("Name")
            .cloned()
            .unwrap_or_else(|| theme_name.to_string());

        let inherits = theme_section
            .get("Inherits")
            .map(|s| split_list(s))
            .unwrap_or_default();

        let directory_names = theme_section
            .get("Directories")
            .map(|s| split_list(s))
            .ok_or_else(|| IconError::IndexParseError("Missing Directories key".to_string()))?;

        let directories = directory_names
            .into_iter()
            .filter_map(|dir_name| {
                let section = ini.get(dir_name.as_str())?;
                let number = |key: &str| section.get(key).and_then(|s| s.parse::<u32>().ok());

                Some(IconDirectory {
                    size: number("Size").unwrap_or(48),
                    scale: number("Scale").unwrap_or(1),
                    context: section
                        .get("Context")
                        .map(|s| IconContext::parse(s))
                        .unwrap_or(IconContext::Unknown),
                    directory_type: section
                        .get("Type")
                        .map(|s| DirectoryType::parse(s))
                        .unwrap_or(DirectoryType::Threshold),
                    min_size: number("MinSize"),
                    max_size: number("MaxSize"),
                    threshold: number("Threshold"),
                    name: dir_name,
                })
            })
            .collect();

        Ok(IconTheme {
            name,
            inherits,
            directories,
            base_path,
        })
    }

    /// Get the path to a directory by name.
    pub fn directory_path(&self, dir_name: &str) -> PathBuf {
        self.base_path.join(dir_name)
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Simple INI parser for index.theme files.
fn parse_ini(content: &str) -> HashMap<String, HashMap<String, String>> {
    let mut result = HashMap::new();
    let mut current_section: Option<String> = None;
    let mut current_map = HashMap::new();

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            if let Some(section) = current_section.take() {
                result.insert(section, std::mem::take(&mut current_map));
            }
            current_section = Some(line[1..line.len() - 1].to_string());
            continue;
        }

        if let Some((key, value)) = line.split_once('=') {
            current_map.insert(key.trim().to_string(), value.trim().to_string());
        }
    }

    if let Some(section) = current_section {
        result.insert(section, current_map);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = "\
[Icon Theme]
Name=Tango
Inherits=hicolor, gnome
Directories=16x16/mimetypes,48x48/places,scalable/mimetypes

# comment
[16x16/mimetypes]
Size=16
Context=MimeTypes
Type=Fixed

[48x48/places]
Size=48
Context=Places
Type=Threshold

[scalable/mimetypes]
Size=64
MinSize=8
MaxSize=512
Context=MimeTypes
Type=Scalable
";

    #[test]
    fn parses_index_theme() {
        let theme = IconTheme::parse("tango", PathBuf::from("/themes/tango"), INDEX).unwrap();
        assert_eq!(theme.name, "Tango");
        assert_eq!(theme.inherits, vec!["hicolor", "gnome"]);
        assert_eq!(theme.directories.len(), 3);
        assert_eq!(theme.directories[0].context, IconContext::Mimetypes);
        assert_eq!(theme.directories[1].directory_type, DirectoryType::Threshold);
        assert_eq!(theme.directories[2].max_size, Some(512));
        assert_eq!(
            theme.directory_path("48x48/places"),
            PathBuf::from("/themes/tango/48x48/places")
        );
    }

    #[test]
    fn missing_directories_is_an_error() {
        let result = IconTheme::parse("broken", PathBuf::new(), "[Icon Theme]\nName=Broken\n");
        assert!(matches!(result, Err(IconError::IndexParseError(_))));
    }

    #[test]
    fn prefers_larger_fixed_directories() {
        let dir = |size| IconDirectory {
            name: format!("{size}"),
            size,
            scale: 1,
            context: IconContext::Mimetypes,
            directory_type: DirectoryType::Fixed,
            min_size: None,
            max_size: None,
            threshold: None,
        };
        assert_eq!(dir(48).size_distance(48), 0);
        assert!(dir(64).size_distance(48) < dir(32).size_distance(48));
    }

    #[test]
    fn guesses_contexts() {
        assert_eq!(IconContext::guess("folder"), IconContext::Places);
        assert_eq!(IconContext::guess("emblem-symbolic-link"), IconContext::Emblems);
        assert_eq!(IconContext::guess("x-office-document"), IconContext::Mimetypes);
        assert_eq!(IconContext::guess("whatever"), IconContext::Unknown);
    }
}
