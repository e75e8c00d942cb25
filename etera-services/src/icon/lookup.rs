// SPDX-License-Identifier: LGPL-3.0-only
//! Icon lookup system with search paths and inheritance.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use crate::icon::error::IconError;
use crate::icon::theme::{IconContext, IconDirectory, IconTheme};

/// File extensions the loader understands, in order of preference.
pub const ICON_EXTENSIONS: &[&str] = &["svg", "png"];

/// Icon lookup system.
pub struct IconLookup {
    /// Cache of loaded themes.
    theme_cache: Arc<Mutex<HashMap<String, IconTheme>>>,
    /// Search paths for icon themes.
    search_paths: Vec<PathBuf>,
    /// Accepted icon file extensions.
    extensions: &'static [&'static str],
}

impl IconLookup {
    /// Create a lookup over the standard XDG icon directories.
    pub fn new() -> Self {
        let mut search_paths = Vec::new();

        if let Some(home) = dirs::home_dir() {
            search_paths.push(home.join(".icons"));
        }
        if let Some(data) = dirs::data_dir() {
            search_paths.push(data.join("icons"));
        }
        search_paths.push(PathBuf::from("/usr/local/share/icons"));
        search_paths.push(PathBuf::from("/usr/share/icons"));

        Self::with_search_paths(search_paths)
    }

    /// Create a lookup over explicit theme roots.
    pub fn with_search_paths(search_paths: Vec<PathBuf>) -> Self {
        Self {
            theme_cache: Arc::new(Mutex::new(HashMap::new())),
            search_paths,
            extensions: ICON_EXTENSIONS,
        }
    }

    /// Load a theme (with caching).
    pub fn load_theme(&self, theme_name: &str) -> Result<IconTheme, IconError> {
        let mut cache = self.theme_cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(theme) = cache.get(theme_name) {
            return Ok(theme.clone());
        }

        for search_path in &self.search_paths {
            let theme_path = search_path.join(theme_name);
            if !theme_path.is_dir() {
                continue;
            }
            match IconTheme::load(theme_name, theme_path) {
                Ok(theme) => {
                    cache.insert(theme_name.to_string(), theme.clone());
                    return Ok(theme);
                },
                Err(e) => {
                    log::debug!("IconLookup: Skipping theme '{}' in {:?}: {}", theme_name, search_path, e);
                },
            }
        }

        Err(IconError::ThemeNotFound(theme_name.to_string()))
    }

    /// Lookup an icon in a theme, its inherited themes, then hicolor.
    pub fn lookup_icon(
        &self,
        icon_name: &str,
        size: u32,
        context: IconContext,
        theme_name: &str,
    ) -> Option<PathBuf> {
        if let Ok(theme) = self.load_theme(theme_name) {
            if let Some(path) = self.lookup_in_theme(&theme, icon_name, size, context) {
                return Some(path);
            }

            for inherited in &theme.inherits {
                if inherited == "hicolor" {
                    continue;
                }
                if let Ok(inherited_theme) = self.load_theme(inherited) {
                    if let Some(path) =
                        self.lookup_in_theme(&inherited_theme, icon_name, size, context)
                    {
                        log::debug!(
                            "IconLookup: Found icon '{}' in inherited theme '{}' at {:?}",
                            icon_name,
                            inherited,
                            path
                        );
                        return Some(path);
                    }
                }
            }
        }

        if theme_name != "hicolor" {
            return self.lookup_icon(icon_name, size, context, "hicolor");
        }

        None
    }

    /// Lookup icon in a specific theme.
    fn lookup_in_theme(
        &self,
        theme: &IconTheme,
        icon_name: &str,
        size: u32,
        context: IconContext,
    ) -> Option<PathBuf> {
        let candidates = Self::candidate_directories(&theme.directories, size, context);

        // Best matches first, then every other directory in the theme.
        let mut rest: Vec<&IconDirectory> = theme
            .directories
            .iter()
            .filter(|d| !candidates.iter().any(|c| c.name == d.name))
            .collect();
        rest.sort_by_key(|d| d.size_distance(size));

        for dir in candidates.iter().chain(rest.iter()) {
            let dir_path = theme.directory_path(&dir.name);
            for ext in self.extensions {
                let icon_path = dir_path.join(format!("{}.{}", icon_name, ext));
                if icon_path.is_file() {
                    return Some(icon_path);
                }
            }
        }

        None
    }

    /// Directories matching the context, ordered by how well they fit `size`.
    fn candidate_directories(
        directories: &[IconDirectory],
        size: u32,
        context: IconContext,
    ) -> Vec<&IconDirectory> {
        let mut candidates: Vec<&IconDirectory> =
            directories.iter().filter(|d| d.context == context).collect();

        if candidates.is_empty() {
            candidates = directories
                .iter()
                .filter(|d| d.context == IconContext::Unknown)
                .collect();
        }

        if candidates.is_empty() {
            candidates = directories.iter().collect();
        }

        candidates.sort_by_key(|d| d.size_distance(size));
        candidates
    }
}

impl Default for IconLookup {
    fn default() -> Self {
        Self::new()
    }
}
