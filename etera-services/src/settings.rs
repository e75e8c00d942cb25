// SPDX-License-Identifier: LGPL-3.0-only
//! Layered icon and preview settings.
//!
//! Later layers override earlier ones, key by key:
//! 1. System data: `/usr/share/etera/icons.toml` (and `XDG_DATA_DIRS`)
//! 2. System config: `/etc/xdg/etera/icons.toml` (and `XDG_CONFIG_DIRS`)
//! 3. User config: `~/.config/etera/icons.toml` (`XDG_CONFIG_HOME`)
//!
//! Outside Unix only the user config directory is consulted.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

/// Directory prefix of the settings files.
pub const SETTINGS_PREFIX: &str = "etera";
/// Name of the settings file.
pub const SETTINGS_FILE: &str = "icons.toml";
/// Extensions whose jumbo shell icon is a small glyph on a blank canvas.
pub const DEFAULT_JUMBO_WORKAROUND: &[&str] =
    &["cer", "chm", "css", "js", "msi", "prf", "py", "sh", "wsf"];

/// Effective settings after every layer has been merged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    /// Icon resolution settings.
    pub icons: IconSettings,
    /// Preview worker and cache settings.
    pub previews: PreviewSettings,
}

/// Icon resolution settings.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSettings {
    /// XDG icon theme to resolve named icons from.
    pub theme: String,
    /// Directory of `<name>.svg` or `<name>.png` files overriding the bundled
    /// glyphs.
    pub resource_dir: Option<PathBuf>,
    /// Extensions whose jumbo shell icon is skipped and whose glyph is
    /// centered instead of stretched.
    pub jumbo_workaround: Vec<String>,
}

impl Default for IconSettings {
    fn default() -> Self {
        Self {
            theme: "hicolor".to_string(),
            resource_dir: None,
            jumbo_workaround: DEFAULT_JUMBO_WORKAROUND
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

/// Preview worker and cache settings.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSettings {
    /// Worker threads of the owned preview runtime.
    pub worker_threads: usize,
    /// Fetches allowed in flight at once.
    pub max_concurrent_fetches: usize,
    /// Preview icons kept per cache; 0 keeps everything.
    pub cache_capacity: usize,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            worker_threads: 2,
            max_concurrent_fetches: 4,
            cache_capacity: 0,
        }
    }
}

/// One settings file; absent keys leave earlier layers untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsLayer {
    #[serde(default)]
    icons: IconLayer,
    #[serde(default)]
    previews: PreviewLayer,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct IconLayer {
    theme: Option<String>,
    resource_dir: Option<PathBuf>,
    jumbo_workaround: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PreviewLayer {
    worker_threads: Option<usize>,
    max_concurrent_fetches: Option<usize>,
    cache_capacity: Option<usize>,
}

impl SettingsLayer {
    /// Parse a settings file.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

impl Settings {
    /// Load settings from the standard locations.
    pub fn load() -> Result<Self> {
        let mut settings = Self::default();
        for path in settings_files()? {
            settings.load_file(&path);
        }
        Ok(settings)
    }

    /// Defaults overridden by a single TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut settings = Self::default();
        settings.merge(SettingsLayer::from_toml(content)?);
        Ok(settings)
    }

    /// Merge settings files in order, reporting each file's outcome.
    pub fn load_from_paths(&mut self, paths: &[PathBuf]) -> Vec<Result<()>> {
        paths
            .iter()
            .map(|path| -> Result<()> {
                let content = fs::read_to_string(path)
                    .map_err(|e| anyhow::anyhow!("Failed to read settings file {:?}: {}", path, e))?;
                let layer = SettingsLayer::from_toml(&content)
                    .map_err(|e| anyhow::anyhow!("Failed to parse settings file {:?}: {}", path, e))?;
                self.merge(layer);
                Ok(())
            })
            .collect()
    }

    fn load_file(&mut self, path: &Path) {
        log::info!("Loading settings from: {:?}", path);
        match fs::read_to_string(path) {
            Ok(content) => match SettingsLayer::from_toml(&content) {
                Ok(layer) => self.merge(layer),
                Err(e) => log::warn!("Failed to parse settings file {:?}: {}", path, e),
            },
            Err(e) => log::warn!("Failed to read settings file {:?}: {}", path, e),
        }
    }

    /// Apply a layer on top of the current settings.
    pub fn merge(&mut self, layer: SettingsLayer) {
        if let Some(theme) = layer.icons.theme {
            self.icons.theme = theme;
        }
        if layer.icons.resource_dir.is_some() {
            self.icons.resource_dir = layer.icons.resource_dir;
        }
        if let Some(extensions) = layer.icons.jumbo_workaround {
            self.icons.jumbo_workaround = extensions
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect();
        }

        if let Some(threads) = layer.previews.worker_threads {
            self.previews.worker_threads = threads.max(1);
        }
        if let Some(fetches) = layer.previews.max_concurrent_fetches {
            self.previews.max_concurrent_fetches = fetches.max(1);
        }
        if let Some(capacity) = layer.previews.cache_capacity {
            self.previews.cache_capacity = capacity;
        }
    }
}

#[cfg(unix)]
fn settings_files() -> Result<Vec<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix(SETTINGS_PREFIX)?;

    // Both iterators yield the most important file first.
    let mut files: Vec<PathBuf> = xdg_dirs.find_data_files(SETTINGS_FILE).rev().collect();
    files.extend(xdg_dirs.find_config_files(SETTINGS_FILE).rev());
    Ok(files)
}

#[cfg(not(unix))]
fn settings_files() -> Result<Vec<PathBuf>> {
    Ok(dirs::config_dir()
        .map(|dir| dir.join(SETTINGS_PREFIX).join(SETTINGS_FILE))
        .filter(|path| path.exists())
        .into_iter()
        .collect())
}
