// SPDX-License-Identifier: LGPL-3.0-only
//! In-memory cache of native file type icons.

use std::collections::{HashMap, HashSet};

use crate::icon::pixmaps::Icon;

/// Cache of platform icons keyed by file type, with a negative-result set.
///
/// Entries are already prepared. The shared (linked) variant of a key is
/// always derived from its plain entry.
#[derive(Debug, Default)]
pub struct NativeIconCache {
    plain: HashMap<String, Icon>,
    shared: HashMap<String, Icon>,
    misses: HashSet<String>,
}

impl NativeIconCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `key`, deriving and storing the shared variant on demand.
    ///
    /// Keys in the negative set always miss.
    pub fn cached(&mut self, key: &str, shared: bool, badge: &Icon) -> Option<Icon> {
        if self.misses.contains(key) {
            return None;
        }

        if shared {
            if let Some(icon) = self.shared.get(key) {
                return Some(icon.clone());
            }
            let linked = self.plain.get(key)?.with_badge(badge);
            self.shared.insert(key.to_string(), linked.clone());
            return Some(linked);
        }

        self.plain.get(key).cloned()
    }

    /// Store a prepared icon and return the variant matching `shared`.
    pub fn store(&mut self, key: &str, icon: Icon, shared: bool, badge: &Icon) -> Icon {
        self.plain.insert(key.to_string(), icon.clone());
        if !shared {
            return icon;
        }
        let linked = icon.with_badge(badge);
        self.shared.insert(key.to_string(), linked.clone());
        linked
    }

    /// Record that the platform has no icon for `key`.
    pub fn mark_missing(&mut self, key: &str) {
        self.misses.insert(key.to_string());
    }

    /// Whether `key` is in the negative set.
    pub fn is_missing(&self, key: &str) -> bool {
        self.misses.contains(key)
    }
}
