// SPDX-License-Identifier: LGPL-3.0-only
//! LRU caches of prepared preview icons.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::icon::Icon;

/// Prepared previews keyed by preview identifier, plain and shared.
pub struct PreviewCache {
    plain: LruCache<String, Icon>,
    shared: LruCache<String, Icon>,
}

impl PreviewCache {
    /// Create a cache holding up to `capacity` previews per variant;
    /// 0 means unbounded.
    pub fn new(capacity: usize) -> Self {
        let lru = || match NonZeroUsize::new(capacity) {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };
        Self {
            plain: lru(),
            shared: lru(),
        }
    }

    /// Look up a preview.
    ///
    /// Shared requests check the shared cache, then derive the shared
    /// variant from a plain entry and keep it.
    pub fn lookup(&mut self, id: &str, shared: bool, badge: &Icon) -> Option<Icon> {
        if shared {
            if let Some(icon) = self.shared.get(id) {
                return Some(icon.clone());
            }
            let linked = self.plain.get(id)?.with_badge(badge);
            self.shared.put(id.to_string(), linked.clone());
            return Some(linked);
        }
        self.plain.get(id).cloned()
    }

    /// Store a plain preview.
    pub fn insert_plain(&mut self, id: &str, icon: Icon) {
        self.plain.put(id.to_string(), icon);
    }

    /// Store a shared preview.
    pub fn insert_shared(&mut self, id: &str, icon: Icon) {
        self.shared.put(id.to_string(), icon);
    }

    /// Number of plain previews.
    pub fn len(&self) -> usize {
        self.plain.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(color: [u8; 4]) -> Icon {
        Icon::from_image(RgbaImage::from_pixel(64, 64, Rgba(color)))
    }

    #[test]
    fn shared_lookup_derives_from_plain() {
        let badge = solid([0, 0, 255, 255]);
        let plain = solid([255, 0, 0, 255]);
        let mut cache = PreviewCache::new(0);
        assert!(cache.lookup("a", false, &badge).is_none());
        assert!(cache.lookup("a", true, &badge).is_none());

        cache.insert_plain("a", plain.clone());
        let linked = cache.lookup("a", true, &badge).unwrap();
        assert_eq!(linked, plain.with_badge(&badge));
        assert_eq!(cache.lookup("a", false, &badge).unwrap(), plain);
        assert_eq!(cache.lookup("a", true, &Icon::new()).unwrap(), linked);
    }

    #[test]
    fn bounded_capacity_evicts_least_recent() {
        let mut cache = PreviewCache::new(2);
        let badge = Icon::new();
        cache.insert_plain("a", solid([1, 0, 0, 255]));
        cache.insert_plain("b", solid([2, 0, 0, 255]));
        assert!(cache.lookup("a", false, &badge).is_some());
        cache.insert_plain("c", solid([3, 0, 0, 255]));

        assert_eq!(cache.len(), 2);
        assert!(cache.lookup("b", false, &badge).is_none());
        assert!(cache.lookup("a", false, &badge).is_some());
        assert!(cache.lookup("c", false, &badge).is_some());
    }
}
