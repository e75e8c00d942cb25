// SPDX-License-Identifier: LGPL-3.0-only
//! Icons and previews for disk items.
//!
//! [`IconProvider`] resolves the icon of an item from the platform file type
//! icons, the media category table and the bundled glyphs, and fetches
//! server-rendered previews in the background. It lives on the UI thread:
//! call [`IconProvider::process_events`] from the event loop to deliver
//! finished previews.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use tokio::runtime::Handle;

use crate::icon::{
    BuiltinIcons, FallbackIcons, Glyphs, Icon, NativeIcon, NativeIconCache, NativeIconSource,
    ThemeIcons, XdgThemeIcons,
};
use crate::item::{DiskItem, ListItem, MediaType};
use crate::preview::{
    PendingPreviews, PreviewCache, PreviewError, PreviewEvent, PreviewExecutor, PreviewFetcher,
    PreviewWaker,
};
use crate::settings::Settings;

thread_local! {
    static INSTANCE: RefCell<Option<Rc<IconProvider>>> = const { RefCell::new(None) };
}

/// A platform icon source with its cache.
struct NativeBackend {
    source: Box<dyn NativeIconSource>,
    cache: RefCell<NativeIconCache>,
}

impl NativeBackend {
    fn new(source: Box<dyn NativeIconSource>) -> Self {
        Self {
            source,
            cache: RefCell::new(NativeIconCache::new()),
        }
    }

    fn resolve(&self, key: &str, shared: bool, badge: &Icon) -> Option<Icon> {
        if key.is_empty() {
            return None;
        }
        if let Some(icon) = self.cache.borrow_mut().cached(key, shared, badge) {
            return Some(icon);
        }
        if self.cache.borrow().is_missing(key) {
            return None;
        }

        match self.source.lookup(key) {
            NativeIcon::Found { icon, center } => {
                let prepared = icon.prepare(1, center);
                Some(self.cache.borrow_mut().store(key, prepared, shared, badge))
            },
            NativeIcon::Missing => {
                log::debug!("IconProvider: No {} icon for '{}'", self.source.name(), key);
                self.cache.borrow_mut().mark_missing(key);
                None
            },
            NativeIcon::Unavailable => None,
        }
    }
}

/// Resolves item icons and fetches previews.
pub struct IconProvider {
    glyphs: Glyphs,
    extension_icons: Option<NativeBackend>,
    mime_icons: Option<NativeBackend>,
    previews: RefCell<PreviewCache>,
    pending: RefCell<PendingPreviews>,
    executor: PreviewExecutor,
}

impl IconProvider {
    /// Start configuring a provider that fetches previews with `fetcher`.
    pub fn builder(fetcher: Arc<dyn PreviewFetcher>) -> IconProviderBuilder {
        IconProviderBuilder::new(fetcher)
    }

    /// Install `provider` as this thread's instance.
    pub fn init(provider: IconProvider) -> Rc<IconProvider> {
        let provider = Rc::new(provider);
        let previous = INSTANCE.with(|instance| instance.borrow_mut().replace(provider.clone()));
        if previous.is_some() {
            log::warn!("IconProvider: Replacing an existing instance");
        }
        provider
    }

    /// Drop this thread's instance.
    pub fn cleanup() {
        let previous = INSTANCE.with(|instance| instance.borrow_mut().take());
        drop(previous);
    }

    /// This thread's instance, if initialized.
    pub fn instance() -> Option<Rc<IconProvider>> {
        INSTANCE.with(|instance| instance.borrow().clone())
    }

    /// Icon of an item.
    pub fn icon(&self, item: &dyn DiskItem) -> Icon {
        let shared = item.is_public();

        if item.is_dir() {
            return self.glyphs.directory(shared).clone();
        }
        if !item.is_file() {
            return Icon::new();
        }

        let native = [
            (self.extension_icons.as_ref(), item.extension()),
            (self.mime_icons.as_ref(), item.mime_type()),
        ];
        for (backend, key) in native {
            let (Some(backend), Some(key)) = (backend, key) else {
                continue;
            };
            if let Some(icon) = backend.resolve(key, shared, &self.glyphs.link) {
                return icon;
            }
        }

        self.media_icon(item.media_type(), shared)
            .unwrap_or_else(|| self.glyphs.file(shared).clone())
    }

    /// Icon of a media category, if it has one.
    pub fn media_icon(&self, media_type: MediaType, shared: bool) -> Option<Icon> {
        self.glyphs.media(media_type, shared).cloned()
    }

    /// Set the item's preview, or its regular icon while the preview is
    /// fetched.
    ///
    /// Returns whether the preview was applied right away.
    pub fn preview(&self, list_item: &Rc<dyn ListItem>) -> bool {
        let item = list_item.item();
        let shared = item.is_public();
        let Some(id) = item.preview().filter(|id| !id.is_empty()) else {
            list_item.set_icon(self.icon(item));
            return false;
        };

        let cached = self
            .previews
            .borrow_mut()
            .lookup(id, shared, &self.glyphs.link);
        if let Some(icon) = cached {
            list_item.set_icon(icon);
            return true;
        }

        list_item.set_icon(self.icon(item));

        let ticket = self.pending.borrow_mut().register(id, list_item);
        if let Err(e) = self.executor.request(id, ticket) {
            log::warn!("IconProvider: Cannot fetch preview {}: {}", id, e);
            self.pending.borrow_mut().release(id, ticket);
        }
        false
    }

    /// Stop delivering the item's preview to it. The fetch keeps running.
    pub fn cancel_preview(&self, list_item: &dyn ListItem) {
        if let Some(id) = list_item.item().preview() {
            self.pending.borrow_mut().remove(id);
        }
    }

    /// Deliver finished previews. Returns the number of events handled.
    pub fn process_events(&self) -> usize {
        let events = self.executor.drain();
        let count = events.len();
        for event in events {
            self.handle_event(event);
        }
        count
    }

    fn handle_event(&self, event: PreviewEvent) {
        match event {
            PreviewEvent::Ready { source, icon, .. } => {
                self.previews.borrow_mut().insert_plain(&source, icon.clone());

                let waiter = self.pending.borrow_mut().take(&source);
                let Some(waiter) = waiter else {
                    return;
                };
                let icon = if waiter.item().is_public() {
                    let linked = icon.with_badge(&self.glyphs.link);
                    self.previews
                        .borrow_mut()
                        .insert_shared(&source, linked.clone());
                    linked
                } else {
                    icon
                };
                waiter.set_icon(icon);
            },
            PreviewEvent::Undecodable {
                source,
                ticket,
                error,
            } => {
                log::debug!("IconProvider: Dropping undecodable preview {}: {}", source, error);
                self.pending.borrow_mut().release(&source, ticket);
            },
            PreviewEvent::Failed {
                source,
                ticket,
                error,
            } => {
                log::debug!("IconProvider: Preview {} failed: {}", source, error);
                self.pending.borrow_mut().release(&source, ticket);
            },
        }
    }

    /// Number of previews with a waiting item.
    pub fn pending_previews(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Number of cached previews.
    pub fn cached_previews(&self) -> usize {
        self.previews.borrow().len()
    }
}

/// Configures an [`IconProvider`].
///
/// Unset parts come from the settings: the XDG theme named there, the
/// bundled glyphs and the platform's file type icons.
pub struct IconProviderBuilder {
    fetcher: Arc<dyn PreviewFetcher>,
    settings: Settings,
    theme: Option<Rc<dyn ThemeIcons>>,
    fallback: Option<Box<dyn FallbackIcons>>,
    extension_source: Option<Box<dyn NativeIconSource>>,
    mime_source: Option<Box<dyn NativeIconSource>>,
    platform_sources: bool,
    handle: Option<Handle>,
    waker: Option<PreviewWaker>,
}

impl IconProviderBuilder {
    fn new(fetcher: Arc<dyn PreviewFetcher>) -> Self {
        Self {
            fetcher,
            settings: Settings::default(),
            theme: None,
            fallback: None,
            extension_source: None,
            mime_source: None,
            platform_sources: true,
            handle: None,
            waker: None,
        }
    }

    /// Use these settings instead of the defaults.
    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Resolve named icons from `theme`.
    pub fn theme(mut self, theme: Rc<dyn ThemeIcons>) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Use `fallback` when the theme lacks a glyph.
    pub fn fallback(mut self, fallback: Box<dyn FallbackIcons>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Resolve file type icons by extension with `source`.
    pub fn extension_source(mut self, source: Box<dyn NativeIconSource>) -> Self {
        self.extension_source = Some(source);
        self
    }

    /// Resolve file type icons by MIME type with `source`.
    pub fn mime_source(mut self, source: Box<dyn NativeIconSource>) -> Self {
        self.mime_source = Some(source);
        self
    }

    /// Do not add the platform's file type icon sources.
    pub fn without_platform_sources(mut self) -> Self {
        self.platform_sources = false;
        self
    }

    /// Run fetches on an existing runtime instead of an owned one.
    pub fn runtime_handle(mut self, handle: Handle) -> Self {
        self.handle = Some(handle);
        self
    }

    /// Call `waker` from the worker after each finished fetch.
    pub fn on_event(mut self, waker: PreviewWaker) -> Self {
        self.waker = Some(waker);
        self
    }

    /// Load the glyphs and start the preview worker.
    pub fn build(self) -> Result<IconProvider, PreviewError> {
        let settings = self.settings;
        let theme = self
            .theme
            .unwrap_or_else(|| Rc::new(XdgThemeIcons::new(settings.icons.theme.clone())));
        let fallback = self.fallback.unwrap_or_else(|| {
            Box::new(BuiltinIcons::with_resource_dir(
                settings.icons.resource_dir.clone(),
            ))
        });

        let glyphs = Glyphs::load(theme.as_ref(), fallback.as_ref());

        let mut extension_source = self.extension_source;
        let mut mime_source = self.mime_source;
        if self.platform_sources {
            if extension_source.is_none() {
                extension_source = platform_extension_source(&settings);
            }
            if mime_source.is_none() {
                mime_source = platform_mime_source(&theme);
            }
        }

        let executor = match &self.handle {
            Some(handle) => PreviewExecutor::with_handle(
                self.fetcher,
                handle,
                settings.previews.max_concurrent_fetches,
                self.waker,
            ),
            None => PreviewExecutor::spawn(self.fetcher, &settings.previews, self.waker)?,
        };

        log::info!(
            "IconProvider: Ready (extension icons: {}, MIME icons: {})",
            extension_source.as_ref().map_or("none", |s| s.name()),
            mime_source.as_ref().map_or("none", |s| s.name()),
        );

        Ok(IconProvider {
            glyphs,
            extension_icons: extension_source.map(NativeBackend::new),
            mime_icons: mime_source.map(NativeBackend::new),
            previews: RefCell::new(PreviewCache::new(settings.previews.cache_capacity)),
            pending: RefCell::new(PendingPreviews::new()),
            executor,
        })
    }
}

#[cfg(windows)]
fn platform_extension_source(settings: &Settings) -> Option<Box<dyn NativeIconSource>> {
    Some(Box::new(crate::icon::ShellExtensionIcons::new(
        settings.icons.jumbo_workaround.iter().cloned(),
    )))
}

#[cfg(not(windows))]
fn platform_extension_source(_settings: &Settings) -> Option<Box<dyn NativeIconSource>> {
    None
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_mime_source(theme: &Rc<dyn ThemeIcons>) -> Option<Box<dyn NativeIconSource>> {
    Some(Box::new(crate::icon::XdgMimeIcons::new(theme.clone())))
}

#[cfg(not(all(unix, not(target_os = "macos"))))]
fn platform_mime_source(_theme: &Rc<dyn ThemeIcons>) -> Option<Box<dyn NativeIconSource>> {
    None
}
