//! Shared fixtures for provider tests

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::io::Cursor;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use etera_services::icon::{BuiltinIcons, Icon, NativeIcon, NativeIconSource, NoTheme};
use etera_services::item::{DiskItem, ListItem, Resource};
use etera_services::preview::{FetchError, PreviewFetcher};
use etera_services::provider::{IconProvider, IconProviderBuilder};
use image::{Rgba, RgbaImage};

/// Native icon source answering from a fixed outcome and counting lookups.
pub struct CountingSource {
    pub outcome: fn(&str) -> NativeIcon,
    pub calls: Rc<Cell<usize>>,
}

impl CountingSource {
    pub fn new(outcome: fn(&str) -> NativeIcon) -> (Self, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        (
            Self {
                outcome,
                calls: calls.clone(),
            },
            calls,
        )
    }
}

impl NativeIconSource for CountingSource {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn lookup(&self, key: &str) -> NativeIcon {
        self.calls.set(self.calls.get() + 1);
        (self.outcome)(key)
    }
}

pub fn solid(size: u32, color: [u8; 4]) -> Icon {
    Icon::from_image(RgbaImage::from_pixel(size, size, Rgba(color)))
}

pub fn found(_key: &str) -> NativeIcon {
    NativeIcon::Found {
        icon: solid(32, [200, 30, 30, 255]),
        center: false,
    }
}

pub fn missing(_key: &str) -> NativeIcon {
    NativeIcon::Missing
}

pub fn unavailable(_key: &str) -> NativeIcon {
    NativeIcon::Unavailable
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbaImage::from_pixel(width, height, Rgba([20, 120, 220, 255]))
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("encode fixture png");
    bytes
}

/// Fetcher keyed by the preview URL prefix: `ok/` yields a PNG, `junk/`
/// yields undecodable bytes, `flaky/` fails with 503 the first time and
/// yields a PNG after that, anything else fails with 404.
#[derive(Default)]
pub struct FixtureFetcher {
    pub calls: AtomicUsize,
    pub failed_once: Mutex<HashSet<String>>,
}

#[async_trait]
impl PreviewFetcher for FixtureFetcher {
    async fn fetch(&self, source: &str) -> Result<Vec<u8>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if source.starts_with("ok/") {
            Ok(png_bytes(120, 80))
        } else if source.starts_with("junk/") {
            Ok(b"\x89PNG but not really".to_vec())
        } else if source.starts_with("flaky/") {
            let first = self
                .failed_once
                .lock()
                .expect("fixture lock")
                .insert(source.to_string());
            if first {
                Err(FetchError::new(503, "Service Unavailable"))
            } else {
                Ok(png_bytes(120, 80))
            }
        } else {
            Err(FetchError::new(404, "Not Found"))
        }
    }
}

impl FixtureFetcher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// List row recording every icon it receives.
pub struct Row {
    pub resource: Resource,
    pub icons: RefCell<Vec<Icon>>,
}

impl Row {
    pub fn new(resource: Resource) -> Rc<Self> {
        Rc::new(Self {
            resource,
            icons: RefCell::new(Vec::new()),
        })
    }

    pub fn received(&self) -> usize {
        self.icons.borrow().len()
    }

    pub fn last_icon(&self) -> Option<Icon> {
        self.icons.borrow().last().cloned()
    }
}

impl ListItem for Row {
    fn item(&self) -> &dyn DiskItem {
        &self.resource
    }

    fn set_icon(&self, icon: Icon) {
        self.icons.borrow_mut().push(icon);
    }
}

/// Provider without theme or platform sources, running its own workers.
pub fn builder(fetcher: Arc<FixtureFetcher>) -> IconProviderBuilder {
    IconProvider::builder(fetcher)
        .theme(Rc::new(NoTheme))
        .fallback(Box::new(BuiltinIcons::new()))
        .without_platform_sources()
}

/// Wait without processing events until `done` holds or two seconds pass.
pub fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}

/// Process events until `done` holds or two seconds pass.
pub fn pump_until(provider: &IconProvider, mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        provider.process_events();
        if done() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    false
}
