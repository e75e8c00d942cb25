//! Example: Resolving icons and previews for disk resources
//!
//! Resolves the icon of a few resources parsed from REST API JSON and
//! fetches a preview from a local file standing in for the preview server.
//!
//! Run with `RUST_LOG=debug` to see cache and lookup traces.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use etera_services::item::{DiskItem, ListItem, Resource};
use etera_services::preview::{FetchError, PreviewFetcher};
use etera_services::{Icon, IconProvider, Settings};

const RESOURCES: &str = r#"[
    {"name": "Documents", "path": "disk:/Documents", "type": "dir"},
    {"name": "Shared", "path": "disk:/Shared", "type": "dir", "public_url": "https://disk.example/d/abc"},
    {"name": "report.odt", "path": "disk:/report.odt", "type": "file", "media_type": "document"},
    {"name": "song.flac", "path": "disk:/song.flac", "type": "file", "media_type": "audio"},
    {"name": "novel.epub", "path": "disk:/novel.epub", "type": "file", "media_type": "book"}
]"#;

/// Serves previews from the local filesystem.
struct LocalFetcher;

#[async_trait]
impl PreviewFetcher for LocalFetcher {
    async fn fetch(&self, source: &str) -> Result<Vec<u8>, FetchError> {
        std::fs::read(source).map_err(|e| FetchError::new(e.raw_os_error().unwrap_or(-1), e.to_string()))
    }
}

struct Row {
    resource: Resource,
    icon: RefCell<Option<Icon>>,
}

impl ListItem for Row {
    fn item(&self) -> &dyn DiskItem {
        &self.resource
    }

    fn set_icon(&self, icon: Icon) {
        println!("  {} <- icon {:?}", self.resource.name, icon);
        *self.icon.borrow_mut() = Some(icon);
    }
}

fn describe(icon: &Icon) -> String {
    if icon.is_null() {
        "(none)".to_string()
    } else {
        format!("{:?}", icon.sizes())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let settings = Settings::load()?;
    println!("Icon theme: {}", settings.icons.theme);

    let provider = IconProvider::init(
        IconProvider::builder(Arc::new(LocalFetcher))
            .settings(settings)
            .build()?,
    );

    let resources: Vec<Resource> = serde_json::from_str(RESOURCES)?;
    println!("\nIcons:");
    for resource in &resources {
        let icon = provider.icon(resource);
        println!(
            "  {:<12} public={:<5} sizes={}",
            resource.name,
            resource.is_public(),
            describe(&icon)
        );
    }

    // Any PNG on disk stands in for a server-rendered preview.
    let preview_path = std::env::args().nth(1);
    if let Some(path) = preview_path {
        println!("\nPreview of {}:", path);
        let row: Rc<dyn ListItem> = Rc::new(Row {
            resource: Resource::file("preview.png").with_preview(path),
            icon: RefCell::new(None),
        });

        if !provider.preview(&row) {
            let deadline = Instant::now() + Duration::from_secs(5);
            while provider.pending_previews() > 0 && Instant::now() < deadline {
                provider.process_events();
                std::thread::sleep(Duration::from_millis(10));
            }
        }
        // Second request is served from the cache.
        println!("  cached: {}", provider.preview(&row));
    }

    IconProvider::cleanup();
    Ok(())
}
