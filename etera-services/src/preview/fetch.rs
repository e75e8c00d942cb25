// SPDX-License-Identifier: LGPL-3.0-only
//! Transport seam for preview bytes.

use async_trait::async_trait;

use crate::preview::error::FetchError;

/// Fetches server-rendered preview images.
///
/// `source` is the preview location carried by the item, usually a URL.
/// Implementations run on the preview runtime.
#[async_trait]
pub trait PreviewFetcher: Send + Sync {
    /// Download the encoded preview image.
    async fn fetch(&self, source: &str) -> Result<Vec<u8>, FetchError>;
}
