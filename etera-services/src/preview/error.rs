// SPDX-License-Identifier: LGPL-3.0-only
//! Error types for preview operations.

use thiserror::Error;

/// Failure reported by a [`PreviewFetcher`](crate::preview::PreviewFetcher).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Fetch failed ({code}): {message}")]
pub struct FetchError {
    /// Transport or HTTP status code.
    pub code: i32,
    /// Human readable description.
    pub message: String,
}

impl FetchError {
    /// Create a fetch error.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Errors that can occur while producing a preview.
#[derive(Error, Debug)]
pub enum PreviewError {
    /// The fetched bytes are not a supported image.
    #[error("Undecodable preview: {0}")]
    Decode(#[from] image::ImageError),

    /// The preview bytes could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The preview worker has stopped accepting requests.
    #[error("Preview worker has stopped")]
    QueueClosed,

    /// The preview runtime could not be started.
    #[error("Failed to start preview runtime: {0}")]
    Runtime(#[from] std::io::Error),
}
