// SPDX-License-Identifier: LGPL-3.0-only
//! Server-rendered previews.
//!
//! Previews are fetched through a [`PreviewFetcher`] on a background
//! [`PreviewExecutor`], prepared at every icon size and cached in memory.
//! The list item waiting on a preview is tracked in [`PendingPreviews`].

mod cache;
mod error;
mod events;
mod executor;
mod fetch;
mod pending;

pub use cache::PreviewCache;
pub use error::{FetchError, PreviewError};
pub use events::PreviewEvent;
pub use executor::{decode_preview, PreviewExecutor, PreviewWaker};
pub use fetch::PreviewFetcher;
pub use pending::PendingPreviews;
