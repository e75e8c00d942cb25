// SPDX-License-Identifier: LGPL-3.0-only
//! Icon and preview services of the Etera disk client.

pub mod icon;
pub mod item;
pub mod preview;
pub mod provider;
pub mod settings;

// Re-export the types most callers need
pub use icon::{Icon, ICON_SIZES};
pub use item::{DiskItem, ListItem, MediaType, Resource, ResourceType};
pub use preview::{FetchError, PreviewFetcher};
pub use provider::{IconProvider, IconProviderBuilder};
pub use settings::Settings;
