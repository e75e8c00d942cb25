#![warn(missing_docs)]

//! Icons and server-rendered previews for the Etera cloud disk client.

pub use etera_services as services;

/// A "prelude" for users of the etera services.
///
/// Importing this module brings into scope the types needed to resolve
/// icons and previews for disk items.
///
/// ```rust
/// use etera::prelude::*;
/// ```
pub mod prelude {
    pub use crate::services::icon::{Icon, ICON_SIZES};
    pub use crate::services::item::{DiskItem, ListItem, MediaType, Resource};
    pub use crate::services::preview::{FetchError, PreviewFetcher};
    pub use crate::services::provider::IconProvider;
    pub use crate::services::settings::Settings;
}
