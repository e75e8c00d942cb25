// SPDX-License-Identifier: LGPL-3.0-only
//! Completion events of preview fetches.

use crate::icon::Icon;
use crate::preview::error::FetchError;

/// Outcome of one preview fetch, delivered to the owning thread.
#[derive(Debug, Clone)]
pub enum PreviewEvent {
    /// The preview was fetched and prepared at every icon size.
    Ready {
        /// Preview identifier.
        source: String,
        /// Ticket of the request that started the fetch.
        ticket: u64,
        /// Prepared preview icon.
        icon: Icon,
    },
    /// The fetched bytes could not be decoded.
    Undecodable {
        /// Preview identifier.
        source: String,
        /// Ticket of the request that started the fetch.
        ticket: u64,
        /// Decoder message.
        error: String,
    },
    /// The fetch itself failed.
    Failed {
        /// Preview identifier.
        source: String,
        /// Ticket of the request that started the fetch.
        ticket: u64,
        /// Error reported by the fetcher.
        error: FetchError,
    },
}

impl PreviewEvent {
    /// Identifier of the preview this event is about.
    pub fn source(&self) -> &str {
        match self {
            Self::Ready { source, .. }
            | Self::Undecodable { source, .. }
            | Self::Failed { source, .. } => source,
        }
    }

    /// Ticket of the request that started the fetch.
    pub fn ticket(&self) -> u64 {
        match self {
            Self::Ready { ticket, .. }
            | Self::Undecodable { ticket, .. }
            | Self::Failed { ticket, .. } => *ticket,
        }
    }
}
