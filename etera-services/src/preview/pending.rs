// SPDX-License-Identifier: LGPL-3.0-only
//! List items waiting for a preview.

use std::collections::HashMap;
use std::rc::{Rc, Weak};

use crate::item::ListItem;

struct Waiter {
    item: Weak<dyn ListItem>,
    ticket: u64,
}

/// At most one waiting list item per preview identifier.
///
/// Every registration gets a fresh ticket which travels with its fetch.
/// A failed fetch only releases the waiter holding the same ticket, so a
/// newer request survives the failure of an older one. Items are held
/// weakly; an item dropped before delivery is skipped.
#[derive(Default)]
pub struct PendingPreviews {
    waiters: HashMap<String, Waiter>,
    next_ticket: u64,
}

impl PendingPreviews {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `item` the waiter for `id`, replacing any earlier one, and
    /// return the ticket for the fetch it needs.
    pub fn register(&mut self, id: &str, item: &Rc<dyn ListItem>) -> u64 {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        let waiter = Waiter {
            item: Rc::downgrade(item),
            ticket,
        };
        if self.waiters.insert(id.to_string(), waiter).is_some() {
            log::debug!("PendingPreviews: Preview {} has a new waiter", id);
        }
        ticket
    }

    /// Remove the waiter for `id`, returning it if it is still alive.
    pub fn take(&mut self, id: &str) -> Option<Rc<dyn ListItem>> {
        self.waiters.remove(id)?.item.upgrade()
    }

    /// Forget the waiter for `id` if it still holds `ticket`.
    pub fn release(&mut self, id: &str, ticket: u64) -> bool {
        match self.waiters.get(id) {
            Some(waiter) if waiter.ticket == ticket => self.waiters.remove(id).is_some(),
            _ => false,
        }
    }

    /// Forget the waiter for `id`.
    pub fn remove(&mut self, id: &str) -> bool {
        self.waiters.remove(id).is_some()
    }

    /// Number of identifiers with a waiter.
    pub fn len(&self) -> usize {
        self.waiters.len()
    }
}
