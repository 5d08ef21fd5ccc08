//! Per-slot request numbering.
//!
//! A slot is one logical request stream (the search results panel, a view
//! wrapper). Only the newest ticket of a slot may apply its response, so a
//! slow earlier response can never overwrite a newer one.

use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    slot: String,
    number: u64,
}

impl Ticket {
    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn number(&self) -> u64 {
        self.number
    }
}

#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: Mutex<HashMap<String, u64>>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new request in `slot`, superseding every earlier ticket.
    pub fn issue(&self, slot: &str) -> Ticket {
        let mut latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        let number = latest.entry(slot.to_string()).or_insert(0);
        *number += 1;
        Ticket {
            slot: slot.to_string(),
            number: *number,
        }
    }

    pub fn is_latest(&self, ticket: &Ticket) -> bool {
        let latest = self.latest.lock().unwrap_or_else(|e| e.into_inner());
        latest.get(&ticket.slot) == Some(&ticket.number)
    }

    /// Run `apply` only if `ticket` is still the newest in its slot.
    pub fn apply_if_latest<R>(&self, ticket: &Ticket, apply: impl FnOnce() -> R) -> Option<R> {
        if self.is_latest(ticket) {
            Some(apply())
        } else {
            None
        }
    }
}
