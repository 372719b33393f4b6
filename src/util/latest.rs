// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Single-slot hand-off between a producer thread and the UI.
//!
//! Unlike a channel there is no backlog: publishing replaces whatever the
//! reader has not collected yet, so the reader always sees the newest value.

use std::sync::{Arc, Mutex};

/// Shared latest-value cell. Clones refer to the same slot.
#[derive(Debug)]
pub struct LatestValue<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for LatestValue<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for LatestValue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> LatestValue<T> {
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }

    /// Store `value`, dropping any value not yet taken.
    pub fn publish(&self, value: T) {
        // Poisoning leaves the Option intact.
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = Some(value);
    }

    /// Take the newest value, if one arrived since the last call.
    pub fn take(&self) -> Option<T> {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        slot.take()
    }
}
