// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! Decaying duplicate-suppression cache (C1).
//!
//! Bounded mapping from [`RequestKey`] to insertion time. Eviction fires on
//! whichever of (size, age) trips first: `put` prunes expired entries, then
//! evicts the oldest surviving entry if the map is still at capacity.
//! Lookups (`has`) never mutate age — TTL is measured from insertion time
//! only (write-time TTL), not from last access.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::model::RequestKey;

pub struct DedupCache {
    max_entries: usize,
    ttl: Duration,
    entries: Mutex<HashMap<RequestKey, Instant>>,
}

impl DedupCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            max_entries: max_entries.max(1),
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// `true` iff `key` is present and has not exceeded its TTL.
    pub fn has(&self, key: &RequestKey) -> bool {
        let entries = self.entries.lock().expect("dedup cache mutex poisoned");
        match entries.get(key) {
            Some(inserted_at) => inserted_at.elapsed() < self.ttl,
            None => false,
        }
    }

    /// Record `key` as processed at the current time. Evicts expired
    /// entries first, then the single oldest entry if still at capacity.
    pub fn put(&self, key: RequestKey) {
        let mut entries = self.entries.lock().expect("dedup cache mutex poisoned");
        let ttl = self.ttl;
        entries.retain(|_, inserted_at| inserted_at.elapsed() < ttl);

        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            if let Some(oldest_key) = entries
                .iter()
                .min_by_key(|(_, inserted_at)| **inserted_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest_key);
            }
        }

        entries.insert(key, Instant::now());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("dedup cache mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
