// SPDX-FileCopyrightText: 2026 Stan Grams <sjg@haxx.space>
//
// SPDX-License-Identifier: BSD-2-Clause

//! The bulletin table: a static set loaded from config, overlaid at emit
//! time by an optional dynamic set a host program can update at runtime.
//! The dynamic entry wins on key collision.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Static bulletins plus a cloneable handle for runtime updates.
pub struct BulletinTable {
    static_entries: HashMap<String, String>,
    dynamic: Arc<Mutex<HashMap<String, String>>>,
}

impl BulletinTable {
    pub fn new(static_entries: HashMap<String, String>) -> Self {
        Self {
            static_entries,
            dynamic: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// A cloneable handle a host program can use to add/remove dynamic
    /// bulletins without holding a reference to the scheduler itself.
    pub fn handle(&self) -> BulletinHandle {
        BulletinHandle(self.dynamic.clone())
    }

    /// Merge the static table with the current dynamic overlay. Taken
    /// fresh at each scheduler fire so runtime updates are visible on the
    /// next emission without restarting the job.
    pub fn snapshot(&self) -> HashMap<String, String> {
        let mut merged = self.static_entries.clone();
        merged.extend(self.dynamic.lock().expect("bulletin table mutex poisoned").clone());
        merged
    }
}

#[derive(Clone)]
pub struct BulletinHandle(Arc<Mutex<HashMap<String, String>>>);

impl BulletinHandle {
    pub fn set(&self, id: impl Into<String>, text: impl Into<String>) {
        self.0.lock().expect("bulletin table mutex poisoned").insert(id.into(), text.into());
    }

    pub fn remove(&self, id: &str) {
        self.0.lock().expect("bulletin table mutex poisoned").remove(id);
    }
}
