//! Small per-user presentation flags (first-visit tutorial and the like).
//!
//! Persistence is best-effort key/value storage owned by the shell (browser
//! local storage, a dotfile, or plain memory); values are short strings.

#[cfg(test)]
#[path = "prefs_test.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Mutex;

/// Key recording that the dashboard has been visited at least once.
pub const VISITED_DASHBOARD_KEY: &str = "has_visited_dashboard";

pub trait PrefStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

/// In-memory preference store; the default when the shell provides nothing
/// durable. Flags then last for the process lifetime only.
#[derive(Default)]
pub struct MemoryPrefs {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryPrefs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl PrefStore for MemoryPrefs {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok().and_then(|values| values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(key.to_owned(), value.to_owned());
        }
    }
}
