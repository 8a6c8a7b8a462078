//! Error message lookup.
//!
//! Fields store resolved text only. A `MessageSource` turns a message key
//! into that text before a validator is registered.

use std::collections::HashMap;
use tracing::warn;

/// Lookup from a message key to display text.
pub trait MessageSource {
    fn resolve(&self, key: &str) -> Option<String>;

    /// Resolve `key`, falling back to the key itself when it is unknown.
    fn resolve_or_key(&self, key: &str) -> String {
        self.resolve(key).unwrap_or_else(|| {
            warn!(key, "no message for key");
            key.to_string()
        })
    }
}

impl MessageSource for HashMap<String, String> {
    fn resolve(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}
