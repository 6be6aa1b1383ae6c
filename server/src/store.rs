use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe in-memory table mapping short_code -> original_url.
///
/// Backed by a DashMap so reads are concurrent and a write only locks the
/// shard that owns the key. Entries are added by the create handler and
/// live for the lifetime of the process; nothing is ever removed.
///
/// The store does not enforce unique keys: `put` overwrites silently and
/// callers are expected to check `exists` first (see
/// [`crate::code::generate_unique`]).
#[derive(Clone, Debug)]
pub struct LinkStore {
    inner: Arc<DashMap<String, String>>,
}

impl LinkStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
        }
    }

    /// Insert a mapping, replacing any URL already stored under `short_code`.
    pub fn put(&self, short_code: impl Into<String>, original_url: impl Into<String>) {
        self.inner.insert(short_code.into(), original_url.into());
    }

    /// Look up a short code. Returns a clone of the original URL if present.
    pub fn get(&self, short_code: &str) -> Option<String> {
        self.inner.get(short_code).map(|v| v.clone())
    }

    pub fn exists(&self, short_code: &str) -> bool {
        self.inner.contains_key(short_code)
    }

    /// Number of mappings currently stored.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Default for LinkStore {
    fn default() -> Self {
        Self::new()
    }
}
