//! Transient display URLs for locally held blobs
//!
//! A [`DisplayUrl`] keeps its blob resolvable until it is dropped, at which
//! point the URL is revoked. Replacing or clearing a logo therefore releases
//! the previous URL without any explicit bookkeeping at the call site.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

const URL_PREFIX: &str = "blob:stream-studio/";

type UrlTable = Arc<Mutex<HashMap<String, Arc<[u8]>>>>;

/// Mints display URLs and tracks the ones still live
#[derive(Debug, Clone, Default)]
pub struct UrlStore {
    table: UrlTable,
}

impl UrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a blob and return its URL handle
    pub fn create(&self, blob: impl Into<Arc<[u8]>>) -> DisplayUrl {
        let url = format!("{}{}", URL_PREFIX, Uuid::new_v4());
        self.table.lock().insert(url.clone(), blob.into());
        debug!("Created display URL {}", url);
        DisplayUrl {
            url,
            table: self.table.clone(),
        }
    }

    /// Number of URLs not yet revoked
    pub fn live_count(&self) -> usize {
        self.table.lock().len()
    }
}

/// Owned display URL, revoked on drop
#[derive(Debug)]
pub struct DisplayUrl {
    url: String,
    table: UrlTable,
}

impl DisplayUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for DisplayUrl {
    fn drop(&mut self) {
        if self.table.lock().remove(&self.url).is_some() {
            debug!("Revoked display URL {}", self.url);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_live(store: &UrlStore, url: &str) -> bool {
        store.table.lock().contains_key(url)
    }

    #[test]
    fn test_create_registers_blob() {
        let store = UrlStore::new();
        let url = store.create(vec![1u8, 2, 3]);
        assert!(url.as_str().starts_with(URL_PREFIX));
        assert_eq!(store.table.lock().get(url.as_str()).map(|b| b.to_vec()), Some(vec![1u8, 2, 3]));
    }

    #[test]
    fn test_drop_revokes() {
        let store = UrlStore::new();
        let url = store.create(vec![0u8]);
        let key = url.as_str().to_string();
        assert_eq!(store.live_count(), 1);
        drop(url);
        assert_eq!(store.live_count(), 0);
        assert!(!is_live(&store, &key));
    }

    #[test]
    fn test_urls_are_unique() {
        let store = UrlStore::new();
        let a = store.create(vec![0u8]);
        let b = store.create(vec![0u8]);
        assert_ne!(a.as_str(), b.as_str());
        assert_eq!(store.live_count(), 2);
    }
}
