//! Read-through caches.
//!
//! Two instances live in [`crate::AppState`]:
//!
//! ```text
//! PriceCache     book id     → Money    (order creation)
//! CategoryCache  category id → String   (catalog listing)
//! ```
//!
//! Entries are filled on first miss and never invalidated: prices and
//! category names are static for the lifetime of the process.

use std::collections::HashMap;
use std::hash::Hash;

use shelf_core::Money;
use tokio::sync::RwLock;

/// A process-wide map guarded by an async RwLock.
///
/// Callers do the read-through themselves:
///
/// ```rust,ignore
/// let price = match cache.get(&book_id).await {
///     Some(price) => price,
///     None => {
///         let price = load(book_id).await?;
///         cache.insert(book_id, price).await;
///         price
///     }
/// };
/// ```
#[derive(Debug)]
pub struct ReadThroughCache<K, V> {
    entries: RwLock<HashMap<K, V>>,
}

impl<K, V> ReadThroughCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    pub fn new() -> Self {
        ReadThroughCache {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cached value for `key`, if loaded before.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.entries.read().await.get(key).cloned()
    }

    /// Stores a freshly loaded value. A concurrent loader may already have
    /// stored the same value; the later write wins.
    pub async fn insert(&self, key: K, value: V) {
        self.entries.write().await.insert(key, value);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl<K, V> Default for ReadThroughCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Book prices by book id.
pub type PriceCache = ReadThroughCache<i64, Money>;

/// Category names by category id.
pub type CategoryCache = ReadThroughCache<i64, String>;
