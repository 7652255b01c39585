use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::classify::ResourceLocator;
use crate::types::TagMap;

pub const TAG_CACHE_CAPACITY: usize = 256;

/// Ownership sentinel: a database resource's tag mapping is only usable
/// when this key is present.
pub const REQUIRED_DB_TAG: &str = "Organization GUID";

/// Fixed-capacity cache with least-recently-used eviction and no expiry.
/// Entries are treated as immutable for the process lifetime.
pub struct LruCache<K, V> {
    capacity: usize,
    map: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            map: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&mut self, key: &K) -> Option<&V> {
        if !self.map.contains_key(key) {
            return None;
        }
        self.touch(key);
        self.map.get(key)
    }

    pub fn insert(&mut self, key: K, value: V) {
        if self.map.contains_key(&key) {
            self.map.insert(key.clone(), value);
            self.touch(&key);
            return;
        }
        if self.map.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.map.remove(&oldest);
            }
        }
        self.order.push_back(key.clone());
        self.map.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(key.clone());
    }
}

/// Injected tag-fetch capability, backed by the cloud tagging APIs in
/// production and by mocks in tests.
#[async_trait]
pub trait TagSource: Send + Sync {
    async fn fetch_tags(&self, locator: &ResourceLocator) -> Result<TagMap>;
}

/// Injected capacity-descriptor lookup for database instances.
#[async_trait]
pub trait CapacitySource: Send + Sync {
    async fn allocated_storage_gb(&self, db_name: &str) -> Result<Option<i32>>;
}

/// Required-tag policy, kept separate from fetching so both halves are
/// testable on their own. For database resources a mapping without the
/// sentinel key collapses to empty no matter what else was fetched; other
/// resource families pass through unchanged.
pub fn usable_tags(locator: &ResourceLocator, fetched: TagMap) -> TagMap {
    match locator {
        ResourceLocator::DbInstance { arn, .. } if !fetched.contains_key(REQUIRED_DB_TAG) => {
            if !fetched.is_empty() {
                warn!("{REQUIRED_DB_TAG} tag missing for {arn}, withholding all tags");
            }
            TagMap::new()
        }
        _ => fetched,
    }
}

/// Memoized fetch-then-filter over a [`TagSource`]. The cache stores the
/// composition's result, so a mapping that failed the required-tag policy
/// (or a failed fetch) stays empty for the entry's cache lifetime.
pub struct TagCache {
    entries: Mutex<LruCache<ResourceLocator, TagMap>>,
    source: Arc<dyn TagSource>,
}

impl TagCache {
    pub fn new(source: Arc<dyn TagSource>) -> Self {
        Self::with_capacity(source, TAG_CACHE_CAPACITY)
    }

    pub fn with_capacity(source: Arc<dyn TagSource>, capacity: usize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            source,
        }
    }

    /// Resolve tags for a resource. Fetch failures are converted to an
    /// empty mapping and cached like any other result: one resource failing
    /// its lookup drops that resource's records, never the batch.
    pub async fn get_tags(&self, locator: &ResourceLocator) -> TagMap {
        {
            let mut entries = self.entries.lock().await;
            if let Some(hit) = entries.get(locator) {
                return hit.clone();
            }
        }

        let fetched = match self.source.fetch_tags(locator).await {
            Ok(tags) => tags,
            Err(err) => {
                warn!("tag lookup failed for {locator}: {err:?}");
                TagMap::new()
            }
        };
        let tags = usable_tags(locator, fetched);

        self.entries
            .lock()
            .await
            .insert(locator.clone(), tags.clone());
        tags
    }
}

/// Memoized capacity lookups, cached by instance name. A failed lookup is
/// cached as absent.
pub struct CapacityCache {
    entries: Mutex<LruCache<String, Option<i32>>>,
    source: Arc<dyn CapacitySource>,
}

impl CapacityCache {
    pub fn new(source: Arc<dyn CapacitySource>) -> Self {
        Self::with_capacity(source, TAG_CACHE_CAPACITY)
    }

    pub fn with_capacity(source: Arc<dyn CapacitySource>, capacity: usize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            source,
        }
    }

    pub async fn allocated_storage_gb(&self, db_name: &str) -> Option<i32> {
        {
            let mut entries = self.entries.lock().await;
            if let Some(hit) = entries.get(&db_name.to_string()) {
                return *hit;
            }
        }

        let size = match self.source.allocated_storage_gb(db_name).await {
            Ok(size) => size,
            Err(err) => {
                warn!("capacity lookup failed for {db_name}: {err:?}");
                None
            }
        };

        self.entries.lock().await.insert(db_name.to_string(), size);
        size
    }
}
