// Memoized search results
// Sits in front of `results::search` for large catalogs. It never changes an
// answer, it only skips recomputation; callers invalidate when the catalog
// they pass in changes.

use crate::catalog::ListingRecord;
use crate::pagination::Navigation;
use crate::results::{search, SearchResultPage};
use crate::search::SearchCriteria;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::debug;

#[derive(Debug, Default)]
pub struct CacheStats {
    pub items_count: AtomicUsize,
    pub hit_count: AtomicUsize,
    pub miss_count: AtomicUsize,
    pub eviction_count: AtomicUsize,
    pub invalidation_count: AtomicUsize,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStatsReport {
    pub items_count: usize,
    pub hit_count: usize,
    pub miss_count: usize,
    pub eviction_count: usize,
    pub invalidation_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 256 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    criteria: SearchCriteria,
    requested_page: usize,
}

struct CacheEntry {
    page: SearchResultPage,
    navigation: Navigation,
    last_accessed: u64,
}

pub struct ResultCache {
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
    config: CacheConfig,
    // Logical clock for least-recently-used eviction
    tick: AtomicU64,
    stats: CacheStats,
}

impl ResultCache {
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
            tick: AtomicU64::new(0),
            stats: CacheStats::default(),
        }
    }

    // Same contract as `results::search`, answered from the cache when the
    // same criteria and page were asked for since the last invalidation.
    // The lock is never held while filtering.
    pub fn search(
        &self,
        catalog: &[ListingRecord],
        criteria: &SearchCriteria,
        requested_page: usize,
    ) -> (SearchResultPage, Navigation) {
        let key = CacheKey {
            criteria: criteria.clone(),
            requested_page,
        };

        if let Some(hit) = self.lookup(&key) {
            return hit;
        }
        self.stats.miss_count.fetch_add(1, Ordering::SeqCst);

        let (page, navigation) = search(catalog, criteria, requested_page);
        if self.config.max_entries == 0 {
            return (page, navigation);
        }

        let now = self.tick.fetch_add(1, Ordering::SeqCst);
        let mut entries = self.entries.lock();
        // Another thread may have stored the same key meanwhile; keep its entry
        if let Some(entry) = entries.get_mut(&key) {
            entry.last_accessed = now;
            return (entry.page.clone(), entry.navigation);
        }

        if entries.len() >= self.config.max_entries {
            self.evict_least_recent(&mut entries);
        }

        entries.insert(
            key,
            CacheEntry {
                page: page.clone(),
                navigation,
                last_accessed: now,
            },
        );
        self.stats.items_count.store(entries.len(), Ordering::SeqCst);

        (page, navigation)
    }

    fn lookup(&self, key: &CacheKey) -> Option<(SearchResultPage, Navigation)> {
        let now = self.tick.fetch_add(1, Ordering::SeqCst);
        let mut entries = self.entries.lock();
        let entry = entries.get_mut(key)?;

        entry.last_accessed = now;
        self.stats.hit_count.fetch_add(1, Ordering::SeqCst);
        Some((entry.page.clone(), entry.navigation))
    }

    // Drops every entry; call after the catalog changes
    pub fn invalidate(&self) -> usize {
        let mut entries = self.entries.lock();
        let count = entries.len();
        entries.clear();

        self.stats.items_count.store(0, Ordering::SeqCst);
        self.stats.invalidation_count.fetch_add(1, Ordering::SeqCst);
        debug!(count, "search cache invalidated");
        count
    }

    pub fn stats(&self) -> CacheStatsReport {
        CacheStatsReport {
            items_count: self.stats.items_count.load(Ordering::SeqCst),
            hit_count: self.stats.hit_count.load(Ordering::SeqCst),
            miss_count: self.stats.miss_count.load(Ordering::SeqCst),
            eviction_count: self.stats.eviction_count.load(Ordering::SeqCst),
            invalidation_count: self.stats.invalidation_count.load(Ordering::SeqCst),
        }
    }

    fn evict_least_recent(&self, entries: &mut HashMap<CacheKey, CacheEntry>) {
        let oldest_key = entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_accessed)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest_key {
            entries.remove(&key);
            self.stats.eviction_count.fetch_add(1, Ordering::SeqCst);
            debug!(page = key.requested_page, "search cache entry evicted");
        }
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amenity::Amenity;
    use crate::catalog::{load_catalog_file, SAMPLE_CATALOG_PATH};
    use std::num::NonZeroUsize;

    fn catalog() -> Vec<ListingRecord> {
        load_catalog_file(SAMPLE_CATALOG_PATH).unwrap()
    }

    fn criteria() -> SearchCriteria {
        SearchCriteria::unfiltered(NonZeroUsize::new(9).unwrap())
    }

    #[test]
    fn test_hit_returns_same_answer() {
        let catalog = catalog();
        let cache = ResultCache::default();

        let first = cache.search(&catalog, &criteria(), 2);
        let second = cache.search(&catalog, &criteria(), 2);

        assert_eq!(first, second);
        assert_eq!(first, search(&catalog, &criteria(), 2));

        let stats = cache.stats();
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.items_count, 1);
    }

    #[test]
    fn test_rejected_navigation_is_cached_too() {
        let catalog = catalog();
        let cache = ResultCache::default();

        let (page, navigation) = cache.search(&catalog, &criteria(), 4);
        assert_eq!(navigation, Navigation::Rejected);
        assert_eq!(page.current_page, 1);

        let (_, navigation) = cache.search(&catalog, &criteria(), 4);
        assert_eq!(navigation, Navigation::Rejected);
        assert_eq!(cache.stats().hit_count, 1);
    }

    #[test]
    fn test_least_recent_entry_is_evicted() {
        let catalog = catalog();
        let cache = ResultCache::new(CacheConfig { max_entries: 2 });

        cache.search(&catalog, &criteria(), 1);
        cache.search(&catalog, &criteria(), 2);
        // Touch page 1 so page 2 becomes the oldest
        cache.search(&catalog, &criteria(), 1);
        cache.search(&catalog, &criteria(), 3);

        let stats = cache.stats();
        assert_eq!(stats.eviction_count, 1);
        assert_eq!(stats.items_count, 2);

        cache.search(&catalog, &criteria(), 1);
        assert_eq!(cache.stats().hit_count, 2);
        cache.search(&catalog, &criteria(), 2);
        assert_eq!(cache.stats().miss_count, 4);
    }

    #[test]
    fn test_invalidate_after_catalog_change() {
        let mut catalog = catalog();
        let cache = ResultCache::default();
        let mut with_pool = criteria();
        with_pool.required_amenities.insert(Amenity::Pool);

        let (before, _) = cache.search(&catalog, &with_pool, 1);
        assert_eq!(before.total_count, 15);

        catalog.retain(|listing| listing.location != "Austin, TX");
        assert_eq!(cache.invalidate(), 1);

        let (after, _) = cache.search(&catalog, &with_pool, 1);
        assert_eq!(after.total_count, 10);
        assert_eq!(cache.stats().invalidation_count, 1);
    }

    #[test]
    fn test_zero_capacity_never_stores() {
        let catalog = catalog();
        let cache = ResultCache::new(CacheConfig { max_entries: 0 });

        cache.search(&catalog, &criteria(), 1);
        cache.search(&catalog, &criteria(), 1);

        let stats = cache.stats();
        assert_eq!(stats.hit_count, 0);
        assert_eq!(stats.miss_count, 2);
        assert_eq!(stats.items_count, 0);
    }

    #[test]
    fn test_concurrent_lookups() {
        use std::sync::Arc;
        use std::thread;

        let catalog = Arc::new(catalog());
        let cache = Arc::new(ResultCache::default());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for page in 1..=3 {
                        let (result, _) = cache.search(&catalog, &criteria(), page);
                        assert_eq!(result.current_page, page);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let stats = cache.stats();
        assert_eq!(stats.hit_count + stats.miss_count, 12);
        assert_eq!(stats.items_count, 3);
    }

    #[test]
    fn test_hits_proceed_while_a_miss_is_computing() {
        use std::sync::mpsc;
        use std::sync::Arc;
        use std::thread;
        use std::time::Duration;

        let catalog = Arc::new(catalog());
        let cache = Arc::new(ResultCache::default());
        cache.search(&catalog, &criteria(), 1);

        // A large catalog keeps the miss busy filtering
        let big: Arc<Vec<ListingRecord>> = Arc::new(
            (0..2_000)
                .flat_map(|_| catalog.iter().cloned())
                .collect(),
        );
        let miss = {
            let cache = Arc::clone(&cache);
            let big = Arc::clone(&big);
            thread::spawn(move || cache.search(&big, &criteria(), 2))
        };

        let (tx, rx) = mpsc::channel();
        {
            let cache = Arc::clone(&cache);
            let catalog = Arc::clone(&catalog);
            thread::spawn(move || {
                let hit = cache.search(&catalog, &criteria(), 1);
                tx.send(hit).unwrap();
            });
        }

        let hit = rx.recv_timeout(Duration::from_secs(30)).unwrap();
        assert_eq!(hit, search(&catalog, &criteria(), 1));
        miss.join().unwrap();
        assert_eq!(cache.stats().hit_count, 1);
        assert_eq!(cache.stats().items_count, 2);
    }

    #[test]
    fn test_racing_misses_store_one_entry() {
        use std::sync::{Arc, Barrier};
        use std::thread;

        let catalog = Arc::new(catalog());
        let cache = Arc::new(ResultCache::default());
        let barrier = Arc::new(Barrier::new(4));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let catalog = Arc::clone(&catalog);
                let cache = Arc::clone(&cache);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    cache.search(&catalog, &criteria(), 2)
                })
            })
            .collect();

        let expected = search(&catalog, &criteria(), 2);
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
        let stats = cache.stats();
        assert_eq!(stats.items_count, 1);
        assert_eq!(stats.hit_count + stats.miss_count, 4);
    }
}
