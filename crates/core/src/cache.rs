//! Read-side cache keyed by username, backed by Moka.
//!
//! Entries are views, never the source of truth: mutating operations read
//! balances from locked rows and invalidate the affected usernames after
//! commit.
//!
//! A view computed before an invalidation must not land in the cache after
//! it. Readers take a [`UsernameCache::generation`] before loading and store
//! with [`UsernameCache::insert_if_unchanged`], which refuses the write if
//! the username was invalidated in between.

use moka::sync::Cache;
use std::hash::BuildHasher;
use std::hash::RandomState;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default cache capacity (number of entries).
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default time-to-live for cache entries (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Number of invalidation stamp slots. Usernames hash onto slots; a shared
/// slot only makes the freshness check stricter.
const STAMP_SLOTS: usize = 1024;

/// Thread-safe TTL cache from username to a cloned view `V`.
#[derive(Clone)]
pub struct UsernameCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    cache: Cache<String, Arc<V>>,
    /// Monotonic counter, bumped by every invalidation.
    epoch: Arc<AtomicU64>,
    /// Highest epoch at which any username on the slot was invalidated.
    stamps: Arc<[AtomicU64]>,
    hasher: RandomState,
}

impl<V> UsernameCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates a cache with default settings (10 000 entries, 5 minute TTL).
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a cache with custom capacity and TTL.
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self {
            cache,
            epoch: Arc::new(AtomicU64::new(0)),
            stamps: (0..STAMP_SLOTS).map(|_| AtomicU64::new(0)).collect(),
            hasher: RandomState::new(),
        }
    }

    /// Returns the cached view for `username`, if present and fresh.
    #[must_use]
    pub fn get(&self, username: &str) -> Option<V> {
        self.cache.get(username).map(|value| (*value).clone())
    }

    /// Stores a view for `username` unconditionally.
    pub fn insert(&self, username: &str, value: V) {
        self.cache.insert(username.to_string(), Arc::new(value));
    }

    /// Returns the current generation. Take it before loading a view that
    /// will be passed to [`Self::insert_if_unchanged`].
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.epoch.load(Ordering::SeqCst)
    }

    /// Stores a view for `username` only if the username has not been
    /// invalidated since `generation` was taken. Returns whether the view
    /// was kept.
    pub fn insert_if_unchanged(&self, username: &str, generation: u64, value: V) -> bool {
        let stamp = self.stamp_for(username);
        if stamp.load(Ordering::SeqCst) > generation {
            return false;
        }

        self.cache.insert(username.to_string(), Arc::new(value));

        // An invalidation that raced the insert bumped the stamp first
        if stamp.load(Ordering::SeqCst) > generation {
            self.cache.invalidate(username);
            return false;
        }
        true
    }

    /// Drops the entry for `username`.
    pub fn invalidate(&self, username: &str) {
        let next = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.stamp_for(username).fetch_max(next, Ordering::SeqCst);
        self.cache.invalidate(username);
    }

    /// Drops every entry.
    pub fn invalidate_all(&self) {
        let next = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        for stamp in self.stamps.iter() {
            stamp.fetch_max(next, Ordering::SeqCst);
        }
        self.cache.invalidate_all();
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs pending maintenance so counts and evictions are observable.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }

    fn slot(&self, username: &str) -> usize {
        // Truncation is fine: only the low bits pick the slot
        #[allow(clippy::cast_possible_truncation)]
        let hash = self.hasher.hash_one(username) as usize;
        hash % STAMP_SLOTS
    }

    fn stamp_for(&self, username: &str) -> &AtomicU64 {
        &self.stamps[self.slot(username)]
    }
}

impl<V> Default for UsernameCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_then_hit() {
        let cache: UsernameCache<i64> = UsernameCache::new();

        assert_eq!(cache.get("alice"), None);
        cache.insert("alice", 920);
        assert_eq!(cache.get("alice"), Some(920));
    }

    #[test]
    fn test_invalidate_single_entry() {
        let cache: UsernameCache<i64> = UsernameCache::new();
        cache.insert("sender", 900);
        cache.insert("receiver", 1100);

        cache.invalidate("sender");
        cache.run_pending_tasks();

        assert_eq!(cache.get("sender"), None);
        assert_eq!(cache.get("receiver"), Some(1100));
    }

    #[test]
    fn test_invalidate_all() {
        let cache: UsernameCache<String> = UsernameCache::with_config(10, 60);
        cache.insert("a", "x".to_string());
        cache.insert("b", "y".to_string());

        cache.invalidate_all();
        cache.run_pending_tasks();

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.entry_count(), 0);
    }

    #[test]
    fn test_insert_if_unchanged_without_invalidation() {
        let cache: UsernameCache<i64> = UsernameCache::new();
        let generation = cache.generation();

        assert!(cache.insert_if_unchanged("alice", generation, 1000));
        assert_eq!(cache.get("alice"), Some(1000));
    }

    #[test]
    fn test_view_loaded_before_invalidation_is_dropped() {
        let cache: UsernameCache<i64> = UsernameCache::new();

        // Reader takes a generation and loads balance 1000
        let generation = cache.generation();
        // A transfer commits and invalidates before the reader stores
        cache.invalidate("alice");

        assert!(!cache.insert_if_unchanged("alice", generation, 1000));
        assert_eq!(cache.get("alice"), None);

        // The next reader starts after the write and may store
        let generation = cache.generation();
        assert!(cache.insert_if_unchanged("alice", generation, 900));
        assert_eq!(cache.get("alice"), Some(900));
    }

    #[test]
    fn test_invalidating_other_username_keeps_view() {
        let cache: UsernameCache<i64> = UsernameCache::new();
        let alice_slot = cache.slot("alice");
        let other = (0..)
            .map(|i| format!("bob-{i}"))
            .find(|name| cache.slot(name) != alice_slot)
            .unwrap();

        let generation = cache.generation();
        cache.invalidate(&other);

        assert!(cache.insert_if_unchanged("alice", generation, 1000));
        assert_eq!(cache.get("alice"), Some(1000));
    }

    #[test]
    fn test_invalidate_all_drops_pending_views() {
        let cache: UsernameCache<i64> = UsernameCache::with_config(10, 60);
        let generation = cache.generation();

        cache.invalidate_all();

        assert!(!cache.insert_if_unchanged("alice", generation, 1000));
        assert!(!cache.insert_if_unchanged("bob", generation, 1000));
    }

    #[test]
    fn test_concurrent_invalidation_never_leaves_stale_view() {
        let cache: UsernameCache<u64> = UsernameCache::new();

        for _ in 0..200 {
            let generation = cache.generation();
            let writer = {
                let cache = cache.clone();
                std::thread::spawn(move || cache.invalidate("alice"))
            };
            cache.insert_if_unchanged("alice", generation, generation);
            writer.join().unwrap();

            // Every view here was loaded before the writer's invalidation
            assert_eq!(cache.get("alice"), None);
        }
    }

    #[test]
    fn test_insert_overwrites() {
        let cache: UsernameCache<i64> = UsernameCache::default();
        cache.insert("alice", 1000);
        cache.insert("alice", 920);

        assert_eq!(cache.get("alice"), Some(920));
    }
}
