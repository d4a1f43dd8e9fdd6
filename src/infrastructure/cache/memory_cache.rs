//! 有界内存缓存（LRU + TTL）

use parking_lot::Mutex;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

struct Entry<V> {
    value: V,
    inserted_at: Instant,
    last_access: u64,
}

struct Inner<K, V> {
    entries: HashMap<K, Entry<V>>,
    tick: u64,
}

impl<K, V> Inner<K, V> {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// 线程安全的有界缓存
///
/// - 超过 max_entries 时先清理过期条目，仍然满则淘汰最久未访问的条目
/// - 条目写入 ttl 之后视为过期，读取时惰性删除
pub struct MemoryCache<K, V> {
    inner: Mutex<Inner<K, V>>,
    max_entries: usize,
    ttl: Duration,
    hit_count: AtomicU64,
    miss_count: AtomicU64,
    eviction_count: AtomicU64,
}

impl<K, V> MemoryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                tick: 0,
            }),
            max_entries: max_entries.max(1),
            ttl,
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
            eviction_count: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let mut inner = self.inner.lock();
        let tick = inner.next_tick();

        let expired = match inner.entries.get_mut(key) {
            Some(entry) if entry.inserted_at.elapsed() >= self.ttl => true,
            Some(entry) => {
                entry.last_access = tick;
                self.hit_count.fetch_add(1, Ordering::Relaxed);
                return Some(entry.value.clone());
            }
            None => false,
        };

        if expired {
            inner.entries.remove(key);
        }
        self.miss_count.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn insert(&self, key: K, value: V) {
        let mut inner = self.inner.lock();
        let tick = inner.next_tick();

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.max_entries {
            self.make_room(&mut inner);
        }

        inner.entries.insert(
            key,
            Entry {
                value,
                inserted_at: Instant::now(),
                last_access: tick,
            },
        );
    }

    /// 读取但不计入命中统计，也不刷新访问顺序
    pub fn peek(&self, key: &K) -> Option<V> {
        self.inner
            .lock()
            .entries
            .get(key)
            .filter(|e| e.inserted_at.elapsed() < self.ttl)
            .map(|e| e.value.clone())
    }

    /// 原地修改已存在的条目，不改变写入时间；条目不存在时返回 false
    pub fn update(&self, key: &K, f: impl FnOnce(&mut V)) -> bool {
        match self.inner.lock().entries.get_mut(key) {
            Some(entry) => {
                f(&mut entry.value);
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.lock().entries.remove(key).map(|e| e.value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.inner
            .lock()
            .entries
            .get(key)
            .map(|e| e.inserted_at.elapsed() < self.ttl)
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn hit_count(&self) -> u64 {
        self.hit_count.load(Ordering::Relaxed)
    }

    pub fn miss_count(&self) -> u64 {
        self.miss_count.load(Ordering::Relaxed)
    }

    pub fn eviction_count(&self) -> u64 {
        self.eviction_count.load(Ordering::Relaxed)
    }

    fn make_room(&self, inner: &mut Inner<K, V>) {
        let ttl = self.ttl;
        let before = inner.entries.len();
        inner.entries.retain(|_, e| e.inserted_at.elapsed() < ttl);
        let purged = before - inner.entries.len();
        if purged > 0 {
            self.eviction_count.fetch_add(purged as u64, Ordering::Relaxed);
        }

        while inner.entries.len() >= self.max_entries {
            let oldest = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_access)
                .map(|(k, _)| k.clone());
            match oldest {
                Some(key) => {
                    inner.entries.remove(&key);
                    self.eviction_count.fetch_add(1, Ordering::Relaxed);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_insert_remove() {
        let cache = MemoryCache::new(4, Duration::from_secs(60));
        assert_eq!(cache.get(&"a"), None);
        cache.insert("a", 1);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.remove(&"a"), Some(1));
        assert!(cache.is_empty());
        assert_eq!(cache.hit_count(), 1);
        assert_eq!(cache.miss_count(), 1);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = MemoryCache::new(2, Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        // touch a so b becomes the LRU entry
        assert_eq!(cache.get(&"a"), Some(1));
        cache.insert("c", 3);

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
        assert!(cache.contains(&"c"));
        assert_eq!(cache.eviction_count(), 1);
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let cache = MemoryCache::new(2, Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a"), Some(10));
        assert_eq!(cache.eviction_count(), 0);
    }

    #[test]
    fn test_peek_and_update_leave_stats_alone() {
        let cache = MemoryCache::new(4, Duration::from_secs(60));
        cache.insert("a", 1);

        assert!(cache.update(&"a", |v| *v += 1));
        assert!(!cache.update(&"b", |v| *v += 1));
        assert_eq!(cache.peek(&"a"), Some(2));
        assert_eq!(cache.peek(&"b"), None);
        assert_eq!(cache.hit_count(), 0);
        assert_eq!(cache.miss_count(), 0);
    }

    #[test]
    fn test_expired_entries_are_dropped() {
        let cache = MemoryCache::new(4, Duration::ZERO);
        cache.insert("a", 1);
        assert_eq!(cache.get(&"a"), None);
        assert!(cache.is_empty());
    }
}
