//! In-memory Query Cache Implementation

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::MemoryCache;
use crate::application::ports::{
    CacheError, CacheStats, KeyGuard, QueryCachePort, QueryFetcher, QueryKey,
};

/// 缓存条目：值和用于重新拉取的 fetcher 一起存放，随条目一起淘汰
#[derive(Clone)]
struct CachedQuery {
    value: Value,
    fetcher: Option<QueryFetcher>,
}

/// 进行中的 fetch
#[derive(Default)]
struct InFlight {
    generation: u64,
    active: usize,
}

/// 单次 fetch 的登记，drop 时注销；最后一个 fetch 结束后移除该 key
struct FetchTicket<'a> {
    in_flight: &'a DashMap<QueryKey, InFlight>,
    key: &'a QueryKey,
    generation: u64,
}

impl<'a> FetchTicket<'a> {
    fn begin(in_flight: &'a DashMap<QueryKey, InFlight>, key: &'a QueryKey) -> Self {
        let generation = {
            let mut flight = in_flight.entry(key.clone()).or_default();
            flight.active += 1;
            flight.generation
        };
        Self {
            in_flight,
            key,
            generation,
        }
    }

    fn is_current(&self) -> bool {
        self.in_flight
            .get(self.key)
            .map(|f| f.generation == self.generation)
            .unwrap_or(true)
    }
}

impl Drop for FetchTicket<'_> {
    fn drop(&mut self) {
        if let Some(mut flight) = self.in_flight.get_mut(self.key) {
            flight.active = flight.active.saturating_sub(1);
        }
        self.in_flight.remove_if(self.key, |_, f| f.active == 0);
    }
}

/// 基于 MemoryCache 的查询缓存
///
/// 进行中的 fetch 按 key 记录代数 (generation)，cancel 使代数加一；
/// fetch 完成时代数已变化则丢弃结果，不写入缓存。
/// fetcher 存放在缓存条目中，代数和 key 锁只在使用期间存在，
/// 因此所有按 key 的状态都受 max_entries 约束
pub struct InMemoryQueryCache {
    entries: MemoryCache<QueryKey, CachedQuery>,
    in_flight: DashMap<QueryKey, InFlight>,
    key_locks: Arc<DashMap<QueryKey, Arc<Mutex<()>>>>,
}

impl InMemoryQueryCache {
    pub fn new(max_entries: usize, ttl: Duration) -> Self {
        Self {
            entries: MemoryCache::new(max_entries, ttl),
            in_flight: DashMap::new(),
            key_locks: Arc::new(DashMap::new()),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    async fn load(
        &self,
        key: &QueryKey,
        fetcher: QueryFetcher,
    ) -> Result<Option<Value>, CacheError> {
        let ticket = FetchTicket::begin(&self.in_flight, key);
        let value = fetcher().await?;

        if !ticket.is_current() {
            tracing::debug!(key = %key, "Fetch cancelled, result discarded");
            return Ok(value);
        }

        match &value {
            Some(v) => self.entries.insert(
                key.clone(),
                CachedQuery {
                    value: v.clone(),
                    fetcher: Some(fetcher),
                },
            ),
            None => {
                self.entries.remove(key);
            }
        }
        Ok(value)
    }
}

#[async_trait]
impl QueryCachePort for InMemoryQueryCache {
    fn get(&self, key: &QueryKey) -> Option<Value> {
        self.entries.get(key).map(|q| q.value)
    }

    /// 覆盖值时保留已登记的 fetcher
    fn set(&self, key: &QueryKey, value: Value) {
        let fetcher = self.entries.peek(key).and_then(|q| q.fetcher);
        self.entries.insert(key.clone(), CachedQuery { value, fetcher });
    }

    fn remove(&self, key: &QueryKey) {
        self.entries.remove(key);
    }

    fn cancel(&self, key: &QueryKey) {
        if let Some(mut flight) = self.in_flight.get_mut(key) {
            flight.generation += 1;
        }
    }

    async fn fetch(
        &self,
        key: &QueryKey,
        fetcher: QueryFetcher,
    ) -> Result<Option<Value>, CacheError> {
        if let Some(cached) = self.entries.get(key) {
            if cached.fetcher.is_none() {
                self.entries.update(key, |q| q.fetcher = Some(fetcher));
            }
            return Ok(Some(cached.value));
        }
        self.load(key, fetcher).await
    }

    async fn invalidate(&self, key: &QueryKey) -> Result<(), CacheError> {
        let fetcher = self.entries.peek(key).and_then(|q| q.fetcher);
        match fetcher {
            Some(fetcher) => {
                if let Err(e) = self.load(key, fetcher).await {
                    self.entries.remove(key);
                    return Err(e);
                }
                Ok(())
            }
            None => {
                self.entries.remove(key);
                Ok(())
            }
        }
    }

    async fn lock(&self, key: &QueryKey) -> KeyGuard {
        let lock = self
            .key_locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;

        let locks = self.key_locks.clone();
        let key = key.clone();
        KeyGuard::new(guard).on_release(move || {
            // 没有其他持有者或等待者时移除
            locks.remove_if(&key, |_, l| Arc::strong_count(l) == 1);
        })
    }

    fn stats(&self) -> CacheStats {
        CacheStats {
            total_entries: self.entries.len(),
            max_entries: self.entries.max_entries(),
            hit_count: self.entries.hit_count(),
            miss_count: self.entries.miss_count(),
            eviction_count: self.entries.eviction_count(),
        }
    }
}
