//! Query Cache Port - 查询缓存抽象
//!
//! 显式构造、注入使用的有界缓存；值统一存为 JSON

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::OwnedMutexGuard;

/// Query Cache 错误
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Fetch failed: {0}")]
    FetchFailed(String),
}

/// 缓存 key，由若干段组成，显示为 `a:b:c`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn workflow(id: impl std::fmt::Display) -> Self {
        Self::new(["workflow".to_string(), id.to_string()])
    }

    pub fn quote(id: impl std::fmt::Display) -> Self {
        Self::new(["quote".to_string(), id.to_string()])
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(":"))
    }
}

/// 从数据源加载 key 对应的值；Ok(None) 表示数据不存在
pub type QueryFetcher =
    Arc<dyn Fn() -> BoxFuture<'static, Result<Option<Value>, CacheError>> + Send + Sync>;

/// key 锁的持有凭证
///
/// drop 时先释放锁，再执行登记的清理回调
pub struct KeyGuard {
    guard: Option<OwnedMutexGuard<()>>,
    on_release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl KeyGuard {
    pub fn new(guard: OwnedMutexGuard<()>) -> Self {
        Self {
            guard: Some(guard),
            on_release: None,
        }
    }

    pub fn on_release(mut self, callback: impl FnOnce() + Send + Sync + 'static) -> Self {
        self.on_release = Some(Box::new(callback));
        self
    }
}

impl Drop for KeyGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        if let Some(callback) = self.on_release.take() {
            callback();
        }
    }
}

/// 缓存统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_entries: usize,
    pub max_entries: usize,
    pub hit_count: u64,
    pub miss_count: u64,
    pub eviction_count: u64,
}

/// Query Cache Port
#[async_trait]
pub trait QueryCachePort: Send + Sync {
    /// 读取未过期的值
    fn get(&self, key: &QueryKey) -> Option<Value>;

    /// 直接写入（超过容量时按 LRU 淘汰）
    fn set(&self, key: &QueryKey, value: Value);

    fn remove(&self, key: &QueryKey);

    /// 取消 key 上正在进行的 fetch，其结果不会写入缓存
    fn cancel(&self, key: &QueryKey);

    /// 缓存优先读取；未命中时调用 fetcher 并写入缓存
    ///
    /// fetcher 会被登记，供 invalidate 重新拉取
    async fn fetch(&self, key: &QueryKey, fetcher: QueryFetcher)
        -> Result<Option<Value>, CacheError>;

    /// 使 key 失效：有登记的 fetcher 时重新拉取，否则直接移除
    async fn invalidate(&self, key: &QueryKey) -> Result<(), CacheError>;

    /// 获取 key 级别的互斥锁，用于串行化同一 key 上的修改
    async fn lock(&self, key: &QueryKey) -> KeyGuard;

    fn stats(&self) -> CacheStats;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_key_display() {
        let key = QueryKey::new(["workflow", "abc", "history"]);
        assert_eq!(key.to_string(), "workflow:abc:history");
        assert_eq!(QueryKey::workflow("w1"), QueryKey::new(["workflow", "w1"]));
    }

    #[tokio::test]
    async fn test_key_guard_releases_before_callback() {
        let lock = Arc::new(tokio::sync::Mutex::new(()));
        let released = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let guard = {
            let lock = lock.clone();
            let released = released.clone();
            KeyGuard::new(lock.clone().lock_owned().await).on_release(move || {
                released.store(lock.try_lock().is_ok(), std::sync::atomic::Ordering::SeqCst);
            })
        };
        assert!(lock.try_lock().is_err());

        drop(guard);
        assert!(released.load(std::sync::atomic::Ordering::SeqCst));
    }
}
