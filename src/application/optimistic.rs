//! Optimistic Mutation - 乐观更新
//!
//! 流程:
//! 1. 取消 key 上进行中的查询
//! 2. 记录当前缓存快照
//! 3. 写入乐观值
//! 4. 执行真正的修改
//! 5. 成功则使 key 失效，失败则无条件恢复快照
//!
//! 同一 key 上的修改通过 key 锁串行执行

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::application::ports::{KeyGuard, QueryCachePort, QueryKey};

type Callback<A> = Box<dyn FnOnce(&A) + Send>;

/// 针对单个缓存 key 的乐观修改
pub struct OptimisticMutation<T, R, E> {
    cache: Arc<dyn QueryCachePort>,
    key: QueryKey,
    on_success: Option<Callback<R>>,
    on_error: Option<Callback<E>>,
    _value: PhantomData<fn() -> T>,
}

impl<T, R, E> OptimisticMutation<T, R, E>
where
    T: Serialize + DeserializeOwned + Send,
    R: Send,
    E: std::fmt::Display + Send,
{
    pub fn new(cache: Arc<dyn QueryCachePort>, key: QueryKey) -> Self {
        Self {
            cache,
            key,
            on_success: None,
            on_error: None,
            _value: PhantomData,
        }
    }

    pub fn on_success(mut self, callback: impl FnOnce(&R) + Send + 'static) -> Self {
        self.on_success = Some(Box::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl FnOnce(&E) + Send + 'static) -> Self {
        self.on_error = Some(Box::new(callback));
        self
    }

    /// 获取 key 锁后执行
    pub async fn execute<O, M, Fut>(self, optimistic: O, mutation: M) -> Result<R, E>
    where
        O: FnOnce(Option<T>) -> T + Send,
        M: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<R, E>> + Send,
    {
        let (cache, key) = (self.cache.clone(), self.key.clone());
        let guard = cache.lock(&key).await;
        self.execute_with_guard(&guard, optimistic, mutation).await
    }

    /// 调用方已持有 key 锁时使用（例如需要在锁内先读取最新值）
    pub async fn execute_with_guard<O, M, Fut>(
        self,
        _guard: &KeyGuard,
        optimistic: O,
        mutation: M,
    ) -> Result<R, E>
    where
        O: FnOnce(Option<T>) -> T + Send,
        M: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<R, E>> + Send,
    {
        let Self {
            cache,
            key,
            on_success,
            on_error,
            ..
        } = self;

        cache.cancel(&key);
        let snapshot = cache.get(&key);
        write_optimistic(cache.as_ref(), &key, snapshot.clone(), optimistic);

        match mutation().await {
            Ok(result) => {
                if let Err(e) = cache.invalidate(&key).await {
                    tracing::warn!(key = %key, error = %e, "Invalidate after mutation failed");
                }
                if let Some(callback) = on_success {
                    callback(&result);
                }
                Ok(result)
            }
            Err(err) => {
                restore(cache.as_ref(), &key, snapshot);
                tracing::debug!(key = %key, error = %err, "Mutation failed, snapshot restored");
                if let Some(callback) = on_error {
                    callback(&err);
                }
                Err(err)
            }
        }
    }
}

fn write_optimistic<T, O>(cache: &dyn QueryCachePort, key: &QueryKey, snapshot: Option<Value>, optimistic: O)
where
    T: Serialize + DeserializeOwned,
    O: FnOnce(Option<T>) -> T,
{
    let current = match snapshot.map(serde_json::from_value::<T>).transpose() {
        Ok(current) => current,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Cached value has unexpected shape, skipping optimistic write");
            return;
        }
    };

    match serde_json::to_value(optimistic(current)) {
        Ok(value) => cache.set(key, value),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Failed to serialize optimistic value");
        }
    }
}

fn restore(cache: &dyn QueryCachePort, key: &QueryKey, snapshot: Option<Value>) {
    match snapshot {
        Some(value) => cache.set(key, value),
        None => cache.remove(key),
    }
}
