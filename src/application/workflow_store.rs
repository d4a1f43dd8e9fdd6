//! Workflow Store - 带查询缓存的工作流读写
//!
//! 读取经过 query cache（key = workflow:{id}），
//! 修改在 key 锁内先加载最新值，再通过 OptimisticMutation 持久化

use futures_util::FutureExt;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::optimistic::OptimisticMutation;
use crate::application::ports::{
    CacheError, QueryCachePort, QueryFetcher, QueryKey, WorkflowRepositoryPort,
};
use crate::domain::workflow::{WorkflowError, WorkflowExecution, WorkflowId};

pub struct WorkflowStore {
    repo: Arc<dyn WorkflowRepositoryPort>,
    cache: Arc<dyn QueryCachePort>,
}

impl WorkflowStore {
    pub fn new(repo: Arc<dyn WorkflowRepositoryPort>, cache: Arc<dyn QueryCachePort>) -> Self {
        Self { repo, cache }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 新建的工作流直接写库，并预热缓存
    pub async fn insert(&self, execution: &WorkflowExecution) -> Result<(), ApplicationError> {
        self.repo.save(execution).await?;
        let key = QueryKey::workflow(execution.id());
        if let Err(e) = self.cache.fetch(&key, self.fetcher(*execution.id())).await {
            tracing::warn!(key = %key, error = %e, "Failed to warm workflow cache");
        }
        Ok(())
    }

    pub async fn load(&self, id: Uuid) -> Result<Option<WorkflowExecution>, ApplicationError> {
        let id = WorkflowId::from_uuid(id);
        let value = self
            .cache
            .fetch(&QueryKey::workflow(id), self.fetcher(id))
            .await?;

        value
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| ApplicationError::internal(format!("Corrupt cached workflow: {}", e)))
    }

    /// 在 key 锁内加载、修改并保存
    ///
    /// 领域规则失败时不触碰缓存
    pub async fn mutate<T, F>(
        &self,
        id: Uuid,
        apply: F,
    ) -> Result<(WorkflowExecution, T), ApplicationError>
    where
        T: Send,
        F: FnOnce(&mut WorkflowExecution) -> Result<T, WorkflowError> + Send,
    {
        let key = QueryKey::workflow(id);
        let guard = self.cache.lock(&key).await;

        let mut execution = self
            .load(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Workflow", id))?;
        let outcome = apply(&mut execution)?;

        let repo = self.repo.clone();
        let updated = execution.clone();
        let optimistic = execution.clone();

        OptimisticMutation::<WorkflowExecution, (), ApplicationError>::new(self.cache.clone(), key)
            .execute_with_guard(
                &guard,
                move |_| optimistic,
                move || async move { repo.save(&updated).await.map_err(ApplicationError::from) },
            )
            .await?;

        Ok((execution, outcome))
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<WorkflowExecution>, ApplicationError> {
        Ok(self.repo.find_by_user(user_id).await?)
    }

    fn fetcher(&self, id: WorkflowId) -> QueryFetcher {
        let repo = self.repo.clone();
        Arc::new(move || {
            let repo = repo.clone();
            async move {
                let found = repo
                    .find_by_id(id)
                    .await
                    .map_err(|e| CacheError::FetchFailed(e.to_string()))?;
                found
                    .map(|w| serde_json::to_value(&w))
                    .transpose()
                    .map_err(|e| CacheError::SerializationError(e.to_string()))
            }
            .boxed()
        })
    }
}
