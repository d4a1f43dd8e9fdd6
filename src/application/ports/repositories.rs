//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::quote::{QuoteId, QuoteRequest, QuoteResult};
use crate::domain::tryon::TryOnSession;
use crate::domain::workflow::{WorkflowExecution, WorkflowId};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Workflow Repository
// ============================================================================

/// Workflow Repository Port
#[async_trait]
pub trait WorkflowRepositoryPort: Send + Sync {
    /// 保存（插入或整体覆盖）工作流实例
    async fn save(&self, execution: &WorkflowExecution) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: WorkflowId) -> Result<Option<WorkflowExecution>, RepositoryError>;

    /// 获取用户的所有工作流，按创建时间倒序
    async fn find_by_user(&self, user_id: &str) -> Result<Vec<WorkflowExecution>, RepositoryError>;
}

// ============================================================================
// Quote Repository
// ============================================================================

/// 报价实体（用于持久化）
#[derive(Debug, Clone)]
pub struct QuoteRecord {
    pub quote: QuoteResult,
    pub request: QuoteRequest,
    pub user_id: Option<String>,
}

/// Quote Repository Port
#[async_trait]
pub trait QuoteRepositoryPort: Send + Sync {
    async fn save(&self, record: &QuoteRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: QuoteId) -> Result<Option<QuoteRecord>, RepositoryError>;

    /// 批量获取，结果顺序与 ids 一致，缺失的 id 被跳过
    async fn find_by_ids(&self, ids: &[QuoteId]) -> Result<Vec<QuoteRecord>, RepositoryError>;
}

// ============================================================================
// Try-On Session Repository
// ============================================================================

/// Try-On Session Repository Port
#[async_trait]
pub trait TryOnSessionRepositoryPort: Send + Sync {
    /// 保存（插入或更新）会话
    async fn save(&self, session: &TryOnSession) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TryOnSession>, RepositoryError>;

    /// 获取批次内所有会话，按创建时间排序
    async fn find_by_batch(&self, batch_id: Uuid) -> Result<Vec<TryOnSession>, RepositoryError>;
}
