//! Try-On Queries

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct GetTryOnSession {
    pub session_id: Uuid,
}

/// 获取批次内所有会话
#[derive(Debug, Clone)]
pub struct GetBatchSessions {
    pub batch_id: Uuid,
}
