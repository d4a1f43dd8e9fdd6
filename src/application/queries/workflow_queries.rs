//! Workflow Queries

use uuid::Uuid;

/// 获取工作流详情
#[derive(Debug, Clone)]
pub struct GetWorkflow {
    pub workflow_id: Uuid,
}

/// 列出用户的工作流
#[derive(Debug, Clone)]
pub struct ListUserWorkflows {
    pub user_id: String,
}
