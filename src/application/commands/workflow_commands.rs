//! Workflow Commands

use serde_json::Value;
use uuid::Uuid;

use crate::domain::workflow::WorkflowType;

/// 启动工作流命令
#[derive(Debug, Clone)]
pub struct StartWorkflow {
    pub user_id: String,
    pub workflow_type: WorkflowType,
    pub input_data: Value,
}

/// 完成当前步骤并推进
#[derive(Debug, Clone)]
pub struct AdvanceStep {
    pub workflow_id: Uuid,
    pub output_data: Value,
}

/// 步骤以外的状态变更
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowAction {
    Rollback,
    Pause,
    Resume,
    Cancel,
}

impl WorkflowAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowAction::Rollback => "rollback",
            WorkflowAction::Pause => "pause",
            WorkflowAction::Resume => "resume",
            WorkflowAction::Cancel => "cancel",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransitionWorkflow {
    pub workflow_id: Uuid,
    pub action: WorkflowAction,
}

/// 标记当前步骤失败
#[derive(Debug, Clone)]
pub struct FailWorkflow {
    pub workflow_id: Uuid,
    pub reason: String,
}
