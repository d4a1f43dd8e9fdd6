//! Workflow Context - Errors

use thiserror::Error;

use super::{WorkflowStatus, WorkflowType};

#[derive(Debug, Error, PartialEq)]
pub enum WorkflowError {
    #[error("当前状态 {status} 不允许执行 {action}")]
    InvalidState {
        action: &'static str,
        status: WorkflowStatus,
    },

    #[error("工作流 {workflow_type} 中不存在步骤: {step}")]
    UnknownStep {
        workflow_type: WorkflowType,
        step: String,
    },

    #[error("已处于第一步，无法回滚")]
    CannotRollback,
}
