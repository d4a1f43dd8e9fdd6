//! Workflow Context - 工作流限界上下文
//!
//! 职责:
//! - 按固定步骤表推进设计到生产的各类流程
//! - 步骤历史记录（只追加）
//! - 回滚 / 暂停 / 恢复 / 取消

mod aggregate;
mod errors;
mod value_objects;

pub use aggregate::{StepTransition, WorkflowExecution};
pub use errors::WorkflowError;
pub use value_objects::{StepStatus, WorkflowId, WorkflowStatus, WorkflowStepData, WorkflowType};
