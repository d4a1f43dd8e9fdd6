//! Workflow Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{StepStatus, WorkflowError, WorkflowId, WorkflowStatus, WorkflowStepData, WorkflowType};

/// advance 的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepTransition {
    /// 进入下一步
    Advanced { from: String, to: String },
    /// 终止步骤已完成，工作流结束
    Completed { last_step: String },
}

/// WorkflowExecution 聚合根
///
/// 不变量:
/// - start 之后 step_history 至少有一条记录
/// - step_history 只追加，已有记录只会从 pending 变为其他状态
/// - 非终止状态下，current_step 恰有一条 pending 记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowExecution {
    id: WorkflowId,
    user_id: String,
    workflow_type: WorkflowType,
    current_step: String,
    step_history: Vec<WorkflowStepData>,
    status: WorkflowStatus,
    input_data: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WorkflowExecution {
    /// 启动新的工作流实例
    pub fn start(user_id: impl Into<String>, workflow_type: WorkflowType, input_data: Value) -> Self {
        let now = Utc::now();
        let first = workflow_type.first_step();
        Self {
            id: WorkflowId::new(),
            user_id: user_id.into(),
            workflow_type,
            current_step: first.to_string(),
            step_history: vec![WorkflowStepData::pending(first, input_data.clone())],
            status: WorkflowStatus::Active,
            input_data,
            created_at: now,
            updated_at: now,
        }
    }

    /// 从持久化数据重建
    #[allow(clippy::too_many_arguments)]
    pub fn rehydrate(
        id: WorkflowId,
        user_id: String,
        workflow_type: WorkflowType,
        current_step: String,
        step_history: Vec<WorkflowStepData>,
        status: WorkflowStatus,
        input_data: Value,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, WorkflowError> {
        if workflow_type.step_index(&current_step).is_none() {
            return Err(WorkflowError::UnknownStep {
                workflow_type,
                step: current_step,
            });
        }
        Ok(Self {
            id,
            user_id,
            workflow_type,
            current_step,
            step_history,
            status,
            input_data,
            created_at,
            updated_at,
        })
    }

    /// 完成当前步骤并推进到下一步
    pub fn advance(&mut self, output: Value) -> Result<StepTransition, WorkflowError> {
        self.ensure_status("advance", &[WorkflowStatus::Active])?;

        let from = self.current_step.clone();
        if let Some(record) = self.pending_record_mut() {
            record.status = StepStatus::Completed;
            record.output_data = Some(output.clone());
            record.timestamp = Utc::now();
        }

        let transition = match self.workflow_type.next_step(&from) {
            Some(next) => {
                self.step_history.push(WorkflowStepData::pending(next, output));
                self.current_step = next.to_string();
                StepTransition::Advanced {
                    from,
                    to: next.to_string(),
                }
            }
            None => {
                self.status = WorkflowStatus::Completed;
                StepTransition::Completed { last_step: from }
            }
        };

        self.updated_at = Utc::now();
        Ok(transition)
    }

    /// 回到上一步
    ///
    /// 当前 pending 记录和上一步的完成记录都标记为 rolled_back，
    /// 然后用上一步原来的输入追加一条新的 pending 记录。
    pub fn rollback(&mut self) -> Result<StepTransition, WorkflowError> {
        self.ensure_status("rollback", &[WorkflowStatus::Active])?;

        let previous = self
            .workflow_type
            .previous_step(&self.current_step)
            .ok_or(WorkflowError::CannotRollback)?;

        let from = self.current_step.clone();
        let now = Utc::now();
        if let Some(record) = self.pending_record_mut() {
            record.status = StepStatus::RolledBack;
            record.timestamp = now;
        }

        let mut original_input = Value::Null;
        if let Some(record) = self
            .step_history
            .iter_mut()
            .rev()
            .find(|r| r.step_name == previous && r.status == StepStatus::Completed)
        {
            record.status = StepStatus::RolledBack;
            record.timestamp = now;
            original_input = record.input_data.clone();
        }

        self.step_history
            .push(WorkflowStepData::pending(previous, original_input));
        self.current_step = previous.to_string();
        self.updated_at = now;

        Ok(StepTransition::Advanced {
            from,
            to: previous.to_string(),
        })
    }

    pub fn pause(&mut self) -> Result<(), WorkflowError> {
        self.ensure_status("pause", &[WorkflowStatus::Active])?;
        self.status = WorkflowStatus::Paused;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), WorkflowError> {
        self.ensure_status("resume", &[WorkflowStatus::Paused])?;
        self.status = WorkflowStatus::Active;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 取消工作流，当前步骤记录标记为 failed
    pub fn cancel(&mut self) -> Result<(), WorkflowError> {
        self.ensure_status("cancel", &[WorkflowStatus::Active, WorkflowStatus::Paused])?;
        self.close_pending(json!({ "error": "cancelled" }));
        self.status = WorkflowStatus::Cancelled;
        Ok(())
    }

    /// 当前步骤执行失败，整个工作流进入 failed
    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), WorkflowError> {
        self.ensure_status("fail", &[WorkflowStatus::Active, WorkflowStatus::Paused])?;
        self.close_pending(json!({ "error": reason.into() }));
        self.status = WorkflowStatus::Failed;
        Ok(())
    }

    /// 按历史记录计算的进度（已完成记录数 / 记录总数 * 100）
    ///
    /// 只反映已经走过的步骤，不代表在整个步骤表中的位置。
    pub fn step_progress(&self) -> f64 {
        if self.step_history.is_empty() {
            return 0.0;
        }
        let completed = self
            .step_history
            .iter()
            .filter(|r| r.status == StepStatus::Completed)
            .count();
        completed as f64 / self.step_history.len() as f64 * 100.0
    }

    /// 按步骤表计算的进度（已完成的不同步骤数 / 步骤总数 * 100）
    pub fn sequence_progress(&self) -> f64 {
        let steps = self.workflow_type.steps();
        let completed = steps
            .iter()
            .filter(|step| {
                self.step_history
                    .iter()
                    .any(|r| r.step_name == **step && r.status == StepStatus::Completed)
            })
            .count();
        completed as f64 / steps.len() as f64 * 100.0
    }

    fn ensure_status(
        &self,
        action: &'static str,
        allowed: &[WorkflowStatus],
    ) -> Result<(), WorkflowError> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(WorkflowError::InvalidState {
                action,
                status: self.status,
            })
        }
    }

    fn pending_record_mut(&mut self) -> Option<&mut WorkflowStepData> {
        let current = &self.current_step;
        self.step_history
            .iter_mut()
            .rev()
            .find(|r| &r.step_name == current && r.status == StepStatus::Pending)
    }

    fn close_pending(&mut self, output: Value) {
        let now = Utc::now();
        if let Some(record) = self.pending_record_mut() {
            record.status = StepStatus::Failed;
            record.output_data = Some(output);
            record.timestamp = now;
        }
        self.updated_at = now;
    }

    // Getters
    pub fn id(&self) -> &WorkflowId {
        &self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn workflow_type(&self) -> WorkflowType {
        self.workflow_type
    }

    pub fn current_step(&self) -> &str {
        &self.current_step
    }

    pub fn step_history(&self) -> &[WorkflowStepData] {
        &self.step_history
    }

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn input_data(&self) -> &Value {
        &self.input_data
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
