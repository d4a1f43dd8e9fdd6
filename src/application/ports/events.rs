//! Event Port - 应用事件通知
//!
//! 用注入的发布器代替全局通知状态

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::tryon::BatchProgress;

/// 推送给订阅者的事件
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum AppEvent {
    QuoteGenerated {
        quote_id: Uuid,
        final_price: f64,
        timeline: u32,
    },
    WorkflowStarted {
        workflow_id: Uuid,
        workflow_type: String,
        user_id: String,
    },
    WorkflowStepChanged {
        workflow_id: Uuid,
        current_step: String,
        status: String,
    },
    BatchProgress {
        batch_id: Uuid,
        completed: usize,
        failed: usize,
        total: usize,
        estimated_secs_remaining: u64,
    },
    BatchCompleted {
        batch_id: Uuid,
        succeeded: usize,
        failed: usize,
        cancelled: usize,
    },
}

impl AppEvent {
    pub fn batch_progress(batch_id: Uuid, progress: &BatchProgress) -> Self {
        AppEvent::BatchProgress {
            batch_id,
            completed: progress.completed,
            failed: progress.failed,
            total: progress.total,
            estimated_secs_remaining: progress.estimated_secs_remaining,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AppEvent::QuoteGenerated { .. } => "QuoteGenerated",
            AppEvent::WorkflowStarted { .. } => "WorkflowStarted",
            AppEvent::WorkflowStepChanged { .. } => "WorkflowStepChanged",
            AppEvent::BatchProgress { .. } => "BatchProgress",
            AppEvent::BatchCompleted { .. } => "BatchCompleted",
        }
    }
}

/// Event Publisher Port
///
/// 发布不能失败；没有订阅者时事件直接丢弃
pub trait EventPublisherPort: Send + Sync {
    fn publish(&self, event: AppEvent);
}
