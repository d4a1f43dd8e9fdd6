//! Data Transfer Objects

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::workflow::{WorkflowExecution, WorkflowStepData};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

// ============================================================================
// Workflow DTOs
// ============================================================================

/// 工作流视图，附带两种进度
#[derive(Debug, Serialize)]
pub struct WorkflowResponse {
    pub id: Uuid,
    pub user_id: String,
    pub workflow_type: String,
    pub current_step: String,
    pub status: String,
    pub step_history: Vec<WorkflowStepData>,
    pub input_data: Value,
    pub step_progress: f64,
    pub sequence_progress: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&WorkflowExecution> for WorkflowResponse {
    fn from(execution: &WorkflowExecution) -> Self {
        Self {
            id: *execution.id().as_uuid(),
            user_id: execution.user_id().to_string(),
            workflow_type: execution.workflow_type().as_str().to_string(),
            current_step: execution.current_step().to_string(),
            status: execution.status().as_str().to_string(),
            step_history: execution.step_history().to_vec(),
            input_data: execution.input_data().clone(),
            step_progress: execution.step_progress(),
            sequence_progress: execution.sequence_progress(),
            created_at: execution.created_at().to_rfc3339(),
            updated_at: execution.updated_at().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::workflow::WorkflowType;
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let body = serde_json::to_value(ApiResponse::success(json!({ "a": 1 }))).unwrap();
        assert_eq!(body, json!({ "errno": 0, "error": "", "data": { "a": 1 } }));
    }

    #[test]
    fn test_workflow_response_carries_progress() {
        let mut execution =
            WorkflowExecution::start("user-1", WorkflowType::UserOnboarding, json!({}));
        execution.advance(json!({ "done": true })).unwrap();

        let response = WorkflowResponse::from(&execution);
        assert_eq!(response.workflow_type, "user_onboarding");
        assert_eq!(response.current_step, "style_preferences");
        assert_eq!(response.status, "active");
        assert_eq!(response.step_history.len(), 2);
        assert_eq!(response.step_progress, 50.0);
        assert_eq!(response.sequence_progress, 25.0);
    }
}
