//! Workflow HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    AdvanceStep, FailWorkflow, GetWorkflow, ListUserWorkflows, StartWorkflow, TransitionWorkflow,
    WorkflowAction,
};
use crate::domain::workflow::{StepTransition, WorkflowType};
use crate::infrastructure::http::dto::{ApiResponse, WorkflowResponse};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartWorkflowRequest {
    pub user_id: String,
    pub workflow_type: WorkflowType,
    #[serde(default)]
    pub input_data: Value,
}

#[derive(Debug, Deserialize)]
pub struct AdvanceStepRequest {
    pub workflow_id: Uuid,
    #[serde(default)]
    pub output_data: Value,
}

#[derive(Debug, Deserialize)]
pub struct WorkflowIdRequest {
    pub workflow_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct FailWorkflowRequest {
    pub workflow_id: Uuid,
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct ListWorkflowsRequest {
    pub user_id: String,
}

#[derive(Debug, Serialize)]
pub struct AdvanceStepResult {
    pub workflow: WorkflowResponse,
    /// 刚完成的步骤
    pub completed_step: String,
    /// 进入的下一步；完成整个工作流时为空
    pub next_step: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 启动工作流
pub async fn start_workflow(
    State(state): State<Arc<AppState>>,
    Json(req): Json<StartWorkflowRequest>,
) -> Result<Json<ApiResponse<WorkflowResponse>>, ApiError> {
    let execution = state
        .start_workflow_handler
        .handle(StartWorkflow {
            user_id: req.user_id,
            workflow_type: req.workflow_type,
            input_data: req.input_data,
        })
        .await?;

    Ok(Json(ApiResponse::success(WorkflowResponse::from(&execution))))
}

/// 完成当前步骤并推进
pub async fn advance_step(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AdvanceStepRequest>,
) -> Result<Json<ApiResponse<AdvanceStepResult>>, ApiError> {
    let response = state
        .advance_step_handler
        .handle(AdvanceStep {
            workflow_id: req.workflow_id,
            output_data: req.output_data,
        })
        .await?;

    let (completed_step, next_step) = match response.transition {
        StepTransition::Advanced { from, to } => (from, Some(to)),
        StepTransition::Completed { last_step } => (last_step, None),
    };

    Ok(Json(ApiResponse::success(AdvanceStepResult {
        workflow: WorkflowResponse::from(&response.execution),
        completed_step,
        next_step,
    })))
}

pub async fn rollback_step(
    state: State<Arc<AppState>>,
    req: Json<WorkflowIdRequest>,
) -> Result<Json<ApiResponse<WorkflowResponse>>, ApiError> {
    transition(state, req, WorkflowAction::Rollback).await
}

pub async fn pause_workflow(
    state: State<Arc<AppState>>,
    req: Json<WorkflowIdRequest>,
) -> Result<Json<ApiResponse<WorkflowResponse>>, ApiError> {
    transition(state, req, WorkflowAction::Pause).await
}

pub async fn resume_workflow(
    state: State<Arc<AppState>>,
    req: Json<WorkflowIdRequest>,
) -> Result<Json<ApiResponse<WorkflowResponse>>, ApiError> {
    transition(state, req, WorkflowAction::Resume).await
}

pub async fn cancel_workflow(
    state: State<Arc<AppState>>,
    req: Json<WorkflowIdRequest>,
) -> Result<Json<ApiResponse<WorkflowResponse>>, ApiError> {
    transition(state, req, WorkflowAction::Cancel).await
}

async fn transition(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WorkflowIdRequest>,
    action: WorkflowAction,
) -> Result<Json<ApiResponse<WorkflowResponse>>, ApiError> {
    let execution = state
        .transition_workflow_handler
        .handle(TransitionWorkflow {
            workflow_id: req.workflow_id,
            action,
        })
        .await?;

    Ok(Json(ApiResponse::success(WorkflowResponse::from(&execution))))
}

/// 标记当前步骤失败
pub async fn fail_workflow(
    State(state): State<Arc<AppState>>,
    Json(req): Json<FailWorkflowRequest>,
) -> Result<Json<ApiResponse<WorkflowResponse>>, ApiError> {
    let execution = state
        .fail_workflow_handler
        .handle(FailWorkflow {
            workflow_id: req.workflow_id,
            reason: req.error,
        })
        .await?;

    Ok(Json(ApiResponse::success(WorkflowResponse::from(&execution))))
}

/// 获取工作流详情
pub async fn get_workflow(
    State(state): State<Arc<AppState>>,
    Json(req): Json<WorkflowIdRequest>,
) -> Result<Json<ApiResponse<WorkflowResponse>>, ApiError> {
    let execution = state
        .get_workflow_handler
        .handle(GetWorkflow {
            workflow_id: req.workflow_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(WorkflowResponse::from(&execution))))
}

/// 列出用户的工作流
pub async fn list_workflows(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListWorkflowsRequest>,
) -> Result<Json<ApiResponse<Vec<WorkflowResponse>>>, ApiError> {
    let executions = state
        .list_workflows_handler
        .handle(ListUserWorkflows {
            user_id: req.user_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        executions.iter().map(WorkflowResponse::from).collect(),
    )))
}
