//! Try-On HTTP Handlers
//!
//! 批量试穿同步返回所有条目的结果；进度通过 /ws/events 推送。
//! 批次在独立任务中运行，客户端断开后仍会处理完所有条目

use axum::{extract::State, Json};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{BatchTryOn, GetBatchSessions, GetTryOnSession};
use crate::domain::tryon::{BatchTryOnResult, TryOnSession, TryOnSettings};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BatchTryOnRequest {
    pub user_id: String,
    pub body_image_url: String,
    pub clothing_image_urls: Vec<String>,
    pub generated_image_ids: Vec<String>,
    #[serde(default)]
    pub settings: TryOnSettings,
}

#[derive(Debug, Deserialize)]
pub struct GetSessionRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct GetBatchSessionsRequest {
    pub batch_id: Uuid,
}

// ============================================================================
// Handlers
// ============================================================================

/// 批量虚拟试穿
pub async fn batch_tryon(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchTryOnRequest>,
) -> Result<Json<ApiResponse<BatchTryOnResult>>, ApiError> {
    let handler = state.batch_tryon_handler.clone();
    let command = BatchTryOn {
        user_id: req.user_id,
        body_image_url: req.body_image_url,
        clothing_image_urls: req.clothing_image_urls,
        generated_image_ids: req.generated_image_ids,
        settings: req.settings,
    };

    // 请求 future 被丢弃时，批次任务不受影响
    let result = tokio::spawn(async move { handler.handle(command).await })
        .await
        .map_err(|e| ApiError::Internal(format!("Batch try-on task failed: {}", e)))??;

    Ok(Json(ApiResponse::success(result)))
}

/// 获取试穿会话
pub async fn get_tryon_session(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetSessionRequest>,
) -> Result<Json<ApiResponse<TryOnSession>>, ApiError> {
    let session = state
        .get_tryon_session_handler
        .handle(GetTryOnSession { session_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(session)))
}

/// 获取批次内的所有会话
pub async fn get_batch_sessions(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetBatchSessionsRequest>,
) -> Result<Json<ApiResponse<Vec<TryOnSession>>>, ApiError> {
    let sessions = state
        .get_batch_sessions_handler
        .handle(GetBatchSessions {
            batch_id: req.batch_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(sessions)))
}
