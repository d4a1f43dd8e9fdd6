//! Quote HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{CompareQuotes, GenerateQuote, GetQuote};
use crate::domain::quote::{QuoteComparison, QuoteRequest, QuoteResult};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateQuoteRequest {
    #[serde(flatten)]
    pub request: QuoteRequest,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuotesRequest {
    pub quote_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct GetQuoteRequest {
    pub id: Uuid,
}

/// 已保存的报价及其原始请求
#[derive(Debug, Serialize)]
pub struct StoredQuoteResponse {
    pub quote: QuoteResult,
    pub request: QuoteRequest,
    pub user_id: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 生成报价
pub async fn generate_quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateQuoteRequest>,
) -> Result<Json<ApiResponse<QuoteResult>>, ApiError> {
    let quote = state
        .generate_quote_handler
        .handle(GenerateQuote {
            request: req.request,
            user_id: req.user_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(quote)))
}

/// 对比已保存的报价
pub async fn compare_quotes(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CompareQuotesRequest>,
) -> Result<Json<ApiResponse<QuoteComparison>>, ApiError> {
    let comparison = state
        .compare_quotes_handler
        .handle(CompareQuotes {
            quote_ids: req.quote_ids,
        })
        .await?;

    Ok(Json(ApiResponse::success(comparison)))
}

/// 获取报价详情
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetQuoteRequest>,
) -> Result<Json<ApiResponse<StoredQuoteResponse>>, ApiError> {
    let record = state
        .get_quote_handler
        .handle(GetQuote { quote_id: req.id })
        .await?;

    Ok(Json(ApiResponse::success(StoredQuoteResponse {
        quote: record.quote,
        request: record.request,
        user_id: record.user_id,
    })))
}
