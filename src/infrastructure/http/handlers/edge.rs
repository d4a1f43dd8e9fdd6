//! Edge Function HTTP Handlers

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use crate::application::{EdgeFunction, InvokeEdgeFunction};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct InvokeEdgeRequest {
    /// 函数名，例如 "enhance-prompt-ai"
    pub function: String,
    #[serde(default = "empty_object")]
    pub payload: Value,
}

fn empty_object() -> Value {
    Value::Object(Default::default())
}

/// 调用指定的 edge function，返回远端 body
pub async fn invoke_edge_function(
    State(state): State<Arc<AppState>>,
    Json(req): Json<InvokeEdgeRequest>,
) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let function = EdgeFunction::from_name(&req.function)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown edge function: {}", req.function)))?;

    let body = state
        .invoke_edge_handler
        .handle(InvokeEdgeFunction {
            function,
            payload: req.payload,
        })
        .await?;

    Ok(Json(ApiResponse::success(body)))
}
