//! HTTP Routes
//!
//! API Endpoints:
//! - /api/ping                    GET   健康检查
//! - /api/quote/generate          POST  生成报价
//! - /api/quote/compare           POST  对比已保存的报价
//! - /api/quote/get               POST  获取报价详情
//! - /api/workflow/start          POST  启动工作流
//! - /api/workflow/advance        POST  完成当前步骤并推进
//! - /api/workflow/rollback       POST  回退到上一步
//! - /api/workflow/pause          POST  暂停
//! - /api/workflow/resume         POST  恢复
//! - /api/workflow/cancel         POST  取消
//! - /api/workflow/fail           POST  标记当前步骤失败
//! - /api/workflow/get            POST  获取工作流详情
//! - /api/workflow/list           POST  列出用户的工作流
//! - /api/tryon/batch             POST  批量虚拟试穿
//! - /api/tryon/get               POST  获取试穿会话
//! - /api/tryon/batch_sessions    POST  获取批次内的会话
//! - /api/edge/invoke            POST  调用指定的 edge function
//! - /ws/events                   WS    全局事件推送

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        .nest("/api", api_routes())
        .route("/ws/events", get(handlers::events_websocket_handler))
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/quote", quote_routes())
        .nest("/workflow", workflow_routes())
        .nest("/tryon", tryon_routes())
        .route("/edge/invoke", post(handlers::invoke_edge_function))
}

/// Quote 路由
fn quote_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(handlers::generate_quote))
        .route("/compare", post(handlers::compare_quotes))
        .route("/get", post(handlers::get_quote))
}

/// Workflow 路由
fn workflow_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/start", post(handlers::start_workflow))
        .route("/advance", post(handlers::advance_step))
        .route("/rollback", post(handlers::rollback_step))
        .route("/pause", post(handlers::pause_workflow))
        .route("/resume", post(handlers::resume_workflow))
        .route("/cancel", post(handlers::cancel_workflow))
        .route("/fail", post(handlers::fail_workflow))
        .route("/get", post(handlers::get_workflow))
        .route("/list", post(handlers::list_workflows))
}

/// Try-On 路由
fn tryon_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/batch", post(handlers::batch_tryon))
        .route("/get", post(handlers::get_tryon_session))
        .route("/batch_sessions", post(handlers::get_batch_sessions))
}
