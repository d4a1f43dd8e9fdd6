//! 应用层 - 查询（读操作）
//!
//! CQRS 查询侧：处理所有读操作

mod quote_queries;
mod tryon_queries;
mod workflow_queries;

pub mod handlers;

pub use quote_queries::*;
pub use tryon_queries::*;
pub use workflow_queries::*;
