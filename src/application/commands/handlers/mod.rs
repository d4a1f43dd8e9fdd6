//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod edge_handlers;
mod quote_handlers;
mod tryon_handlers;
mod workflow_handlers;

pub use edge_handlers::*;
pub use quote_handlers::*;
pub use tryon_handlers::*;
pub use workflow_handlers::*;
