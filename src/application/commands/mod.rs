//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod edge_commands;
mod quote_commands;
mod tryon_commands;
mod workflow_commands;

pub mod handlers;

pub use edge_commands::*;
pub use quote_commands::*;
pub use tryon_commands::*;
pub use workflow_commands::*;
