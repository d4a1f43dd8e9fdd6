//! SQLite Persistence - SQLite 数据库持久化实现

mod database;
mod quote_repo;
mod tryon_session_repo;
mod workflow_repo;

pub use database::*;
pub use quote_repo::*;
pub use tryon_session_repo::*;
pub use workflow_repo::*;
