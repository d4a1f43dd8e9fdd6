//! Query Handlers 实现

mod quote_handlers;
mod tryon_handlers;
mod workflow_handlers;

pub use quote_handlers::*;
pub use tryon_handlers::*;
pub use workflow_handlers::*;
