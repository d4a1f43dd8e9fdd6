//! Infrastructure Layer - 基础设施层
//!
//! 提供所有端口的具体实现

pub mod adapters;
pub mod cache;
pub mod events;
pub mod http;
pub mod persistence;

pub use cache::InMemoryQueryCache;
pub use events::EventPublisher;
