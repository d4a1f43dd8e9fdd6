//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod edge_functions;
mod events;
mod query_cache;
mod repositories;

pub use edge_functions::{
    virtual_tryon, EdgeFunction, EdgeFunctionPort, GatewayError, TryOnSettingsPayload,
    VirtualTryOnRequest, VirtualTryOnResponse,
};
pub use events::{AppEvent, EventPublisherPort};
pub use query_cache::{
    CacheError, CacheStats, KeyGuard, QueryCachePort, QueryFetcher, QueryKey,
};
pub use repositories::{
    QuoteRecord, QuoteRepositoryPort, RepositoryError, TryOnSessionRepositoryPort,
    WorkflowRepositoryPort,
};
