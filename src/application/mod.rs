//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（EdgeFunction、Repository、QueryCache、EventPublisher）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - optimistic: 基于查询缓存的乐观更新
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod optimistic;
pub mod ports;
pub mod queries;
pub mod workflow_store;

// Re-exports
pub use commands::{
    AdvanceStep, BatchTryOn, CompareQuotes, FailWorkflow, GenerateQuote, InvokeEdgeFunction,
    StartWorkflow, TransitionWorkflow, WorkflowAction,
    handlers::{
        AdvanceStepHandler, AdvanceStepResponse, BatchTryOnHandler, CompareQuotesHandler,
        FailWorkflowHandler, GenerateQuoteHandler, InvokeEdgeFunctionHandler,
        StartWorkflowHandler, TransitionWorkflowHandler, DEFAULT_SECS_PER_ITEM,
    },
};

pub use error::ApplicationError;
pub use optimistic::OptimisticMutation;
pub use workflow_store::WorkflowStore;

pub use ports::{
    // Edge functions
    virtual_tryon,
    EdgeFunction,
    EdgeFunctionPort,
    GatewayError,
    VirtualTryOnRequest,
    VirtualTryOnResponse,
    // Events
    AppEvent,
    EventPublisherPort,
    // Query cache
    CacheError,
    CacheStats,
    KeyGuard,
    QueryCachePort,
    QueryFetcher,
    QueryKey,
    // Repositories
    QuoteRecord,
    QuoteRepositoryPort,
    RepositoryError,
    TryOnSessionRepositoryPort,
    WorkflowRepositoryPort,
};

pub use queries::{
    GetBatchSessions, GetQuote, GetTryOnSession, GetWorkflow, ListUserWorkflows,
    handlers::{
        GetBatchSessionsHandler, GetQuoteHandler, GetTryOnSessionHandler, GetWorkflowHandler,
        ListUserWorkflowsHandler,
    },
};
