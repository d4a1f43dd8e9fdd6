//! Create2Make - 设计到生产的编排服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Quote Context: 报价计算与对比（纯函数）
//! - Workflow Context: 多步骤工作流状态机
//! - Try-On Context: 虚拟试穿会话与批次结果
//!
//! 应用层 (application/):
//! - Ports: 端口定义（EdgeFunction, Repositories, QueryCache, EventPublisher）
//! - Commands: CQRS 命令处理器
//! - Queries: CQRS 查询处理器
//! - Optimistic: 基于查询缓存的乐观更新
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: JSON API + WebSocket 事件推送
//! - Adapters: Edge Function 客户端（HTTP / Fake）
//! - Cache: LRU + TTL 查询缓存
//! - Persistence: SQLite 存储
//! - Events: 广播事件发布

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
