//! Domain Layer - 领域层
//!
//! 包含三个限界上下文:
//! - Quote Context: 报价计算与对比
//! - Workflow Context: 设计到生产的流程状态机
//! - Try-On Context: 虚拟试穿会话与批量结果

pub mod quote;
pub mod tryon;
pub mod workflow;
