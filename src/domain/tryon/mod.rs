//! Try-On Context - 虚拟试穿限界上下文
//!
//! 职责:
//! - 试穿会话的状态流转 (pending -> processing -> completed/failed)
//! - 批量试穿结果与进度的表示

mod batch;
mod session;
mod value_objects;

pub use batch::{BatchItemOutcome, BatchProgress, BatchTryOnResult};
pub use session::TryOnSession;
pub use value_objects::{FitAdjustment, TryOnSettings, TryOnStatus};
