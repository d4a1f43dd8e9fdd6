//! Quote Context - 报价限界上下文
//!
//! 职责:
//! - 根据材料、数量、复杂度计算价格与工期
//! - 多个报价之间的对比与推荐
//!
//! 纯计算，不做任何 I/O；持久化由应用层负责

mod engine;
mod errors;
mod value_objects;

pub use engine::{
    compare_quotes, generate_quote, round_cents, QuoteComparison, QuoteResult,
    QUOTE_VALIDITY_DAYS, RUSH_MULTIPLIER,
};
pub use errors::QuoteError;
pub use value_objects::{BreakdownLine, Complexity, Material, QuoteAlternative, QuoteId, QuoteRequest};
