//! Quote Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum QuoteError {
    #[error("材料列表不能为空")]
    EmptyMaterials,

    #[error("数量必须大于 0，当前为 {0}")]
    InvalidQuantity(u32),

    #[error("无效的材料: {0}")]
    InvalidMaterial(String),

    #[error("至少需要 2 个报价才能比较，当前为 {0}")]
    NotEnoughQuotes(usize),
}
