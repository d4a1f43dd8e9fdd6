//! Quote Commands

use uuid::Uuid;

use crate::domain::quote::QuoteRequest;

/// 生成报价命令
#[derive(Debug, Clone)]
pub struct GenerateQuote {
    pub request: QuoteRequest,
    pub user_id: Option<String>,
}

/// 对比已保存的报价
#[derive(Debug, Clone)]
pub struct CompareQuotes {
    pub quote_ids: Vec<Uuid>,
}
