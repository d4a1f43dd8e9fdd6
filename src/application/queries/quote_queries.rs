//! Quote Queries

use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct GetQuote {
    pub quote_id: Uuid,
}
