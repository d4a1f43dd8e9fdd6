//! Quote Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{QuoteRecord, QuoteRepositoryPort};
use crate::application::queries::GetQuote;
use crate::domain::quote::QuoteId;

/// GetQuote Handler
pub struct GetQuoteHandler {
    quote_repo: Arc<dyn QuoteRepositoryPort>,
}

impl GetQuoteHandler {
    pub fn new(quote_repo: Arc<dyn QuoteRepositoryPort>) -> Self {
        Self { quote_repo }
    }

    pub async fn handle(&self, query: GetQuote) -> Result<QuoteRecord, ApplicationError> {
        self.quote_repo
            .find_by_id(QuoteId::from_uuid(query.quote_id))
            .await?
            .ok_or_else(|| ApplicationError::not_found("Quote", query.quote_id))
    }
}
