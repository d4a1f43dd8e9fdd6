//! Quote Command Handlers

use std::sync::Arc;

use crate::application::commands::{CompareQuotes, GenerateQuote};
use crate::application::error::ApplicationError;
use crate::application::ports::{AppEvent, EventPublisherPort, QuoteRecord, QuoteRepositoryPort};
use crate::domain::quote::{compare_quotes, generate_quote, QuoteComparison, QuoteId, QuoteResult};

// ============================================================================
// GenerateQuote
// ============================================================================

/// GenerateQuote Handler
///
/// 报价计算是纯函数；保存失败只记录日志，不影响返回的报价
pub struct GenerateQuoteHandler {
    quote_repo: Arc<dyn QuoteRepositoryPort>,
    events: Arc<dyn EventPublisherPort>,
}

impl GenerateQuoteHandler {
    pub fn new(quote_repo: Arc<dyn QuoteRepositoryPort>, events: Arc<dyn EventPublisherPort>) -> Self {
        Self { quote_repo, events }
    }

    pub async fn handle(&self, command: GenerateQuote) -> Result<QuoteResult, ApplicationError> {
        let quote = generate_quote(&command.request)?;

        let record = QuoteRecord {
            quote: quote.clone(),
            request: command.request,
            user_id: command.user_id,
        };
        if let Err(e) = self.quote_repo.save(&record).await {
            tracing::warn!(quote_id = %quote.id, error = %e, "Failed to store quote");
        }

        tracing::info!(
            quote_id = %quote.id,
            final_price = quote.final_price,
            timeline = quote.timeline,
            "Quote generated"
        );

        self.events.publish(AppEvent::QuoteGenerated {
            quote_id: *quote.id.as_uuid(),
            final_price: quote.final_price,
            timeline: quote.timeline,
        });

        Ok(quote)
    }
}

// ============================================================================
// CompareQuotes
// ============================================================================

/// CompareQuotes Handler
pub struct CompareQuotesHandler {
    quote_repo: Arc<dyn QuoteRepositoryPort>,
}

impl CompareQuotesHandler {
    pub fn new(quote_repo: Arc<dyn QuoteRepositoryPort>) -> Self {
        Self { quote_repo }
    }

    pub async fn handle(&self, command: CompareQuotes) -> Result<QuoteComparison, ApplicationError> {
        let ids: Vec<QuoteId> = command
            .quote_ids
            .iter()
            .copied()
            .map(QuoteId::from_uuid)
            .collect();

        let records = self.quote_repo.find_by_ids(&ids).await?;
        if let Some(missing) = command
            .quote_ids
            .iter()
            .find(|id| !records.iter().any(|r| r.quote.id.as_uuid() == *id))
        {
            return Err(ApplicationError::not_found("Quote", *missing));
        }

        let quotes: Vec<QuoteResult> = records.into_iter().map(|r| r.quote).collect();
        let comparison = compare_quotes(&quotes)?;

        tracing::debug!(
            count = quotes.len(),
            recommended = %comparison.recommended.id,
            "Quotes compared"
        );

        Ok(comparison)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::{Complexity, Material, QuoteRequest};
    use crate::infrastructure::events::EventPublisher;
    use crate::infrastructure::persistence::sqlite::{create_test_pool, SqliteQuoteRepository};
    use uuid::Uuid;

    fn request(complexity: Complexity, rush_order: bool) -> QuoteRequest {
        QuoteRequest {
            materials: vec![Material::new("cotton", 2.0, 5.0)],
            quantity: 10,
            complexity,
            rush_order,
        }
    }

    async fn handlers() -> (GenerateQuoteHandler, CompareQuotesHandler, Arc<EventPublisher>) {
        let pool = create_test_pool().await.unwrap();
        let repo: Arc<dyn QuoteRepositoryPort> = Arc::new(SqliteQuoteRepository::new(pool));
        let events = EventPublisher::new().arc();
        (
            GenerateQuoteHandler::new(repo.clone(), events.clone()),
            CompareQuotesHandler::new(repo),
            events,
        )
    }

    #[tokio::test]
    async fn test_generate_publishes_and_stores() {
        let (generate, compare, events) = handlers().await;
        let mut rx = events.subscribe();

        let q1 = generate
            .handle(GenerateQuote { request: request(Complexity::Simple, false), user_id: None })
            .await
            .unwrap();
        assert_eq!(q1.final_price, 100.0);
        assert!(matches!(rx.try_recv().unwrap(), AppEvent::QuoteGenerated { .. }));

        let q2 = generate
            .handle(GenerateQuote { request: request(Complexity::Simple, true), user_id: Some("u1".into()) })
            .await
            .unwrap();

        let comparison = compare
            .handle(CompareQuotes { quote_ids: vec![*q1.id.as_uuid(), *q2.id.as_uuid()] })
            .await
            .unwrap();
        assert_eq!(comparison.cheapest.id, q1.id);
        assert_eq!(comparison.fastest.id, q2.id);
    }

    #[tokio::test]
    async fn test_invalid_request_is_validation_error() {
        let (generate, _, _) = handlers().await;
        let mut req = request(Complexity::Simple, false);
        req.materials.clear();

        let err = generate
            .handle(GenerateQuote { request: req, user_id: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_compare_missing_or_single_quote() {
        let (generate, compare, _) = handlers().await;
        let q = generate
            .handle(GenerateQuote { request: request(Complexity::Medium, false), user_id: None })
            .await
            .unwrap();

        let err = compare
            .handle(CompareQuotes { quote_ids: vec![*q.id.as_uuid()] })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let err = compare
            .handle(CompareQuotes { quote_ids: vec![*q.id.as_uuid(), Uuid::new_v4()] })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }
}
