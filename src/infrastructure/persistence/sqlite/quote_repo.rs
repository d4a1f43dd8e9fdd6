//! SQLite Quote Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{db_error, from_json, parse_time, to_json};
use super::DbPool;
use crate::application::ports::{QuoteRecord, QuoteRepositoryPort, RepositoryError};
use crate::domain::quote::{QuoteId, QuoteResult};

/// SQLite Quote Repository
pub struct SqliteQuoteRepository {
    pool: DbPool,
}

impl SqliteQuoteRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct QuoteRow {
    id: String,
    user_id: Option<String>,
    request: String,
    base_price: f64,
    final_price: f64,
    timeline: i64,
    breakdown: String,
    confidence: f64,
    alternatives: String,
    valid_until: String,
    created_at: String,
}

impl TryFrom<QuoteRow> for QuoteRecord {
    type Error = RepositoryError;

    fn try_from(row: QuoteRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(QuoteRecord {
            quote: QuoteResult {
                id: QuoteId::from_uuid(id),
                base_price: row.base_price,
                final_price: row.final_price,
                timeline: u32::try_from(row.timeline)
                    .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
                breakdown: from_json(&row.breakdown)?,
                confidence: row.confidence,
                alternatives: from_json(&row.alternatives)?,
                valid_until: parse_time(&row.valid_until)?,
                created_at: parse_time(&row.created_at)?,
            },
            request: from_json(&row.request)?,
            user_id: row.user_id,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, user_id, request, base_price, final_price, timeline, breakdown, confidence, alternatives, valid_until, created_at FROM quotes";

#[async_trait]
impl QuoteRepositoryPort for SqliteQuoteRepository {
    async fn save(&self, record: &QuoteRecord) -> Result<(), RepositoryError> {
        let quote = &record.quote;
        sqlx::query(
            r#"
            INSERT INTO quotes
                (id, user_id, request, base_price, final_price, timeline, breakdown, confidence, alternatives, valid_until, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(quote.id.to_string())
        .bind(&record.user_id)
        .bind(to_json(&record.request)?)
        .bind(quote.base_price)
        .bind(quote.final_price)
        .bind(i64::from(quote.timeline))
        .bind(to_json(&quote.breakdown)?)
        .bind(quote.confidence)
        .bind(to_json(&quote.alternatives)?)
        .bind(quote.valid_until.to_rfc3339())
        .bind(quote.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::Duplicate(quote.id.to_string())
            }
            other => db_error(other),
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: QuoteId) -> Result<Option<QuoteRecord>, RepositoryError> {
        let row: Option<QuoteRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(QuoteRecord::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[QuoteId]) -> Result<Vec<QuoteRecord>, RepositoryError> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.find_by_id(*id).await? {
                records.push(record);
            }
        }
        Ok(records)
    }
}
