//! SQLite Try-On Session Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{db_error, from_json, parse_time, to_json};
use super::DbPool;
use crate::application::ports::{RepositoryError, TryOnSessionRepositoryPort};
use crate::domain::tryon::{TryOnSession, TryOnStatus};

/// SQLite Try-On Session Repository
pub struct SqliteTryOnSessionRepository {
    pool: DbPool,
}

impl SqliteTryOnSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SessionRow {
    id: String,
    batch_id: Option<String>,
    user_id: String,
    body_reference_url: String,
    clothing_image_url: String,
    generated_image_id: String,
    settings: String,
    status: String,
    result_url: Option<String>,
    error_message: Option<String>,
    created_at: String,
    updated_at: String,
}

fn parse_uuid(value: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(value).map_err(|e| RepositoryError::SerializationError(e.to_string()))
}

impl TryFrom<SessionRow> for TryOnSession {
    type Error = RepositoryError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(TryOnSession {
            id: parse_uuid(&row.id)?,
            batch_id: row.batch_id.as_deref().map(parse_uuid).transpose()?,
            user_id: row.user_id,
            body_reference_url: row.body_reference_url,
            clothing_image_url: row.clothing_image_url,
            generated_image_id: row.generated_image_id,
            settings: from_json(&row.settings)?,
            status: TryOnStatus::from_str(&row.status).ok_or_else(|| {
                RepositoryError::SerializationError(format!("Unknown try-on status: {}", row.status))
            })?,
            result_url: row.result_url,
            error_message: row.error_message,
            created_at: parse_time(&row.created_at)?,
            updated_at: parse_time(&row.updated_at)?,
        })
    }
}

const SELECT_COLUMNS: &str = "SELECT id, batch_id, user_id, body_reference_url, clothing_image_url, generated_image_id, settings, status, result_url, error_message, created_at, updated_at FROM virtual_tryon_sessions";

#[async_trait]
impl TryOnSessionRepositoryPort for SqliteTryOnSessionRepository {
    async fn save(&self, session: &TryOnSession) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO virtual_tryon_sessions
                (id, batch_id, user_id, body_reference_url, clothing_image_url, generated_image_id,
                 settings, status, result_url, error_message, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                settings = excluded.settings,
                status = excluded.status,
                result_url = excluded.result_url,
                error_message = excluded.error_message,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(session.id.to_string())
        .bind(session.batch_id.map(|id| id.to_string()))
        .bind(&session.user_id)
        .bind(&session.body_reference_url)
        .bind(&session.clothing_image_url)
        .bind(&session.generated_image_id)
        .bind(to_json(&session.settings)?)
        .bind(session.status.as_str())
        .bind(&session.result_url)
        .bind(&session.error_message)
        .bind(session.created_at.to_rfc3339())
        .bind(session.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TryOnSession>, RepositoryError> {
        let row: Option<SessionRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(TryOnSession::try_from).transpose()
    }

    async fn find_by_batch(&self, batch_id: Uuid) -> Result<Vec<TryOnSession>, RepositoryError> {
        let rows: Vec<SessionRow> = sqlx::query_as(&format!(
            "{} WHERE batch_id = ? ORDER BY rowid ASC",
            SELECT_COLUMNS
        ))
        .bind(batch_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(TryOnSession::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tryon::{FitAdjustment, TryOnSettings};
    use crate::infrastructure::persistence::sqlite::create_test_pool;

    #[tokio::test]
    async fn test_status_updates_are_persisted() {
        let repo = SqliteTryOnSessionRepository::new(create_test_pool().await.unwrap());
        let settings = TryOnSettings {
            fit_adjustment: FitAdjustment::Tight,
            ..TryOnSettings::default()
        };
        let mut session = TryOnSession::new("u1", "body", "cloth", "img", settings);
        repo.save(&session).await.unwrap();

        session.mark_processing();
        session.complete("https://cdn/out.png");
        repo.save(&session).await.unwrap();

        let loaded = repo.find_by_id(session.id).await.unwrap().unwrap();
        assert_eq!(loaded, session);
        assert_eq!(loaded.settings.fit_adjustment, FitAdjustment::Tight);
    }

    #[tokio::test]
    async fn test_find_by_batch_keeps_insert_order() {
        let repo = SqliteTryOnSessionRepository::new(create_test_pool().await.unwrap());
        let batch_id = Uuid::new_v4();
        let mut ids = Vec::new();
        for i in 0..3 {
            let session = TryOnSession::new("u1", "body", format!("cloth-{i}"), format!("img-{i}"), TryOnSettings::default())
                .in_batch(batch_id);
            ids.push(session.id);
            repo.save(&session).await.unwrap();
        }
        let other = TryOnSession::new("u1", "body", "x", "y", TryOnSettings::default());
        repo.save(&other).await.unwrap();

        let found: Vec<Uuid> = repo
            .find_by_batch(batch_id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(found, ids);
    }
}
