//! SQLite Workflow Repository

use async_trait::async_trait;
use sqlx::FromRow;
use uuid::Uuid;

use super::database::{db_error, from_json, parse_time, to_json};
use super::DbPool;
use crate::application::ports::{RepositoryError, WorkflowRepositoryPort};
use crate::domain::workflow::{WorkflowExecution, WorkflowId, WorkflowStatus, WorkflowType};

/// SQLite Workflow Repository
pub struct SqliteWorkflowRepository {
    pool: DbPool,
}

impl SqliteWorkflowRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct WorkflowRow {
    id: String,
    user_id: String,
    workflow_type: String,
    current_step: String,
    step_history: String,
    status: String,
    input_data: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<WorkflowRow> for WorkflowExecution {
    type Error = RepositoryError;

    fn try_from(row: WorkflowRow) -> Result<Self, Self::Error> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;
        let workflow_type = WorkflowType::from_str(&row.workflow_type).ok_or_else(|| {
            RepositoryError::SerializationError(format!("Unknown workflow type: {}", row.workflow_type))
        })?;
        let status = WorkflowStatus::from_str(&row.status).ok_or_else(|| {
            RepositoryError::SerializationError(format!("Unknown workflow status: {}", row.status))
        })?;

        WorkflowExecution::rehydrate(
            WorkflowId::from_uuid(id),
            row.user_id,
            workflow_type,
            row.current_step,
            from_json(&row.step_history)?,
            status,
            from_json(&row.input_data)?,
            parse_time(&row.created_at)?,
            parse_time(&row.updated_at)?,
        )
        .map_err(|e| RepositoryError::SerializationError(e.to_string()))
    }
}

const SELECT_COLUMNS: &str = "SELECT id, user_id, workflow_type, current_step, step_history, status, input_data, created_at, updated_at FROM workflow_executions";

#[async_trait]
impl WorkflowRepositoryPort for SqliteWorkflowRepository {
    async fn save(&self, execution: &WorkflowExecution) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO workflow_executions
                (id, user_id, workflow_type, current_step, step_history, status, input_data, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                current_step = excluded.current_step,
                step_history = excluded.step_history,
                status = excluded.status,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(execution.id().to_string())
        .bind(execution.user_id())
        .bind(execution.workflow_type().as_str())
        .bind(execution.current_step())
        .bind(to_json(&execution.step_history())?)
        .bind(execution.status().as_str())
        .bind(to_json(execution.input_data())?)
        .bind(execution.created_at().to_rfc3339())
        .bind(execution.updated_at().to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        Ok(())
    }

    async fn find_by_id(&self, id: WorkflowId) -> Result<Option<WorkflowExecution>, RepositoryError> {
        let row: Option<WorkflowRow> = sqlx::query_as(&format!("{} WHERE id = ?", SELECT_COLUMNS))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?;

        row.map(WorkflowExecution::try_from).transpose()
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<WorkflowExecution>, RepositoryError> {
        let rows: Vec<WorkflowRow> = sqlx::query_as(&format!(
            "{} WHERE user_id = ? ORDER BY rowid DESC",
            SELECT_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error)?;

        rows.into_iter().map(WorkflowExecution::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::sqlite::create_test_pool;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_and_reload_round_trip() {
        let repo = SqliteWorkflowRepository::new(create_test_pool().await.unwrap());
        let mut wf = WorkflowExecution::start(
            "user-1",
            WorkflowType::OrderFulfillment,
            json!({ "order_id": "o-1" }),
        );
        repo.save(&wf).await.unwrap();

        wf.advance(json!({ "confirmed": true })).unwrap();
        repo.save(&wf).await.unwrap();

        let loaded = repo.find_by_id(*wf.id()).await.unwrap().unwrap();
        assert_eq!(loaded, wf);
        assert_eq!(loaded.current_step(), "material_sourcing");
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let repo = SqliteWorkflowRepository::new(create_test_pool().await.unwrap());
        for user in ["a", "a", "b"] {
            let wf = WorkflowExecution::start(user, WorkflowType::UserOnboarding, json!({}));
            repo.save(&wf).await.unwrap();
        }

        assert_eq!(repo.find_by_user("a").await.unwrap().len(), 2);
        assert_eq!(repo.find_by_user("b").await.unwrap().len(), 1);
        assert!(repo.find_by_id(WorkflowId::new()).await.unwrap().is_none());
    }
}
