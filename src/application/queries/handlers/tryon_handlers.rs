//! Try-On Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::TryOnSessionRepositoryPort;
use crate::application::queries::{GetBatchSessions, GetTryOnSession};
use crate::domain::tryon::TryOnSession;

/// GetTryOnSession Handler
pub struct GetTryOnSessionHandler {
    session_repo: Arc<dyn TryOnSessionRepositoryPort>,
}

impl GetTryOnSessionHandler {
    pub fn new(session_repo: Arc<dyn TryOnSessionRepositoryPort>) -> Self {
        Self { session_repo }
    }

    pub async fn handle(&self, query: GetTryOnSession) -> Result<TryOnSession, ApplicationError> {
        self.session_repo
            .find_by_id(query.session_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("TryOnSession", query.session_id))
    }
}

/// GetBatchSessions Handler
pub struct GetBatchSessionsHandler {
    session_repo: Arc<dyn TryOnSessionRepositoryPort>,
}

impl GetBatchSessionsHandler {
    pub fn new(session_repo: Arc<dyn TryOnSessionRepositoryPort>) -> Self {
        Self { session_repo }
    }

    pub async fn handle(&self, query: GetBatchSessions) -> Result<Vec<TryOnSession>, ApplicationError> {
        Ok(self.session_repo.find_by_batch(query.batch_id).await?)
    }
}
