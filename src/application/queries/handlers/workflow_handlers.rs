//! Workflow Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::queries::{GetWorkflow, ListUserWorkflows};
use crate::application::workflow_store::WorkflowStore;
use crate::domain::workflow::WorkflowExecution;

/// GetWorkflow Handler（经过查询缓存）
pub struct GetWorkflowHandler {
    store: Arc<WorkflowStore>,
}

impl GetWorkflowHandler {
    pub fn new(store: Arc<WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, query: GetWorkflow) -> Result<WorkflowExecution, ApplicationError> {
        self.store
            .load(query.workflow_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Workflow", query.workflow_id))
    }
}

/// ListUserWorkflows Handler
pub struct ListUserWorkflowsHandler {
    store: Arc<WorkflowStore>,
}

impl ListUserWorkflowsHandler {
    pub fn new(store: Arc<WorkflowStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        query: ListUserWorkflows,
    ) -> Result<Vec<WorkflowExecution>, ApplicationError> {
        self.store.list_for_user(&query.user_id).await
    }
}
