//! Workflow Command Handlers

use std::sync::Arc;

use crate::application::commands::{
    AdvanceStep, FailWorkflow, StartWorkflow, TransitionWorkflow, WorkflowAction,
};
use crate::application::error::ApplicationError;
use crate::application::ports::{AppEvent, EventPublisherPort};
use crate::application::workflow_store::WorkflowStore;
use crate::domain::workflow::{StepTransition, WorkflowExecution};

fn publish_step_changed(events: &dyn EventPublisherPort, execution: &WorkflowExecution) {
    events.publish(AppEvent::WorkflowStepChanged {
        workflow_id: *execution.id().as_uuid(),
        current_step: execution.current_step().to_string(),
        status: execution.status().as_str().to_string(),
    });
}

// ============================================================================
// StartWorkflow
// ============================================================================

/// StartWorkflow Handler
pub struct StartWorkflowHandler {
    store: Arc<WorkflowStore>,
    events: Arc<dyn EventPublisherPort>,
}

impl StartWorkflowHandler {
    pub fn new(store: Arc<WorkflowStore>, events: Arc<dyn EventPublisherPort>) -> Self {
        Self { store, events }
    }

    pub async fn handle(&self, command: StartWorkflow) -> Result<WorkflowExecution, ApplicationError> {
        if command.user_id.trim().is_empty() {
            return Err(ApplicationError::validation("user_id 不能为空"));
        }

        let execution =
            WorkflowExecution::start(command.user_id, command.workflow_type, command.input_data);
        self.store.insert(&execution).await?;

        tracing::info!(
            workflow_id = %execution.id(),
            workflow_type = %execution.workflow_type(),
            user_id = %execution.user_id(),
            "Workflow started"
        );

        self.events.publish(AppEvent::WorkflowStarted {
            workflow_id: *execution.id().as_uuid(),
            workflow_type: execution.workflow_type().as_str().to_string(),
            user_id: execution.user_id().to_string(),
        });

        Ok(execution)
    }
}

// ============================================================================
// AdvanceStep
// ============================================================================

/// 推进结果
#[derive(Debug, Clone)]
pub struct AdvanceStepResponse {
    pub execution: WorkflowExecution,
    pub transition: StepTransition,
}

/// AdvanceStep Handler
pub struct AdvanceStepHandler {
    store: Arc<WorkflowStore>,
    events: Arc<dyn EventPublisherPort>,
}

impl AdvanceStepHandler {
    pub fn new(store: Arc<WorkflowStore>, events: Arc<dyn EventPublisherPort>) -> Self {
        Self { store, events }
    }

    pub async fn handle(&self, command: AdvanceStep) -> Result<AdvanceStepResponse, ApplicationError> {
        let output = command.output_data;
        let (execution, transition) = self
            .store
            .mutate(command.workflow_id, move |w| w.advance(output))
            .await?;

        match &transition {
            StepTransition::Advanced { from, to } => {
                tracing::info!(workflow_id = %execution.id(), from = %from, to = %to, "Workflow step advanced");
            }
            StepTransition::Completed { last_step } => {
                tracing::info!(workflow_id = %execution.id(), last_step = %last_step, "Workflow completed");
            }
        }
        publish_step_changed(self.events.as_ref(), &execution);

        Ok(AdvanceStepResponse {
            execution,
            transition,
        })
    }
}

// ============================================================================
// TransitionWorkflow (rollback / pause / resume / cancel)
// ============================================================================

/// TransitionWorkflow Handler
pub struct TransitionWorkflowHandler {
    store: Arc<WorkflowStore>,
    events: Arc<dyn EventPublisherPort>,
}

impl TransitionWorkflowHandler {
    pub fn new(store: Arc<WorkflowStore>, events: Arc<dyn EventPublisherPort>) -> Self {
        Self { store, events }
    }

    pub async fn handle(
        &self,
        command: TransitionWorkflow,
    ) -> Result<WorkflowExecution, ApplicationError> {
        let action = command.action;
        let (execution, _) = self
            .store
            .mutate(command.workflow_id, move |w| match action {
                WorkflowAction::Rollback => w.rollback().map(|_| ()),
                WorkflowAction::Pause => w.pause(),
                WorkflowAction::Resume => w.resume(),
                WorkflowAction::Cancel => w.cancel(),
            })
            .await?;

        tracing::info!(
            workflow_id = %execution.id(),
            action = action.as_str(),
            current_step = %execution.current_step(),
            status = %execution.status(),
            "Workflow transitioned"
        );
        publish_step_changed(self.events.as_ref(), &execution);

        Ok(execution)
    }
}

// ============================================================================
// FailWorkflow
// ============================================================================

/// FailWorkflow Handler
pub struct FailWorkflowHandler {
    store: Arc<WorkflowStore>,
    events: Arc<dyn EventPublisherPort>,
}

impl FailWorkflowHandler {
    pub fn new(store: Arc<WorkflowStore>, events: Arc<dyn EventPublisherPort>) -> Self {
        Self { store, events }
    }

    pub async fn handle(&self, command: FailWorkflow) -> Result<WorkflowExecution, ApplicationError> {
        let reason = command.reason.clone();
        let (execution, _) = self
            .store
            .mutate(command.workflow_id, move |w| w.fail(reason))
            .await?;

        tracing::warn!(
            workflow_id = %execution.id(),
            step = %execution.current_step(),
            reason = %command.reason,
            "Workflow failed"
        );
        publish_step_changed(self.events.as_ref(), &execution);

        Ok(execution)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{QueryCachePort, QueryKey, WorkflowRepositoryPort};
    use crate::domain::workflow::{StepStatus, WorkflowStatus, WorkflowType};
    use crate::infrastructure::cache::InMemoryQueryCache;
    use crate::infrastructure::events::EventPublisher;
    use crate::infrastructure::persistence::sqlite::{create_test_pool, SqliteWorkflowRepository};
    use serde_json::json;
    use std::time::Duration;
    use uuid::Uuid;

    struct Fixture {
        start: StartWorkflowHandler,
        advance: AdvanceStepHandler,
        transition: TransitionWorkflowHandler,
        fail: FailWorkflowHandler,
        repo: Arc<dyn WorkflowRepositoryPort>,
        cache: Arc<dyn QueryCachePort>,
    }

    async fn fixture() -> Fixture {
        let pool = create_test_pool().await.unwrap();
        let repo: Arc<dyn WorkflowRepositoryPort> = Arc::new(SqliteWorkflowRepository::new(pool));
        let cache: Arc<dyn QueryCachePort> =
            Arc::new(InMemoryQueryCache::new(32, Duration::from_secs(60)));
        let store = WorkflowStore::new(repo.clone(), cache.clone()).arc();
        let events: Arc<dyn EventPublisherPort> = EventPublisher::new().arc();
        Fixture {
            start: StartWorkflowHandler::new(store.clone(), events.clone()),
            advance: AdvanceStepHandler::new(store.clone(), events.clone()),
            transition: TransitionWorkflowHandler::new(store.clone(), events.clone()),
            fail: FailWorkflowHandler::new(store, events),
            repo,
            cache,
        }
    }

    async fn start(f: &Fixture) -> Uuid {
        let wf = f
            .start
            .handle(StartWorkflow {
                user_id: "user-1".into(),
                workflow_type: WorkflowType::UserOnboarding,
                input_data: json!({ "source": "signup" }),
            })
            .await
            .unwrap();
        *wf.id().as_uuid()
    }

    #[tokio::test]
    async fn test_advance_persists_and_refreshes_cache() {
        let f = fixture().await;
        let id = start(&f).await;

        let response = f
            .advance
            .handle(AdvanceStep { workflow_id: id, output_data: json!({ "name": "Ada" }) })
            .await
            .unwrap();
        assert!(matches!(response.transition, StepTransition::Advanced { .. }));

        let stored = f.repo.find_by_id(*response.execution.id()).await.unwrap().unwrap();
        assert_eq!(stored.current_step(), "style_preferences");
        assert_eq!(stored.step_history().len(), 2);

        let cached = f.cache.get(&QueryKey::workflow(id)).unwrap();
        assert_eq!(cached["current_step"], "style_preferences");
    }

    #[tokio::test]
    async fn test_run_to_completion() {
        let f = fixture().await;
        let id = start(&f).await;

        for _ in 0..3 {
            f.advance.handle(AdvanceStep { workflow_id: id, output_data: json!({}) }).await.unwrap();
        }
        let last = f
            .advance
            .handle(AdvanceStep { workflow_id: id, output_data: json!({ "maker": "m-9" }) })
            .await
            .unwrap();

        assert!(matches!(last.transition, StepTransition::Completed { .. }));
        assert_eq!(last.execution.status(), WorkflowStatus::Completed);
        assert_eq!(last.execution.step_history().len(), 4);

        let err = f
            .advance
            .handle(AdvanceStep { workflow_id: id, output_data: json!({}) })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_unknown_workflow_is_not_found() {
        let f = fixture().await;
        let err = f
            .advance
            .handle(AdvanceStep { workflow_id: Uuid::new_v4(), output_data: json!({}) })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_rejected_transition_leaves_state_untouched() {
        let f = fixture().await;
        let id = start(&f).await;
        let before = f.cache.get(&QueryKey::workflow(id));

        let err = f
            .transition
            .handle(TransitionWorkflow { workflow_id: id, action: WorkflowAction::Rollback })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidState(_)));
        assert_eq!(f.cache.get(&QueryKey::workflow(id)), before);
    }

    #[tokio::test]
    async fn test_pause_resume_cancel_and_fail() {
        let f = fixture().await;
        let id = start(&f).await;

        let paused = f
            .transition
            .handle(TransitionWorkflow { workflow_id: id, action: WorkflowAction::Pause })
            .await
            .unwrap();
        assert_eq!(paused.status(), WorkflowStatus::Paused);

        let resumed = f
            .transition
            .handle(TransitionWorkflow { workflow_id: id, action: WorkflowAction::Resume })
            .await
            .unwrap();
        assert_eq!(resumed.status(), WorkflowStatus::Active);

        let failed = f
            .fail
            .handle(FailWorkflow { workflow_id: id, reason: "maker unavailable".into() })
            .await
            .unwrap();
        assert_eq!(failed.status(), WorkflowStatus::Failed);
        assert_eq!(failed.step_history()[0].status, StepStatus::Failed);

        let err = f
            .transition
            .handle(TransitionWorkflow { workflow_id: id, action: WorkflowAction::Cancel })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::InvalidState(_)));
    }

    #[tokio::test]
    async fn test_concurrent_advances_do_not_lose_updates() {
        let f = fixture().await;
        let id = start(&f).await;
        let advance = Arc::new(f.advance);

        let mut tasks = Vec::new();
        for i in 0..3 {
            let advance = advance.clone();
            tasks.push(tokio::spawn(async move {
                advance
                    .handle(AdvanceStep { workflow_id: id, output_data: json!({ "i": i }) })
                    .await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        let stored = f.repo.find_by_id(crate::domain::workflow::WorkflowId::from_uuid(id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.current_step(), "maker_discovery");
        assert_eq!(stored.step_history().len(), 4);
    }
}
