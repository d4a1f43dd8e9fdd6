//! Try-On Command Handlers
//!
//! 批量试穿严格串行：每个条目独立成功或失败，失败不会中断批次

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::application::commands::BatchTryOn;
use crate::application::error::ApplicationError;
use crate::application::ports::{
    virtual_tryon, AppEvent, EdgeFunctionPort, EventPublisherPort, TryOnSessionRepositoryPort,
    VirtualTryOnRequest,
};
use crate::domain::tryon::{BatchItemOutcome, BatchProgress, BatchTryOnResult, TryOnSession};

/// 默认单张试穿的预估耗时（秒）
pub const DEFAULT_SECS_PER_ITEM: u64 = 25;

/// BatchTryOn Handler
pub struct BatchTryOnHandler {
    session_repo: Arc<dyn TryOnSessionRepositoryPort>,
    gateway: Arc<dyn EdgeFunctionPort>,
    events: Arc<dyn EventPublisherPort>,
    secs_per_item: u64,
}

impl BatchTryOnHandler {
    pub fn new(
        session_repo: Arc<dyn TryOnSessionRepositoryPort>,
        gateway: Arc<dyn EdgeFunctionPort>,
        events: Arc<dyn EventPublisherPort>,
    ) -> Self {
        Self {
            session_repo,
            gateway,
            events,
            secs_per_item: DEFAULT_SECS_PER_ITEM,
        }
    }

    pub fn with_secs_per_item(mut self, secs_per_item: u64) -> Self {
        self.secs_per_item = secs_per_item;
        self
    }

    pub async fn handle(&self, command: BatchTryOn) -> Result<BatchTryOnResult, ApplicationError> {
        self.handle_with_cancellation(command, CancellationToken::new())
            .await
    }

    /// 取消只在条目之间检查；进行中的条目总会执行完
    pub async fn handle_with_cancellation(
        &self,
        command: BatchTryOn,
        cancel: CancellationToken,
    ) -> Result<BatchTryOnResult, ApplicationError> {
        validate(&command)?;

        let batch_id = Uuid::new_v4();
        let total = command.clothing_image_urls.len();
        let mut outcomes = Vec::with_capacity(total);
        let (mut completed, mut failed) = (0usize, 0usize);

        tracing::info!(
            batch_id = %batch_id,
            user_id = %command.user_id,
            total,
            "Batch try-on started"
        );

        let items = command
            .clothing_image_urls
            .iter()
            .zip(command.generated_image_ids.iter())
            .enumerate();

        for (index, (clothing_url, image_id)) in items {
            if cancel.is_cancelled() {
                outcomes.push(BatchItemOutcome::Cancelled { index });
                continue;
            }

            let session = TryOnSession::new(
                command.user_id.clone(),
                command.body_image_url.clone(),
                clothing_url.clone(),
                image_id.clone(),
                command.settings,
            )
            .in_batch(batch_id);

            let outcome = self.process_item(index, session).await;
            match &outcome {
                BatchItemOutcome::Succeeded { .. } => completed += 1,
                BatchItemOutcome::Failed { .. } => failed += 1,
                BatchItemOutcome::Cancelled { .. } => {}
            }
            outcomes.push(outcome);

            let progress = BatchProgress::new(completed, failed, total, self.secs_per_item);
            self.events
                .publish(AppEvent::batch_progress(batch_id, &progress));
        }

        let result = BatchTryOnResult { batch_id, outcomes };
        let cancelled = result.cancelled_indices().len();

        tracing::info!(
            batch_id = %batch_id,
            succeeded = completed,
            failed,
            cancelled,
            "Batch try-on finished"
        );
        self.events.publish(AppEvent::BatchCompleted {
            batch_id,
            succeeded: completed,
            failed,
            cancelled,
        });

        Ok(result)
    }

    async fn process_item(&self, index: usize, mut session: TryOnSession) -> BatchItemOutcome {
        if let Err(e) = self.session_repo.save(&session).await {
            tracing::warn!(index, error = %e, "Failed to create try-on session");
            return BatchItemOutcome::Failed {
                index,
                session_id: None,
                error: e.to_string(),
            };
        }

        session.mark_processing();
        if let Err(e) = self.session_repo.save(&session).await {
            return self.record_failure(index, session, e.to_string()).await;
        }

        let request = VirtualTryOnRequest {
            session_id: session.id,
            body_image_url: session.body_reference_url.clone(),
            clothing_image_url: session.clothing_image_url.clone(),
            settings: session.settings.into(),
        };

        match virtual_tryon(self.gateway.as_ref(), &request).await {
            Ok(response) => {
                session.complete(response.result_url);
                if let Err(e) = self.session_repo.save(&session).await {
                    tracing::warn!(session_id = %session.id, error = %e, "Failed to store try-on result");
                }
                tracing::debug!(session_id = %session.id, index, "Try-on item completed");
                BatchItemOutcome::Succeeded { index, session }
            }
            Err(e) => self.record_failure(index, session, e.to_string()).await,
        }
    }

    async fn record_failure(
        &self,
        index: usize,
        mut session: TryOnSession,
        error: String,
    ) -> BatchItemOutcome {
        tracing::warn!(session_id = %session.id, index, error = %error, "Try-on item failed");
        session.fail(error.clone());
        if let Err(e) = self.session_repo.save(&session).await {
            tracing::warn!(session_id = %session.id, error = %e, "Failed to store try-on failure");
        }
        BatchItemOutcome::Failed {
            index,
            session_id: Some(session.id),
            error,
        }
    }
}

fn validate(command: &BatchTryOn) -> Result<(), ApplicationError> {
    if command.clothing_image_urls.is_empty() {
        return Err(ApplicationError::validation("至少需要一张服装图片"));
    }
    if command.clothing_image_urls.len() != command.generated_image_ids.len() {
        return Err(ApplicationError::validation(format!(
            "服装图片数量 ({}) 与生成图片 id 数量 ({}) 不一致",
            command.clothing_image_urls.len(),
            command.generated_image_ids.len()
        )));
    }
    if command.body_image_url.trim().is_empty() {
        return Err(ApplicationError::validation("body_image_url 不能为空"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tryon::{TryOnSettings, TryOnStatus};
    use crate::infrastructure::adapters::edge::FakeEdgeClient;
    use crate::infrastructure::events::EventPublisher;
    use crate::infrastructure::persistence::sqlite::{create_test_pool, SqliteTryOnSessionRepository};

    fn command(n: usize) -> BatchTryOn {
        BatchTryOn {
            user_id: "user-1".into(),
            body_image_url: "https://cdn/body.png".into(),
            clothing_image_urls: (0..n).map(|i| format!("https://cdn/cloth-{i}.png")).collect(),
            generated_image_ids: (0..n).map(|i| format!("img-{i}")).collect(),
            settings: TryOnSettings::default(),
        }
    }

    async fn handler(
        gateway: Arc<FakeEdgeClient>,
    ) -> (BatchTryOnHandler, Arc<dyn TryOnSessionRepositoryPort>, Arc<EventPublisher>) {
        let pool = create_test_pool().await.unwrap();
        let repo: Arc<dyn TryOnSessionRepositoryPort> =
            Arc::new(SqliteTryOnSessionRepository::new(pool));
        let events = EventPublisher::new().arc();
        let handler = BatchTryOnHandler::new(repo.clone(), gateway, events.clone());
        (handler, repo, events)
    }

    #[tokio::test]
    async fn test_failures_partition_the_batch() {
        let gateway = FakeEdgeClient::new().failing_calls([1, 3]).arc();
        let (handler, repo, _) = handler(gateway.clone()).await;

        let result = handler.handle(command(5)).await.unwrap();

        assert_eq!(result.outcomes.len(), 5);
        assert_eq!(result.failed_indices(), vec![1, 3]);
        let succeeded: Vec<usize> = result
            .outcomes
            .iter()
            .filter(|o| matches!(o, BatchItemOutcome::Succeeded { .. }))
            .map(BatchItemOutcome::index)
            .collect();
        assert_eq!(succeeded, vec![0, 2, 4]);
        assert_eq!(result.session_ids().len(), 5);
        assert_eq!(gateway.invocation_count(), 5);

        let stored = repo.find_by_batch(result.batch_id).await.unwrap();
        assert_eq!(stored.len(), 5);
        let failed = stored.iter().filter(|s| s.status == TryOnStatus::Failed).count();
        assert_eq!(failed, 2);
        assert!(stored
            .iter()
            .filter(|s| s.status == TryOnStatus::Completed)
            .all(|s| s.result_url.is_some()));
    }

    #[tokio::test]
    async fn test_items_are_sent_in_order() {
        let gateway = FakeEdgeClient::new().arc();
        let (handler, _, _) = handler(gateway.clone()).await;

        handler.handle(command(3)).await.unwrap();

        let urls: Vec<String> = gateway
            .invocations()
            .iter()
            .map(|(_, payload)| payload["clothingImageUrl"].as_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(
            urls,
            vec![
                "https://cdn/cloth-0.png",
                "https://cdn/cloth-1.png",
                "https://cdn/cloth-2.png"
            ]
        );
    }

    #[tokio::test]
    async fn test_progress_events() {
        let gateway = FakeEdgeClient::new().failing_calls([0]).arc();
        let (handler, _, events) = handler(gateway).await;
        let handler = handler.with_secs_per_item(10);
        let mut rx = events.subscribe();

        handler.handle(command(2)).await.unwrap();

        match rx.recv().await.unwrap() {
            AppEvent::BatchProgress { completed, failed, total, estimated_secs_remaining, .. } => {
                assert_eq!((completed, failed, total), (0, 1, 2));
                assert_eq!(estimated_secs_remaining, 10);
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(matches!(rx.recv().await.unwrap(), AppEvent::BatchProgress { estimated_secs_remaining: 0, .. }));
        assert!(matches!(
            rx.recv().await.unwrap(),
            AppEvent::BatchCompleted { succeeded: 1, failed: 1, cancelled: 0, .. }
        ));
    }

    #[tokio::test]
    async fn test_cancelled_batch_reports_remaining_items() {
        let gateway = FakeEdgeClient::new().arc();
        let (handler, _, _) = handler(gateway.clone()).await;
        let token = CancellationToken::new();
        token.cancel();

        let result = handler
            .handle_with_cancellation(command(3), token)
            .await
            .unwrap();

        assert_eq!(result.cancelled_indices(), vec![0, 1, 2]);
        assert!(result.failed_indices().is_empty());
        assert_eq!(gateway.invocation_count(), 0);
    }

    #[tokio::test]
    async fn test_cancel_between_items_keeps_in_flight_item() {
        let token = CancellationToken::new();
        let trigger = token.clone();
        let gateway = FakeEdgeClient::new()
            .with_hook(move |call| {
                if call == 1 {
                    trigger.cancel();
                }
            })
            .arc();
        let (handler, _, _) = handler(gateway.clone()).await;

        let result = handler
            .handle_with_cancellation(command(4), token)
            .await
            .unwrap();

        assert_eq!(result.results().len(), 2);
        assert_eq!(result.cancelled_indices(), vec![2, 3]);
        assert_eq!(gateway.invocation_count(), 2);
    }

    #[tokio::test]
    async fn test_validation() {
        let (handler, _, _) = handler(FakeEdgeClient::new().arc()).await;

        let err = handler.handle(command(0)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));

        let mut mismatched = command(2);
        mismatched.generated_image_ids.pop();
        let err = handler.handle(mismatched).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }
}
