//! Event Publisher Implementation
//!
//! 基于 broadcast channel 的事件推送，WebSocket 连接订阅全局通道

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::application::ports::{AppEvent, EventPublisherPort};

/// 默认通道容量
const CHANNEL_CAPACITY: usize = 100;

/// 事件发布器
pub struct EventPublisher {
    global_channel: broadcast::Sender<AppEvent>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (global_tx, _) = broadcast::channel(capacity.max(1));
        Self {
            global_channel: global_tx,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 订阅全局事件
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.global_channel.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.global_channel.receiver_count()
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventPublisherPort for EventPublisher {
    fn publish(&self, event: AppEvent) {
        let name = event.name();
        if let Err(e) = self.global_channel.send(event) {
            tracing::debug!(
                event = name,
                error = %e,
                "Failed to publish event (no receivers)"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_publish_reaches_subscribers() {
        let publisher = EventPublisher::new();
        let mut rx = publisher.subscribe();
        let batch_id = Uuid::new_v4();

        publisher.publish(AppEvent::BatchCompleted {
            batch_id,
            succeeded: 2,
            failed: 1,
            cancelled: 0,
        });

        match rx.recv().await.unwrap() {
            AppEvent::BatchCompleted { batch_id: id, succeeded, .. } => {
                assert_eq!(id, batch_id);
                assert_eq!(succeeded, 2);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_publish_without_receivers_is_silent() {
        let publisher = EventPublisher::new();
        publisher.publish(AppEvent::QuoteGenerated {
            quote_id: Uuid::new_v4(),
            final_price: 10.0,
            timeline: 7,
        });
        assert_eq!(publisher.receiver_count(), 0);
    }

    #[test]
    fn test_event_wire_format() {
        let event = AppEvent::WorkflowStepChanged {
            workflow_id: Uuid::nil(),
            current_step: "design_generation".into(),
            status: "active".into(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "WorkflowStepChanged");
        assert_eq!(json["data"]["current_step"], "design_generation");
    }
}
