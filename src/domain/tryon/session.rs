//! Try-On Context - Session Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{TryOnSettings, TryOnStatus};

/// 单次试穿会话
///
/// 状态只前进: pending -> processing -> completed | failed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TryOnSession {
    pub id: Uuid,
    /// 所属批次（单张试穿为 None）
    pub batch_id: Option<Uuid>,
    pub user_id: String,
    pub body_reference_url: String,
    pub clothing_image_url: String,
    pub generated_image_id: String,
    pub settings: TryOnSettings,
    pub status: TryOnStatus,
    pub result_url: Option<String>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryOnSession {
    pub fn new(
        user_id: impl Into<String>,
        body_reference_url: impl Into<String>,
        clothing_image_url: impl Into<String>,
        generated_image_id: impl Into<String>,
        settings: TryOnSettings,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            batch_id: None,
            user_id: user_id.into(),
            body_reference_url: body_reference_url.into(),
            clothing_image_url: clothing_image_url.into(),
            generated_image_id: generated_image_id.into(),
            settings,
            status: TryOnStatus::Pending,
            result_url: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn in_batch(mut self, batch_id: Uuid) -> Self {
        self.batch_id = Some(batch_id);
        self
    }

    pub fn mark_processing(&mut self) {
        self.status = TryOnStatus::Processing;
        self.updated_at = Utc::now();
    }

    pub fn complete(&mut self, result_url: impl Into<String>) {
        self.status = TryOnStatus::Completed;
        self.result_url = Some(result_url.into());
        self.error_message = None;
        self.updated_at = Utc::now();
    }

    pub fn fail(&mut self, message: impl Into<String>) {
        self.status = TryOnStatus::Failed;
        self.error_message = Some(message.into());
        self.updated_at = Utc::now();
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status, TryOnStatus::Completed | TryOnStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_lifecycle() {
        let mut session = TryOnSession::new(
            "user-1",
            "https://cdn/body.png",
            "https://cdn/shirt.png",
            "img-1",
            TryOnSettings::default(),
        );
        assert_eq!(session.status, TryOnStatus::Pending);
        assert!(!session.is_finished());

        session.mark_processing();
        assert_eq!(session.status, TryOnStatus::Processing);

        session.complete("https://cdn/result.png");
        assert_eq!(session.status, TryOnStatus::Completed);
        assert_eq!(session.result_url.as_deref(), Some("https://cdn/result.png"));
        assert!(session.is_finished());
    }

    #[test]
    fn test_session_failure_keeps_message() {
        let mut session = TryOnSession::new("u", "b", "c", "g", TryOnSettings::default());
        session.mark_processing();
        session.fail("model overloaded");
        assert_eq!(session.status, TryOnStatus::Failed);
        assert_eq!(session.error_message.as_deref(), Some("model overloaded"));
        assert!(session.result_url.is_none());
    }
}
