//! Try-On Context - Batch Results

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::TryOnSession;

/// 批量中单个条目的结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchItemOutcome {
    Succeeded {
        index: usize,
        session: TryOnSession,
    },
    Failed {
        index: usize,
        /// 会话创建前就失败时为 None
        session_id: Option<Uuid>,
        error: String,
    },
    /// 批次被取消时尚未开始的条目
    Cancelled { index: usize },
}

impl BatchItemOutcome {
    pub fn index(&self) -> usize {
        match self {
            BatchItemOutcome::Succeeded { index, .. }
            | BatchItemOutcome::Failed { index, .. }
            | BatchItemOutcome::Cancelled { index } => *index,
        }
    }
}

/// 批量试穿结果，outcomes 按输入顺序排列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchTryOnResult {
    pub batch_id: Uuid,
    pub outcomes: Vec<BatchItemOutcome>,
}

impl BatchTryOnResult {
    /// 所有已创建的会话 id（成功与失败）
    pub fn session_ids(&self) -> Vec<Uuid> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                BatchItemOutcome::Succeeded { session, .. } => Some(session.id),
                BatchItemOutcome::Failed { session_id, .. } => *session_id,
                BatchItemOutcome::Cancelled { .. } => None,
            })
            .collect()
    }

    pub fn results(&self) -> Vec<&TryOnSession> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                BatchItemOutcome::Succeeded { session, .. } => Some(session),
                _ => None,
            })
            .collect()
    }

    pub fn failed_indices(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, BatchItemOutcome::Failed { .. }))
            .map(BatchItemOutcome::index)
            .collect()
    }

    pub fn cancelled_indices(&self) -> Vec<usize> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, BatchItemOutcome::Cancelled { .. }))
            .map(BatchItemOutcome::index)
            .collect()
    }
}

/// 批量进度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    pub completed: usize,
    pub failed: usize,
    pub total: usize,
    pub estimated_secs_remaining: u64,
}

impl BatchProgress {
    pub fn new(completed: usize, failed: usize, total: usize, secs_per_item: u64) -> Self {
        let remaining = total.saturating_sub(completed + failed) as u64;
        Self {
            completed,
            failed,
            total,
            estimated_secs_remaining: remaining * secs_per_item,
        }
    }

    pub fn processed(&self) -> usize {
        self.completed + self.failed
    }

    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        self.processed() as f64 / self.total as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tryon::TryOnSettings;

    fn session(i: usize) -> TryOnSession {
        TryOnSession::new("u", "body", format!("cloth-{i}"), format!("img-{i}"), TryOnSettings::default())
    }

    #[test]
    fn test_views_partition_indices() {
        let failed_id = Uuid::new_v4();
        let result = BatchTryOnResult {
            batch_id: Uuid::new_v4(),
            outcomes: vec![
                BatchItemOutcome::Succeeded { index: 0, session: session(0) },
                BatchItemOutcome::Failed { index: 1, session_id: Some(failed_id), error: "boom".into() },
                BatchItemOutcome::Succeeded { index: 2, session: session(2) },
                BatchItemOutcome::Cancelled { index: 3 },
            ],
        };

        assert_eq!(result.results().len(), 2);
        assert_eq!(result.failed_indices(), vec![1]);
        assert_eq!(result.cancelled_indices(), vec![3]);
        assert_eq!(result.session_ids().len(), 3);
        assert!(result.session_ids().contains(&failed_id));
    }

    #[test]
    fn test_progress_estimate() {
        let progress = BatchProgress::new(2, 1, 5, 25);
        assert_eq!(progress.estimated_secs_remaining, 50);
        assert_eq!(progress.processed(), 3);
        assert_eq!(progress.percent(), 60.0);

        let done = BatchProgress::new(4, 1, 5, 25);
        assert_eq!(done.estimated_secs_remaining, 0);
    }
}
