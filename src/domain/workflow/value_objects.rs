//! Workflow Context - Value Objects

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// 工作流实例唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowId(Uuid);

impl WorkflowId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for WorkflowId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for WorkflowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

const DESIGN_TO_MANUFACTURING: &[&str] = &[
    "input_processing",
    "design_generation",
    "design_validation",
    "design_optimization",
    "production_routing",
    "quote_generation",
    "production_execution",
    "quality_control",
    "packaging_shipping",
    "feedback_collection",
];

const ORDER_FULFILLMENT: &[&str] = &[
    "order_confirmation",
    "material_sourcing",
    "production_execution",
    "quality_control",
    "packaging_shipping",
    "delivery",
];

const USER_ONBOARDING: &[&str] = &[
    "profile_setup",
    "style_preferences",
    "first_design",
    "maker_discovery",
];

/// 工作流类型，每种类型对应一张固定的步骤表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowType {
    DesignToManufacturing,
    OrderFulfillment,
    UserOnboarding,
}

impl WorkflowType {
    /// 有序步骤表
    pub fn steps(&self) -> &'static [&'static str] {
        match self {
            WorkflowType::DesignToManufacturing => DESIGN_TO_MANUFACTURING,
            WorkflowType::OrderFulfillment => ORDER_FULFILLMENT,
            WorkflowType::UserOnboarding => USER_ONBOARDING,
        }
    }

    pub fn first_step(&self) -> &'static str {
        self.steps()[0]
    }

    pub fn step_index(&self, step: &str) -> Option<usize> {
        self.steps().iter().position(|s| *s == step)
    }

    /// 下一步，终止步骤返回 None
    pub fn next_step(&self, step: &str) -> Option<&'static str> {
        let index = self.step_index(step)?;
        self.steps().get(index + 1).copied()
    }

    pub fn previous_step(&self, step: &str) -> Option<&'static str> {
        let index = self.step_index(step)?;
        index.checked_sub(1).map(|i| self.steps()[i])
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowType::DesignToManufacturing => "design_to_manufacturing",
            WorkflowType::OrderFulfillment => "order_fulfillment",
            WorkflowType::UserOnboarding => "user_onboarding",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "design_to_manufacturing" => Some(WorkflowType::DesignToManufacturing),
            "order_fulfillment" => Some(WorkflowType::OrderFulfillment),
            "user_onboarding" => Some(WorkflowType::UserOnboarding),
            _ => None,
        }
    }
}

impl std::fmt::Display for WorkflowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 工作流状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Active,
    Paused,
    Completed,
    Failed,
    Cancelled,
}

impl WorkflowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStatus::Active => "active",
            WorkflowStatus::Paused => "paused",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Failed => "failed",
            WorkflowStatus::Cancelled => "cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(WorkflowStatus::Active),
            "paused" => Some(WorkflowStatus::Paused),
            "completed" => Some(WorkflowStatus::Completed),
            "failed" => Some(WorkflowStatus::Failed),
            "cancelled" => Some(WorkflowStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowStatus::Completed | WorkflowStatus::Failed | WorkflowStatus::Cancelled
        )
    }
}

impl std::fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单条步骤记录状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Pending,
    Completed,
    Failed,
    RolledBack,
}

/// 步骤历史记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStepData {
    pub step_name: String,
    pub status: StepStatus,
    pub input_data: Value,
    pub output_data: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl WorkflowStepData {
    pub fn pending(step_name: impl Into<String>, input_data: Value) -> Self {
        Self {
            step_name: step_name.into(),
            status: StepStatus::Pending,
            input_data,
            output_data: None,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_tables() {
        assert_eq!(WorkflowType::DesignToManufacturing.steps().len(), 10);
        assert_eq!(WorkflowType::OrderFulfillment.steps().len(), 6);
        assert_eq!(WorkflowType::UserOnboarding.steps().len(), 4);
        assert_eq!(
            WorkflowType::DesignToManufacturing.first_step(),
            "input_processing"
        );
    }

    #[test]
    fn test_next_and_previous_step() {
        let wt = WorkflowType::UserOnboarding;
        assert_eq!(wt.next_step("profile_setup"), Some("style_preferences"));
        assert_eq!(wt.next_step("maker_discovery"), None);
        assert_eq!(wt.previous_step("profile_setup"), None);
        assert_eq!(wt.previous_step("first_design"), Some("style_preferences"));
        assert_eq!(wt.next_step("delivery"), None);
    }

    #[test]
    fn test_type_and_status_strings() {
        for wt in [
            WorkflowType::DesignToManufacturing,
            WorkflowType::OrderFulfillment,
            WorkflowType::UserOnboarding,
        ] {
            assert_eq!(WorkflowType::from_str(wt.as_str()), Some(wt));
        }
        assert_eq!(WorkflowStatus::from_str("paused"), Some(WorkflowStatus::Paused));
        assert!(WorkflowStatus::Cancelled.is_terminal());
        assert!(!WorkflowStatus::Paused.is_terminal());
    }
}
