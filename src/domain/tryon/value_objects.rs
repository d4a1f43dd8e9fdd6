//! Try-On Context - Value Objects

use serde::{Deserialize, Serialize};

/// 合身度调整
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitAdjustment {
    Tight,
    #[default]
    Regular,
    Loose,
}

impl FitAdjustment {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitAdjustment::Tight => "tight",
            FitAdjustment::Regular => "regular",
            FitAdjustment::Loose => "loose",
        }
    }
}

/// 试穿参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TryOnSettings {
    #[serde(default)]
    pub fit_adjustment: FitAdjustment,
    #[serde(default = "default_true")]
    pub preserve_background: bool,
    #[serde(default = "default_true")]
    pub enhance_quality: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TryOnSettings {
    fn default() -> Self {
        Self {
            fit_adjustment: FitAdjustment::Regular,
            preserve_background: true,
            enhance_quality: true,
        }
    }
}

/// 试穿会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TryOnStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TryOnStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TryOnStatus::Pending => "pending",
            TryOnStatus::Processing => "processing",
            TryOnStatus::Completed => "completed",
            TryOnStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TryOnStatus::Pending),
            "processing" => Some(TryOnStatus::Processing),
            "completed" => Some(TryOnStatus::Completed),
            "failed" => Some(TryOnStatus::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = TryOnSettings::default();
        assert_eq!(settings.fit_adjustment, FitAdjustment::Regular);
        assert!(settings.preserve_background);
        assert!(settings.enhance_quality);
    }

    #[test]
    fn test_settings_partial_deserialize() {
        let settings: TryOnSettings =
            serde_json::from_str(r#"{"fit_adjustment":"loose"}"#).unwrap();
        assert_eq!(settings.fit_adjustment, FitAdjustment::Loose);
        assert!(settings.preserve_background);
    }
}
